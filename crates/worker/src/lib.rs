//! `leadflow-worker` — job dispatch and tracking engine.
//!
//! ## Components
//!
//! - `JobHistory`: bounded, insertion-ordered record of job executions
//! - `Dispatcher`: routes typed job descriptions to registered handlers and
//!   records each job's lifecycle and outcome
//! - `DownstreamClient`: outbound calls to the service that performs the
//!   actual enrichment/scoring/discovery/pipeline work
//! - `handlers`: the ten built-in job handlers
//!
//! ## Design
//!
//! - Many `process()` calls may be in flight concurrently; the history store
//!   is the only shared mutable resource and no lock is held across an await
//! - Batch handlers isolate per-item failures; single-unit handlers propagate
//! - The dispatcher records a failure before re-raising it, so a caller that
//!   observes the error is guaranteed the terminal record is already visible

pub mod dispatcher;
pub mod downstream;
pub mod handlers;
pub mod history;

pub use dispatcher::{DispatchError, Dispatcher, HandlerError, JobHandler, ProcessOutcome};
pub use downstream::{DownstreamClient, DownstreamConfig, DownstreamError, HttpDownstreamClient};
pub use history::{HistoryError, JobHistory, MAX_HISTORY};
