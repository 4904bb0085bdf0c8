//! `leadflow-core` — domain foundation for the job worker.
//!
//! This crate contains **pure domain** types (no infrastructure concerns):
//! job identifiers, the inbound job description, and the lifecycle record
//! kept for every dispatched job.

pub mod error;
pub mod id;
pub mod job;

pub use error::{DomainError, DomainResult};
pub use id::JobId;
pub use job::{JobRecord, JobRequest, JobStatus};
