//! `leadflow-api` — thin HTTP transport over the job worker core.
//!
//! No state or policy lives here; everything routes through
//! `leadflow_worker::Dispatcher`.

pub mod app;
