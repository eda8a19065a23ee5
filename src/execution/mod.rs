//! Pipeline execution
//!
//! Topological driving of a validated pipeline over an opaque task runner.

pub mod driver;

pub use driver::{
    Dataset, DatasetOrigin, Driver, EventHandler, ExecutionEvent, LoggingRunner, RunStatus,
    RunSummary, TaskRunner,
};
