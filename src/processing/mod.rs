//! Background processing of uploaded documents

mod queue;
mod worker;

pub use queue::{IngestHandle, IngestOutcome, IngestQueue, IngestTask};
pub use worker::IngestWorker;
