//! Core queue abstractions and the due-time processor.

pub mod error;
pub mod executor;
#[cfg(feature = "tokio-runtime")]
pub mod processor;
pub mod queue;

pub use error::{AppResult, ProcessorError};
pub use executor::{FnExecutor, ItemExecutor};
#[cfg(feature = "tokio-runtime")]
pub use processor::{Processor, Spawn};
pub use queue::{PriorityQueue, Queueable};
