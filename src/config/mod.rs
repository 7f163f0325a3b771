//! Configuration models for processors.

pub mod processor;

pub use processor::ProcessorConfig;
