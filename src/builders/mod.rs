//! Builders to construct processors from configuration.

pub mod processor_builder;

pub use processor_builder::ProcessorBuilder;
