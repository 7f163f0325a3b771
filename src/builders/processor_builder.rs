//! Builder constructing a [`Processor`] from configuration.

use chrono::{DateTime, Utc};

use crate::config::ProcessorConfig;
use crate::core::{ItemExecutor, Processor, ProcessorError, Queueable, Spawn};
use crate::util::{Clock, SystemClock};

/// Collects configuration and a clock, then starts a [`Processor`].
///
/// ```rust,ignore
/// let processor = ProcessorBuilder::new(ProcessorConfig::from_env()?)
///     .with_initial_capacity(256)
///     .build(executor, &TokioSpawner::new(handle))?;
/// ```
pub struct ProcessorBuilder<C = SystemClock> {
    config: ProcessorConfig,
    clock: C,
}

impl ProcessorBuilder<SystemClock> {
    /// Start from `config` with the system clock.
    pub const fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> ProcessorBuilder<C> {
    /// Configuration the processor will be started with.
    pub const fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Replace the clock used to decide which items are due.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> ProcessorBuilder<C2> {
        ProcessorBuilder {
            config: self.config,
            clock,
        }
    }

    /// Override the initial queue capacity.
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.config.initial_capacity = initial_capacity;
        self
    }

    /// Override whether enqueueing an existing key replaces it.
    #[must_use]
    pub fn with_replace_existing(mut self, replace_existing: bool) -> Self {
        self.config.replace_existing = replace_existing;
        self
    }

    /// Validate the configuration and start the processor.
    pub fn build<T, E, S>(self, executor: E, spawner: &S) -> Result<Processor<T>, ProcessorError>
    where
        T: Queueable<Time = DateTime<Utc>> + Send + 'static,
        T::Key: Send,
        E: ItemExecutor<T>,
        S: Spawn,
    {
        Processor::start(&self.config, executor, self.clock, spawner)
    }
}
