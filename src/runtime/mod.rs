//! Runtime adapters for spawning the processor's dispatch task.

pub mod tokio_spawner;

pub use tokio_spawner::TokioSpawner;
