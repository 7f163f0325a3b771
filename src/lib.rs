//! # Prometheus Timer Queue
//!
//! A time-ordered, uniquely-keyed priority queue and a processor that fires
//! queued items when they fall due.
//!
//! Reminder and timer services keep large sets of pending items, each with a due
//! time and an identity. They need the earliest item at all times, but also need
//! to reschedule or cancel an arbitrary item by its identity without scanning.
//! This crate provides that structure and the dispatch loop built on top of it.
//!
//! ## Key Features
//!
//! - **Indexed min-heap**: O(1) peek and existence checks, O(log n) insert, pop,
//!   update and remove by key
//! - **Deduplication**: inserting a pending key either keeps the first item or
//!   replaces it, chosen per call
//! - **Race-tolerant**: updating or removing an absent key is a no-op
//! - **Bring your own lock**: the queue is unsynchronized; [`sync::SharedQueue`]
//!   wraps it in a single `parking_lot` mutex when sharing is needed
//! - **Processor**: a tokio dispatch task that sleeps until the next item is due
//!   and hands it to an executor
//!
//! ## PriorityQueue
//!
//! ```rust
//! use prometheus_timer_queue::core::{PriorityQueue, Queueable};
//!
//! #[derive(Debug)]
//! struct Reminder {
//!     name: String,
//!     due_secs: u64,
//! }
//!
//! impl Queueable for Reminder {
//!     type Key = String;
//!     type Time = u64;
//!     fn key(&self) -> &String { &self.name }
//!     fn scheduled_time(&self) -> u64 { self.due_secs }
//! }
//!
//! let mut queue = PriorityQueue::new();
//! queue.insert(Reminder { name: "standup".into(), due_secs: 900 }, false);
//! queue.insert(Reminder { name: "lunch".into(), due_secs: 1200 }, false);
//!
//! // Reschedule without knowing whether it moves earlier or later.
//! queue.update(Reminder { name: "lunch".into(), due_secs: 600 });
//! assert_eq!(queue.peek().map(|r| r.name.as_str()), Some("lunch"));
//!
//! queue.remove("lunch");
//! assert_eq!(queue.pop().map(|r| r.due_secs), Some(900));
//! assert!(queue.pop().is_none());
//! ```
//!
//! ## Processor
//!
//! ```rust,ignore
//! use prometheus_timer_queue::builders::ProcessorBuilder;
//! use prometheus_timer_queue::config::ProcessorConfig;
//! use prometheus_timer_queue::core::FnExecutor;
//! use prometheus_timer_queue::runtime::TokioSpawner;
//!
//! let processor = ProcessorBuilder::new(ProcessorConfig::from_env()?)
//!     .build(FnExecutor::new(fire_reminder), &TokioSpawner::new(handle))?;
//!
//! processor.enqueue(reminder)?;
//! processor.dequeue("actor||id||name")?;
//! processor.close().await?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core queue abstractions, executors and the processor.
pub mod core;
/// Configuration models for processors.
pub mod config;
/// Builders to construct processors from configuration.
#[cfg(feature = "tokio-runtime")]
pub mod builders;
/// Runtime adapters used to spawn the dispatch task.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Mutex-guarded queue handle for shared access.
pub mod sync;
/// Shared utilities.
pub mod util;
