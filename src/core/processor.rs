//! Due-time processor driving a shared priority queue.
//!
//! A [`Processor`] owns a [`SharedQueue`] and a single dispatch task. The task
//! sleeps until the earliest item is due, pops it and hands it to an
//! [`ItemExecutor`]. Enqueueing or dequeueing wakes the task so it can re-arm its
//! sleep against the new head of the queue.
//!
//! # Example
//!
//! ```rust,ignore
//! use prometheus_timer_queue::config::ProcessorConfig;
//! use prometheus_timer_queue::core::{FnExecutor, Processor};
//! use prometheus_timer_queue::runtime::TokioSpawner;
//! use prometheus_timer_queue::util::SystemClock;
//!
//! let processor = Processor::start(
//!     &ProcessorConfig::new("reminders"),
//!     FnExecutor::new(|r: Reminder| println!("fired {}", r.name)),
//!     SystemClock,
//!     &TokioSpawner::new(tokio::runtime::Handle::current()),
//! )?;
//!
//! processor.enqueue(reminder)?;
//! processor.close().await?;
//! ```

use std::borrow::Borrow;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Notify};

use crate::config::ProcessorConfig;
use crate::core::{ItemExecutor, ProcessorError, Queueable};
use crate::sync::SharedQueue;
use crate::util::Clock;

/// Abstraction for spawning the dispatch task on a runtime.
pub trait Spawn {
    /// Spawn a future that runs to completion in the background.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// State shared between the processor handle and its dispatch task.
struct Shared<T: Queueable> {
    queue: SharedQueue<T>,
    /// Signalled whenever the head of the queue may have changed or on close.
    wake: Notify,
    stopped: AtomicBool,
}

impl<T: Queueable> Shared<T> {
    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Dispatches queued items to an executor once their scheduled time arrives.
///
/// Items are executed one at a time, in non-decreasing scheduled time.
pub struct Processor<T: Queueable> {
    name: String,
    replace_existing: bool,
    shared: Arc<Shared<T>>,
    /// Flips to `true` when the dispatch task exits.
    done: watch::Receiver<bool>,
}

impl<T> Processor<T>
where
    T: Queueable<Time = DateTime<Utc>> + Send + 'static,
    T::Key: Send,
{
    /// Validate `config` and start the dispatch task on `spawner`.
    pub fn start<E, C, S>(
        config: &ProcessorConfig,
        executor: E,
        clock: C,
        spawner: &S,
    ) -> Result<Self, ProcessorError>
    where
        E: ItemExecutor<T>,
        C: Clock,
        S: Spawn,
    {
        config.validate().map_err(ProcessorError::InvalidConfig)?;

        let shared = Arc::new(Shared {
            queue: SharedQueue::with_capacity(config.initial_capacity),
            wake: Notify::new(),
            stopped: AtomicBool::new(false),
        });
        let (done_tx, done_rx) = watch::channel(false);

        spawner.spawn(dispatch_loop(
            config.name.clone(),
            Arc::clone(&shared),
            executor,
            clock,
            done_tx,
        ));
        tracing::info!(processor = %config.name, "processor started");

        Ok(Self {
            name: config.name.clone(),
            replace_existing: config.replace_existing,
            shared,
            done: done_rx,
        })
    }

    /// Name from the configuration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schedule an item.
    ///
    /// A pending item with the same key is replaced when the processor was
    /// configured with `replace_existing`, otherwise the new item is dropped.
    pub fn enqueue(&self, item: T) -> Result<(), ProcessorError> {
        self.enqueue_all(std::iter::once(item))
    }

    /// Schedule several items with a single wake-up of the dispatch task.
    pub fn enqueue_all<I>(&self, items: I) -> Result<(), ProcessorError>
    where
        I: IntoIterator<Item = T>,
    {
        if self.shared.is_stopped() {
            return Err(ProcessorError::Stopped);
        }
        let mut added = 0usize;
        {
            let mut queue = self.shared.queue.lock();
            for item in items {
                queue.insert(item, self.replace_existing);
                added += 1;
            }
        }
        tracing::debug!(processor = %self.name, added, "items enqueued");
        self.shared.wake.notify_one();
        Ok(())
    }

    /// Remove a pending item, returning it if it had not fired yet.
    pub fn dequeue<Q>(&self, key: &Q) -> Result<Option<T>, ProcessorError>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.shared.is_stopped() {
            return Err(ProcessorError::Stopped);
        }
        let removed = self.shared.queue.remove(key);
        if removed.is_some() {
            tracing::debug!(processor = %self.name, "item dequeued");
            self.shared.wake.notify_one();
        }
        Ok(removed)
    }

    /// Number of pending items.
    pub fn len(&self) -> usize {
        self.shared.queue.len()
    }

    /// Returns `true` if no items are pending.
    pub fn is_empty(&self) -> bool {
        self.shared.queue.is_empty()
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_stopped(&self) -> bool {
        self.shared.is_stopped()
    }

    /// Stop the dispatch task and wait for it to exit.
    ///
    /// Pending items stay in the queue and are not executed. If an item is being
    /// executed, this waits for the executor to return. Every caller waits,
    /// including ones racing an earlier `close`; once the task has exited,
    /// further calls return immediately.
    pub async fn close(&self) -> Result<(), ProcessorError> {
        let first = !self.shared.stopped.swap(true, Ordering::AcqRel);
        if first {
            self.shared.wake.notify_one();
        }

        let mut done = self.done.clone();
        // Err means the task was torn down without reporting; it is gone either way.
        let _ = done.wait_for(|exited| *exited).await;

        if first {
            tracing::info!(processor = %self.name, pending = self.len(), "processor stopped");
        }
        Ok(())
    }
}

impl<T: Queueable> Drop for Processor<T> {
    fn drop(&mut self) {
        // Stop the dispatch task but don't wait for it; `close` is the graceful path.
        if !self.shared.stopped.swap(true, Ordering::AcqRel) {
            self.shared.wake.notify_one();
            tracing::debug!(
                processor = %self.name,
                "processor dropped without close, dispatch task will exit"
            );
        }
    }
}

async fn dispatch_loop<T, E, C>(
    name: String,
    shared: Arc<Shared<T>>,
    executor: E,
    clock: C,
    done: watch::Sender<bool>,
) where
    T: Queueable<Time = DateTime<Utc>> + Send + 'static,
    T::Key: Send,
    E: ItemExecutor<T>,
    C: Clock,
{
    while !shared.is_stopped() {
        let Some(due_at) = shared.queue.peek_time() else {
            tracing::trace!(processor = %name, "queue empty, waiting");
            shared.wake.notified().await;
            continue;
        };

        let now = clock.now();
        if due_at > now {
            let delay = (due_at - now).to_std().unwrap_or_default();
            tracing::trace!(processor = %name, ?delay, "sleeping until next item");
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = shared.wake.notified() => {}
            }
            continue;
        }

        // The head may have been dequeued or replaced since it was peeked.
        if let Some(item) = shared.queue.pop_due(&now) {
            tracing::trace!(processor = %name, "executing due item");
            executor.execute(item).await;
        }
    }

    tracing::debug!(processor = %name, "dispatch loop exiting");
    done.send_replace(true);
}
