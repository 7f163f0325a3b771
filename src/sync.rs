//! Shared queue handle
//!
//! [`PriorityQueue`] performs no locking of its own. This module provides the
//! coarse-grained wrapper the rest of the crate uses when a queue is touched from
//! more than one thread: a single `parking_lot::Mutex` guarding the whole
//! structure, held for exactly one queue operation at a time.
//!
//! # Examples
//!
//! ```
//! use prometheus_timer_queue::core::Queueable;
//! use prometheus_timer_queue::sync::SharedQueue;
//! use std::thread;
//!
//! #[derive(Debug)]
//! struct Tick(u32);
//!
//! impl Queueable for Tick {
//!     type Key = u32;
//!     type Time = u32;
//!     fn key(&self) -> &u32 { &self.0 }
//!     fn scheduled_time(&self) -> u32 { self.0 }
//! }
//!
//! let queue = SharedQueue::new();
//! let handles: Vec<_> = (0..4)
//!     .map(|n| {
//!         let queue = queue.clone();
//!         thread::spawn(move || queue.insert(Tick(n), false))
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(queue.len(), 4);
//! assert_eq!(queue.pop().map(|t| t.0), Some(0));
//! ```

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::core::{PriorityQueue, Queueable};

/// Cloneable, mutex-guarded handle to a [`PriorityQueue`].
///
/// Clones share the same underlying queue.
pub struct SharedQueue<T: Queueable> {
    inner: Arc<Mutex<PriorityQueue<T>>>,
}

impl<T: Queueable> SharedQueue<T> {
    /// Create an empty shared queue.
    pub fn new() -> Self {
        Self::from_queue(PriorityQueue::new())
    }

    /// Create an empty shared queue with preallocated room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_queue(PriorityQueue::with_capacity(capacity))
    }

    /// Wrap an existing queue.
    pub fn from_queue(queue: PriorityQueue<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(queue)),
        }
    }

    /// Lock the queue for a multi-step critical section.
    pub fn lock(&self) -> MutexGuard<'_, PriorityQueue<T>> {
        self.inner.lock()
    }

    /// See [`PriorityQueue::insert`].
    pub fn insert(&self, item: T, replace_if_exists: bool) {
        self.inner.lock().insert(item, replace_if_exists);
    }

    /// See [`PriorityQueue::update`].
    pub fn update(&self, item: T) {
        self.inner.lock().update(item);
    }

    /// See [`PriorityQueue::remove`].
    pub fn remove<Q>(&self, key: &Q) -> Option<T>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    /// See [`PriorityQueue::pop`].
    pub fn pop(&self) -> Option<T> {
        self.inner.lock().pop()
    }

    /// See [`PriorityQueue::pop_due`].
    pub fn pop_due(&self, now: &T::Time) -> Option<T> {
        self.inner.lock().pop_due(now)
    }

    /// Scheduled time of the earliest item.
    pub fn peek_time(&self) -> Option<T::Time> {
        self.inner.lock().peek().map(Queueable::scheduled_time)
    }

    /// Key of the earliest item.
    pub fn peek_key(&self) -> Option<T::Key> {
        self.inner.lock().peek().map(|item| item.key().clone())
    }

    /// See [`PriorityQueue::contains`].
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    /// See [`PriorityQueue::len`].
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// See [`PriorityQueue::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// See [`PriorityQueue::clear`].
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<T: Queueable> Clone for SharedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Queueable> Default for SharedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
