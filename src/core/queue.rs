//! Time-ordered priority queue with a key index.
//!
//! [`PriorityQueue`] is a binary min-heap ordered by each item's scheduled time,
//! paired with a map from item key to heap position. The index makes it possible
//! to look up, reschedule or evict any item by key in O(log n) while the earliest
//! item stays available at the root.
//!
//! The queue is not synchronized. Wrap it in a mutex (see
//! [`SharedQueue`](crate::sync::SharedQueue)) when several threads need access.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Capability set required from items stored in a [`PriorityQueue`].
///
/// # Example
///
/// ```
/// use prometheus_timer_queue::core::{PriorityQueue, Queueable};
///
/// struct Reminder {
///     name: String,
///     due: u64,
/// }
///
/// impl Queueable for Reminder {
///     type Key = String;
///     type Time = u64;
///
///     fn key(&self) -> &String {
///         &self.name
///     }
///
///     fn scheduled_time(&self) -> u64 {
///         self.due
///     }
/// }
///
/// let mut queue = PriorityQueue::new();
/// queue.insert(Reminder { name: "late".into(), due: 20 }, false);
/// queue.insert(Reminder { name: "early".into(), due: 10 }, false);
///
/// assert_eq!(queue.pop().map(|r| r.name), Some("early".to_string()));
/// ```
pub trait Queueable {
    /// Identity of the item; unique within a queue and stable while enqueued.
    type Key: Eq + Hash + Clone;
    /// Timestamp type used as the ordering key.
    type Time: Ord + Copy;

    /// Returns the item's key.
    fn key(&self) -> &Self::Key;

    /// Returns the time at which the item is due.
    fn scheduled_time(&self) -> Self::Time;
}

impl<T: Queueable + ?Sized> Queueable for Arc<T> {
    type Key = T::Key;
    type Time = T::Time;

    fn key(&self) -> &Self::Key {
        (**self).key()
    }

    fn scheduled_time(&self) -> Self::Time {
        (**self).scheduled_time()
    }
}

/// Min-heap of [`Queueable`] items keyed by [`Queueable::key`].
///
/// Popping yields items in non-decreasing scheduled time. Items that share a
/// scheduled time come out in an unspecified order.
pub struct PriorityQueue<T: Queueable> {
    /// Heap-ordered items; the root at index 0 is the earliest.
    items: Vec<T>,
    /// Current index in `items` of every enqueued key.
    positions: HashMap<T::Key, usize>,
}

impl<T: Queueable> PriorityQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Create an empty queue with room for `capacity` items before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Number of enqueued items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no items are enqueued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if an item with `key` is enqueued.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.contains_key(key)
    }

    /// Returns the enqueued item with `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.get(key).map(|&pos| &self.items[pos])
    }

    /// Returns the earliest item without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Add an item to the queue.
    ///
    /// If an item with the same key is already enqueued, it is left untouched
    /// unless `replace_if_exists` is set, in which case it is overwritten by
    /// `item` and moved to the position its new scheduled time calls for.
    pub fn insert(&mut self, item: T, replace_if_exists: bool) {
        if let Some(&pos) = self.positions.get(item.key()) {
            if replace_if_exists {
                self.items[pos] = item;
                self.fix(pos);
            }
            return;
        }

        let pos = self.items.len();
        self.positions.insert(item.key().clone(), pos);
        self.items.push(item);
        self.sift_up(pos);
    }

    /// Replace the enqueued item that has the same key as `item`.
    ///
    /// Does nothing if no such item is enqueued.
    pub fn update(&mut self, item: T) {
        if let Some(&pos) = self.positions.get(item.key()) {
            self.items[pos] = item;
            self.fix(pos);
        }
    }

    /// Remove and return the item with `key`. Absent keys are ignored.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = *self.positions.get(key)?;
        self.remove_at(pos)
    }

    /// Remove and return the earliest item.
    pub fn pop(&mut self) -> Option<T> {
        self.remove_at(0)
    }

    /// Remove and return the earliest item if it is due at or before `now`.
    pub fn pop_due(&mut self, now: &T::Time) -> Option<T> {
        let due = self
            .items
            .first()
            .is_some_and(|head| head.scheduled_time() <= *now);
        if due {
            self.remove_at(0)
        } else {
            None
        }
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.positions.clear();
    }

    fn remove_at(&mut self, pos: usize) -> Option<T> {
        let last = self.items.len().checked_sub(1)?;
        if pos > last {
            return None;
        }
        self.swap(pos, last);
        let item = self.items.pop()?;
        self.positions.remove(item.key());
        if pos < self.items.len() {
            self.fix(pos);
        }
        Some(item)
    }

    /// Restore heap order around `pos` after its item changed in either direction.
    fn fix(&mut self, pos: usize) {
        if self.sift_up(pos) == pos {
            self.sift_down(pos);
        }
    }

    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.is_earlier(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.is_earlier(right, left) {
                right
            } else {
                left
            };
            if !self.is_earlier(child, pos) {
                break;
            }
            self.swap(pos, child);
            pos = child;
        }
    }

    fn is_earlier(&self, a: usize, b: usize) -> bool {
        self.items[a].scheduled_time() < self.items[b].scheduled_time()
    }

    /// The only place items move: keeps `positions` in step with `items`.
    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.items.swap(a, b);
        if let Some(slot) = self.positions.get_mut(self.items[a].key()) {
            *slot = a;
        }
        if let Some(slot) = self.positions.get_mut(self.items[b].key()) {
            *slot = b;
        }
    }
}

impl<T: Queueable> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Queueable + fmt::Debug> fmt::Debug for PriorityQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("len", &self.items.len())
            .field("items", &self.items)
            .finish()
    }
}
