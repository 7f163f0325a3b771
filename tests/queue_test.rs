//! Integration tests for the keyed priority queue.
//!
//! Covers ordering, duplicate handling, update/remove by key and peeking,
//! using RFC 3339 due times the way reminder services schedule them.

use chrono::{DateTime, Utc};
use prometheus_timer_queue::core::{PriorityQueue, Queueable};

#[derive(Debug, Clone)]
struct Reminder {
    name: String,
    execution_time: DateTime<Utc>,
}

impl Queueable for Reminder {
    type Key = String;
    type Time = DateTime<Utc>;

    fn key(&self) -> &String {
        &self.name
    }

    fn scheduled_time(&self) -> DateTime<Utc> {
        self.execution_time
    }
}

fn reminder(n: u32, due: &str) -> Reminder {
    Reminder {
        name: n.to_string(),
        execution_time: DateTime::parse_from_rfc3339(due)
            .expect("valid RFC 3339 timestamp")
            .with_timezone(&Utc),
    }
}

fn due_string(r: &Reminder) -> String {
    r.execution_time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn pop_and_compare(queue: &mut PriorityQueue<Reminder>, expect_n: u32, expect_due: &str) {
    let r = queue.pop().expect("queue should not be empty");
    assert_eq!(r.name, expect_n.to_string());
    assert_eq!(due_string(&r), expect_due);
}

fn peek_and_compare(queue: &PriorityQueue<Reminder>, expect_n: u32, expect_due: &str) {
    let r = queue.peek().expect("queue should not be empty");
    assert_eq!(r.name, expect_n.to_string());
    assert_eq!(due_string(r), expect_due);
}

fn insert_five(queue: &mut PriorityQueue<Reminder>) {
    queue.insert(reminder(2, "2022-02-02T02:02:02Z"), false);
    queue.insert(reminder(3, "2023-03-03T03:03:03Z"), false);
    queue.insert(reminder(1, "2021-01-01T01:01:01Z"), false);
    queue.insert(reminder(5, "2029-09-09T09:09:09Z"), false);
    queue.insert(reminder(4, "2024-04-04T04:04:04Z"), false);
}

#[test]
fn test_pop_returns_items_in_due_order() {
    let mut queue = PriorityQueue::new();
    insert_five(&mut queue);
    assert_eq!(queue.len(), 5);

    for expected in 1..=5 {
        let r = queue.pop().expect("item available");
        assert_eq!(r.name, expected.to_string());
    }
    assert!(queue.pop().is_none());
    assert_eq!(queue.len(), 0);
}

#[test]
fn test_duplicate_insert_keeps_original() {
    let mut queue = PriorityQueue::new();
    queue.insert(reminder(2, "2022-02-02T02:02:02Z"), false);
    queue.insert(reminder(1, "2021-01-01T01:01:01Z"), false);
    assert_eq!(queue.len(), 2);

    queue.insert(reminder(2, "2029-09-09T09:09:09Z"), false);
    assert_eq!(queue.len(), 2);

    pop_and_compare(&mut queue, 1, "2021-01-01T01:01:01Z");
    pop_and_compare(&mut queue, 2, "2022-02-02T02:02:02Z");
    assert!(queue.pop().is_none());
}

#[test]
fn test_duplicate_insert_with_replace() {
    let mut queue = PriorityQueue::new();
    queue.insert(reminder(2, "2022-02-02T02:02:02Z"), false);
    queue.insert(reminder(1, "2021-01-01T01:01:01Z"), false);

    queue.insert(reminder(1, "2029-09-09T09:09:09Z"), true);
    assert_eq!(queue.len(), 2);

    pop_and_compare(&mut queue, 2, "2022-02-02T02:02:02Z");
    pop_and_compare(&mut queue, 1, "2029-09-09T09:09:09Z");
    assert!(queue.pop().is_none());
}

#[test]
fn test_single_key_replace_changes_due_time() {
    let mut queue = PriorityQueue::new();
    queue.insert(reminder(2, "2022-02-02T02:02:02Z"), false);
    queue.insert(reminder(2, "2029-09-09T09:09:09Z"), false);
    assert_eq!(queue.len(), 1);
    peek_and_compare(&queue, 2, "2022-02-02T02:02:02Z");

    queue.insert(reminder(2, "2029-09-09T09:09:09Z"), true);
    assert_eq!(queue.len(), 1);
    pop_and_compare(&mut queue, 2, "2029-09-09T09:09:09Z");
}

#[test]
fn test_insert_between_pops() {
    let mut queue = PriorityQueue::new();
    queue.insert(reminder(2, "2022-02-02T02:02:02Z"), false);
    queue.insert(reminder(5, "2023-03-03T03:03:03Z"), false);
    queue.insert(reminder(1, "2021-01-01T01:01:01Z"), false);
    queue.insert(reminder(8, "2029-09-09T09:09:09Z"), false);
    queue.insert(reminder(7, "2024-04-04T04:04:04Z"), false);
    assert_eq!(queue.len(), 5);

    for expected in 1..=2 {
        assert_eq!(queue.pop().map(|r| r.name), Some(expected.to_string()));
    }

    // Two at the front (one sharing a due time with an already popped item),
    // one in the middle and one at the end.
    queue.insert(reminder(3, "2021-01-01T01:01:01Z"), false);
    queue.insert(reminder(4, "2021-01-11T11:11:11Z"), false);
    queue.insert(reminder(6, "2023-03-13T13:13:13Z"), false);
    queue.insert(reminder(9, "2030-10-30T10:10:10Z"), false);
    assert_eq!(queue.len(), 7);

    for expected in 3..=9 {
        assert_eq!(queue.pop().map(|r| r.name), Some(expected.to_string()));
    }
    assert!(queue.pop().is_none());
    assert_eq!(queue.len(), 0);
}

#[test]
fn test_remove_by_key() {
    let mut queue = PriorityQueue::new();
    insert_five(&mut queue);

    for expected in 1..=2 {
        assert_eq!(queue.pop().map(|r| r.name), Some(expected.to_string()));
    }
    assert_eq!(queue.len(), 3);

    let removed = queue.remove("4").expect("key 4 is queued");
    assert_eq!(due_string(&removed), "2024-04-04T04:04:04Z");

    // Removing keys that are not queued is a no-op
    assert!(queue.remove("10").is_none());
    assert!(queue.remove("4").is_none());
    assert_eq!(queue.len(), 2);

    pop_and_compare(&mut queue, 3, "2023-03-03T03:03:03Z");
    pop_and_compare(&mut queue, 5, "2029-09-09T09:09:09Z");
    assert!(queue.pop().is_none());
}

#[test]
fn test_remove_middle_of_three() {
    let mut queue = PriorityQueue::new();
    queue.insert(reminder(1, "2021-01-01T01:01:01Z"), false);
    queue.insert(reminder(2, "2022-02-02T02:02:02Z"), false);
    queue.insert(reminder(3, "2023-03-03T03:03:03Z"), false);

    queue.remove("2");
    assert_eq!(queue.len(), 2);

    pop_and_compare(&mut queue, 1, "2021-01-01T01:01:01Z");
    pop_and_compare(&mut queue, 3, "2023-03-03T03:03:03Z");
    assert!(queue.pop().is_none());
}

#[test]
fn test_update_reorders() {
    let mut queue = PriorityQueue::new();
    insert_five(&mut queue);

    for expected in 1..=2 {
        assert_eq!(queue.pop().map(|r| r.name), Some(expected.to_string()));
    }
    assert_eq!(queue.len(), 3);

    // Same relative position, new time
    queue.update(reminder(4, "2024-04-04T14:14:14Z"));
    // Moves to the front
    queue.update(reminder(5, "2021-01-01T01:01:01Z"));
    // Not queued: no-op
    queue.update(reminder(10, "2021-01-01T01:01:01Z"));
    assert_eq!(queue.len(), 3);
    assert!(!queue.contains("10"));

    pop_and_compare(&mut queue, 5, "2021-01-01T01:01:01Z");
    pop_and_compare(&mut queue, 3, "2023-03-03T03:03:03Z");
    pop_and_compare(&mut queue, 4, "2024-04-04T14:14:14Z");
    assert!(queue.pop().is_none());
}

#[test]
fn test_update_to_extremes() {
    let mut queue = PriorityQueue::new();
    insert_five(&mut queue);

    queue.update(reminder(5, "2020-01-01T00:00:00Z"));
    peek_and_compare(&queue, 5, "2020-01-01T00:00:00Z");

    queue.update(reminder(5, "2040-01-01T00:00:00Z"));
    queue.update(reminder(1, "2039-01-01T00:00:00Z"));
    let order: Vec<_> = std::iter::from_fn(|| queue.pop()).map(|r| r.name).collect();
    assert_eq!(order, ["2", "3", "4", "1", "5"]);
}

#[test]
fn test_peek() {
    let mut queue = PriorityQueue::new();

    // Peeking an empty queue reports nothing and changes nothing
    assert!(queue.peek().is_none());
    assert!(queue.pop().is_none());
    assert_eq!(queue.len(), 0);

    queue.insert(reminder(2, "2022-02-02T02:02:02Z"), false);
    assert_eq!(queue.len(), 1);
    peek_and_compare(&queue, 2, "2022-02-02T02:02:02Z");

    queue.insert(reminder(3, "2023-03-03T03:03:03Z"), false);
    assert_eq!(queue.len(), 2);
    peek_and_compare(&queue, 2, "2022-02-02T02:02:02Z");

    queue.insert(reminder(1, "2021-01-01T01:01:01Z"), false);
    assert_eq!(queue.len(), 3);
    peek_and_compare(&queue, 1, "2021-01-01T01:01:01Z");

    queue.insert(reminder(5, "2029-09-09T09:09:09Z"), false);
    assert_eq!(queue.len(), 4);
    peek_and_compare(&queue, 1, "2021-01-01T01:01:01Z");

    queue.insert(reminder(4, "2024-04-04T04:04:04Z"), false);
    assert_eq!(queue.len(), 5);
    peek_and_compare(&queue, 1, "2021-01-01T01:01:01Z");

    queue.insert(reminder(6, "2019-01-19T01:01:01Z"), false);
    assert_eq!(queue.len(), 6);
    peek_and_compare(&queue, 6, "2019-01-19T01:01:01Z");

    pop_and_compare(&mut queue, 6, "2019-01-19T01:01:01Z");
    peek_and_compare(&queue, 1, "2021-01-01T01:01:01Z");

    // Update an item to bring it to the front
    queue.update(reminder(2, "2019-01-19T01:01:01Z"));
    peek_and_compare(&queue, 2, "2019-01-19T01:01:01Z");

    // Replace the first item to push it back
    queue.insert(reminder(2, "2039-01-19T01:01:01Z"), true);
    peek_and_compare(&queue, 1, "2021-01-01T01:01:01Z");
    assert_eq!(queue.len(), 5);
}

#[test]
fn test_len_tracks_distinct_keys() {
    let mut queue = PriorityQueue::new();
    for round in 0..3 {
        for n in 0..50 {
            queue.insert(reminder(n, "2025-05-05T05:05:05Z"), round % 2 == 1);
        }
    }
    assert_eq!(queue.len(), 50);

    for n in (0..50).step_by(2) {
        queue.remove(n.to_string().as_str());
    }
    assert_eq!(queue.len(), 25);

    let mut popped = 0;
    while queue.pop().is_some() {
        popped += 1;
    }
    assert_eq!(popped, 25);
}
