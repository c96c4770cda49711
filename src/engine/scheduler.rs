//! Virtual clock and timer queue
//!
//! Single-threaded and cooperative: tasks run one at a time, in deadline
//! order, with the clock set to each task's deadline while it runs. Tasks
//! sharing a deadline run in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// A task waiting for its deadline
#[derive(Debug)]
struct Entry<T> {
    at: Duration,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest deadline first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Timer queue over a virtual clock measured from page load
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    queue: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Create a scheduler at time zero with nothing queued
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use greeting_card::engine::Scheduler;
    ///
    /// let mut scheduler = Scheduler::new();
    /// scheduler.schedule_in(Duration::from_millis(700), "flap");
    /// assert_eq!(scheduler.pop_due(Duration::from_millis(500)), None);
    /// assert_eq!(
    ///     scheduler.pop_due(Duration::from_secs(1)),
    ///     Some("flap")
    /// );
    /// assert_eq!(scheduler.now(), Duration::from_millis(700));
    /// ```
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue a task `delay` after the current time
    pub fn schedule_in(&mut self, delay: Duration, task: T) {
        self.schedule_at(self.now + delay, task);
    }

    /// Queue a task at an absolute time; past deadlines fire on the next pop
    pub fn schedule_at(&mut self, at: Duration, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry { at, seq, task });
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.peek().map(|entry| entry.at)
    }

    /// Number of queued tasks
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Pop the earliest task due at or before `until`, moving the clock to
    /// its deadline. The clock never runs backwards.
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        if self.next_deadline()? > until {
            return None;
        }
        let entry = self.queue.pop()?;
        self.now = self.now.max(entry.at);
        Some(entry.task)
    }

    /// Move the clock forward without running anything
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_pops_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_at(ms(300), 3);
        scheduler.schedule_at(ms(100), 1);
        scheduler.schedule_at(ms(200), 2);

        let mut fired = Vec::new();
        while let Some(task) = scheduler.pop_due(ms(1000)) {
            fired.push((task, scheduler.now()));
        }
        assert_eq!(fired, vec![(1, ms(100)), (2, ms(200)), (3, ms(300))]);
    }

    #[test]
    fn test_equal_deadlines_fifo() {
        let mut scheduler = Scheduler::new();
        for i in 0..5 {
            scheduler.schedule_at(ms(50), i);
        }
        let fired: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(ms(50))).collect();
        assert_eq!(fired, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_not_due_stays_queued() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(ms(10), ());
        assert_eq!(scheduler.pop_due(ms(9)), None);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.now(), Duration::ZERO);
    }

    #[test]
    fn test_schedule_in_is_relative_to_now() {
        let mut scheduler = Scheduler::new();
        scheduler.set_now(ms(1000));
        scheduler.schedule_in(ms(250), "x");
        assert_eq!(scheduler.next_deadline(), Some(ms(1250)));
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut scheduler = Scheduler::new();
        scheduler.set_now(ms(500));
        scheduler.set_now(ms(100));
        assert_eq!(scheduler.now(), ms(500));

        scheduler.schedule_at(ms(200), ());
        assert_eq!(scheduler.pop_due(ms(500)), Some(()));
        assert_eq!(scheduler.now(), ms(500));
    }
}
