//! Cooperative timer queue on a virtual clock.
//!
//! All generator channels share one logical thread. A scheduled advance is an
//! entry in this queue; "waiting" is simply the gap until the driver pumps the
//! queue past the entry's deadline. Nothing blocks.
//!
//! Entries are keyed by `(deadline, id)`, so due timers pop in deadline order
//! and timers sharing a deadline pop in the order they were scheduled.

use std::collections::BTreeMap;
use std::time::Duration;

/// Opaque handle to one scheduled advance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    id: u64,
    due: Duration,
}

impl TimerHandle {
    /// Virtual time at which this timer fires.
    #[inline]
    pub fn due(&self) -> Duration {
        self.due
    }
}

/// Pending timers, each tagged with the channel it advances.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    entries: BTreeMap<(Duration, u64), String>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an advance of `channel` at virtual time `due`.
    pub fn schedule(&mut self, due: Duration, channel: &str) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert((due, id), channel.to_owned());
        TimerHandle { id, due }
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// already cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.entries.remove(&(handle.due, handle.id)).is_some()
    }

    #[inline]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.contains_key(&(handle.due, handle.id))
    }

    /// Earliest deadline still pending.
    #[inline]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|&(due, _)| due)
    }

    /// Remove and return the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerHandle, String)> {
        let &(due, id) = self.entries.keys().next()?;
        if due > now {
            return None;
        }
        let channel = self.entries.remove(&(due, id))?;
        Some((TimerHandle { id, due }, channel))
    }

    /// Number of timers pending for `channel`.
    pub fn pending_for(&self, channel: &str) -> usize {
        self.entries.values().filter(|c| c.as_str() == channel).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn pops_in_deadline_then_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(30), "c");
        q.schedule(ms(10), "a");
        q.schedule(ms(10), "b");

        assert_eq!(q.next_deadline(), Some(ms(10)));
        assert!(q.pop_due(ms(5)).is_none());

        let order: Vec<String> = std::iter::from_fn(|| q.pop_due(ms(30)).map(|(_, c)| c)).collect();
        assert_eq!(order, ["a", "b", "c"]);
        assert!(q.is_empty());
    }

    #[test]
    fn cancel_is_one_shot() {
        let mut q = TimerQueue::new();
        let h = q.schedule(ms(10), "a");
        assert!(q.is_pending(h));
        assert!(q.cancel(h));
        assert!(!q.cancel(h));
        assert!(!q.is_pending(h));
        assert!(q.pop_due(ms(100)).is_none());
    }

    #[test]
    fn cancel_after_fire_is_noop() {
        let mut q = TimerQueue::new();
        let h = q.schedule(ms(10), "a");
        let (fired, _) = q.pop_due(ms(10)).unwrap();
        assert_eq!(fired, h);
        assert!(!q.cancel(h));
    }

    #[test]
    fn counts_per_channel() {
        let mut q = TimerQueue::new();
        q.schedule(ms(1), "a");
        q.schedule(ms(2), "a");
        q.schedule(ms(3), "b");
        assert_eq!(q.pending_for("a"), 2);
        assert_eq!(q.pending_for("b"), 1);
        assert_eq!(q.pending_for("z"), 0);
        assert_eq!(q.len(), 3);
    }
}
