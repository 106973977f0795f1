//! Trailing-edge debounce on the virtual clock.
//!
//! Rapid control changes (a dial being dragged) are coalesced into a single
//! value delivered once the input has been quiet for `wait`.

use std::time::Duration;

/// Default quiet period for option controls.
pub const CONTROL_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Clone, Debug)]
pub struct Debounce<T> {
    wait: Duration,
    queued: Option<(T, Duration)>,
}

impl<T> Debounce<T> {
    pub fn new(wait: Duration) -> Self {
        Self { wait, queued: None }
    }

    /// Queue `value`, replacing anything queued, and restart the wait from `now`.
    pub fn push(&mut self, value: T, now: Duration) {
        self.queued = Some((value, now + self.wait));
    }

    /// Take the queued value if its wait has elapsed by `now`.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match self.queued {
            Some((_, due)) if due <= now => self.queued.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// When the queued value becomes available.
    #[inline]
    pub fn deadline(&self) -> Option<Duration> {
        self.queued.as_ref().map(|&(_, due)| due)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.queued.is_some()
    }

    /// Drop the queued value.
    #[inline]
    pub fn cancel(&mut self) {
        self.queued = None;
    }

    #[inline]
    pub fn wait(&self) -> Duration {
        self.wait
    }
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self::new(CONTROL_DEBOUNCE)
    }
}
