use std::time::{Duration, Instant};

/// Identifies one armed timer. Every arm produces a new generation, so a token
/// from a cancelled timer never matches the one currently armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    pub(crate) fn new(generation: u64) -> Self {
        Self(generation)
    }

    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Something that can fire a token back after a delay.
///
/// The owner delivers fired tokens to `PlaybackState::on_timer`.
pub trait Scheduler {
    fn arm(&mut self, token: TimerToken, delay: Duration);
    fn cancel(&mut self, token: TimerToken);
}

/// Single-slot timer polled by an event loop.
#[derive(Debug, Default)]
pub struct DeadlineTimer {
    pending: Option<(TimerToken, Instant)>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// How long the event loop may block before the pending token is due.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }

    /// Take the pending token if its deadline has passed.
    pub fn poll_expired(&mut self, now: Instant) -> Option<TimerToken> {
        match self.pending {
            Some((token, deadline)) if deadline <= now => {
                self.pending = None;
                Some(token)
            }
            _ => None,
        }
    }
}

impl Scheduler for DeadlineTimer {
    fn arm(&mut self, token: TimerToken, delay: Duration) {
        self.pending = Some((token, Instant::now() + delay));
    }

    fn cancel(&mut self, token: TimerToken) {
        if matches!(self.pending, Some((pending, _)) if pending == token) {
            self.pending = None;
        }
    }
}
