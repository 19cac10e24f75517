//! Attempt deadlines, cooldown pacing and elapsed-time tracking.

use drill_core::Difficulty;

use crate::config::TimingConfig;
use crate::matcher::ResolutionKind;

/// Per-attempt input window; an explicit override (custom modes) wins.
pub fn per_input_duration(
    difficulty: Difficulty,
    override_ms: Option<u64>,
    timing: &TimingConfig,
) -> u64 {
    match override_ms {
        Some(ms) if ms > 0 => ms,
        _ => timing.duration_for(difficulty),
    }
}

/// Feedback delay before the next pattern is requested.
pub fn cooldown_after(kind: ResolutionKind, timing: &TimingConfig) -> u64 {
    match kind {
        ResolutionKind::Success => timing.cooldown_success_ms,
        ResolutionKind::Wrong => timing.cooldown_wrong_ms,
        ResolutionKind::Timeout => timing.cooldown_timeout_ms,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttemptClock {
    pub start: u64,
    pub deadline: u64,
}

impl AttemptClock {
    pub fn new(start: u64, window_ms: u64) -> Self {
        Self {
            start,
            deadline: start.saturating_add(window_ms),
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.deadline
    }

    pub fn remaining(&self, now: u64) -> u64 {
        self.deadline.saturating_sub(now)
    }

    /// 1.0 at the start of the window, 0.0 at the deadline.
    pub fn fraction_remaining(&self, now: u64) -> f64 {
        let window = self.deadline.saturating_sub(self.start);
        if window == 0 {
            return 0.0;
        }
        self.remaining(now).min(window) as f64 / window as f64
    }
}

/// Whole seconds since session start, never moving backwards.
///
/// The value is refreshed at most once per `interval_ms`; ticks in between
/// return the last published value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElapsedClock {
    start: u64,
    interval_ms: u64,
    next_due: u64,
    seconds: u64,
}

impl ElapsedClock {
    pub fn new(start: u64, interval_ms: u64) -> Self {
        let interval_ms = interval_ms.max(1);
        Self {
            start,
            interval_ms,
            next_due: start + interval_ms,
            seconds: 0,
        }
    }

    pub fn tick(&mut self, now: u64) -> u64 {
        if now < self.next_due {
            return self.seconds;
        }
        let missed = (now - self.next_due) / self.interval_ms + 1;
        self.next_due += missed * self.interval_ms;
        self.refresh(now)
    }

    /// Publishes the current value regardless of the interval.
    pub fn refresh(&mut self, now: u64) -> u64 {
        let seconds = now.saturating_sub(self.start) / 1000;
        self.seconds = self.seconds.max(seconds);
        self.seconds
    }

    pub fn get(&self) -> u64 {
        self.seconds
    }
}

/// Presentational pre-session countdown, e.g. 3, 2, 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    started_at: u64,
    steps: u8,
    step_ms: u64,
    total_ms: u64,
    emitted: u8,
}

impl Countdown {
    pub fn new(started_at: u64, timing: &TimingConfig) -> Self {
        Self {
            started_at,
            steps: timing.countdown_steps,
            step_ms: timing.countdown_step_ms,
            total_ms: timing.countdown_total_ms(),
            emitted: 0,
        }
    }

    /// Steps that became due since the last call, as the number still to show.
    pub fn advance(&mut self, now: u64) -> Vec<u8> {
        let elapsed = now.saturating_sub(self.started_at);
        let due = if self.step_ms == 0 {
            self.steps
        } else {
            (elapsed / self.step_ms + 1).min(self.steps as u64) as u8
        };
        let mut shown = Vec::new();
        while self.emitted < due {
            shown.push(self.steps - self.emitted);
            self.emitted += 1;
        }
        shown
    }

    pub fn is_finished(&self, now: u64) -> bool {
        now >= self.finishes_at()
    }

    pub fn finishes_at(&self) -> u64 {
        self.started_at + self.total_ms
    }
}
