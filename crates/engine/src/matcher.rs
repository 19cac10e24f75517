//! Sequence matcher: resolves one attempt against the live input stream.
//!
//! Partial progress is defined as the longest suffix of the inputs recorded
//! since the attempt began that equals a prefix of the target.

use drill_core::{InputEvent, InputLog, Pattern, Symbol};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Pending,
    Success,
    Wrong,
    Timeout,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionKind {
    Success,
    Wrong,
    Timeout,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Resolution {
    pub attempt_id: u64,
    pub kind: ResolutionKind,
    /// Host time at which the outcome was observed.
    pub at: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MatchState {
    Complete,
    Partial(usize),
    NoMatch,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Attempt {
    pub id: u64,
    pub target: Pattern,
    /// Absolute input-log index of the first event that belongs to this attempt.
    pub start_index: u64,
    pub start_time: u64,
    pub deadline: u64,
    pub matched_prefix_len: usize,
    pub status: AttemptStatus,
}

/// Length of the longest suffix of `inputs` that equals a prefix of `target`.
pub fn longest_prefix_suffix(target: &[Symbol], inputs: &[Symbol]) -> usize {
    let max = target.len().min(inputs.len());
    (1..=max)
        .rev()
        .find(|&k| inputs[inputs.len() - k..] == target[..k])
        .unwrap_or(0)
}

/// Full match on the most recent inputs wins over prefix bookkeeping.
pub fn evaluate(target: &[Symbol], inputs: &[Symbol]) -> MatchState {
    if !target.is_empty()
        && inputs.len() >= target.len()
        && inputs[inputs.len() - target.len()..] == *target
    {
        return MatchState::Complete;
    }
    match longest_prefix_suffix(target, inputs) {
        0 => MatchState::NoMatch,
        n => MatchState::Partial(n),
    }
}

impl ResolutionKind {
    pub fn status(self) -> AttemptStatus {
        match self {
            ResolutionKind::Success => AttemptStatus::Success,
            ResolutionKind::Wrong => AttemptStatus::Wrong,
            ResolutionKind::Timeout => AttemptStatus::Timeout,
        }
    }
}

impl Attempt {
    pub fn new(id: u64, target: Pattern, start_index: u64, start_time: u64, window_ms: u64) -> Self {
        Self {
            id,
            target,
            start_index,
            start_time,
            deadline: start_time.saturating_add(window_ms),
            matched_prefix_len: 0,
            status: AttemptStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == AttemptStatus::Pending
    }

    pub fn window_ms(&self) -> u64 {
        self.deadline - self.start_time
    }

    /// Share of the target already entered, for progress display.
    pub fn progress(&self) -> f64 {
        self.matched_prefix_len as f64 / self.target.len() as f64
    }

    /// Terminal latch: only the first resolution is accepted.
    fn resolve(&mut self, kind: ResolutionKind, at: u64) -> Option<Resolution> {
        if !self.is_pending() {
            return None;
        }
        self.status = kind.status();
        debug!(
            "attempt {} resolved {:?} at {} (target {})",
            self.id, kind, at, self.target
        );
        Some(Resolution {
            attempt_id: self.id,
            kind,
            at,
        })
    }

    /// Evaluates the inputs recorded since this attempt began.
    pub fn evaluate_inputs(&mut self, inputs: &[Symbol], at: u64) -> Option<Resolution> {
        if !self.is_pending() || inputs.is_empty() {
            return None;
        }
        let had_progress = self.matched_prefix_len > 0;
        match evaluate(self.target.symbols(), inputs) {
            MatchState::Complete => {
                self.matched_prefix_len = self.target.len();
                self.resolve(ResolutionKind::Success, at)
            }
            MatchState::Partial(n) => {
                self.matched_prefix_len = n;
                None
            }
            MatchState::NoMatch => {
                self.matched_prefix_len = 0;
                if had_progress {
                    None
                } else {
                    self.resolve(ResolutionKind::Wrong, at)
                }
            }
        }
    }

    pub fn check_deadline(&mut self, now: u64) -> Option<Resolution> {
        if now >= self.deadline {
            self.resolve(ResolutionKind::Timeout, now)
        } else {
            None
        }
    }
}

/// Owns the rolling input log and the current attempt.
#[derive(Clone, Debug)]
pub struct SequenceMatcher {
    log: InputLog,
    attempt: Option<Attempt>,
    next_id: u64,
}

impl SequenceMatcher {
    pub fn new(window: usize) -> Self {
        Self {
            log: InputLog::with_window(window),
            attempt: None,
            next_id: 1,
        }
    }

    /// Starts a fresh attempt; earlier inputs are stale for it.
    pub fn begin(&mut self, target: Pattern, now: u64, window_ms: u64) -> &Attempt {
        let id = self.next_id;
        self.next_id += 1;
        let attempt = Attempt::new(id, target, self.log.next_index(), now, window_ms);
        debug!(
            "attempt {} started: {} window {}ms",
            id, attempt.target, window_ms
        );
        self.attempt.insert(attempt)
    }

    pub fn on_input(&mut self, event: InputEvent) -> Option<Resolution> {
        self.log.push(event);
        let attempt = self.attempt.as_mut()?;
        if !attempt.is_pending() {
            return None;
        }
        if event.timestamp >= attempt.deadline {
            return attempt.check_deadline(event.timestamp);
        }
        let recent = self.log.symbols_since(attempt.start_index);
        let keep = attempt.target.len().min(recent.len());
        attempt.evaluate_inputs(&recent[recent.len() - keep..], event.timestamp)
    }

    /// Only ever yields a timeout.
    pub fn on_tick(&mut self, now: u64) -> Option<Resolution> {
        self.attempt.as_mut()?.check_deadline(now)
    }

    pub fn attempt(&self) -> Option<&Attempt> {
        self.attempt.as_ref()
    }

    pub fn log(&self) -> &InputLog {
        &self.log
    }

    /// Drops the current attempt so nothing can resolve against it.
    pub fn cancel(&mut self) -> Option<Attempt> {
        self.attempt.take()
    }
}

impl Default for SequenceMatcher {
    fn default() -> Self {
        Self::new(drill_core::DEFAULT_LOG_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    fn pattern(symbols: &[Symbol]) -> Pattern {
        Pattern::new(symbols.iter().copied()).unwrap()
    }

    fn feed(m: &mut SequenceMatcher, inputs: &[(Symbol, u64)]) -> Option<Resolution> {
        let mut last = None;
        for &(symbol, t) in inputs {
            if let Some(r) = m.on_input(InputEvent::new(symbol, t)) {
                last = Some(r);
            }
        }
        last
    }

    #[test]
    fn test_longest_prefix_suffix_basic() {
        let target = [Down, Right, Lp];
        assert_eq!(longest_prefix_suffix(&target, &[]), 0);
        assert_eq!(longest_prefix_suffix(&target, &[Down]), 1);
        assert_eq!(longest_prefix_suffix(&target, &[Up, Down, Right]), 2);
        assert_eq!(longest_prefix_suffix(&target, &[Down, Right, Up]), 0);
    }

    #[test]
    fn test_longest_prefix_suffix_repeated_symbols() {
        let target = [Lp, Lp, Lp];
        assert_eq!(longest_prefix_suffix(&target, &[Lp]), 1);
        assert_eq!(longest_prefix_suffix(&target, &[Lp, Lp]), 2);
        assert_eq!(longest_prefix_suffix(&target, &[Lp, Hp, Lp]), 1);
        assert_eq!(longest_prefix_suffix(&target, &[Hp, Lp, Lp]), 2);
        assert_eq!(evaluate(&target, &[Hp, Lp, Lp, Lp]), MatchState::Complete);
    }

    #[test]
    fn test_longest_prefix_suffix_overlapping_prefix() {
        let target = [Down, Down, Right, Lp];
        assert_eq!(longest_prefix_suffix(&target, &[Down, Down, Down]), 2);
        assert_eq!(longest_prefix_suffix(&target, &[Down, Down, Right]), 3);
    }

    #[test]
    fn test_exact_sequence_succeeds() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Down, Right, Lp]), 0, 2000);
        let r = feed(&mut m, &[(Down, 0), (Right, 100), (Lp, 300)]).unwrap();
        assert_eq!(r.kind, ResolutionKind::Success);
        assert_eq!(r.at, 300);
        let attempt = m.attempt().unwrap();
        assert_eq!(attempt.status, AttemptStatus::Success);
        assert_eq!(attempt.matched_prefix_len, 3);
    }

    #[test]
    fn test_single_symbol_wrong_input() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Up]), 0, 3000);
        let r = m.on_input(InputEvent::new(Down, 50)).unwrap();
        assert_eq!(r.kind, ResolutionKind::Wrong);
        assert_eq!(m.attempt().unwrap().matched_prefix_len, 0);
    }

    #[test]
    fn test_partial_progress_updates_without_resolving() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Down, DownRight, Right, Hp]), 0, 2000);
        assert!(feed(&mut m, &[(Down, 10), (DownRight, 20)]).is_none());
        assert_eq!(m.attempt().unwrap().matched_prefix_len, 2);
        assert!((m.attempt().unwrap().progress() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_broken_partial_resets_without_wrong() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Down, Right, Lp]), 0, 2000);
        assert!(feed(&mut m, &[(Down, 10), (Up, 20)]).is_none());
        let attempt = m.attempt().unwrap();
        assert_eq!(attempt.matched_prefix_len, 0);
        assert!(attempt.is_pending());
        let r = m.on_input(InputEvent::new(Up, 30)).unwrap();
        assert_eq!(r.kind, ResolutionKind::Wrong);
    }

    #[test]
    fn test_recovery_after_broken_partial() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Down, Right, Lp]), 0, 2000);
        let r = feed(
            &mut m,
            &[(Down, 10), (Hp, 20), (Down, 30), (Right, 40), (Lp, 50)],
        )
        .unwrap();
        assert_eq!(r.kind, ResolutionKind::Success);
    }

    #[test]
    fn test_repeated_symbol_pattern() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Lp, Lp, Lp]), 0, 2000);
        assert!(feed(&mut m, &[(Lp, 10), (Lp, 20), (Hp, 30)]).is_none());
        assert_eq!(m.attempt().unwrap().matched_prefix_len, 0);
        assert!(feed(&mut m, &[(Lp, 40), (Lp, 50)]).is_none());
        assert_eq!(m.attempt().unwrap().matched_prefix_len, 2);
        let r = m.on_input(InputEvent::new(Lp, 60)).unwrap();
        assert_eq!(r.kind, ResolutionKind::Success);
    }

    #[test]
    fn test_stale_inputs_ignored() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Up]), 0, 3000);
        assert_eq!(
            m.on_input(InputEvent::new(Up, 10)).map(|r| r.kind),
            Some(ResolutionKind::Success)
        );
        m.begin(pattern(&[Down, Right, Lp]), 1500, 2000);
        // `up` from the previous attempt must not count against this one.
        assert!(feed(&mut m, &[(Down, 1600), (Right, 1700)]).is_none());
        let r = m.on_input(InputEvent::new(Lp, 1800)).unwrap();
        assert_eq!(r.kind, ResolutionKind::Success);
    }

    #[test]
    fn test_previous_attempt_inputs_do_not_complete_new_one() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Lp]), 0, 3000);
        feed(&mut m, &[(Down, 10)]);
        m.begin(pattern(&[Down, Lp]), 1000, 3000);
        let r = m.on_input(InputEvent::new(Lp, 1100)).unwrap();
        assert_eq!(r.kind, ResolutionKind::Wrong);
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Up]), 0, 3000);
        assert!(m.on_tick(2999).is_none());
        let r = m.on_tick(3000).unwrap();
        assert_eq!(r.kind, ResolutionKind::Timeout);
        assert!(m.on_tick(3100).is_none());
        assert!(m.on_input(InputEvent::new(Up, 3200)).is_none());
    }

    #[test]
    fn test_timeout_after_success_is_noop() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Up]), 0, 3000);
        m.on_input(InputEvent::new(Up, 100));
        assert!(m.on_tick(5000).is_none());
        assert_eq!(m.attempt().unwrap().status, AttemptStatus::Success);
    }

    #[test]
    fn test_wrong_suppresses_timeout() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Up]), 0, 3000);
        m.on_input(InputEvent::new(Down, 100));
        assert!(m.on_tick(3000).is_none());
        assert_eq!(m.attempt().unwrap().status, AttemptStatus::Wrong);
    }

    #[test]
    fn test_late_input_resolves_timeout() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Up]), 0, 3000);
        let r = m.on_input(InputEvent::new(Up, 3000)).unwrap();
        assert_eq!(r.kind, ResolutionKind::Timeout);
    }

    #[test]
    fn test_input_without_attempt_is_logged_only() {
        let mut m = SequenceMatcher::default();
        assert!(m.on_input(InputEvent::new(Up, 0)).is_none());
        assert_eq!(m.log().len(), 1);
        assert!(m.on_tick(10_000).is_none());
    }

    #[test]
    fn test_cancel_clears_attempt() {
        let mut m = SequenceMatcher::default();
        m.begin(pattern(&[Up]), 0, 1000);
        assert!(m.cancel().is_some());
        assert!(m.on_tick(2000).is_none());
        assert!(m.attempt().is_none());
    }

    #[test]
    fn test_attempt_ids_increase() {
        let mut m = SequenceMatcher::default();
        let first = m.begin(pattern(&[Up]), 0, 1000).id;
        let second = m.begin(pattern(&[Up]), 10, 1000).id;
        assert!(second > first);
    }
}
