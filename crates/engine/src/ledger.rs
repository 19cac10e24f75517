//! Score/streak ledger: the only place session totals change.

use drill_core::{Difficulty, Score};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::matcher::{Attempt, Resolution, ResolutionKind};
use crate::streak::StreakTracker;
use crate::timer::ElapsedClock;

const ELAPSED_INTERVAL_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub attempt_id: u64,
    pub kind: ResolutionKind,
    pub points: u64,
    pub streak: u32,
    pub new_max_streak: bool,
    /// Milliseconds from attempt start to completion, successes only.
    pub completion_ms: Option<u64>,
}

/// Speed bonus: up to `ratio` of base points for finishing early, none at the wire.
pub fn time_bonus(base_points: u32, ratio: f64, window_ms: u64, elapsed_ms: u64) -> f64 {
    if window_ms == 0 {
        return 0.0;
    }
    let share = (window_ms as f64 - elapsed_ms as f64) / window_ms as f64;
    (base_points as f64 * ratio * share.max(0.0)).round_ties_even()
}

/// Points for completing a pattern of `len` symbols in `elapsed_ms` of a `window_ms` window.
///
/// Rounding is half-to-even: medium, three symbols, 300 ms of 2000 ms gives
/// `180 + round(42.5) = 222`.
pub fn success_points(
    len: usize,
    difficulty: Difficulty,
    window_ms: u64,
    elapsed_ms: u64,
    scoring: &ScoringConfig,
) -> u64 {
    let base = scoring.base_points as f64;
    let complexity = len.saturating_sub(1) as f64 * scoring.complexity_bonus as f64;
    let bonus = time_bonus(scoring.base_points, scoring.time_bonus_ratio, window_ms, elapsed_ms);
    let points = (base + complexity) * scoring.multiplier(difficulty) + bonus;
    points.round_ties_even().max(0.0) as u64
}

#[derive(Clone, Debug)]
pub struct ScoreLedger {
    score: Score,
    streak: StreakTracker,
    elapsed: ElapsedClock,
    elapsed_start: u64,
    elapsed_interval_ms: u64,
    difficulty: Difficulty,
    scoring: ScoringConfig,
    last_attempt_id: Option<u64>,
}

impl ScoreLedger {
    pub fn new(difficulty: Difficulty, scoring: ScoringConfig, session_start: u64) -> Self {
        Self {
            score: Score::new(),
            streak: StreakTracker::new(),
            elapsed: ElapsedClock::new(session_start, ELAPSED_INTERVAL_MS),
            elapsed_start: session_start,
            elapsed_interval_ms: ELAPSED_INTERVAL_MS,
            difficulty,
            scoring,
            last_attempt_id: None,
        }
    }

    /// How often `tick_elapsed` publishes a new elapsed value.
    pub fn with_elapsed_interval(mut self, interval_ms: u64) -> Self {
        self.elapsed = ElapsedClock::new(self.elapsed_start, interval_ms);
        self.elapsed_interval_ms = interval_ms;
        self
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Applies one resolution. An attempt is counted at most once.
    pub fn apply_resolution(
        &mut self,
        resolution: &Resolution,
        attempt: &Attempt,
    ) -> Option<ScoreDelta> {
        if resolution.attempt_id != attempt.id
            || self.last_attempt_id.is_some_and(|id| attempt.id <= id)
        {
            return None;
        }
        self.last_attempt_id = Some(attempt.id);
        self.score.total_attempts += 1;

        let delta = match resolution.kind {
            ResolutionKind::Success => {
                let elapsed_ms = resolution.at.saturating_sub(attempt.start_time);
                let points = success_points(
                    attempt.target.len(),
                    self.difficulty,
                    attempt.window_ms(),
                    elapsed_ms,
                    &self.scoring,
                );
                self.score.correct_attempts += 1;
                self.score.points += points;
                let new_max_streak = self.streak.register_success();
                ScoreDelta {
                    attempt_id: attempt.id,
                    kind: resolution.kind,
                    points,
                    streak: self.streak.current,
                    new_max_streak,
                    completion_ms: Some(elapsed_ms),
                }
            }
            ResolutionKind::Wrong | ResolutionKind::Timeout => {
                self.streak.register_miss();
                ScoreDelta {
                    attempt_id: attempt.id,
                    kind: resolution.kind,
                    points: 0,
                    streak: 0,
                    new_max_streak: false,
                    completion_ms: None,
                }
            }
        };

        self.score.current_streak = self.streak.current;
        self.score.max_streak = self.streak.max;
        self.score.refresh_accuracy();
        debug!(
            "ledger: {:?} +{} pts, total {}/{} streak {}",
            delta.kind,
            delta.points,
            self.score.correct_attempts,
            self.score.total_attempts,
            self.score.current_streak
        );
        Some(delta)
    }

    /// Periodic elapsed-seconds update.
    pub fn tick_elapsed(&mut self, now: u64) -> u64 {
        self.score.elapsed_seconds = self.elapsed.tick(now);
        self.score.elapsed_seconds
    }

    /// Final elapsed value when the session closes between intervals.
    pub fn close_elapsed(&mut self, now: u64) -> u64 {
        self.score.elapsed_seconds = self.elapsed.refresh(now);
        self.score.elapsed_seconds
    }

    pub fn reset(&mut self, session_start: u64) {
        self.score = Score::new();
        self.streak = StreakTracker::new();
        self.elapsed = ElapsedClock::new(session_start, self.elapsed_interval_ms);
        self.elapsed_start = session_start;
        self.last_attempt_id = None;
    }
}
