//! Cumulative session score.

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Score {
    pub total_attempts: u32,
    pub correct_attempts: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub accuracy_percent: f64,
    pub points: u64,
    pub elapsed_seconds: u64,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missed_attempts(&self) -> u32 {
        self.total_attempts.saturating_sub(self.correct_attempts)
    }

    pub fn refresh_accuracy(&mut self) {
        self.accuracy_percent = accuracy_percent(self.correct_attempts, self.total_attempts);
    }
}

/// `100 * correct / total`, defined as 0 when nothing has been attempted.
pub fn accuracy_percent(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * correct as f64 / total as f64
}
