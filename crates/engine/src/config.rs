use drill_core::Difficulty;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub easy_ms: u64,
    pub medium_ms: u64,
    pub hard_ms: u64,
    /// UI progress sampling cadence.
    pub tick_ms: u64,
    pub countdown_steps: u8,
    pub countdown_step_ms: u64,
    pub cooldown_success_ms: u64,
    pub cooldown_wrong_ms: u64,
    pub cooldown_timeout_ms: u64,
    pub elapsed_tick_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_points: u32,
    /// Extra base points per symbol beyond the first.
    pub complexity_bonus: u32,
    /// Share of base points available as a speed bonus.
    pub time_bonus_ratio: f64,
    pub easy_multiplier: f64,
    pub medium_multiplier: f64,
    pub hard_multiplier: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub timing: TimingConfig,
    pub scoring: ScoringConfig,
    pub input_window: usize,
    pub history_cap: usize,
    pub leaderboard_cap: usize,
}

impl TimingConfig {
    pub fn standard() -> Self {
        Self {
            easy_ms: 3000,
            medium_ms: 2000,
            hard_ms: 1000,
            tick_ms: 100,
            countdown_steps: 3,
            countdown_step_ms: 300,
            cooldown_success_ms: 1500,
            cooldown_wrong_ms: 1000,
            cooldown_timeout_ms: 500,
            elapsed_tick_ms: 1000,
        }
    }

    pub fn duration_for(&self, difficulty: Difficulty) -> u64 {
        match difficulty {
            Difficulty::Easy => self.easy_ms,
            Difficulty::Medium => self.medium_ms,
            Difficulty::Hard => self.hard_ms,
        }
    }

    pub fn countdown_total_ms(&self) -> u64 {
        self.countdown_steps as u64 * self.countdown_step_ms
    }
}

impl ScoringConfig {
    pub fn standard() -> Self {
        Self {
            base_points: 100,
            complexity_bonus: 25,
            time_bonus_ratio: 0.5,
            easy_multiplier: 1.0,
            medium_multiplier: 1.2,
            hard_multiplier: 1.5,
        }
    }

    pub fn multiplier(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy_multiplier,
            Difficulty::Medium => self.medium_multiplier,
            Difficulty::Hard => self.hard_multiplier,
        }
    }
}

impl TrainerConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        let durations = [
            ("easy_ms", t.easy_ms),
            ("medium_ms", t.medium_ms),
            ("hard_ms", t.hard_ms),
            ("tick_ms", t.tick_ms),
            ("elapsed_tick_ms", t.elapsed_tick_ms),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::InvalidTiming(format!("{name} must be non-zero")));
        }
        if self.input_window == 0 {
            return Err(ConfigError::InvalidTiming(
                "input_window must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::standard(),
            scoring: ScoringConfig::standard(),
            input_window: drill_core::DEFAULT_LOG_WINDOW,
            history_cap: 100,
            leaderboard_cap: 50,
        }
    }
}
