use drill_core::{Pattern, Score};
use drill_engine::ResolutionKind;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    pub attempt_id: u64,
    pub pattern: Pattern,
    pub kind: ResolutionKind,
    pub points: u64,
    pub completion_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternStats {
    pub name: String,
    pub notation: String,
    pub attempts: u32,
    pub successes: u32,
    pub wrongs: u32,
    pub timeouts: u32,
    pub best_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub score: Score,
    /// In order of first appearance.
    pub patterns: Vec<PatternStats>,
    pub weakest: Option<String>,
}

impl PatternStats {
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.successes as f64 / self.attempts as f64
    }
}

pub fn build_report(score: &Score, outcomes: &[AttemptOutcome]) -> SessionReport {
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut patterns: Vec<PatternStats> = Vec::new();

    for outcome in outcomes {
        let name = outcome.pattern.display_name();
        let slot = *index.entry(name.clone()).or_insert_with(|| {
            patterns.push(PatternStats {
                name,
                notation: outcome.pattern.notation(),
                ..PatternStats::default()
            });
            patterns.len() - 1
        });
        let stats = &mut patterns[slot];
        stats.attempts += 1;
        match outcome.kind {
            ResolutionKind::Success => {
                stats.successes += 1;
                if let Some(ms) = outcome.completion_ms {
                    stats.best_ms = Some(stats.best_ms.map_or(ms, |best| best.min(ms)));
                }
            }
            ResolutionKind::Wrong => stats.wrongs += 1,
            ResolutionKind::Timeout => stats.timeouts += 1,
        }
    }

    let weakest = weakest_pattern(&patterns);
    SessionReport {
        score: score.clone(),
        patterns,
        weakest,
    }
}

/// Lowest success rate among patterns that were missed at least once; more attempts breaks ties.
fn weakest_pattern(patterns: &[PatternStats]) -> Option<String> {
    patterns
        .iter()
        .filter(|p| p.successes < p.attempts)
        .min_by(|a, b| {
            a.success_rate()
                .total_cmp(&b.success_rate())
                .then(b.attempts.cmp(&a.attempts))
        })
        .map(|p| p.name.clone())
}
