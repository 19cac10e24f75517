//! Completed-session history, leaderboard and the persistence seam.

use std::collections::VecDeque;

use drill_core::{Difficulty, Mode, Score};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const HISTORY_KEY: &str = "drill.history";
pub const LEADERBOARD_KEY: &str = "drill.leaderboard";

/// Key-value blob storage supplied by the host.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode or decode stored sessions: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub id: u64,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub target_attempt_count: u32,
    pub score: Score,
    pub start_time: u64,
    pub end_time: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub session_id: u64,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub points: u64,
    pub accuracy_percent: f64,
    pub max_streak: u32,
    pub recorded_at: u64,
}

impl From<&CompletedSession> for LeaderboardEntry {
    fn from(s: &CompletedSession) -> Self {
        Self {
            session_id: s.id,
            mode: s.mode,
            difficulty: s.difficulty,
            points: s.score.points,
            accuracy_percent: s.score.accuracy_percent,
            max_streak: s.score.max_streak,
            recorded_at: s.end_time,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    history: VecDeque<CompletedSession>,
    leaderboard: Vec<LeaderboardEntry>,
    history_cap: usize,
    leaderboard_cap: usize,
}

impl SessionStore {
    pub fn new(history_cap: usize, leaderboard_cap: usize) -> Self {
        Self {
            history: VecDeque::new(),
            leaderboard: Vec::new(),
            history_cap,
            leaderboard_cap,
        }
    }

    /// Most recent last.
    pub fn history(&self) -> impl Iterator<Item = &CompletedSession> + '_ {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Highest points first.
    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    pub fn qualifies(&self, points: u64) -> bool {
        if points == 0 || self.leaderboard_cap == 0 {
            return false;
        }
        self.leaderboard.len() < self.leaderboard_cap
            || self.leaderboard.last().is_some_and(|e| points > e.points)
    }

    /// Stores a finished session. Returns its leaderboard rank when it placed.
    pub fn record(&mut self, session: CompletedSession) -> Option<usize> {
        let rank = if self.qualifies(session.score.points) {
            let points = session.score.points;
            let rank = self.leaderboard.partition_point(|e| e.points >= points);
            self.leaderboard.insert(rank, LeaderboardEntry::from(&session));
            self.leaderboard.truncate(self.leaderboard_cap);
            Some(rank)
        } else {
            None
        };

        self.history.push_back(session);
        while self.history.len() > self.history_cap {
            self.history.pop_front();
        }
        rank
    }

    pub fn snapshot(&self, kv: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        kv.set(HISTORY_KEY, serde_json::to_string(&self.history)?);
        kv.set(LEADERBOARD_KEY, serde_json::to_string(&self.leaderboard)?);
        Ok(())
    }

    /// Rebuilds a store from blobs written by [`SessionStore::snapshot`]; missing keys mean empty.
    pub fn restore(
        kv: &dyn KeyValueStore,
        history_cap: usize,
        leaderboard_cap: usize,
    ) -> Result<Self, StoreError> {
        let mut store = Self::new(history_cap, leaderboard_cap);
        if let Some(blob) = kv.get(HISTORY_KEY) {
            store.history = serde_json::from_str(&blob)?;
            while store.history.len() > history_cap {
                store.history.pop_front();
            }
        }
        if let Some(blob) = kv.get(LEADERBOARD_KEY) {
            let mut entries: Vec<LeaderboardEntry> = serde_json::from_str(&blob)?;
            entries.sort_by(|a, b| b.points.cmp(&a.points));
            entries.truncate(leaderboard_cap);
            store.leaderboard = entries;
        }
        Ok(store)
    }
}
