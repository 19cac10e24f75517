//! Input events and the rolling input log.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::Symbol;

pub const DEFAULT_LOG_WINDOW: usize = 50;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct InputEvent {
    pub symbol: Symbol,
    /// Milliseconds on the host clock.
    pub timestamp: u64,
}

impl InputEvent {
    pub fn new(symbol: Symbol, timestamp: u64) -> Self {
        Self { symbol, timestamp }
    }
}

/// Append-only window over the most recent input events.
///
/// Every event gets an absolute sequence index that survives trimming, so an
/// index taken with [`InputLog::next_index`] keeps pointing at the same place
/// in the stream after older events have been dropped.
#[derive(Clone, Debug)]
pub struct InputLog {
    events: VecDeque<InputEvent>,
    window: usize,
    /// Absolute index of `events[0]`.
    base: u64,
}

impl InputLog {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_LOG_WINDOW)
    }

    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            events: VecDeque::with_capacity(window),
            window,
            base: 0,
        }
    }

    /// Absolute index the next pushed event will receive.
    pub fn next_index(&self) -> u64 {
        self.base + self.events.len() as u64
    }

    pub fn push(&mut self, event: InputEvent) -> u64 {
        let index = self.next_index();
        self.events.push_back(event);
        while self.events.len() > self.window {
            self.events.pop_front();
            self.base += 1;
        }
        index
    }

    /// Events recorded at or after `start_index`, oldest first.
    pub fn since(&self, start_index: u64) -> impl Iterator<Item = &InputEvent> + '_ {
        let skip = start_index.saturating_sub(self.base) as usize;
        self.events.iter().skip(skip)
    }

    /// Symbols recorded at or after `start_index`, oldest first.
    pub fn symbols_since(&self, start_index: u64) -> Vec<Symbol> {
        self.since(start_index).map(|e| e.symbol).collect()
    }

    pub fn last(&self) -> Option<&InputEvent> {
        self.events.back()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.base = self.next_index();
        self.events.clear();
    }
}

impl Default for InputLog {
    fn default() -> Self {
        Self::new()
    }
}
