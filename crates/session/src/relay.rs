//! Optional broadcast relay: mirrored inputs out, participant status in.

use std::collections::VecDeque;

use drill_core::InputEvent;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayStatus {
    #[default]
    Waiting,
    Active,
}

#[derive(Deserialize)]
struct Projection {
    status: RelayStatus,
}

/// Reads the `status` field out of a relay state blob.
pub fn parse_projection(json: &str) -> Result<RelayStatus, serde_json::Error> {
    serde_json::from_str::<Projection>(json).map(|p| p.status)
}

/// Fire-and-forget mirror of recorded inputs. Never awaited by the core.
pub trait RelaySink {
    fn publish(&mut self, event: &InputEvent);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullRelay;

impl RelaySink for NullRelay {
    fn publish(&mut self, _event: &InputEvent) {}
}

/// Bounded outbox the host flushes to its transport; oldest events drop first.
#[derive(Clone, Debug)]
pub struct RelayOutbox {
    events: VecDeque<InputEvent>,
    capacity: usize,
    dropped: u64,
}

impl RelayOutbox {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn flush(&mut self) -> Vec<InputEvent> {
        self.events.drain(..).collect()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl RelaySink for RelayOutbox {
    fn publish(&mut self, event: &InputEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(*event);
    }
}
