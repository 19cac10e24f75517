//! drill-session - session lifecycle, persistence and host-facing seams.

pub mod controller;
pub mod input;
pub mod relay;
pub mod report;
pub mod store;

pub use controller::{
    AttemptProgress, Session, SessionController, SessionEvent, SessionId, SessionRequest,
    SessionState, TrainerContext,
};
pub use input::{Broadcaster, InputCallback, InputQueue, InputSource, KeyMap, PollEdge, Settings};
pub use relay::{parse_projection, NullRelay, RelayOutbox, RelaySink, RelayStatus};
pub use report::{build_report, AttemptOutcome, PatternStats, SessionReport};
pub use store::{
    CompletedSession, KeyValueStore, LeaderboardEntry, MemoryStore, SessionStore, StoreError,
    HISTORY_KEY, LEADERBOARD_KEY,
};
