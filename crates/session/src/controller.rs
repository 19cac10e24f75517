//! Session Controller: drives one training session through countdown,
//! attempts, cooldowns and completion.
//!
//! The controller is tick-driven. The host forwards input events through
//! [`SessionController::on_input`] and calls [`SessionController::tick`] at
//! its own cadence; every due transition is processed in order and reported
//! back as [`SessionEvent`]s.

use drill_core::{Difficulty, InputEvent, Mode, Pattern, Score};
use drill_engine::{
    cooldown_after, per_input_duration, Attempt, AttemptClock, ConfigError, Countdown,
    CustomConfig, PatternLibrary, Resolution, ScoreDelta, ScoreLedger, SelectRequest,
    SequenceMatcher, TrainerConfig,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::input::{InputQueue, Settings};
use crate::relay::{parse_projection, NullRelay, RelaySink, RelayStatus};
use crate::report::{build_report, AttemptOutcome, SessionReport};
use crate::store::{CompletedSession, KeyValueStore, SessionStore, StoreError};

pub type SessionId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Countdown,
    AwaitingInput,
    Cooldown,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub target_attempt_count: u32,
    pub score: Score,
    /// Every accepted input, in arrival order.
    pub history: Vec<InputEvent>,
    pub start_time: u64,
}

/// What a host asks for when starting a session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRequest {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub target_attempt_count: u32,
    pub custom: Option<CustomConfig>,
    pub custom_combo: Option<Pattern>,
    /// Seed for pattern selection.
    pub seed: u64,
}

impl SessionRequest {
    pub fn new(mode: Mode, difficulty: Difficulty, target_attempt_count: u32) -> Self {
        Self {
            mode,
            difficulty,
            target_attempt_count,
            custom: None,
            custom_combo: None,
            seed: 0,
        }
    }

    pub fn with_custom(mut self, custom: CustomConfig) -> Self {
        self.custom = Some(custom);
        self
    }

    pub fn with_custom_combo(mut self, pattern: Pattern) -> Self {
        self.custom_combo = Some(pattern);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn select_request(&self) -> SelectRequest {
        SelectRequest {
            mode: self.mode,
            difficulty: self.difficulty,
            custom: self.custom.clone(),
            custom_combo: self.custom_combo.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    CountdownStep {
        remaining: u8,
    },
    AttemptStarted {
        attempt_id: u64,
        pattern: Pattern,
        deadline: u64,
    },
    Progress {
        attempt_id: u64,
        matched: usize,
        total: usize,
    },
    Resolved {
        resolution: Resolution,
        delta: ScoreDelta,
        pattern: Pattern,
    },
    Completed {
        record: CompletedSession,
        rank: Option<usize>,
    },
}

/// Snapshot of the pending attempt for progress display.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttemptProgress {
    pub attempt_id: u64,
    pub matched: usize,
    pub total: usize,
    pub remaining_ms: u64,
    pub fraction_remaining: f64,
}

/// Collaborators shared by every session: configuration, the pattern
/// catalog and the host's settings.
pub struct TrainerContext {
    pub config: TrainerConfig,
    pub library: PatternLibrary,
    pub settings: Settings,
}

impl TrainerContext {
    pub fn new(config: TrainerConfig, settings: Settings) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            library: PatternLibrary::standard(),
            settings,
        })
    }
}

impl Default for TrainerContext {
    fn default() -> Self {
        Self {
            config: TrainerConfig::default(),
            library: PatternLibrary::standard(),
            settings: Settings::default(),
        }
    }
}

struct ActiveSession {
    session: Session,
    request: SessionRequest,
    window_ms: u64,
    matcher: SequenceMatcher,
    ledger: ScoreLedger,
    countdown: Countdown,
    cooldown_until: u64,
    rng: StdRng,
    outcomes: Vec<AttemptOutcome>,
    finalized: bool,
}

impl ActiveSession {
    /// Routes one resolution through the ledger.
    fn settle(&mut self, resolution: Resolution) -> Option<(ScoreDelta, Pattern)> {
        let attempt = self.matcher.attempt()?;
        let delta = self.ledger.apply_resolution(&resolution, attempt)?;
        let pattern = attempt.target.clone();
        self.session.score = self.ledger.score().clone();
        self.outcomes.push(AttemptOutcome {
            attempt_id: delta.attempt_id,
            pattern: pattern.clone(),
            kind: delta.kind,
            points: delta.points,
            completion_ms: delta.completion_ms,
        });
        Some((delta, pattern))
    }

    fn attempts_done(&self) -> bool {
        self.ledger.score().total_attempts >= self.session.target_attempt_count
    }
}

pub struct SessionController {
    ctx: TrainerContext,
    store: SessionStore,
    kv: Box<dyn KeyValueStore>,
    relay: Box<dyn RelaySink>,
    relay_status: RelayStatus,
    state: SessionState,
    active: Option<ActiveSession>,
    next_session_id: SessionId,
}

impl SessionController {
    /// Builds a controller, restoring history and leaderboard from `kv`.
    pub fn new(ctx: TrainerContext, kv: Box<dyn KeyValueStore>) -> Result<Self, StoreError> {
        let store = SessionStore::restore(
            kv.as_ref(),
            ctx.config.history_cap,
            ctx.config.leaderboard_cap,
        )?;
        let next_session_id = store.history().map(|s| s.id).max().unwrap_or(0) + 1;
        Ok(Self {
            ctx,
            store,
            kv,
            relay: Box::new(NullRelay),
            relay_status: RelayStatus::default(),
            state: SessionState::Idle,
            active: None,
            next_session_id,
        })
    }

    pub fn with_relay(mut self, relay: Box<dyn RelaySink>) -> Self {
        self.relay = relay;
        self
    }

    /// Validates the request and enters the countdown. Any running session is dropped.
    pub fn start(&mut self, request: SessionRequest, now: u64) -> Result<SessionId, ConfigError> {
        if request.target_attempt_count == 0 {
            warn!("rejecting session: target attempt count must be at least 1");
            return Err(ConfigError::InvalidAttemptCount);
        }
        if let Err(err) = self
            .ctx
            .library
            .validate(&request.select_request(), self.ctx.settings.layout)
        {
            warn!("rejecting session ({} / {}): {}", request.mode, request.difficulty, err);
            return Err(err);
        }

        if self.active.is_some() {
            self.end();
        }

        let id = self.next_session_id;
        self.next_session_id += 1;
        let config = &self.ctx.config;
        let window_ms = per_input_duration(
            request.difficulty,
            request.select_request().duration_override(),
            &config.timing,
        );

        info!(
            "session {} started: {} / {}, {} attempts, {}ms window",
            id, request.mode, request.difficulty, request.target_attempt_count, window_ms
        );
        self.active = Some(ActiveSession {
            session: Session {
                id,
                mode: request.mode,
                difficulty: request.difficulty,
                target_attempt_count: request.target_attempt_count,
                score: Score::new(),
                history: Vec::new(),
                start_time: now,
            },
            window_ms,
            matcher: SequenceMatcher::new(config.input_window),
            ledger: ScoreLedger::new(request.difficulty, config.scoring.clone(), now)
                .with_elapsed_interval(config.timing.elapsed_tick_ms),
            countdown: Countdown::new(now, &config.timing),
            cooldown_until: now,
            rng: StdRng::seed_from_u64(request.seed),
            outcomes: Vec::new(),
            finalized: false,
            request,
        });
        self.state = SessionState::Countdown;
        Ok(id)
    }

    /// Records one input and evaluates it against the pending attempt.
    pub fn on_input(&mut self, event: InputEvent) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if !self.ctx.settings.layout.allows(event.symbol) {
            debug!("dropping {} (not on the active button layout)", event.symbol);
            return events;
        }
        let Some(active) = self.active.as_mut() else {
            return events;
        };
        if self.state == SessionState::Completed {
            return events;
        }

        self.relay.publish(&event);
        active.session.history.push(event);
        let resolution = active.matcher.on_input(event);
        if self.state != SessionState::AwaitingInput {
            return events;
        }

        match resolution {
            Some(resolution) => self.handle_resolution(resolution, &mut events),
            None => {
                if let Some(attempt) = active.matcher.attempt().filter(|a| a.is_pending()) {
                    events.push(SessionEvent::Progress {
                        attempt_id: attempt.id,
                        matched: attempt.matched_prefix_len,
                        total: attempt.target.len(),
                    });
                }
            }
        }
        events
    }

    /// Feeds everything queued by an input source.
    pub fn pump(&mut self, queue: &InputQueue) -> Vec<SessionEvent> {
        queue
            .drain()
            .into_iter()
            .flat_map(|event| self.on_input(event))
            .collect()
    }

    /// Advances countdown, deadline and cooldown timers to `now`.
    pub fn tick(&mut self, now: u64) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let Some(active) = self.active.as_mut() else {
            return events;
        };

        match self.state {
            SessionState::Idle | SessionState::Completed => {}
            SessionState::Countdown => {
                events.extend(
                    active
                        .countdown
                        .advance(now)
                        .into_iter()
                        .map(|remaining| SessionEvent::CountdownStep { remaining }),
                );
                if active.countdown.is_finished(now) {
                    self.begin_attempt(now, &mut events);
                }
            }
            SessionState::AwaitingInput => {
                active.ledger.tick_elapsed(now);
                active.session.score = active.ledger.score().clone();
                if let Some(resolution) = active.matcher.on_tick(now) {
                    self.handle_resolution(resolution, &mut events);
                }
            }
            SessionState::Cooldown => {
                active.ledger.tick_elapsed(now);
                active.session.score = active.ledger.score().clone();
                if now >= active.cooldown_until {
                    if active.attempts_done() {
                        self.complete(now, &mut events);
                    } else {
                        self.begin_attempt(now, &mut events);
                    }
                }
            }
        }
        events
    }

    /// Stops the session. Pending deadlines and cooldowns are discarded, so
    /// later ticks and inputs do nothing.
    pub fn end(&mut self) -> Option<Session> {
        let active = self.active.take()?;
        if !active.finalized {
            info!(
                "session {} ended early after {} attempts",
                active.session.id,
                active.ledger.score().total_attempts
            );
        }
        self.state = SessionState::Idle;
        Some(active.session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> Option<&Score> {
        self.active.as_ref().map(|a| a.ledger.score())
    }

    pub fn session(&self) -> Option<&Session> {
        self.active.as_ref().map(|a| &a.session)
    }

    pub fn attempt(&self) -> Option<&Attempt> {
        self.active.as_ref().and_then(|a| a.matcher.attempt())
    }

    /// Progress of the pending attempt, sampled at the host's UI cadence.
    pub fn progress(&self, now: u64) -> Option<AttemptProgress> {
        if self.state != SessionState::AwaitingInput {
            return None;
        }
        let attempt = self.attempt().filter(|a| a.is_pending())?;
        let clock = AttemptClock::new(attempt.start_time, attempt.window_ms());
        Some(AttemptProgress {
            attempt_id: attempt.id,
            matched: attempt.matched_prefix_len,
            total: attempt.target.len(),
            remaining_ms: clock.remaining(now),
            fraction_remaining: clock.fraction_remaining(now),
        })
    }

    pub fn report(&self) -> Option<SessionReport> {
        self.active
            .as_ref()
            .map(|a| build_report(a.ledger.score(), &a.outcomes))
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Cadence at which the host should sample [`SessionController::progress`].
    pub fn progress_interval_ms(&self) -> u64 {
        self.ctx.config.timing.tick_ms
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.ctx.config
    }

    pub fn settings(&self) -> &Settings {
        &self.ctx.settings
    }

    pub fn relay_status(&self) -> RelayStatus {
        self.relay_status
    }

    /// Applies a relay state blob; malformed blobs leave the status unchanged.
    pub fn apply_relay_projection(&mut self, json: &str) -> Result<RelayStatus, serde_json::Error> {
        self.relay_status = parse_projection(json)?;
        Ok(self.relay_status)
    }

    fn begin_attempt(&mut self, now: u64, events: &mut Vec<SessionEvent>) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let pattern = match self.ctx.library.select(
            &active.request.select_request(),
            self.ctx.settings.layout,
            &mut active.rng,
        ) {
            Ok(pattern) => pattern,
            Err(err) => {
                warn!("session {} aborted: {}", active.session.id, err);
                self.active = None;
                self.state = SessionState::Idle;
                return;
            }
        };
        let attempt = active.matcher.begin(pattern, now, active.window_ms);
        events.push(SessionEvent::AttemptStarted {
            attempt_id: attempt.id,
            pattern: attempt.target.clone(),
            deadline: attempt.deadline,
        });
        self.state = SessionState::AwaitingInput;
    }

    fn handle_resolution(&mut self, resolution: Resolution, events: &mut Vec<SessionEvent>) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.finalized {
            return;
        }
        let Some((delta, pattern)) = active.settle(resolution) else {
            return;
        };
        active.cooldown_until =
            resolution.at + cooldown_after(resolution.kind, &self.ctx.config.timing);
        events.push(SessionEvent::Resolved {
            resolution,
            delta,
            pattern,
        });
        self.state = SessionState::Cooldown;
    }

    /// Records the finished session. Runs at most once per session.
    fn complete(&mut self, now: u64, events: &mut Vec<SessionEvent>) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.finalized {
            return;
        }
        active.finalized = true;
        active.matcher.cancel();
        active.ledger.close_elapsed(now);
        active.session.score = active.ledger.score().clone();

        let record = CompletedSession {
            id: active.session.id,
            mode: active.session.mode,
            difficulty: active.session.difficulty,
            target_attempt_count: active.session.target_attempt_count,
            score: active.session.score.clone(),
            start_time: active.session.start_time,
            end_time: now,
        };
        let rank = self.store.record(record.clone());
        if let Err(err) = self.store.snapshot(self.kv.as_mut()) {
            warn!("failed to persist session {}: {}", record.id, err);
        }
        info!(
            "session {} completed: {} pts, {:.1}% accuracy, max streak {}{}",
            record.id,
            record.score.points,
            record.score.accuracy_percent,
            record.score.max_streak,
            rank.map(|r| format!(", leaderboard #{}", r + 1)).unwrap_or_default()
        );
        self.state = SessionState::Completed;
        events.push(SessionEvent::Completed { record, rank });
    }
}
