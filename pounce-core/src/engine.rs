//! Turn engine: the only mutator of `GameState`
//!
//! Moves are committed immediately but their rules effects wait until
//! `advance_time` reaches the end of the settle window. Each capture in a
//! chain is its own timed step, and a computer evader spends `think_ms`
//! "thinking" before its planned move is submitted. While anything is
//! pending, selection and submission are refused.

use crate::camping::{self, CampingWarning};
use crate::capture::{landed_hunter, next_strike_for, pick_random, strike_position, strike_targets, NextStrike};
use crate::config::GameConfig;
use crate::error::{MoveError, SaveError};
use crate::events::GameEvent;
use crate::game::{GameState, PendingStep, Turn, Winner};
use crate::geometry::Vec2;
use crate::pieces::{Body, Motion, PieceId, Status};
use crate::planner::EvaderPlanner;
use crate::rescue::apply_rescue;
use crate::save;
use crate::victory::{evader_wins, hunters_win};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// ENGINE
// ============================================================================

/// Game driver owning the state, the planner and the tie-break randomness
pub struct Engine<R: Rng = ChaCha8Rng> {
    state: GameState,
    rng: R,
    planner: EvaderPlanner,
    /// False from a load until the next `advance_time`
    clock_synced: bool,
}

impl Engine<ChaCha8Rng> {
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine<R> {
    /// Start a fresh game in the reference setup
    pub fn new(config: GameConfig, rng: R) -> Self {
        let mut state = GameState::new(config);
        state.stats.games_started = 1;
        Self::from_state(state, rng)
    }

    /// Drive an existing state (custom setups, tests, loaded games)
    pub fn from_state(state: GameState, rng: R) -> Self {
        Self {
            state,
            rng,
            planner: EvaderPlanner::default(),
            clock_synced: true,
        }
    }

    pub fn with_planner(mut self, planner: EvaderPlanner) -> Self {
        self.planner = planner;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Start a new game. Session statistics and the clock carry over.
    pub fn reset(&mut self, config: GameConfig) {
        let mut stats = std::mem::take(&mut self.state.stats);
        stats.games_started += 1;
        let clock = self.state.clock;
        self.state = GameState::new(config);
        self.state.stats = stats;
        self.state.clock = clock;
        tracing::debug!(games = self.state.stats.games_started, "game reset");
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    /// Piece the player may pick up at `point`, if any
    pub fn select_piece_at(&self, point: Vec2) -> Option<PieceId> {
        let state = &self.state;
        if state.is_over() || state.is_busy() || !point.is_finite() {
            return None;
        }
        match state.turn {
            Turn::Evader => (!state.config.is_computer_evader() && state.evader.body.contains(point))
                .then_some(PieceId::Evader),
            Turn::Hunters => state
                .hunters
                .iter()
                .position(|h| h.can_act() && h.body.contains(point))
                .map(PieceId::Hunter),
        }
    }

    /// Commit a move toward `target`. Returns where the piece will land.
    ///
    /// The move starts at the last `advance_time` timestamp. Right after
    /// `deserialize` it starts on the next tick instead.
    pub fn submit_move(&mut self, piece: PieceId, target: Vec2) -> Result<Vec2, MoveError> {
        if self.state.is_over() {
            return Err(MoveError::GameOver);
        }
        if self.state.is_busy() {
            return Err(MoveError::Busy);
        }
        if !target.is_finite() {
            return Err(MoveError::InvalidCoordinate);
        }
        match (piece, self.state.turn) {
            (PieceId::Evader, Turn::Evader) => {}
            (PieceId::Hunter(i), Turn::Hunters) => {
                let hunter = self.state.hunter(i).ok_or(MoveError::PieceUnavailable)?;
                if !hunter.can_act() {
                    return Err(MoveError::PieceUnavailable);
                }
            }
            _ => return Err(MoveError::NotYourTurn),
        }
        Ok(self.commit_move(piece, target, self.start_time()))
    }

    /// Resolve an equidistant choice point for a human evader
    pub fn choose_capture(&mut self, hunter: usize) -> Result<(), MoveError> {
        if self.state.is_over() {
            return Err(MoveError::GameOver);
        }
        let Some(candidates) = self.state.capture_choice() else {
            return Err(MoveError::NotYourTurn);
        };
        if !candidates.contains(&hunter) {
            return Err(MoveError::PieceUnavailable);
        }
        self.begin_chain_step(hunter, self.start_time());
        Ok(())
    }

    pub fn camping_warning(&self, hunter: usize) -> CampingWarning {
        camping::warning(&self.state, hunter)
    }

    pub fn serialize(&self) -> Result<String, SaveError> {
        save::encode(&self.state)
    }

    /// Replace the game with a saved one. On error nothing changes.
    pub fn deserialize(&mut self, blob: &str) -> Result<(), SaveError> {
        self.state = save::decode(blob)?;
        self.clock_synced = false;
        Ok(())
    }

    // ========================================================================
    // CLOCK
    // ========================================================================

    /// Settle everything due by `now`, returning what happened in order
    pub fn advance_time(&mut self, now: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !now.is_finite() {
            return events;
        }
        self.state.clock = now;
        self.clock_synced = true;

        while let Some(step) = self.state.pending.clone() {
            let progressed = match step {
                PendingStep::Thinking { ready_at } => self.tick_thinking(ready_at, now, &mut events),
                PendingStep::EvaderMove => match settled_at(&mut self.state.evader.body, now) {
                    Some(at) => {
                        self.settle_evader_move(at, &mut events);
                        true
                    }
                    None => false,
                },
                PendingStep::ChainStep { target } => match settled_at(&mut self.state.evader.body, now) {
                    Some(at) => {
                        self.settle_chain_step(target, at, &mut events);
                        true
                    }
                    None => false,
                },
                PendingStep::HunterMove { hunter } => {
                    match settled_at(&mut self.state.hunters[hunter].body, now) {
                        Some(at) => {
                            self.settle_hunter_move(hunter, at, &mut events);
                            true
                        }
                        None => false,
                    }
                }
                PendingStep::AwaitingCaptureChoice { .. } => false,
            };
            if !progressed {
                break;
            }
        }
        events
    }

    fn tick_thinking(&mut self, ready_at: Option<f64>, now: f64, events: &mut Vec<GameEvent>) -> bool {
        let ready = match ready_at {
            Some(t) => t,
            None => {
                let t = now + self.state.config.think_ms;
                self.state.pending = Some(PendingStep::Thinking { ready_at: Some(t) });
                t
            }
        };
        if now < ready {
            return false;
        }

        let plan = self.planner.plan(&self.state, &mut self.rng);
        events.push(GameEvent::EvaderPlanned {
            target: plan.target,
            expected_chain: plan.chain_length,
        });
        self.state.pending = None;
        self.commit_move(PieceId::Evader, plan.target, Some(ready));
        true
    }

    /// Start of a motion opened by a command; `None` waits for the next tick
    fn start_time(&self) -> Option<f64> {
        self.clock_synced.then_some(self.state.clock)
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    fn commit_move(&mut self, piece: PieceId, target: Vec2, start: Option<f64>) -> Vec2 {
        let board = self.state.config.board;
        let duration = self.state.config.settle_ms;
        let (body, pending) = match piece {
            PieceId::Evader => {
                self.state.threatened.clear();
                (&mut self.state.evader.body, PendingStep::EvaderMove)
            }
            PieceId::Hunter(i) => (&mut self.state.hunters[i].body, PendingStep::HunterMove { hunter: i }),
        };

        let reached = body.position.step_toward(target, body.movement_range);
        let destination = match piece {
            PieceId::Evader => board.clamp_evader(reached, body.size),
            PieceId::Hunter(_) => board.clamp_hunter(reached),
        };
        body.motion = Some(Motion::new(body.position, destination, start, duration));
        body.position = destination;

        self.state.pending = Some(pending);
        self.state.stats.moves += 1;
        destination
    }

    fn settle_evader_move(&mut self, at: f64, events: &mut Vec<GameEvent>) {
        self.state.pending = None;
        events.push(GameEvent::MoveSettled {
            piece: PieceId::Evader,
            position: self.state.evader.position(),
        });

        match landed_hunter(&self.state.evader, &self.state.hunters) {
            Some(first) => {
                self.state.chain_length = 0;
                self.capture(first, events);
                if !self.check_evader_victory(events) {
                    self.continue_chain(at, events);
                }
            }
            None => {
                let state = &self.state;
                let threatened: Vec<usize> = strike_targets(
                    state.evader.position(),
                    state.evader.strike_range(),
                    &state.hunters,
                    &state.config.board,
                )
                .into_iter()
                .map(|(i, _)| i)
                .collect();
                if !threatened.is_empty() {
                    events.push(GameEvent::Threat {
                        hunters: threatened.clone(),
                    });
                }
                self.state.threatened = threatened;
                self.end_evader_turn(events);
            }
        }
    }

    fn settle_chain_step(&mut self, target: usize, at: f64, events: &mut Vec<GameEvent>) {
        self.state.pending = None;
        events.push(GameEvent::MoveSettled {
            piece: PieceId::Evader,
            position: self.state.evader.position(),
        });
        self.capture(target, events);
        if !self.check_evader_victory(events) {
            self.continue_chain(at, events);
        }
    }

    fn capture(&mut self, hunter: usize, events: &mut Vec<GameEvent>) {
        self.state.hunters[hunter].status = Status::Incapacitated;
        self.state.chain_length += 1;
        tracing::debug!(hunter, chain = self.state.chain_length, "hunter captured");
        events.push(GameEvent::Captured {
            hunter,
            chain_position: self.state.chain_length,
        });
    }

    fn continue_chain(&mut self, at: f64, events: &mut Vec<GameEvent>) {
        let state = &self.state;
        match next_strike_for(&state.evader, &state.hunters, &state.config.board) {
            NextStrike::None => {
                self.close_chain(events);
                self.end_evader_turn(events);
            }
            NextStrike::Single(target) => self.begin_chain_step(target, Some(at)),
            NextStrike::Choice(candidates) => {
                if self.state.config.is_computer_evader() {
                    match pick_random(&candidates, &mut self.rng) {
                        Some(target) => self.begin_chain_step(target, Some(at)),
                        None => {
                            self.close_chain(events);
                            self.end_evader_turn(events);
                        }
                    }
                } else {
                    events.push(GameEvent::CaptureChoiceRequired {
                        candidates: candidates.clone(),
                    });
                    self.state.pending = Some(PendingStep::AwaitingCaptureChoice { candidates });
                }
            }
        }
    }

    fn begin_chain_step(&mut self, target: usize, start: Option<f64>) {
        let state = &mut self.state;
        let destination = strike_position(&state.evader, &state.hunters[target], &state.config.board);
        let body = &mut state.evader.body;
        body.motion = Some(Motion::new(body.position, destination, start, state.config.settle_ms));
        body.position = destination;
        state.pending = Some(PendingStep::ChainStep { target });
    }

    fn close_chain(&mut self, events: &mut Vec<GameEvent>) {
        let length = std::mem::take(&mut self.state.chain_length);
        self.state.stats.capture_chains.push(length);
        tracing::debug!(length, "capture chain ended");
        events.push(GameEvent::ChainEnded { length });
    }

    fn check_evader_victory(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if !evader_wins(&self.state.hunters) {
            return false;
        }
        if self.state.chain_length > 0 {
            self.close_chain(events);
        }
        self.declare(Winner::Evader, None, events);
        true
    }

    fn end_evader_turn(&mut self, events: &mut Vec<GameEvent>) {
        let state = &self.state;
        if let Some(triple) = hunters_win(&state.evader, &state.hunters, &state.config.board) {
            self.declare(Winner::Hunters, Some(triple), events);
            return;
        }
        self.state.start_hunter_turn();
        tracing::debug!("hunters to move");
        events.push(GameEvent::TurnChanged(Turn::Hunters));
    }

    fn settle_hunter_move(&mut self, mover: usize, at: f64, events: &mut Vec<GameEvent>) {
        self.state.pending = None;
        events.push(GameEvent::MoveSettled {
            piece: PieceId::Hunter(mover),
            position: self.state.hunters[mover].position(),
        });

        let order = self.state.next_action_order();
        let hunter = &mut self.state.hunters[mover];
        hunter.has_acted = true;
        hunter.action_order = Some(order);

        if let Some(rescue) = apply_rescue(&mut self.state, mover) {
            if rescue.rescuer_keeps_action {
                self.state.hunters[mover].has_acted = false;
            }
            events.push(GameEvent::Rescued {
                rescuer: rescue.rescuer,
                rescued: rescue.rescued,
            });
        }

        let handed_off = self.state.hunters_to_act() == 0;
        if handed_off {
            let turn = camping::record_turn(&mut self.state);
            for hunter in camping::enforce(&mut self.state) {
                events.push(GameEvent::CampingElimination { hunter });
            }
            self.state.turn = Turn::Evader;
            tracing::debug!(turn, "hunter turn complete");
            events.push(GameEvent::TurnChanged(Turn::Evader));
        }

        let state = &self.state;
        if let Some(triple) = hunters_win(&state.evader, &state.hunters, &state.config.board) {
            self.declare(Winner::Hunters, Some(triple), events);
            return;
        }
        if evader_wins(&self.state.hunters) {
            self.declare(Winner::Evader, None, events);
            return;
        }

        if handed_off && self.state.config.is_computer_evader() {
            let ready_at = at + self.state.config.think_ms;
            self.state.pending = Some(PendingStep::Thinking {
                ready_at: Some(ready_at),
            });
        }
    }

    fn declare(&mut self, winner: Winner, triple: Option<[usize; 3]>, events: &mut Vec<GameEvent>) {
        let state = &mut self.state;
        state.winner = Some(winner);
        state.winning_triple = triple;
        state.pending = None;
        if winner == Winner::Hunters {
            state.stats.triangles_formed += 1;
        }
        tracing::info!(?winner, ?triple, "game over");
        events.push(GameEvent::Victory { winner });
    }
}

/// End time of a finished motion, consuming it. Unstamped motions start now.
fn settled_at(body: &mut Body, now: f64) -> Option<f64> {
    let Some(motion) = body.motion.as_mut() else {
        return Some(now);
    };
    if motion.started_at.is_none() {
        motion.started_at = Some(now);
    }
    if !motion.is_complete(now) {
        return None;
    }
    let end = motion.ends_at().unwrap_or(now);
    body.motion = None;
    Some(end)
}

// ============================================================================
// TESTS
// ============================================================================
