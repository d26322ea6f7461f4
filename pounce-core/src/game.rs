//! Game state: pieces, turn, outcome, history, statistics

use crate::board::Board;
use crate::config::GameConfig;
use crate::geometry::Vec2;
use crate::history::TurnHistory;
use crate::pieces::{Evader, Hunter, Specialization, Status, PARTY};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Whose turn it is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Evader,
    Hunters,
}

/// Game outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    Evader,
    Hunters,
}

/// Resolution step waiting on the clock (or on a human choice)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PendingStep {
    /// Computer evader is planning; `ready_at` is stamped on the next tick
    Thinking { ready_at: Option<f64> },
    /// The evader's own move is settling
    EvaderMove,
    /// A capture-chain sub-move onto `target` is settling
    ChainStep { target: usize },
    /// Equidistant choice point waiting for `Engine::choose_capture`
    AwaitingCaptureChoice { candidates: Vec<usize> },
    HunterMove { hunter: usize },
}

/// Session-cumulative statistics; survive `reset`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub games_started: u32,
    pub moves: u32,
    /// Hunters captured per completed chain
    pub capture_chains: Vec<u32>,
    pub camping_removals: u32,
    pub triangles_formed: u32,
}

impl Statistics {
    pub fn longest_chain(&self) -> u32 {
        self.capture_chains.iter().copied().max().unwrap_or(0)
    }

    pub fn average_chain(&self) -> f64 {
        if self.capture_chains.is_empty() {
            return 0.0;
        }
        let total: u32 = self.capture_chains.iter().sum();
        f64::from(total) / self.capture_chains.len() as f64
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Complete, serializable game state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) evader: Evader,
    pub(crate) hunters: Vec<Hunter>,
    pub(crate) turn: Turn,
    pub(crate) winner: Option<Winner>,
    pub(crate) winning_triple: Option<[usize; 3]>,
    pub(crate) history: TurnHistory,
    pub(crate) stats: Statistics,
    /// Display-only threat indicator
    pub(crate) threatened: Vec<usize>,
    pub(crate) pending: Option<PendingStep>,
    /// Captures so far in the chain being resolved
    pub(crate) chain_length: u32,
    /// Last timestamp seen by `advance_time`
    pub(crate) clock: f64,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Reference setup: evader at the center, the party spread around the
    /// middle of the Outer Band
    pub fn new(config: GameConfig) -> Self {
        let board = config.board;
        let radius = board.inner_radius + board.band_width / 2.0;
        let step = TAU / PARTY.len() as f64;
        let hunters = PARTY
            .iter()
            .enumerate()
            .map(|(i, &spec)| Hunter::new(board.point_at(i as f64 * step, radius), spec))
            .collect();
        let evader = Evader::new(board.center, config.evader_size(), config.evader_range());
        Self::from_parts(config, evader, hunters)
    }

    /// Custom setup with explicit pieces; evader to move
    pub fn from_parts(config: GameConfig, evader: Evader, hunters: Vec<Hunter>) -> Self {
        let pending = config
            .is_computer_evader()
            .then_some(PendingStep::Thinking { ready_at: None });
        Self {
            config,
            evader,
            hunters,
            turn: Turn::Evader,
            winner: None,
            winning_triple: None,
            history: TurnHistory::new(),
            stats: Statistics::default(),
            threatened: Vec::new(),
            pending,
            chain_length: 0,
            clock: 0.0,
        }
    }

    /// Custom setup from positions: evader sized by the config, hunters by
    /// their specialization
    pub fn with_positions(
        config: GameConfig,
        evader_position: Vec2,
        hunters: &[(Specialization, Vec2)],
    ) -> Self {
        let evader = Evader::new(evader_position, config.evader_size(), config.evader_range());
        let hunters = hunters
            .iter()
            .map(|&(spec, pos)| Hunter::new(pos, spec))
            .collect();
        Self::from_parts(config, evader, hunters)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.config.board
    }

    pub fn evader(&self) -> &Evader {
        &self.evader
    }

    pub fn hunters(&self) -> &[Hunter] {
        &self.hunters
    }

    pub fn hunter(&self, index: usize) -> Option<&Hunter> {
        self.hunters.get(index)
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winning_triple(&self) -> Option<[usize; 3]> {
        self.winning_triple
    }

    pub fn history(&self) -> &TurnHistory {
        &self.history
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn threatened(&self) -> &[usize] {
        &self.threatened
    }

    pub fn pending(&self) -> Option<&PendingStep> {
        self.pending.as_ref()
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Input is ignored while anything is settling, planning, or awaiting a choice
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Computer evader planning is in progress
    pub fn is_thinking(&self) -> bool {
        matches!(self.pending, Some(PendingStep::Thinking { .. }))
    }

    /// Candidates of an equidistant choice point, if one is waiting
    pub fn capture_choice(&self) -> Option<&[usize]> {
        match &self.pending {
            Some(PendingStep::AwaitingCaptureChoice { candidates }) => Some(candidates),
            _ => None,
        }
    }

    /// Indices of Active hunters standing in the Inner Zone
    pub fn active_in_inner_zone(&self) -> impl Iterator<Item = usize> + '_ {
        let board = self.config.board;
        self.hunters
            .iter()
            .enumerate()
            .filter(move |(_, h)| h.is_active() && board.in_inner_zone(h.position()))
            .map(|(i, _)| i)
    }

    /// Hunters still owed a move this turn
    pub fn hunters_to_act(&self) -> usize {
        self.hunters.iter().filter(|h| h.can_act()).count()
    }

    pub fn count_status(&self, status: Status) -> usize {
        self.hunters.iter().filter(|h| h.status == status).count()
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Semantic validation for states arriving from outside the engine
    pub fn validate(&self) -> Result<(), String> {
        self.config.validate()?;
        let board = self.config.board;
        if self.hunters.is_empty() {
            return Err("no hunters".to_string());
        }

        let evader = &self.evader.body;
        if !evader.position.is_finite() || !evader.size.is_finite() || evader.size <= 0.0 {
            return Err("evader has an invalid position or size".to_string());
        }
        if !(evader.movement_range.is_finite() && evader.movement_range >= 0.0) {
            return Err("evader has an invalid range".to_string());
        }
        let slack = 1e-6;
        if board.distance_to_center(evader.position) > board.inner_radius - evader.size + slack {
            return Err("evader is outside its legal area".to_string());
        }

        for (i, hunter) in self.hunters.iter().enumerate() {
            let body = &hunter.body;
            if !body.position.is_finite() || !body.size.is_finite() || body.size <= 0.0 {
                return Err(format!("hunter {i} has an invalid position or size"));
            }
            if !(body.movement_range.is_finite() && body.movement_range >= 0.0) {
                return Err(format!("hunter {i} has an invalid range"));
            }
            if board.distance_to_center(body.position) > board.outer_radius() + slack {
                return Err(format!("hunter {i} is outside the playable area"));
            }
            if hunter.camping_epoch > self.history.turns_recorded() {
                return Err(format!("hunter {i} has a camping epoch in the future"));
            }
        }

        self.history.validate(self.hunters.len())?;

        let n = self.hunters.len();
        if let Some(triple) = self.winning_triple {
            if triple.iter().any(|&i| i >= n) || self.winner != Some(Winner::Hunters) {
                return Err("inconsistent winning triple".to_string());
            }
        }
        if self.threatened.iter().any(|&i| i >= n) {
            return Err("threat indicator references a missing hunter".to_string());
        }
        match &self.pending {
            Some(_) if self.winner.is_some() => {
                return Err("finished game has pending work".to_string());
            }
            Some(PendingStep::ChainStep { target }) if *target >= n => {
                return Err("chain step references a missing hunter".to_string());
            }
            Some(PendingStep::HunterMove { hunter }) if *hunter >= n => {
                return Err("hunter move references a missing hunter".to_string());
            }
            Some(PendingStep::AwaitingCaptureChoice { candidates })
                if candidates.len() < 2 || candidates.iter().any(|&i| i >= n) =>
            {
                return Err("invalid capture choice".to_string());
            }
            _ => {}
        }

        let computer = self.config.is_computer_evader();
        match (&self.pending, self.turn) {
            (None, _) => {}
            (Some(PendingStep::HunterMove { hunter }), Turn::Hunters) => {
                if !self.hunters[*hunter].is_active() {
                    return Err(format!("hunter {hunter} is moving but not Active"));
                }
            }
            (Some(PendingStep::HunterMove { .. }), Turn::Evader) => {
                return Err("hunter move pending on the evader's turn".to_string());
            }
            (Some(_), Turn::Hunters) => {
                return Err("evader step pending on the hunters' turn".to_string());
            }
            (Some(PendingStep::Thinking { .. }), Turn::Evader) if !computer => {
                return Err("human evader cannot be thinking".to_string());
            }
            (Some(PendingStep::AwaitingCaptureChoice { .. }), Turn::Evader) if computer => {
                return Err("computer evader cannot await a capture choice".to_string());
            }
            (Some(PendingStep::ChainStep { target }), Turn::Evader) if !self.hunters[*target].is_active() => {
                return Err(format!("chain step strikes hunter {target}, which is not Active"));
            }
            _ => {}
        }

        match self.winner {
            Some(Winner::Evader) if self.count_status(Status::Active) > 0 => {
                return Err("evader won but hunters are still Active".to_string());
            }
            Some(Winner::Hunters) if self.winning_triple.is_none() => {
                return Err("hunters won without a triangle".to_string());
            }
            _ => {}
        }
        if !self.clock.is_finite() {
            return Err("clock is not finite".to_string());
        }
        Ok(())
    }

    // ========================================================================
    // INTERNAL MUTATION
    // ========================================================================

    /// Drop interpolation timestamps so open timers restart on the next tick
    pub(crate) fn rebase_timers(&mut self) {
        if let Some(motion) = self.evader.body.motion.as_mut() {
            motion.started_at = None;
        }
        for hunter in &mut self.hunters {
            if let Some(motion) = hunter.body.motion.as_mut() {
                motion.started_at = None;
            }
        }
        if let Some(PendingStep::Thinking { ready_at }) = self.pending.as_mut() {
            *ready_at = None;
        }
    }

    /// An idle computer evader on its own turn starts planning again
    pub(crate) fn resume_planning(&mut self) {
        let idle = self.pending.is_none() && self.winner.is_none() && self.turn == Turn::Evader;
        if idle && self.config.is_computer_evader() {
            self.pending = Some(PendingStep::Thinking { ready_at: None });
        }
    }

    /// Begin a hunter turn: nobody has acted yet
    pub(crate) fn start_hunter_turn(&mut self) {
        self.turn = Turn::Hunters;
        for hunter in &mut self.hunters {
            hunter.has_acted = false;
            hunter.action_order = None;
        }
    }

    pub(crate) fn next_action_order(&self) -> u8 {
        let taken = self.hunters.iter().filter(|h| h.action_order.is_some()).count();
        u8::try_from(taken + 1).unwrap_or(u8::MAX)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::HUNTER_COUNT;

    #[test]
    fn test_reference_setup() {
        let state = GameState::new(GameConfig::default());
        assert_eq!(state.hunters().len(), HUNTER_COUNT);
        assert_eq!(state.turn(), Turn::Evader);
        assert_eq!(state.winner(), None);
        assert_eq!(state.evader().position(), state.board().center);
        assert_eq!(state.evader().body.size, 30.0);
        for hunter in state.hunters() {
            assert!(state.board().in_outer_band(hunter.position()));
            assert_eq!(hunter.status, Status::Active);
        }
        // Computer evader starts thinking
        assert!(state.is_thinking());
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_human_evader_starts_idle() {
        let state = GameState::new(GameConfig::human_evader());
        assert!(!state.is_busy());
    }

    #[test]
    fn test_validate_catches_bad_positions() {
        let mut state = GameState::new(GameConfig::human_evader());
        state.evader.body.position = Vec2::new(290.0, 0.0);
        assert!(state.validate().is_err());

        let mut state = GameState::new(GameConfig::human_evader());
        state.hunters[2].body.position = Vec2::new(f64::NAN, 0.0);
        assert!(state.validate().is_err());

        let mut state = GameState::new(GameConfig::human_evader());
        state.winning_triple = Some([0, 1, 9]);
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_statistics() {
        let stats = Statistics {
            capture_chains: vec![1, 3, 2],
            ..Default::default()
        };
        assert_eq!(stats.longest_chain(), 3);
        assert_eq!(stats.average_chain(), 2.0);
        assert_eq!(Statistics::default().average_chain(), 0.0);
    }

    #[test]
    fn test_start_hunter_turn_clears_bookkeeping() {
        let mut state = GameState::new(GameConfig::human_evader());
        state.hunters[0].has_acted = true;
        state.hunters[0].action_order = Some(1);
        state.start_hunter_turn();
        assert_eq!(state.turn(), Turn::Hunters);
        assert_eq!(state.hunters_to_act(), HUNTER_COUNT);
        assert_eq!(state.next_action_order(), 1);
    }
}
