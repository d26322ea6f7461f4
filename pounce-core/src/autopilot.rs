//! Scripted hunter policy for headless play
//!
//! Not a strong player: hunters rescue downed teammates first, otherwise
//! close in on fixed slots around the evader. Good enough to exercise every
//! rule in simulations against the computer evader.

use crate::engine::Engine;
use crate::game::{GameState, Statistics, Turn, Winner};
use crate::geometry::Vec2;
use crate::pieces::{PieceId, Status};
use rand::Rng;
use std::f64::consts::TAU;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Distance from the evader at which hunters take up their slots
pub const RING_RADIUS: f64 = 110.0;

/// Clock ticks allowed per hunter turn before a game is called stalled
const TICKS_PER_ROUND: u32 = 64;

// ============================================================================
// POLICY
// ============================================================================

#[derive(Clone, Debug)]
pub struct HunterAutopilot {
    pub ring_radius: f64,
}

impl Default for HunterAutopilot {
    fn default() -> Self {
        Self {
            ring_radius: RING_RADIUS,
        }
    }
}

impl HunterAutopilot {
    /// Next hunter move, or `None` when hunters cannot move right now
    pub fn next_move(&self, state: &GameState) -> Option<(PieceId, Vec2)> {
        if state.is_over() || state.is_busy() || state.turn() != Turn::Hunters {
            return None;
        }
        let hunters = state.hunters();

        if let Some(downed) = hunters.iter().find(|h| h.status == Status::Incapacitated) {
            let target = downed.position();
            let rescuer = hunters
                .iter()
                .enumerate()
                .filter(|(_, h)| h.can_act())
                .min_by(|a, b| {
                    let da = a.1.position().distance_to(target);
                    let db = b.1.position().distance_to(target);
                    da.total_cmp(&db)
                })
                .map(|(i, _)| i)?;
            return Some((PieceId::Hunter(rescuer), target));
        }

        let mover = hunters.iter().position(|h| h.can_act())?;
        Some((PieceId::Hunter(mover), self.slot(state, mover)))
    }

    /// Ring slot of `hunter`, pulled back inside the Inner Zone
    pub fn slot(&self, state: &GameState, hunter: usize) -> Vec2 {
        let board = state.board();
        let angle = hunter as f64 * TAU / state.hunters().len().max(1) as f64;
        let raw = state.evader().position() + Vec2::from_angle(angle).scale(self.ring_radius);
        board.clamp_to_radius(raw, board.inner_radius)
    }
}

// ============================================================================
// HEADLESS GAMES
// ============================================================================

/// Summary of one autopilot game
#[derive(Clone, Debug, PartialEq)]
pub struct GameOutcome {
    /// `None` if the round limit was hit first
    pub winner: Option<Winner>,
    pub winning_triple: Option<[usize; 3]>,
    /// Completed hunter turns
    pub rounds: u32,
    pub hunters_active: usize,
    pub hunters_eliminated: usize,
    pub stats: Statistics,
}

/// Play the engine's current game to the end: autopilot hunters against the
/// computer evader, ticking the clock in settle-sized steps.
pub fn play_out<R: Rng>(engine: &mut Engine<R>, autopilot: &HunterAutopilot, max_rounds: u32) -> GameOutcome {
    let config = engine.state().config();
    let tick = config.settle_ms.max(config.think_ms).max(1.0);
    let max_ticks = max_rounds.saturating_add(1).saturating_mul(TICKS_PER_ROUND);
    let mut now = engine.state().clock();

    for _ in 0..max_ticks {
        let state = engine.state();
        if state.is_over() || state.history().turns_recorded() >= max_rounds {
            break;
        }
        if !state.is_busy() {
            match state.turn() {
                Turn::Hunters => {
                    let Some((piece, target)) = autopilot.next_move(state) else {
                        break;
                    };
                    if let Err(err) = engine.submit_move(piece, target) {
                        tracing::warn!(%err, "autopilot move refused");
                        break;
                    }
                }
                // Human evader with nobody to move it
                Turn::Evader => break,
            }
        }
        now += tick;
        engine.advance_time(now);
    }

    let state = engine.state();
    GameOutcome {
        winner: state.winner(),
        winning_triple: state.winning_triple(),
        rounds: state.history().turns_recorded(),
        hunters_active: state.count_status(Status::Active),
        hunters_eliminated: state.count_status(Status::Eliminated),
        stats: state.stats().clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::pieces::Specialization;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_idle_outside_hunter_turn() {
        let state = GameState::new(GameConfig::human_evader());
        assert_eq!(HunterAutopilot::default().next_move(&state), None);
    }

    #[test]
    fn test_rescue_comes_first() {
        let mut state = GameState::with_positions(
            GameConfig::human_evader(),
            Vec2::new(-200.0, 0.0),
            &[
                (Specialization::Standard, Vec2::new(0.0, 200.0)),
                (Specialization::Standard, Vec2::new(100.0, 0.0)),
                (Specialization::Standard, Vec2::new(50.0, 0.0)),
            ],
        );
        state.hunters[0].status = Status::Incapacitated;
        state.start_hunter_turn();
        let (piece, target) = HunterAutopilot::default().next_move(&state).unwrap();
        // Hunter 1 is 224 away, hunter 2 is 206 away
        assert_eq!(piece, PieceId::Hunter(2));
        assert_eq!(target, Vec2::new(0.0, 200.0));
    }

    #[test]
    fn test_slots_stay_in_inner_zone() {
        let mut state = GameState::new(GameConfig::human_evader());
        state.evader.body.position = Vec2::new(260.0, 0.0);
        let autopilot = HunterAutopilot::default();
        for i in 0..state.hunters().len() {
            let slot = autopilot.slot(&state, i);
            assert!(state.board().in_inner_zone(slot));
        }
    }

    #[test]
    fn test_play_out_stops_for_human_evader() {
        let mut engine = Engine::from_state(GameState::new(GameConfig::human_evader()), StepRng::new(0, 1));
        let outcome = play_out(&mut engine, &HunterAutopilot::default(), 10);
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.rounds, 0);
    }

    #[test]
    fn test_play_out_finishes_or_hits_limit() {
        let mut engine = Engine::with_seed(GameConfig::default(), 42);
        let outcome = play_out(&mut engine, &HunterAutopilot::default(), 30);
        assert!(outcome.winner.is_some() || outcome.rounds >= 30);
        assert!(outcome.stats.moves > 0);
        assert!(outcome.hunters_active + outcome.hunters_eliminated <= 5);
    }
}
