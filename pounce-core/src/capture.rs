//! Capture chain resolution
//!
//! The evader captures a hunter by landing on it (edge-to-edge overlap),
//! then keeps striking the nearest Active hunter in the Inner Zone within
//! strike range until none is left. The live engine resolves one timed
//! step at a time; `simulate_chain` runs the same rules instantly on a copy.

use crate::board::Board;
use crate::game::GameState;
use crate::geometry::Vec2;
use crate::pieces::{Evader, Hunter, Status};
use crate::victory::evader_wins;
use rand::Rng;

/// Distances closer than this to the nearest target count as a tie
pub const TIE_TOLERANCE: f64 = 1.0;

/// What the chain does next from the evader's current position
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NextStrike {
    None,
    Single(usize),
    /// Equidistant choice point, candidates in index order of distance
    Choice(Vec<usize>),
}

/// First Active hunter (index order) overlapping the evader
pub fn landed_hunter(evader: &Evader, hunters: &[Hunter]) -> Option<usize> {
    let pos = evader.position();
    hunters.iter().position(|h| {
        h.is_active() && pos.distance_to(h.position()) <= evader.body.size + h.body.size
    })
}

/// Active Inner-Zone hunters within `range` of `from`, nearest first
pub fn strike_targets(from: Vec2, range: f64, hunters: &[Hunter], board: &Board) -> Vec<(usize, f64)> {
    let mut targets: Vec<(usize, f64)> = hunters
        .iter()
        .enumerate()
        .filter(|(_, h)| h.is_active() && board.in_inner_zone(h.position()))
        .map(|(i, h)| (i, from.distance_to(h.position())))
        .filter(|&(_, d)| d <= range)
        .collect();
    // Stable: equal distances keep index order
    targets.sort_by(|a, b| a.1.total_cmp(&b.1));
    targets
}

/// Decide the next strike from the sorted target list
pub fn next_strike(targets: &[(usize, f64)]) -> NextStrike {
    let Some(&(first, nearest)) = targets.first() else {
        return NextStrike::None;
    };
    let tied: Vec<usize> = targets
        .iter()
        .take_while(|&&(_, d)| d - nearest < TIE_TOLERANCE)
        .map(|&(i, _)| i)
        .collect();
    if tied.len() >= 2 {
        NextStrike::Choice(tied)
    } else {
        NextStrike::Single(first)
    }
}

/// Next strike for the evader as it currently stands
pub fn next_strike_for(evader: &Evader, hunters: &[Hunter], board: &Board) -> NextStrike {
    let targets = strike_targets(evader.position(), evader.strike_range(), hunters, board);
    next_strike(&targets)
}

/// Uniform pick among tied candidates
pub fn pick_random<R: Rng>(candidates: &[usize], rng: &mut R) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}

/// Where the evader stands after striking `hunter`
pub fn strike_position(evader: &Evader, hunter: &Hunter, board: &Board) -> Vec2 {
    board.clamp_evader(hunter.position(), evader.body.size)
}

/// Length of the chain the evader would score by moving to `target`.
///
/// Runs on private copies of the pieces; `state` is never touched.
/// Equidistant choices are resolved with `rng`.
pub fn simulate_chain<R: Rng>(state: &GameState, target: Vec2, rng: &mut R) -> u32 {
    let board = *state.board();
    let mut evader = state.evader().clone();
    let mut hunters = state.hunters().to_vec();

    evader.body.position = target;
    let Some(first) = landed_hunter(&evader, &hunters) else {
        return 0;
    };
    hunters[first].status = Status::Incapacitated;
    let mut length = 1;

    while !evader_wins(&hunters) {
        let chosen = match next_strike_for(&evader, &hunters, &board) {
            NextStrike::None => break,
            NextStrike::Single(i) => i,
            NextStrike::Choice(candidates) => match pick_random(&candidates, rng) {
                Some(i) => i,
                None => break,
            },
        };
        evader.body.position = strike_position(&evader, &hunters[chosen], &board);
        hunters[chosen].status = Status::Incapacitated;
        length += 1;
    }

    length
}
