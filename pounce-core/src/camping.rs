//! Camping penalty: hunters lingering in the Outer Band are eliminated

use crate::game::GameState;
use crate::history::{HunterSnapshot, HISTORY_CAPACITY};
use crate::pieces::Status;
use serde::{Deserialize, Serialize};

/// Early-warning level shown to players
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CampingWarning {
    None,
    Approaching,
    /// Another Outer-Band turn means elimination
    Imminent,
}

impl CampingWarning {
    pub fn level(self) -> u8 {
        match self {
            CampingWarning::None => 0,
            CampingWarning::Approaching => 1,
            CampingWarning::Imminent => 2,
        }
    }
}

/// Outer-Band snapshots counted against `hunter`, or `None` if the hunter
/// is exempt (not Active, or immune)
pub fn camping_count(state: &GameState, hunter: usize) -> Option<usize> {
    let h = state.hunter(hunter)?;
    if !h.is_active() || h.traits().camping_immune {
        return None;
    }
    let window = HISTORY_CAPACITY.min(h.traits().tolerance);
    Some(state.history().outer_band_count(hunter, window, h.camping_epoch))
}

pub fn warning(state: &GameState, hunter: usize) -> CampingWarning {
    let Some(count) = camping_count(state, hunter) else {
        return CampingWarning::None;
    };
    let tolerance = state.hunters()[hunter].traits().tolerance;
    if count == 0 {
        CampingWarning::None
    } else if count + 1 >= tolerance {
        CampingWarning::Imminent
    } else {
        CampingWarning::Approaching
    }
}

/// Append the end-of-turn snapshot for every hunter
pub(crate) fn record_turn(state: &mut GameState) -> u32 {
    let board = state.config.board;
    let snapshot = state
        .hunters
        .iter()
        .map(|h| HunterSnapshot {
            position: h.position(),
            in_outer_band: board.in_outer_band(h.position()),
        })
        .collect();
    state.history.record(snapshot)
}

/// Eliminate hunters whose count reached their tolerance. Inert while every
/// Active hunter is in the Outer Band.
pub(crate) fn enforce(state: &mut GameState) -> Vec<usize> {
    if state.active_in_inner_zone().next().is_none() {
        return Vec::new();
    }

    let view: &GameState = state;
    let doomed: Vec<usize> = (0..view.hunters.len())
        .filter(|&i| {
            camping_count(view, i).is_some_and(|count| count >= view.hunters[i].traits().tolerance)
        })
        .collect();

    for &i in &doomed {
        state.hunters[i].status = Status::Eliminated;
        state.stats.camping_removals += 1;
        tracing::debug!(hunter = i, "hunter eliminated for camping");
    }
    doomed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::geometry::Vec2;
    use crate::pieces::Specialization;

    const CAMP: Vec2 = Vec2::new(0.0, 400.0);
    const INSIDE: Vec2 = Vec2::new(0.0, -100.0);

    fn party(spec: Specialization) -> GameState {
        GameState::with_positions(
            GameConfig::human_evader(),
            Vec2::ZERO,
            &[(spec, CAMP), (Specialization::Standard, INSIDE)],
        )
    }

    #[test]
    fn test_eliminated_on_third_outer_band_turn() {
        let mut state = party(Specialization::Standard);
        for turn in 1..=3 {
            assert_eq!(warning(&state, 0).level(), (turn - 1).min(2) as u8);
            record_turn(&mut state);
            let removed = enforce(&mut state);
            if turn < 3 {
                assert!(removed.is_empty());
            } else {
                assert_eq!(removed, vec![0]);
            }
        }
        assert_eq!(state.hunters()[0].status, Status::Eliminated);
        assert_eq!(state.stats().camping_removals, 1);
        assert_eq!(warning(&state, 0), CampingWarning::None);
    }

    #[test]
    fn test_inert_when_everyone_camps() {
        let mut state = party(Specialization::Standard);
        state.hunters[1].body.position = Vec2::new(0.0, -400.0);
        for _ in 0..6 {
            record_turn(&mut state);
            assert!(enforce(&mut state).is_empty());
        }
        assert_eq!(state.count_status(Status::Eliminated), 0);
    }

    #[test]
    fn test_scout_has_shorter_fuse() {
        let mut state = party(Specialization::Scout);
        record_turn(&mut state);
        assert_eq!(warning(&state, 0), CampingWarning::Imminent);
        assert!(enforce(&mut state).is_empty());
        record_turn(&mut state);
        assert_eq!(enforce(&mut state), vec![0]);
    }

    #[test]
    fn test_veteran_is_immune() {
        let mut state = party(Specialization::Veteran);
        for _ in 0..5 {
            record_turn(&mut state);
            assert!(enforce(&mut state).is_empty());
        }
        assert_eq!(warning(&state, 0), CampingWarning::None);
    }

    #[test]
    fn test_epoch_forgives_older_snapshots() {
        let mut state = party(Specialization::Standard);
        record_turn(&mut state);
        record_turn(&mut state);
        assert_eq!(warning(&state, 0), CampingWarning::Imminent);
        state.hunters[0].camping_epoch = state.history().turns_recorded();
        assert_eq!(warning(&state, 0), CampingWarning::None);
        record_turn(&mut state);
        assert_eq!(warning(&state, 0), CampingWarning::Approaching);
        assert!(enforce(&mut state).is_empty());
    }
}
