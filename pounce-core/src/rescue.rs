//! Reviving incapacitated hunters

use crate::game::GameState;
use crate::pieces::Status;

/// Result of a rescue performed by a settling hunter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rescue {
    pub rescuer: usize,
    pub rescued: usize,
    /// Rescuer may still move this turn
    pub rescuer_keeps_action: bool,
    /// Rescued hunter may still move this turn
    pub rescued_keeps_action: bool,
}

/// First Incapacitated teammate (index order) within the mover's threshold
pub fn find_rescue(state: &GameState, mover: usize) -> Option<usize> {
    let rescuer = state.hunter(mover)?;
    if !rescuer.is_active() {
        return None;
    }
    state.hunters().iter().enumerate().position(|(i, h)| {
        i != mover
            && h.status == Status::Incapacitated
            && rescuer.position().distance_to(h.position()) <= rescuer.rescue_threshold(h)
    })
}

/// Revive a teammate near `mover`, resetting its camping clock
pub(crate) fn apply_rescue(state: &mut GameState, mover: usize) -> Option<Rescue> {
    let rescued = find_rescue(state, mover)?;
    let epoch = state.history.turns_recorded();
    let rescuer_keeps_action = state.hunters[mover].traits().can_act_after_rescuing;

    let hunter = &mut state.hunters[rescued];
    hunter.status = Status::Active;
    hunter.camping_epoch = epoch;
    let rescued_keeps_action = hunter.traits().can_act_after_being_rescued;
    hunter.has_acted = !rescued_keeps_action;

    tracing::debug!(rescuer = mover, rescued, "hunter rescued");

    Some(Rescue {
        rescuer: mover,
        rescued,
        rescuer_keeps_action,
        rescued_keeps_action,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::geometry::Vec2;
    use crate::pieces::Specialization;

    fn pair(mover: Specialization, downed: Specialization, gap: f64) -> GameState {
        let mut state = GameState::with_positions(
            GameConfig::human_evader(),
            Vec2::new(-200.0, 0.0),
            &[(mover, Vec2::ZERO), (downed, Vec2::new(gap, 0.0))],
        );
        state.hunters[1].status = Status::Incapacitated;
        state
    }

    #[test]
    fn test_touch_rescue_uses_combined_size() {
        let state = pair(Specialization::Standard, Specialization::Standard, 30.0);
        assert_eq!(find_rescue(&state, 0), Some(1));
        let state = pair(Specialization::Standard, Specialization::Standard, 31.0);
        assert_eq!(find_rescue(&state, 0), None);
    }

    #[test]
    fn test_medic_reaches_further() {
        let state = pair(Specialization::Medic, Specialization::Standard, 50.0);
        assert_eq!(find_rescue(&state, 0), Some(1));
    }

    #[test]
    fn test_rescue_marks_acted_by_capability() {
        let mut state = pair(Specialization::Standard, Specialization::Standard, 10.0);
        state.history.record(Vec::new());
        let rescue = apply_rescue(&mut state, 0).unwrap();
        assert!(!rescue.rescuer_keeps_action);
        assert!(!rescue.rescued_keeps_action);
        assert_eq!(state.hunters[1].status, Status::Active);
        assert!(state.hunters[1].has_acted);
        assert_eq!(state.hunters[1].camping_epoch, 1);

        let mut state = pair(Specialization::Medic, Specialization::Veteran, 40.0);
        let rescue = apply_rescue(&mut state, 0).unwrap();
        assert!(rescue.rescuer_keeps_action);
        assert!(rescue.rescued_keeps_action);
        assert!(!state.hunters[1].has_acted);
    }

    #[test]
    fn test_eliminated_hunters_stay_down() {
        let mut state = pair(Specialization::Standard, Specialization::Standard, 10.0);
        state.hunters[1].status = Status::Eliminated;
        assert_eq!(apply_rescue(&mut state, 0), None);
    }
}
