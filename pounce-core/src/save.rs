//! Self-contained JSON snapshots of a game

use crate::error::SaveError;
use crate::game::GameState;
use serde::{Deserialize, Serialize};

/// Format tag written into every save
pub const SAVE_FORMAT: &str = "pounce-save";

/// Current save layout version
pub const SAVE_VERSION: u32 = 1;

#[derive(Serialize)]
struct SaveFileRef<'a> {
    format: &'a str,
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct SaveFile {
    format: String,
    version: u32,
    state: GameState,
}

/// Encode a state as a save blob
pub fn encode(state: &GameState) -> Result<String, SaveError> {
    let file = SaveFileRef {
        format: SAVE_FORMAT,
        version: SAVE_VERSION,
        state,
    };
    Ok(serde_json::to_string(&file)?)
}

/// Decode and validate a save blob. Open timers restart on the next tick.
pub fn decode(blob: &str) -> Result<GameState, SaveError> {
    let file: SaveFile = serde_json::from_str(blob)?;
    if file.format != SAVE_FORMAT {
        return Err(SaveError::UnsupportedFormat(file.format));
    }
    if file.version != SAVE_VERSION {
        return Err(SaveError::UnsupportedVersion(file.version));
    }
    let mut state = file.state;
    state.validate().map_err(SaveError::Invalid)?;
    state.rebase_timers();
    state.resume_planning();
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{PendingStep, Turn, Winner};
    use crate::pieces::Status;

    #[test]
    fn test_roundtrip_fresh_game() {
        let state = GameState::new(GameConfig::human_evader());
        let blob = encode(&state).unwrap();
        assert_eq!(decode(&blob).unwrap(), state);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(decode("not json"), Err(SaveError::Parse(_))));
        assert!(matches!(decode("{}"), Err(SaveError::Parse(_))));
    }

    #[test]
    fn test_rejects_wrong_tag_and_version() {
        let state = GameState::new(GameConfig::default());
        let blob = encode(&state).unwrap();

        let mut value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        value["format"] = "chess".into();
        let err = decode(&value.to_string()).unwrap_err();
        assert!(matches!(err, SaveError::UnsupportedFormat(tag) if tag == "chess"));

        let mut value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        value["version"] = 99.into();
        assert!(matches!(
            decode(&value.to_string()),
            Err(SaveError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_rejects_semantically_invalid_state() {
        let state = GameState::new(GameConfig::default());
        let mut value: serde_json::Value = serde_json::from_str(&encode(&state).unwrap()).unwrap();
        value["state"]["evader"]["body"]["position"]["x"] = 5000.0.into();
        assert!(matches!(decode(&value.to_string()), Err(SaveError::Invalid(_))));
    }

    fn refused(state: &GameState) -> bool {
        matches!(decode(&encode(state).unwrap()), Err(SaveError::Invalid(_)))
    }

    #[test]
    fn test_rejects_pending_step_on_wrong_turn() {
        // Computer evader "thinking" while the hunters are to move
        let mut state = GameState::new(GameConfig::default());
        state.turn = Turn::Hunters;
        assert!(refused(&state));

        let mut state = GameState::new(GameConfig::human_evader());
        state.turn = Turn::Hunters;
        for step in [
            PendingStep::EvaderMove,
            PendingStep::ChainStep { target: 0 },
            PendingStep::AwaitingCaptureChoice { candidates: vec![0, 1] },
        ] {
            state.pending = Some(step);
            assert!(refused(&state));
        }

        let mut state = GameState::new(GameConfig::human_evader());
        state.pending = Some(PendingStep::HunterMove { hunter: 0 });
        assert!(refused(&state));
    }

    #[test]
    fn test_hunter_move_needs_an_active_hunter() {
        let mut state = GameState::new(GameConfig::human_evader());
        state.start_hunter_turn();
        state.pending = Some(PendingStep::HunterMove { hunter: 0 });
        assert!(decode(&encode(&state).unwrap()).is_ok());

        state.hunters[0].status = Status::Incapacitated;
        assert!(refused(&state));
    }

    #[test]
    fn test_chain_step_needs_an_active_target() {
        let mut state = GameState::new(GameConfig::human_evader());
        state.pending = Some(PendingStep::ChainStep { target: 1 });
        assert!(decode(&encode(&state).unwrap()).is_ok());

        state.hunters[1].status = Status::Incapacitated;
        assert!(refused(&state));
    }

    #[test]
    fn test_pending_step_must_match_evader_control() {
        let mut state = GameState::new(GameConfig::human_evader());
        state.pending = Some(PendingStep::Thinking { ready_at: None });
        assert!(refused(&state));

        let mut state = GameState::new(GameConfig::default());
        state.pending = Some(PendingStep::AwaitingCaptureChoice { candidates: vec![0, 1] });
        assert!(refused(&state));
    }

    #[test]
    fn test_rejects_unearned_winner() {
        let mut state = GameState::new(GameConfig::human_evader());
        state.winner = Some(Winner::Evader);
        assert!(refused(&state));
        for hunter in &mut state.hunters {
            hunter.status = Status::Incapacitated;
        }
        assert!(decode(&encode(&state).unwrap()).is_ok());

        let mut state = GameState::new(GameConfig::human_evader());
        state.winner = Some(Winner::Hunters);
        assert!(refused(&state));
        state.winning_triple = Some([0, 1, 2]);
        assert!(decode(&encode(&state).unwrap()).is_ok());
    }

    #[test]
    fn test_idle_computer_evader_resumes_planning() {
        let mut state = GameState::new(GameConfig::default());
        state.pending = None;
        let restored = decode(&encode(&state).unwrap()).unwrap();
        assert_eq!(restored.pending(), Some(&PendingStep::Thinking { ready_at: None }));

        // Not on its own turn: stays idle
        state.start_hunter_turn();
        let restored = decode(&encode(&state).unwrap()).unwrap();
        assert_eq!(restored.pending(), None);
    }

    #[test]
    fn test_thinking_timer_restarts() {
        let mut state = GameState::new(GameConfig::default());
        state.pending = Some(crate::game::PendingStep::Thinking { ready_at: Some(1234.0) });
        let restored = decode(&encode(&state).unwrap()).unwrap();
        assert_eq!(
            restored.pending(),
            Some(&crate::game::PendingStep::Thinking { ready_at: None })
        );
    }
}
