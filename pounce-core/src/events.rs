//! Notifications reported by `Engine::advance_time`

use crate::game::{Turn, Winner};
use crate::geometry::Vec2;
use crate::pieces::PieceId;
use serde::{Deserialize, Serialize};

/// Something that happened while resolving a move
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    MoveSettled { piece: PieceId, position: Vec2 },
    /// `chain_position` is 1 for the landing capture
    Captured { hunter: usize, chain_position: u32 },
    ChainEnded { length: u32 },
    /// Hunters inside strike range after a move that captured nothing
    Threat { hunters: Vec<usize> },
    CaptureChoiceRequired { candidates: Vec<usize> },
    Rescued { rescuer: usize, rescued: usize },
    CampingElimination { hunter: usize },
    TurnChanged(Turn),
    EvaderPlanned { target: Vec2, expected_chain: u32 },
    Victory { winner: Winner },
}
