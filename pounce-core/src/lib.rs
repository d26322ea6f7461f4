//! POUNCE Core - Rules engine for the evader-vs-hunters board game
//!
//! This crate provides the complete game logic:
//! - Continuous board geometry (Inner Zone and Outer Band)
//! - Pieces, specializations and timed motions
//! - Turn engine with capture chains, rescues and the camping penalty
//! - Triangle and all-captured victory checks
//! - Computer evader planner and a scripted hunter autopilot
//! - JSON configuration and save blobs

pub mod geometry;
pub mod board;
pub mod pieces;
pub mod config;
pub mod history;
pub mod game;
pub mod capture;
pub mod rescue;
pub mod camping;
pub mod victory;
pub mod planner;
pub mod events;
pub mod error;
pub mod save;
pub mod engine;
pub mod autopilot;

// Re-exports for convenient access
pub use geometry::{point_in_triangle, Vec2};
pub use board::{Board, Zone, BAND_WIDTH, HAND_SPAN, INNER_RADIUS};
pub use pieces::{Evader, Hunter, Motion, PieceId, Specialization, Status, HUNTER_COUNT, HUNTER_SIZE, PARTY};
pub use config::{Difficulty, EvaderControl, GameConfig, Reach};
pub use history::{TurnHistory, HISTORY_CAPACITY};
pub use game::{GameState, PendingStep, Statistics, Turn, Winner};
pub use camping::CampingWarning;
pub use planner::EvaderPlanner;
pub use events::GameEvent;
pub use error::{MoveError, SaveError};
pub use engine::Engine;
pub use autopilot::{play_out, GameOutcome, HunterAutopilot};
