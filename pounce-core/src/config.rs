//! Game configuration: difficulty and reach tiers, control mode, timings

use crate::board::{Board, HAND_SPAN};
use crate::pieces::{HUNTER_COUNT, HUNTER_SIZE};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default move settle duration in milliseconds
pub const DEFAULT_SETTLE_MS: f64 = 400.0;

/// Default computer evader "thinking" delay in milliseconds
pub const DEFAULT_THINK_MS: f64 = 800.0;

/// Hunter-party difficulty tier; scales the evader against the party footprint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Easy,
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Beginner,
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            Difficulty::Beginner => 0.2,
            Difficulty::Easy => 0.4,
            Difficulty::Normal => 0.6,
            Difficulty::Hard => 0.8,
            Difficulty::Expert => 1.0,
        }
    }

    /// Tier by 1-based level
    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.get(usize::from(level).checked_sub(1)?).copied()
    }

    pub fn level(self) -> u8 {
        Self::ALL.iter().position(|&d| d == self).map_or(1, |i| i as u8 + 1)
    }
}

/// Evader strike-range tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reach {
    Short,
    Standard,
    Long,
}

impl Reach {
    pub const ALL: [Reach; 3] = [Reach::Short, Reach::Standard, Reach::Long];

    pub fn multiplier(self) -> f64 {
        match self {
            Reach::Short => 0.8,
            Reach::Standard => 1.0,
            Reach::Long => 1.25,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.get(usize::from(level).checked_sub(1)?).copied()
    }
}

/// Who drives the evader
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaderControl {
    Computer,
    Human,
}

/// Parameters applied at reset time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: Board,
    pub difficulty: Difficulty,
    pub reach: Reach,
    pub evader_control: EvaderControl,
    pub settle_ms: f64,
    pub think_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: Board::default(),
            difficulty: Difficulty::Easy,
            reach: Reach::Standard,
            evader_control: EvaderControl::Computer,
            settle_ms: DEFAULT_SETTLE_MS,
            think_ms: DEFAULT_THINK_MS,
        }
    }
}

impl GameConfig {
    /// Config for a human-driven evader
    pub fn human_evader() -> Self {
        Self {
            evader_control: EvaderControl::Human,
            ..Default::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_reach(mut self, reach: Reach) -> Self {
        self.reach = reach;
        self
    }

    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    pub fn is_computer_evader(&self) -> bool {
        self.evader_control == EvaderControl::Computer
    }

    /// Evader collision radius: a share of the total hunter footprint
    pub fn evader_size(&self) -> f64 {
        HUNTER_SIZE * HUNTER_COUNT as f64 * self.difficulty.multiplier()
    }

    /// Evader movement and strike range
    pub fn evader_range(&self) -> f64 {
        HAND_SPAN * self.reach.multiplier()
    }

    /// Structural sanity check used by loading and deserialization
    pub fn validate(&self) -> Result<(), String> {
        if !self.board.is_valid() {
            return Err("board dimensions must be finite and positive".to_string());
        }
        if self.evader_size() >= self.board.inner_radius {
            return Err("evader does not fit inside the inner zone".to_string());
        }
        if !(self.settle_ms.is_finite() && self.settle_ms >= 0.0) {
            return Err(format!("invalid settle duration: {}", self.settle_ms));
        }
        if !(self.think_ms.is_finite() && self.think_ms >= 0.0) {
            return Err(format!("invalid think delay: {}", self.think_ms));
        }
        Ok(())
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate().map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}
