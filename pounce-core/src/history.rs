//! Bounded history of hunter turn-end positions

use crate::geometry::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of completed hunter turns remembered
pub const HISTORY_CAPACITY: usize = 3;

/// One hunter's end-of-turn record
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HunterSnapshot {
    pub position: Vec2,
    pub in_outer_band: bool,
}

/// All hunters at the end of one hunter turn
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// 1-based count of completed hunter turns
    pub turn_number: u32,
    pub hunters: Vec<HunterSnapshot>,
}

/// FIFO of the most recent turn snapshots, oldest first
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnHistory {
    entries: VecDeque<TurnSnapshot>,
    turns_recorded: u32,
}

impl TurnHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot, dropping the oldest beyond capacity
    pub fn record(&mut self, hunters: Vec<HunterSnapshot>) -> u32 {
        self.turns_recorded += 1;
        self.entries.push_back(TurnSnapshot {
            turn_number: self.turns_recorded,
            hunters,
        });
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.turns_recorded
    }

    /// Total hunter turns ever recorded, including dropped ones
    pub fn turns_recorded(&self) -> u32 {
        self.turns_recorded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TurnSnapshot> + '_ {
        self.entries.iter()
    }

    /// The newest `n` snapshots, newest first
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &TurnSnapshot> + '_ {
        self.entries.iter().rev().take(n)
    }

    /// Count Outer-Band placements of `hunter` among the newest `window`
    /// snapshots, ignoring snapshots at or before `epoch`
    pub fn outer_band_count(&self, hunter: usize, window: usize, epoch: u32) -> usize {
        self.latest(window)
            .filter(|snap| snap.turn_number > epoch)
            .filter(|snap| snap.hunters.get(hunter).is_some_and(|h| h.in_outer_band))
            .count()
    }

    /// Structural check used when loading saves
    pub fn validate(&self, hunter_count: usize) -> Result<(), String> {
        if self.entries.len() > HISTORY_CAPACITY {
            return Err(format!("history holds {} entries", self.entries.len()));
        }
        let mut previous = 0;
        for snap in &self.entries {
            if snap.hunters.len() != hunter_count {
                return Err(format!(
                    "history snapshot {} has {} hunters",
                    snap.turn_number,
                    snap.hunters.len()
                ));
            }
            if snap.turn_number <= previous || snap.turn_number > self.turns_recorded {
                return Err(format!("history turn {} out of order", snap.turn_number));
            }
            if snap.hunters.iter().any(|h| !h.position.is_finite()) {
                return Err("history contains a non-finite position".to_string());
            }
            previous = snap.turn_number;
        }
        Ok(())
    }
}
