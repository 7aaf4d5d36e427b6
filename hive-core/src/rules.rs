//! Rules - configurable game parameters

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GameError;
use crate::pieces::{Color, ReserveCounts, MAX_PIECES};

/// Rule parameters. `Rules::default()` is the standard base game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub name: String,
    /// Turn (per color, 1-based) by which the queen must be on the board
    pub queen_deadline: u16,
    /// Tournament opening: the queen may not be placed on a color's first turn
    pub no_first_queen: bool,
    /// Pieces each color starts with
    pub reserve: ReserveCounts,
}

impl Rules {
    pub fn standard() -> Self {
        Self::default()
    }

    /// Standard game with the tournament opening restriction
    pub fn tournament() -> Self {
        Self {
            name: "tournament".to_string(),
            no_first_queen: true,
            ..Self::default()
        }
    }

    pub fn with_queen_deadline(mut self, turn: u16) -> Self {
        self.queen_deadline = turn;
        self
    }

    /// Replace the starting reserve, rejecting one no game can be built from
    pub fn with_reserve(mut self, reserve: ReserveCounts) -> Result<Self, GameError> {
        self.reserve = reserve;
        self.validate()?;
        Ok(self)
    }

    /// Each color gets exactly one queen and every piece of both reserves
    /// needs its own id
    pub fn validate(&self) -> Result<(), GameError> {
        if self.reserve.queens != 1 {
            return Err(GameError::QueenCount(self.reserve.queens));
        }
        let pieces = self.reserve.total() * Color::ALL.len();
        if pieces > MAX_PIECES {
            return Err(GameError::TooManyPieces {
                pieces,
                limit: MAX_PIECES,
            });
        }
        Ok(())
    }

    /// Load from JSON file. Missing fields fall back to the standard game.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let rules: Rules = serde_json::from_str(&content)?;
        rules
            .validate()
            .with_context(|| format!("invalid rules '{}'", rules.name))?;
        Ok(rules)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            name: "standard".to_string(),
            queen_deadline: 4,
            no_first_queen: false,
            reserve: ReserveCounts::default(),
        }
    }
}
