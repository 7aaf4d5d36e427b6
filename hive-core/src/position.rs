//! Position fixtures
//!
//! A `Position` lists pieces bottom to top per cell plus the side to move. It
//! is the serialized form used by tests and the CLI to set up a board without
//! replaying a game.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::board::Hex;
use crate::error::GameError;
use crate::game::GameState;
use crate::pieces::{Color, PieceKind};
use crate::rules::Rules;

/// One piece in a fixture. Later entries on the same cell stack on top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub color: Color,
    pub kind: PieceKind,
    pub hex: Hex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub to_move: Color,
    #[serde(default)]
    pub pieces: Vec<PlacedPiece>,
    /// Completed turns per color; defaults to the number of pieces each
    /// color has on the board
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turns: Option<[u16; 2]>,
}

impl Position {
    pub fn new(to_move: Color) -> Self {
        Self {
            to_move,
            pieces: Vec::new(),
            turns: None,
        }
    }

    pub fn with(mut self, color: Color, kind: PieceKind, q: i32, r: i32) -> Self {
        self.pieces.push(PlacedPiece {
            color,
            kind,
            hex: Hex::new(q, r),
        });
        self
    }

    pub fn with_turns(mut self, white: u16, black: u16) -> Self {
        self.turns = Some([white, black]);
        self
    }

    /// Build a game state, drawing each piece from its color's reserve
    pub fn to_game_state(&self, rules: &Rules) -> Result<GameState, GameError> {
        let mut game = GameState::with_rules(rules.clone())?;

        for placed in &self.pieces {
            let piece = game
                .next_in_reserve(placed.color, placed.kind)
                .ok_or(GameError::ReserveExhausted {
                    color: placed.color,
                    kind: placed.kind,
                })?;
            if game.board().is_occupied(placed.hex) && !piece.kind.can_climb() {
                return Err(GameError::StackedNonBeetle {
                    hex: placed.hex,
                    kind: piece.kind,
                });
            }
            game.board_mut().commit(piece, placed.hex);
        }

        if !game.board().occupancy().is_connected() {
            return Err(GameError::DisconnectedPosition);
        }

        let turns = self.turns.unwrap_or_else(|| {
            let mut counts = [0u16; 2];
            for placed in &self.pieces {
                counts[placed.color.index()] += 1;
            }
            counts
        });
        game.set_turn_state(self.to_move, turns);
        Ok(game)
    }

    /// Snapshot of a game, stacks listed bottom to top
    pub fn from_game_state(game: &GameState) -> Self {
        let mut cells: Vec<Hex> = game.board().occupied().collect();
        cells.sort();

        let pieces = cells
            .into_iter()
            .flat_map(|hex| {
                game.board().stack(hex).iter().map(move |p| PlacedPiece {
                    color: p.color,
                    kind: p.kind,
                    hex,
                })
            })
            .collect();

        Self {
            to_move: game.current_player(),
            pieces,
            turns: Some([
                game.turn_number(Color::White) - 1,
                game.turn_number(Color::Black) - 1,
            ]),
        }
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let position: Position = serde_json::from_str(&content)?;
        Ok(position)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
