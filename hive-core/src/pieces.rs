//! Piece definitions and the starting reserve

use serde::{Deserialize, Serialize};

use crate::board::Hex;
use crate::error::GameError;

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    fn prefix(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

/// Piece kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    Queen,
    Beetle,
    Grasshopper,
    Spider,
    Ant,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [
        PieceKind::Queen,
        PieceKind::Beetle,
        PieceKind::Grasshopper,
        PieceKind::Spider,
        PieceKind::Ant,
    ];

    pub fn letter(self) -> char {
        match self {
            PieceKind::Queen => 'Q',
            PieceKind::Beetle => 'B',
            PieceKind::Grasshopper => 'G',
            PieceKind::Spider => 'S',
            PieceKind::Ant => 'A',
        }
    }

    /// Only beetles may climb onto an occupied cell
    pub fn can_climb(self) -> bool {
        self == PieceKind::Beetle
    }
}

/// Piece identifier (index into the game roster)
pub type PieceId = u8;

/// A piece. Identity, color and kind never change during a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub kind: PieceKind,
    /// 1-based index among pieces of the same color and kind
    pub seq: u8,
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind == PieceKind::Queen {
            write!(f, "{}{}", self.color.prefix(), self.kind.letter())
        } else {
            write!(f, "{}{}{}", self.color.prefix(), self.kind.letter(), self.seq)
        }
    }
}

/// Where a piece currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Reserve,
    /// On the board; `height` is the 0-based index in the cell's stack
    Board { hex: Hex, height: usize },
}

/// Number of pieces of each kind a color starts with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReserveCounts {
    pub queens: u8,
    pub beetles: u8,
    pub grasshoppers: u8,
    pub spiders: u8,
    pub ants: u8,
}

impl ReserveCounts {
    pub fn count(&self, kind: PieceKind) -> u8 {
        match kind {
            PieceKind::Queen => self.queens,
            PieceKind::Beetle => self.beetles,
            PieceKind::Grasshopper => self.grasshoppers,
            PieceKind::Spider => self.spiders,
            PieceKind::Ant => self.ants,
        }
    }

    pub fn total(&self) -> usize {
        PieceKind::ALL.iter().map(|&k| self.count(k) as usize).sum()
    }
}

impl Default for ReserveCounts {
    fn default() -> Self {
        Self {
            queens: 1,
            beetles: 2,
            grasshoppers: 3,
            spiders: 2,
            ants: 3,
        }
    }
}

/// Most pieces a game can hold, one id each
pub const MAX_PIECES: usize = PieceId::MAX as usize + 1;

/// Create every piece of a game, white first. Ids are dense indices.
pub fn roster(counts: &ReserveCounts) -> Result<Vec<Piece>, GameError> {
    let total = counts.total() * Color::ALL.len();
    if total > MAX_PIECES {
        return Err(GameError::TooManyPieces {
            pieces: total,
            limit: MAX_PIECES,
        });
    }

    let mut pieces = Vec::with_capacity(total);
    for color in Color::ALL {
        for kind in PieceKind::ALL {
            for seq in 1..=counts.count(kind) {
                let id = PieceId::try_from(pieces.len()).map_err(|_| GameError::TooManyPieces {
                    pieces: total,
                    limit: MAX_PIECES,
                })?;
                pieces.push(Piece { id, color, kind, seq });
            }
        }
    }
    Ok(pieces)
}
