//! Hive Core - Rules engine for the Hive board game
//!
//! This crate answers "what may move where" for a Hive position:
//! - Board geometry (unbounded hex grid with axial coordinates)
//! - Stacks, control, and the occupancy view used for hive checks
//! - Placement legality and the queen deadline
//! - Per-kind movement generation under the One-Hive and Freedom-to-Move rules
//! - Win detection and turn state

pub mod board;
pub mod pieces;
pub mod occupancy;
pub mod hive;
pub mod perimeter;
pub mod movegen;
pub mod placement;
pub mod game;
pub mod rules;
pub mod position;
pub mod error;

// Re-exports for convenient access
pub use board::{Hex, DIRECTIONS};
pub use pieces::{roster, Color, Piece, PieceId, PieceKind, Placement, ReserveCounts};
pub use occupancy::Occupancy;
pub use hive::Board;
pub use game::{winner, GameResult, GameState, Move};
pub use error::GameError;
pub use rules::Rules;
pub use position::{PlacedPiece, Position};
