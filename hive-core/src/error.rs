//! Contract violations
//!
//! Illegal destinations are never errors: they are simply missing from the
//! sets the generators return. These variants report callers that broke the
//! engine's preconditions.

use crate::board::Hex;
use crate::game::{GameResult, Move};
use crate::pieces::{Color, PieceId, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("no piece with id {0}")]
    UnknownPiece(PieceId),

    #[error("piece {0} is not on the board")]
    PieceNotOnBoard(PieceId),

    #[error("no {kind:?} left in the {color:?} reserve")]
    ReserveExhausted { color: Color, kind: PieceKind },

    #[error("piece {piece} belongs to {owner:?} but {to_move:?} is to move")]
    NotYourPiece {
        piece: PieceId,
        owner: Color,
        to_move: Color,
    },

    #[error("illegal move: {0:?}")]
    IllegalMove(Move),

    #[error("game is already over: {0:?}")]
    GameOver(GameResult),

    #[error("only beetles can sit on a stack, found {kind:?} on top at {hex}")]
    StackedNonBeetle { hex: Hex, kind: PieceKind },

    #[error("position does not form a single hive")]
    DisconnectedPosition,

    #[error("each color needs exactly one queen, the reserve has {0}")]
    QueenCount(u8),

    #[error("{pieces} pieces do not fit in {limit} piece ids")]
    TooManyPieces { pieces: usize, limit: usize },
}
