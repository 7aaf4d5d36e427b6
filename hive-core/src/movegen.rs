//! Movement generation for pieces already on the board
//!
//! Every generator works on the hive with the moving piece lifted and checks
//! the One-Hive Rule against a copy of the occupancy set.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::board::Hex;
use crate::error::GameError;
use crate::hive::Board;
use crate::occupancy::Occupancy;
use crate::perimeter;
use crate::pieces::{Piece, PieceId, PieceKind};

/// A piece picked up from the board, ready to be moved
struct Lifted {
    piece: Piece,
    origin: Hex,
    /// Occupancy with the piece removed (its cell stays occupied if the
    /// piece sat on a stack)
    hive: Occupancy,
}

impl Lifted {
    /// One-Hive check for the full hypothetical move
    fn keeps_hive(&self, to: Hex) -> bool {
        self.hive.with(to).is_connected()
    }
}

/// Legal destinations for the piece with id `id`.
///
/// Returns an empty set for trapped (covered) and pinned pieces. Fails only
/// if the piece is not on the board.
pub fn destinations(board: &Board, id: PieceId) -> Result<FxHashSet<Hex>, GameError> {
    let origin = board.locate(id).ok_or(GameError::PieceNotOnBoard(id))?;
    Ok(destinations_at(board, origin, id))
}

/// Destinations of the piece `id` standing on the stack at `origin`
pub(crate) fn destinations_at(board: &Board, origin: Hex, id: PieceId) -> FxHashSet<Hex> {
    let Some(lifted) = lift(board, origin, id) else {
        return FxHashSet::default();
    };

    let moves = match lifted.piece.kind {
        PieceKind::Queen => queen_moves(&lifted),
        PieceKind::Beetle => beetle_moves(&lifted),
        PieceKind::Grasshopper => grasshopper_moves(&lifted),
        PieceKind::Spider => spider_moves(&lifted),
        PieceKind::Ant => ant_moves(&lifted),
    };

    tracing::trace!(
        "{} at {}: {} destinations",
        lifted.piece,
        lifted.origin,
        moves.len()
    );
    moves
}

/// True if another piece sits on top of this one
pub fn is_trapped(board: &Board, id: PieceId) -> Result<bool, GameError> {
    if board.locate(id).is_none() {
        return Err(GameError::PieceNotOnBoard(id));
    }
    Ok(!board.is_top(id))
}

/// True if lifting this piece would split the hive
pub fn is_pinned(board: &Board, id: PieceId) -> Result<bool, GameError> {
    let origin = board.locate(id).ok_or(GameError::PieceNotOnBoard(id))?;
    if board.height(origin) > 1 {
        return Ok(false);
    }
    Ok(!board.occupancy().without(origin).is_connected())
}

/// Pick the piece up, or `None` if it cannot move at all
fn lift(board: &Board, origin: Hex, id: PieceId) -> Option<Lifted> {
    let piece = match board.top(origin) {
        Some(top) if top.id == id => *top,
        _ => return None,
    };

    let mut hive = board.occupancy();
    if board.height(origin) == 1 {
        hive.remove(origin);
        if !hive.is_connected() {
            return None;
        }
    }

    // A lone piece has no hive to move along
    if hive.is_empty() {
        return None;
    }

    Some(Lifted { piece, origin, hive })
}

// ============================================================================
// PIECE RULES
// ============================================================================

/// One slide to an adjacent empty cell
fn queen_moves(lifted: &Lifted) -> FxHashSet<Hex> {
    lifted
        .origin
        .neighbors()
        .into_iter()
        .filter(|&to| {
            !lifted.hive.contains(to)
                && lifted.hive.can_slide(lifted.origin, to)
                && lifted.keeps_hive(to)
        })
        .collect()
}

/// One step in any direction, climbing allowed, no slide gate
fn beetle_moves(lifted: &Lifted) -> FxHashSet<Hex> {
    lifted
        .origin
        .neighbors()
        .into_iter()
        .filter(|&to| lifted.keeps_hive(to))
        .collect()
}

/// Straight jump over at least one piece to the first empty cell
fn grasshopper_moves(lifted: &Lifted) -> FxHashSet<Hex> {
    let mut moves = FxHashSet::default();

    for dir in 0..6 {
        let mut current = lifted.origin.neighbor(dir);
        if !lifted.hive.contains(current) {
            continue;
        }
        while lifted.hive.contains(current) {
            current = current.neighbor(dir);
        }
        if lifted.keeps_hive(current) {
            moves.insert(current);
        }
    }

    moves
}

/// Any perimeter cell reachable through a chain of slides
fn ant_moves(lifted: &Lifted) -> FxHashSet<Hex> {
    let perimeter = lifted.hive.perimeter();
    let mut reached = FxHashSet::default();
    let mut queue = VecDeque::new();
    reached.insert(lifted.origin);
    queue.push_back(lifted.origin);

    while let Some(cell) = queue.pop_front() {
        for next in cell.neighbors() {
            if reached.contains(&next)
                || !perimeter.contains(&next)
                || !lifted.hive.can_slide(cell, next)
                || !lifted.keeps_hive(next)
            {
                continue;
            }
            reached.insert(next);
            queue.push_back(next);
        }
    }

    reached.remove(&lifted.origin);
    reached
}

/// Exactly three steps around the hive in one rotational sense
fn spider_moves(lifted: &Lifted) -> FxHashSet<Hex> {
    perimeter::spider_paths(&lifted.hive, lifted.origin)
        .into_iter()
        .map(|path| path[perimeter::SPIDER_STEPS])
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
