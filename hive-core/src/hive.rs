//! Board model: hex -> stack of pieces

use rustc_hash::FxHashMap;

use crate::board::Hex;
use crate::occupancy::Occupancy;
use crate::pieces::{Color, Piece, PieceId, PieceKind, Placement};

/// The board (clone to simulate)
///
/// Stacks are ordered bottom to top. Cells that become empty are dropped
/// from the map, but every query also treats an empty stack as unoccupied.
#[derive(Clone, Debug, Default)]
pub struct Board {
    cells: FxHashMap<Hex, Vec<Piece>>,
    /// Where each placed piece currently sits
    located: FxHashMap<PieceId, Hex>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // CELL QUERIES
    // ========================================================================

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(|stack| stack.is_empty())
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.cells.get(&hex).is_some_and(|stack| !stack.is_empty())
    }

    /// Stack at `hex`, bottom to top
    pub fn stack(&self, hex: Hex) -> &[Piece] {
        self.cells.get(&hex).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn height(&self, hex: Hex) -> usize {
        self.stack(hex).len()
    }

    pub fn top(&self, hex: Hex) -> Option<&Piece> {
        self.stack(hex).last()
    }

    /// Color of the top piece, which controls the cell for adjacency rules
    pub fn controller(&self, hex: Hex) -> Option<Color> {
        self.top(hex).map(|p| p.color)
    }

    /// Occupied cells
    pub fn occupied(&self) -> impl Iterator<Item = Hex> + '_ {
        self.cells
            .iter()
            .filter(|(_, stack)| !stack.is_empty())
            .map(|(&hex, _)| hex)
    }

    /// Derived occupancy set (recomputed on every call)
    pub fn occupancy(&self) -> Occupancy {
        self.occupied().collect()
    }

    /// Top pieces with their cells
    pub fn tops(&self) -> impl Iterator<Item = (Hex, &Piece)> + '_ {
        self.cells
            .iter()
            .filter_map(|(&hex, stack)| stack.last().map(|p| (hex, p)))
    }

    /// Every piece on the board with its cell and stack height
    pub fn pieces(&self) -> impl Iterator<Item = (Hex, usize, &Piece)> + '_ {
        self.cells.iter().flat_map(|(&hex, stack)| {
            stack
                .iter()
                .enumerate()
                .map(move |(height, piece)| (hex, height, piece))
        })
    }

    // ========================================================================
    // PIECE QUERIES
    // ========================================================================

    pub fn locate(&self, id: PieceId) -> Option<Hex> {
        self.located.get(&id).copied()
    }

    pub fn placement(&self, id: PieceId) -> Placement {
        match self.locate(id) {
            Some(hex) => {
                let height = self
                    .stack(hex)
                    .iter()
                    .position(|p| p.id == id)
                    .unwrap_or_default();
                Placement::Board { hex, height }
            }
            None => Placement::Reserve,
        }
    }

    /// The piece with this id, if it is on the board
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        let hex = self.locate(id)?;
        self.stack(hex).iter().find(|p| p.id == id)
    }

    /// True if the piece is on the board and nothing sits on top of it
    pub fn is_top(&self, id: PieceId) -> bool {
        self.locate(id)
            .and_then(|hex| self.top(hex))
            .is_some_and(|p| p.id == id)
    }

    /// True if any piece of `color` is on the board, buried or not
    pub fn has_pieces(&self, color: Color) -> bool {
        self.pieces().any(|(_, _, p)| p.color == color)
    }

    /// Number of pieces of this color and kind on the board
    pub fn count(&self, color: Color, kind: PieceKind) -> usize {
        self.pieces()
            .filter(|(_, _, p)| p.color == color && p.kind == kind)
            .count()
    }

    /// Position of a color's queen, if placed
    pub fn queen(&self, color: Color) -> Option<Hex> {
        self.pieces()
            .find(|(_, _, p)| p.color == color && p.kind == PieceKind::Queen)
            .map(|(hex, _, _)| hex)
    }

    // ========================================================================
    // COMMIT
    // ========================================================================

    /// Single mutation primitive: put `piece` on top of the stack at `to`,
    /// lifting it from its current cell first if it is already placed.
    ///
    /// Legality is the caller's business; lifting a piece that is not on top
    /// of its stack is an engine bug and panics.
    pub(crate) fn commit(&mut self, piece: Piece, to: Hex) {
        if let Some(from) = self.located.remove(&piece.id) {
            if let Some(stack) = self.cells.get_mut(&from) {
                let lifted = stack.pop();
                assert_eq!(
                    lifted.map(|p| p.id),
                    Some(piece.id),
                    "commit lifted a covered piece at {from}"
                );
                if stack.is_empty() {
                    self.cells.remove(&from);
                }
            }
        }

        self.cells.entry(to).or_default().push(piece);
        self.located.insert(piece.id, to);
    }
}
