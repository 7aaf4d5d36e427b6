//! Placement legality for pieces entering from the reserve

use rustc_hash::FxHashSet;

use crate::board::Hex;
use crate::error::GameError;
use crate::hive::Board;
use crate::pieces::{Color, PieceKind};
use crate::rules::Rules;

/// Empty cells where `color` may introduce a new piece.
///
/// 1. Empty board: only the origin.
/// 2. `color` has nothing on the board: any empty cell next to the hive
///    (every cell there belongs to the opponent).
/// 3. Otherwise: empty cells next to a cell `color` controls and next to
///    no cell the opponent controls.
pub fn legal_placements(board: &Board, color: Color) -> FxHashSet<Hex> {
    if board.is_empty() {
        return std::iter::once(Hex::ORIGIN).collect();
    }

    if !board.has_pieces(color) {
        return board.occupancy().perimeter();
    }

    board
        .tops()
        .filter(|(_, top)| top.color == color)
        .flat_map(|(hex, _)| hex.neighbors())
        .filter(|&cell| !board.is_occupied(cell))
        .filter(|cell| {
            cell.neighbors()
                .iter()
                .all(|&n| board.controller(n) != Some(color.opponent()))
        })
        .collect()
}

/// Cells where `color` may place a piece of `kind` on its `turn`-th turn.
///
/// Applies the queen deadline on top of [`legal_placements`]: once the
/// deadline turn arrives without a queen on the board, every other kind gets
/// an empty set. Asking for a kind the reserve has run out of is a contract
/// violation.
pub fn placement_targets(
    board: &Board,
    rules: &Rules,
    color: Color,
    kind: PieceKind,
    turn: u16,
) -> Result<FxHashSet<Hex>, GameError> {
    if board.count(color, kind) >= rules.reserve.count(kind) as usize {
        return Err(GameError::ReserveExhausted { color, kind });
    }
    Ok(deadline_targets(board, rules, color, kind, turn))
}

/// Queen deadline and tournament opening on top of [`legal_placements`],
/// for a kind the caller knows is still in reserve
pub(crate) fn deadline_targets(
    board: &Board,
    rules: &Rules,
    color: Color,
    kind: PieceKind,
    turn: u16,
) -> FxHashSet<Hex> {
    let queen_missing = board.queen(color).is_none();
    if kind != PieceKind::Queen && queen_missing && turn >= rules.queen_deadline {
        return FxHashSet::default();
    }
    if kind == PieceKind::Queen && rules.no_first_queen && turn <= 1 {
        return FxHashSet::default();
    }

    legal_placements(board, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::Color::{Black, White};
    use crate::pieces::PieceKind::{Ant, Beetle, Grasshopper, Queen, Spider};
    use crate::position::Position;
    use crate::GameState;

    fn hexes(cells: &[(i32, i32)]) -> FxHashSet<Hex> {
        cells.iter().map(|&(q, r)| Hex::new(q, r)).collect()
    }

    fn game(position: Position) -> GameState {
        position.to_game_state(&Rules::default()).unwrap()
    }

    #[test]
    fn test_first_placement_is_origin() {
        let board = Board::new();
        assert_eq!(legal_placements(&board, White), hexes(&[(0, 0)]));
        assert_eq!(legal_placements(&board, Black), hexes(&[(0, 0)]));
    }

    #[test]
    fn test_first_contact_touches_opponent() {
        let game = game(Position::new(Black).with(White, Spider, 0, 0));
        let expected: FxHashSet<Hex> = Hex::ORIGIN.neighbors().into_iter().collect();
        assert_eq!(legal_placements(game.board(), Black), expected);
    }

    #[test]
    fn test_placement_avoids_opponent() {
        let game = game(
            Position::new(White)
                .with(White, Spider, 0, 0)
                .with(Black, Spider, 1, 0),
        );
        assert_eq!(
            legal_placements(game.board(), White),
            hexes(&[(0, -1), (-1, 1), (-1, 0)])
        );
        assert_eq!(
            legal_placements(game.board(), Black),
            hexes(&[(2, -1), (2, 0), (1, 1)])
        );
    }

    #[test]
    fn test_same_color_cell_next_to_opponent_excluded() {
        let game = game(
            Position::new(White)
                .with(White, Queen, 0, 0)
                .with(White, Ant, -1, 0)
                .with(Black, Queen, 1, 0),
        );
        let cells = legal_placements(game.board(), White);
        // Next to the white queen, but also next to the black queen
        assert!(!cells.contains(&Hex::new(0, 1)));
        assert!(!cells.contains(&Hex::new(1, -1)));
        assert!(cells.contains(&Hex::new(-1, 1)));
        assert!(cells.contains(&Hex::new(-2, 0)));
    }

    #[test]
    fn test_beetle_on_top_changes_control() {
        let game = game(
            Position::new(White)
                .with(White, Queen, 0, 0)
                .with(Black, Queen, 1, 0)
                .with(Black, Beetle, 0, 0),
        );
        // White's only piece is buried, so white controls nothing
        assert!(legal_placements(game.board(), White).is_empty());
        assert_eq!(legal_placements(game.board(), Black).len(), 8);
    }

    #[test]
    fn test_queen_deadline() {
        let game = game(
            Position::new(White)
                .with(White, Ant, 0, 0)
                .with(Black, Ant, 1, 0)
                .with(White, Ant, -1, 0)
                .with(Black, Ant, 2, 0)
                .with(White, Grasshopper, -2, 0)
                .with(Black, Grasshopper, 3, 0),
        );
        let rules = Rules::default();
        let board = game.board();

        assert_eq!(game.turn_number(White), 4);
        assert!(placement_targets(board, &rules, White, Spider, 4).unwrap().is_empty());
        assert!(placement_targets(board, &rules, White, Beetle, 4).unwrap().is_empty());
        assert!(!placement_targets(board, &rules, White, Queen, 4).unwrap().is_empty());
        assert!(!placement_targets(board, &rules, White, Spider, 3).unwrap().is_empty());
    }

    #[test]
    fn test_reserve_exhausted() {
        let game = game(
            Position::new(White)
                .with(White, Queen, 0, 0)
                .with(Black, Queen, 1, 0),
        );
        let result = placement_targets(game.board(), &Rules::default(), White, Queen, 2);
        assert_eq!(result, Err(GameError::ReserveExhausted { color: White, kind: Queen }));
    }

    #[test]
    fn test_tournament_opening() {
        let board = Board::new();
        let rules = Rules::tournament();
        assert!(placement_targets(&board, &rules, White, Queen, 1).unwrap().is_empty());
        assert_eq!(
            placement_targets(&board, &rules, White, Ant, 1).unwrap(),
            hexes(&[(0, 0)])
        );
    }
}
