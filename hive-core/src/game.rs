//! Game state, legal move enumeration and win detection

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::Hex;
use crate::error::GameError;
use crate::hive::Board;
use crate::movegen;
use crate::pieces::{roster, Color, Piece, PieceId, PieceKind, Placement};
use crate::placement;
use crate::rules::Rules;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    WhiteWins,
    BlackWins,
    /// Both queens surrounded by the same move
    Draw,
}

/// A legal move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    /// Bring a reserve piece onto the board
    Place { piece: PieceId, to: Hex },
    /// Move a piece already on the board
    Relocate { piece: PieceId, to: Hex },
    /// Only legal when nothing else is
    Pass,
}

/// Win detector. A queen is surrounded when all six neighbors are occupied.
pub fn winner(board: &Board) -> GameResult {
    let surrounded = |color: Color| {
        board
            .queen(color)
            .is_some_and(|hex| hex.neighbors().iter().all(|&n| board.is_occupied(n)))
    };

    match (surrounded(Color::White), surrounded(Color::Black)) {
        (true, true) => GameResult::Draw,
        (true, false) => GameResult::BlackWins,
        (false, true) => GameResult::WhiteWins,
        (false, false) => GameResult::Ongoing,
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state (clone to simulate)
#[derive(Clone, Debug)]
pub struct GameState {
    rules: Rules,
    /// Every piece of the game, indexed by id
    roster: Vec<Piece>,
    board: Board,
    current_player: Color,
    /// Moves committed so far, passes included
    ply: u32,
    /// Completed turns per color
    turns: [u16; 2],
    result: GameResult,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard game, white to move, full reserves
    pub fn new() -> Self {
        Self::with_rules(Rules::default()).expect("standard rules build a valid roster")
    }

    /// Fresh game under `rules`. Fails when the reserve has no single queen
    /// or more pieces than there are ids.
    pub fn with_rules(rules: Rules) -> Result<Self, GameError> {
        rules.validate()?;
        Ok(Self {
            roster: roster(&rules.reserve)?,
            rules,
            board: Board::new(),
            current_player: Color::White,
            ply: 0,
            turns: [0, 0],
            result: GameResult::Ongoing,
        })
    }

    /// Set turn bookkeeping when building a state from a fixture
    pub(crate) fn set_turn_state(&mut self, to_move: Color, turns: [u16; 2]) {
        self.current_player = to_move;
        self.turns = turns;
        self.ply = turns.iter().map(|&t| t as u32).sum();
        self.result = winner(&self.board);
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    /// 1-based number of the turn `color` is on (or about to take)
    pub fn turn_number(&self, color: Color) -> u16 {
        self.turns[color.index()] + 1
    }

    pub fn queen_placed(&self, color: Color) -> bool {
        self.board.queen(color).is_some()
    }

    /// Every piece in the game
    pub fn pieces(&self) -> &[Piece] {
        &self.roster
    }

    pub fn piece(&self, id: PieceId) -> Result<&Piece, GameError> {
        self.roster.get(id as usize).ok_or(GameError::UnknownPiece(id))
    }

    pub fn placement(&self, id: PieceId) -> Result<Placement, GameError> {
        self.piece(id)?;
        Ok(self.board.placement(id))
    }

    /// Top piece at `hex`
    pub fn piece_at(&self, hex: Hex) -> Option<&Piece> {
        self.board.top(hex)
    }

    /// Pieces of `color` not yet on the board
    pub fn reserve(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.roster
            .iter()
            .filter(move |p| p.color == color && self.board.locate(p.id).is_none())
    }

    /// Lowest-numbered reserve piece of this color and kind
    pub fn next_in_reserve(&self, color: Color, kind: PieceKind) -> Option<Piece> {
        self.reserve(color).find(|p| p.kind == kind).copied()
    }

    // ========================================================================
    // RULE QUERIES
    // ========================================================================

    pub fn legal_placements(&self, color: Color) -> FxHashSet<Hex> {
        placement::legal_placements(&self.board, color)
    }

    /// Placement cells for a kind on `color`'s current turn
    pub fn placement_targets(&self, color: Color, kind: PieceKind) -> Result<FxHashSet<Hex>, GameError> {
        placement::placement_targets(&self.board, &self.rules, color, kind, self.turn_number(color))
    }

    /// Destinations for a piece owned by the side to move
    pub fn destinations(&self, id: PieceId) -> Result<FxHashSet<Hex>, GameError> {
        let piece = *self.piece(id)?;
        if piece.color != self.current_player {
            return Err(GameError::NotYourPiece {
                piece: id,
                owner: piece.color,
                to_move: self.current_player,
            });
        }
        movegen::destinations(&self.board, id)
    }

    /// Every placement and movement available to `color`, ignoring passes.
    /// Pieces on the board can only move once their queen is placed.
    pub fn moves_for(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();

        for kind in PieceKind::ALL {
            let Some(piece) = self.next_in_reserve(color, kind) else {
                continue;
            };
            let targets = placement::deadline_targets(
                &self.board,
                &self.rules,
                color,
                kind,
                self.turn_number(color),
            );
            moves.extend(targets.into_iter().map(|to| Move::Place { piece: piece.id, to }));
        }

        if self.queen_placed(color) {
            for (hex, piece) in self.board.tops() {
                if piece.color != color {
                    continue;
                }
                let destinations = movegen::destinations_at(&self.board, hex, piece.id);
                moves.extend(
                    destinations
                        .into_iter()
                        .map(|to| Move::Relocate { piece: piece.id, to }),
                );
            }
        }

        moves.sort();
        moves
    }

    /// Legal-move existence, without the pass
    pub fn has_legal_move(&self, color: Color) -> bool {
        !self.moves_for(color).is_empty()
    }

    /// Legal moves for the side to move. A lone `Pass` when nothing else is
    /// possible, nothing once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.result != GameResult::Ongoing {
            return vec![];
        }
        let moves = self.moves_for(self.current_player);
        if moves.is_empty() {
            vec![Move::Pass]
        } else {
            moves
        }
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Validate and commit a move, then re-evaluate the result
    pub fn play(&mut self, mv: Move) -> Result<GameResult, GameError> {
        if self.result != GameResult::Ongoing {
            return Err(GameError::GameOver(self.result));
        }

        match mv {
            Move::Pass => {
                if self.has_legal_move(self.current_player) {
                    return Err(GameError::IllegalMove(mv));
                }
                tracing::debug!("{:?} passes on ply {}", self.current_player, self.ply);
            }
            Move::Place { piece, to } => {
                let piece = self.own_piece(piece)?;
                if self.board.locate(piece.id).is_some() {
                    return Err(GameError::IllegalMove(mv));
                }
                if !self.placement_targets(piece.color, piece.kind)?.contains(&to) {
                    return Err(GameError::IllegalMove(mv));
                }
                self.commit(piece, to);
            }
            Move::Relocate { piece, to } => {
                let piece = self.own_piece(piece)?;
                if !self.queen_placed(piece.color) {
                    return Err(GameError::IllegalMove(mv));
                }
                if !movegen::destinations(&self.board, piece.id)?.contains(&to) {
                    return Err(GameError::IllegalMove(mv));
                }
                self.commit(piece, to);
            }
        }

        self.end_turn();
        Ok(self.result)
    }

    /// Apply move, return new state
    pub fn apply_move(&self, mv: Move) -> Result<Self, GameError> {
        let mut next = self.clone();
        next.play(mv)?;
        Ok(next)
    }

    fn own_piece(&self, id: PieceId) -> Result<Piece, GameError> {
        let piece = *self.piece(id)?;
        if piece.color != self.current_player {
            return Err(GameError::NotYourPiece {
                piece: id,
                owner: piece.color,
                to_move: self.current_player,
            });
        }
        Ok(piece)
    }

    fn commit(&mut self, piece: Piece, to: Hex) {
        tracing::debug!("ply {}: {} to {}", self.ply + 1, piece, to);
        self.board.commit(piece, to);

        if !self.board.occupancy().is_connected() {
            tracing::error!("hive split after committing {} to {}", piece, to);
            panic!("One-Hive invariant broken after committing {piece} to {to}");
        }
    }

    fn end_turn(&mut self) {
        self.turns[self.current_player.index()] += 1;
        self.ply += 1;
        self.current_player = self.current_player.opponent();
        self.result = winner(&self.board);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::Color::{Black, White};
    use crate::pieces::PieceKind::{Ant, Beetle, Grasshopper, Queen, Spider};
    use crate::pieces::ReserveCounts;
    use crate::position::Position;

    fn place(game: &mut GameState, kind: PieceKind, q: i32, r: i32) {
        let piece = game.next_in_reserve(game.current_player(), kind).unwrap();
        game.play(Move::Place { piece: piece.id, to: Hex::new(q, r) }).unwrap();
    }

    #[test]
    fn test_game_creation() {
        let game = GameState::new();
        assert_eq!(game.current_player(), White);
        assert_eq!(game.result(), GameResult::Ongoing);
        assert_eq!(game.ply(), 0);
        assert_eq!(game.pieces().len(), 22);
        assert_eq!(game.reserve(White).count(), 11);
    }

    #[test]
    fn test_opening_moves() {
        let mut game = GameState::new();
        let moves = game.legal_moves();
        // One placement per kind, all on the origin
        assert_eq!(moves.len(), 5);
        assert!(moves
            .iter()
            .all(|m| matches!(m, Move::Place { to, .. } if *to == Hex::ORIGIN)));

        place(&mut game, Spider, 0, 0);
        assert_eq!(game.current_player(), Black);
        assert_eq!(game.legal_moves().len(), 5 * 6);
    }

    #[test]
    fn test_wrong_color_rejected() {
        let mut game = GameState::new();
        let black_ant = game.next_in_reserve(Black, Ant).unwrap();
        let err = game.play(Move::Place { piece: black_ant.id, to: Hex::ORIGIN });
        assert!(matches!(err, Err(GameError::NotYourPiece { .. })));
        assert!(matches!(game.destinations(black_ant.id), Err(GameError::NotYourPiece { .. })));
    }

    #[test]
    fn test_illegal_placement_rejected() {
        let mut game = GameState::new();
        let ant = game.next_in_reserve(White, Ant).unwrap();
        let mv = Move::Place { piece: ant.id, to: Hex::new(3, 3) };
        assert_eq!(game.play(mv), Err(GameError::IllegalMove(mv)));
        assert_eq!(game.ply(), 0);
        assert_eq!(game.play(Move::Pass), Err(GameError::IllegalMove(Move::Pass)));
        assert_eq!(game.piece(200).err(), Some(GameError::UnknownPiece(200)));
    }

    #[test]
    fn test_no_movement_before_queen() {
        let mut game = GameState::new();
        place(&mut game, Ant, 0, 0);
        place(&mut game, Ant, 1, 0);
        let ant = game.piece_at(Hex::ORIGIN).copied().unwrap();

        assert!(!game.destinations(ant.id).unwrap().is_empty());
        assert!(game
            .legal_moves()
            .iter()
            .all(|m| matches!(m, Move::Place { .. })));
        let mv = Move::Relocate { piece: ant.id, to: Hex::new(1, -1) };
        assert_eq!(game.play(mv), Err(GameError::IllegalMove(mv)));
    }

    #[test]
    fn test_queen_forced_on_fourth_turn() {
        let mut game = GameState::new();
        place(&mut game, Ant, 0, 0);
        place(&mut game, Ant, 1, 0);
        place(&mut game, Spider, -1, 0);
        place(&mut game, Spider, 2, 0);
        place(&mut game, Grasshopper, -2, 0);
        place(&mut game, Grasshopper, 3, 0);

        assert_eq!(game.turn_number(White), 4);
        let moves = game.legal_moves();
        assert!(!moves.is_empty());
        for mv in moves {
            match mv {
                Move::Place { piece, .. } => assert_eq!(game.piece(piece).unwrap().kind, Queen),
                other => panic!("unexpected move {:?}", other),
            }
        }

        let beetle = game.next_in_reserve(White, Beetle).unwrap();
        let mv = Move::Place { piece: beetle.id, to: Hex::new(-3, 0) };
        assert_eq!(game.play(mv), Err(GameError::IllegalMove(mv)));
    }

    #[test]
    fn test_winner_one_queen_surrounded() {
        let game = Position::new(White)
            .with(White, Queen, 0, 0)
            .with(White, Ant, 0, -1)
            .with(White, Ant, 1, -1)
            .with(Black, Ant, 1, 0)
            .with(Black, Ant, 0, 1)
            .with(White, Grasshopper, -1, 1)
            .with(Black, Grasshopper, -1, 0)
            .with(Black, Queen, 2, 0)
            .to_game_state(&Rules::default())
            .unwrap();
        assert_eq!(winner(game.board()), GameResult::BlackWins);
        assert_eq!(game.result(), GameResult::BlackWins);
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_winner_both_queens_draw() {
        let game = Position::new(White)
            .with(White, Queen, 0, 0)
            .with(Black, Queen, 1, 0)
            .with(White, Ant, 0, -1)
            .with(White, Ant, 1, -1)
            .with(White, Ant, 0, 1)
            .with(White, Grasshopper, -1, 1)
            .with(Black, Ant, -1, 0)
            .with(Black, Ant, 2, -1)
            .with(Black, Ant, 2, 0)
            .with(Black, Grasshopper, 1, 1)
            .to_game_state(&Rules::default())
            .unwrap();
        assert_eq!(winner(game.board()), GameResult::Draw);
    }

    #[test]
    fn test_winner_ongoing() {
        let game = Position::new(White)
            .with(White, Queen, 0, 0)
            .with(Black, Queen, 1, 0)
            .to_game_state(&Rules::default())
            .unwrap();
        assert_eq!(winner(game.board()), GameResult::Ongoing);
        assert_eq!(winner(&Board::new()), GameResult::Ongoing);
    }

    #[test]
    fn test_move_surrounds_queen() {
        let mut game = Position::new(Black)
            .with(White, Queen, 0, 0)
            .with(Black, Queen, 0, -1)
            .with(White, Ant, 1, -1)
            .with(Black, Ant, 1, 0)
            .with(White, Ant, 0, 1)
            .with(Black, Ant, -1, 1)
            .with(White, Grasshopper, -1, -1)
            .with(Black, Beetle, -2, 0)
            .to_game_state(&Rules::default())
            .unwrap();
        assert_eq!(game.result(), GameResult::Ongoing);

        let beetle = game.piece_at(Hex::new(-2, 0)).copied().unwrap();
        let result = game.play(Move::Relocate { piece: beetle.id, to: Hex::new(-1, 0) });
        assert_eq!(result, Ok(GameResult::BlackWins));
        assert!(matches!(game.play(Move::Pass), Err(GameError::GameOver(_))));
    }

    #[test]
    fn test_pass_when_stuck() {
        // White's only piece on the board is covered and the queen deadline
        // has passed with no room to place the queen.
        let mut game = Position::new(White)
            .with(White, Ant, 0, 0)
            .with(Black, Beetle, 0, 0)
            .with(Black, Queen, 1, 0)
            .with_turns(3, 3)
            .to_game_state(&Rules::default())
            .unwrap();

        assert!(!game.has_legal_move(White));
        assert_eq!(game.legal_moves(), vec![Move::Pass]);
        assert_eq!(game.play(Move::Pass), Ok(GameResult::Ongoing));
        assert_eq!(game.current_player(), Black);
        assert_eq!(game.turn_number(White), 5);
    }

    #[test]
    fn test_apply_move_leaves_original() {
        let game = GameState::new();
        let mv = game.legal_moves()[0];
        let next = game.apply_move(mv).unwrap();
        assert_eq!(game.ply(), 0);
        assert_eq!(next.ply(), 1);
        assert!(game.board().is_empty());
        assert!(!next.board().is_empty());
    }

    #[test]
    fn test_with_rules_rejects_oversized_reserve() {
        let rules = Rules {
            reserve: ReserveCounts {
                beetles: 130,
                ..ReserveCounts::default()
            },
            ..Rules::default()
        };
        assert_eq!(
            GameState::with_rules(rules).err(),
            Some(GameError::TooManyPieces { pieces: 278, limit: 256 })
        );
    }

    #[test]
    fn test_moves_for_matches_checked_queries() {
        // Mid-game: both queens down, pieces left in both reserves
        let game = Position::new(White)
            .with(White, Queen, 0, 0)
            .with(Black, Queen, 0, -1)
            .with(White, Spider, 1, 0)
            .with(Black, Ant, 0, -2)
            .with(White, Beetle, -1, 1)
            .with(Black, Grasshopper, 1, -2)
            .with_turns(3, 3)
            .to_game_state(&Rules::default())
            .unwrap();

        for color in Color::ALL {
            let mut expected = Vec::new();
            for kind in PieceKind::ALL {
                let Some(piece) = game.next_in_reserve(color, kind) else {
                    continue;
                };
                let targets = placement::placement_targets(
                    game.board(),
                    game.rules(),
                    color,
                    kind,
                    game.turn_number(color),
                )
                .unwrap();
                expected.extend(targets.into_iter().map(|to| Move::Place { piece: piece.id, to }));
            }
            for (_, _, piece) in game.board().pieces() {
                if piece.color != color {
                    continue;
                }
                let destinations = movegen::destinations(game.board(), piece.id).unwrap();
                expected.extend(destinations.into_iter().map(|to| Move::Relocate { piece: piece.id, to }));
            }
            expected.sort();

            let moves = game.moves_for(color);
            assert!(!moves.is_empty());
            assert_eq!(moves, expected, "{:?}", color);
        }
    }
}
