//! Moves command - list the legal moves of a position fixture
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_game(), report_moves()
//! - Level 3: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use hive_core::{GameResult, GameState, Hex, Move, Position, Rules};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct MovesArgs {
    /// Position fixture JSON file
    #[arg(long, value_name = "FILE")]
    pub position: PathBuf,

    /// Rules JSON file (standard game if omitted)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Output moves as JSON
    #[arg(long)]
    pub json: bool,
}

/// One legal move, described for output
#[derive(Clone, Debug, PartialEq, Serialize)]
struct MoveLine {
    action: &'static str,
    piece: Option<String>,
    from: Option<Hex>,
    to: Option<Hex>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: MovesArgs) -> Result<()> {
    let game = load_game(&args)?;

    tracing::info!(
        "{:?} to move, {} pieces on the board",
        game.current_player(),
        game.board().pieces().count()
    );

    report_moves(&game, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_game(args: &MovesArgs) -> Result<GameState> {
    let rules = match &args.rules {
        Some(path) => Rules::load(path)
            .with_context(|| format!("Failed to load rules: {}", path.display()))?,
        None => Rules::default(),
    };

    let position = Position::load(&args.position)
        .with_context(|| format!("Failed to load position: {}", args.position.display()))?;

    position
        .to_game_state(&rules)
        .with_context(|| format!("Invalid position: {}", args.position.display()))
}

fn report_moves(game: &GameState, json: bool) -> Result<()> {
    let lines: Vec<MoveLine> = game
        .legal_moves()
        .into_iter()
        .map(|mv| describe(game, mv))
        .collect();

    if json {
        #[derive(Serialize)]
        struct JsonOutput {
            to_move: String,
            result: GameResult,
            moves: Vec<MoveLine>,
        }

        let output = JsonOutput {
            to_move: format!("{:?}", game.current_player()),
            result: game.result(),
            moves: lines,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("To move: {:?}", game.current_player());
        println!("Result:  {:?}", game.result());
        println!("{} legal moves:", lines.len());
        for line in &lines {
            println!("  {}", format_line(line));
        }
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - UTILITIES
// ============================================================================

fn describe(game: &GameState, mv: Move) -> MoveLine {
    match mv {
        Move::Place { piece, to } => MoveLine {
            action: "place",
            piece: game.piece(piece).ok().map(|p| p.to_string()),
            from: None,
            to: Some(to),
        },
        Move::Relocate { piece, to } => MoveLine {
            action: "move",
            piece: game.piece(piece).ok().map(|p| p.to_string()),
            from: game.board().locate(piece),
            to: Some(to),
        },
        Move::Pass => MoveLine {
            action: "pass",
            piece: None,
            from: None,
            to: None,
        },
    }
}

fn format_line(line: &MoveLine) -> String {
    let piece = line.piece.as_deref().unwrap_or("");
    match (line.from, line.to) {
        (Some(from), Some(to)) => format!("{} {} {} -> {}", line.action, piece, from, to),
        (None, Some(to)) => format!("{} {} at {}", line.action, piece, to),
        _ => line.action.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
