//! Random command - play uniformly random legal games
//!
//! Every ply re-checks the board invariants the engine promises, so a long
//! run doubles as a soak test of the move generators.
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_rules(), play_games(), report_results()
//! - Level 3: play_single_game(), check_invariants(), compute_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use hive_core::{Color, GameResult, GameState, Move, PieceKind, Rules};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RandomArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Stop a game as unfinished after this many plies
    #[arg(long, default_value = "200")]
    pub max_plies: u32,

    /// Rules JSON file (standard game if omitted)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    seed: u64,
    result: GameResult,
    plies: u32,
    passes: u32,
}

/// Aggregated results
#[derive(Clone, Debug)]
struct RandomResults {
    games: Vec<GameRecord>,
    white_wins: usize,
    black_wins: usize,
    draws: usize,
    unfinished: usize,
    avg_plies: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run random command
///
/// 1. Load the rules
/// 2. Play the games in parallel, one derived seed per game
/// 3. Report results
pub fn run(args: RandomArgs, seed: Option<u64>) -> Result<()> {
    let rules = load_rules(&args)?;
    let base_seed = seed.unwrap_or_else(|| create_rng(None).gen());

    tracing::info!(
        "Playing {} random games under '{}' rules (seed={}, max_plies={})",
        args.games,
        rules.name,
        base_seed,
        args.max_plies
    );

    let results = play_games(&rules, &args, base_seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_rules(args: &RandomArgs) -> Result<Rules> {
    match &args.rules {
        Some(path) => Rules::load(path)
            .with_context(|| format!("Failed to load rules: {}", path.display())),
        None => Ok(Rules::default()),
    }
}

/// Play all games using rayon
fn play_games(rules: &Rules, args: &RandomArgs, base_seed: u64) -> Result<RandomResults> {
    let games = (0..args.games)
        .into_par_iter()
        .map(|index| {
            let seed = base_seed.wrapping_add(index as u64);
            play_single_game(rules, index + 1, seed, args.max_plies)
        })
        .collect::<Result<Vec<_>>>()?;

    for record in &games {
        tracing::info!(
            "Game {}: {:?} after {} plies ({} passes)",
            record.game_number,
            record.result,
            record.plies,
            record.passes
        );
    }

    Ok(compute_statistics(games))
}

fn report_results(results: &RandomResults, args: &RandomArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to completion or the ply limit
fn play_single_game(rules: &Rules, game_number: usize, seed: u64, max_plies: u32) -> Result<GameRecord> {
    let mut rng = create_rng(Some(seed));
    let mut state = GameState::with_rules(rules.clone())?;
    let mut passes = 0;

    while state.result() == GameResult::Ongoing && state.ply() < max_plies {
        let moves = state.legal_moves();
        if moves.is_empty() {
            bail!("game {}: no legal moves in an ongoing game at ply {}", game_number, state.ply());
        }

        let mv = moves[rng.gen_range(0..moves.len())];
        if mv == Move::Pass {
            passes += 1;
        }

        state
            .play(mv)
            .with_context(|| format!("game {}: engine rejected its own move {:?}", game_number, mv))?;

        check_invariants(&state)
            .with_context(|| format!("game {} (seed {}) at ply {}", game_number, seed, state.ply()))?;
    }

    if state.result() == GameResult::Ongoing {
        tracing::warn!("Game {} hit the {} ply limit", game_number, max_plies);
    }

    Ok(GameRecord {
        game_number,
        seed,
        result: state.result(),
        plies: state.ply(),
        passes,
    })
}

/// Board invariants that must hold after every ply
fn check_invariants(state: &GameState) -> Result<()> {
    let board = state.board();

    if !board.occupancy().is_connected() {
        bail!("hive is split");
    }

    for hex in board.occupied() {
        let stack = board.stack(hex);
        if let Some(upper) = stack.iter().skip(1).find(|p| p.kind != PieceKind::Beetle) {
            bail!("{} is stacked at {} but is not a beetle", upper, hex);
        }
    }

    // Without a queen every turn was a placement or a pass, and the deadline
    // turn only offers the queen
    for color in Color::ALL {
        let placed = board.pieces().filter(|(_, _, p)| p.color == color).count();
        if !state.queen_placed(color) && placed >= state.rules().queen_deadline as usize {
            bail!("{:?} has {} pieces down but no queen", color, placed);
        }
    }

    Ok(())
}

fn compute_statistics(games: Vec<GameRecord>) -> RandomResults {
    let count = |result: GameResult| games.iter().filter(|g| g.result == result).count();
    let white_wins = count(GameResult::WhiteWins);
    let black_wins = count(GameResult::BlackWins);
    let draws = count(GameResult::Draw);
    let unfinished = count(GameResult::Ongoing);

    let total_plies: u32 = games.iter().map(|g| g.plies).sum();
    let avg_plies = if games.is_empty() {
        0.0
    } else {
        total_plies as f32 / games.len() as f32
    };

    RandomResults {
        games,
        white_wins,
        black_wins,
        draws,
        unfinished,
        avg_plies,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn print_json_results(results: &RandomResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        seed: u64,
        result: GameResult,
        plies: u32,
        passes: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        white_wins: usize,
        black_wins: usize,
        draws: usize,
        unfinished: usize,
        avg_plies: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        white_wins: results.white_wins,
        black_wins: results.black_wins,
        draws: results.draws,
        unfinished: results.unfinished,
        avg_plies: results.avg_plies,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                seed: g.seed,
                result: g.result,
                plies: g.plies,
                passes: g.passes,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_results(results: &RandomResults) {
    let total = results.games.len();

    println!("\n=== Random Games ===");
    println!("Total games: {}", total);
    println!("White wins:  {} ({:.1}%)", results.white_wins, percent(results.white_wins, total));
    println!("Black wins:  {} ({:.1}%)", results.black_wins, percent(results.black_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Unfinished:  {} ({:.1}%)", results.unfinished, percent(results.unfinished, total));
    println!("Avg plies:   {:.1}", results.avg_plies);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {} (seed {}): {:?} in {} plies",
            game.game_number, game.seed, game.result, game.plies
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
