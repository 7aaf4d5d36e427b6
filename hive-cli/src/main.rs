//! Hive CLI - Command-line interface
//!
//! Commands:
//! - moves: List legal moves for a position fixture
//! - random: Play seeded random games and check engine invariants

mod moves_cmd;
mod random_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hive")]
#[command(about = "Hive rules engine")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List legal moves for a position
    Moves(moves_cmd::MovesArgs),
    /// Play random legal games
    Random(random_cmd::RandomArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves(args) => moves_cmd::run(args),
        Commands::Random(args) => random_cmd::run(args, cli.seed),
    }
}
