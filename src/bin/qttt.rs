//! qttt CLI - train, evaluate and play against a tabular Q-learning agent

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "qttt")]
#[command(version, about = "Tabular Q-learning for tic-tac-toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent against a random opponent
    Train(Box<qttt::cli::commands::train::TrainArgs>),

    /// Play a game against the trained agent
    Play(qttt::cli::commands::play::PlayArgs),

    /// Evaluate the trained agent against a random opponent
    Evaluate(qttt::cli::commands::evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => qttt::cli::commands::train::execute(*args),
        Commands::Play(args) => qttt::cli::commands::play::execute(args),
        Commands::Evaluate(args) => qttt::cli::commands::evaluate::execute(args),
    }
}
