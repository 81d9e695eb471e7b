//! Evaluate command - frozen agent against a random opponent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::repository_for,
    cli::{
        DEFAULT_TABLE_PATH,
        output::{format_number, format_percent, print_count, print_kv, print_section},
    },
    pipeline::{RandomOpponent, evaluate},
    q_learning::{ExplorationSchedule, Policy, ValueTable},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate the trained agent")]
pub struct EvaluateArgs {
    /// Value table to load (.msgpack/.mp for MessagePack)
    #[arg(long, short = 't', default_value = DEFAULT_TABLE_PATH)]
    pub table: PathBuf,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let table = ValueTable::load_or_default(repository_for(&args.table).as_ref(), &args.table);

    print_section("Evaluation");
    print_kv("Table", &args.table.display().to_string());
    print_kv("Table entries", &format_number(table.len()));
    print_kv("Games", &format_number(args.games));
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut policy = Policy::new(table, ExplorationSchedule::default());
    let mut opponent = RandomOpponent::new("Random");
    let result = evaluate(&mut policy, &mut opponent, args.games, args.seed)
        .context("evaluation failed")?;

    print_section("Evaluation Results");
    print_count("Wins", result.wins, result.win_rate());
    print_count("Draws", result.draws, result.draw_rate());
    print_count("Losses", result.losses, result.loss_rate());
    print_kv("Non-loss rate", &format_percent(result.non_loss_rate()));

    if let Some(path) = &args.export {
        result
            .save(path)
            .with_context(|| format!("failed to export results to {}", path.display()))?;
        println!("\nResults exported to: {}", path.display());
    }

    Ok(())
}
