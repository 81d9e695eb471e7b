//! Train command - self-play training against a random opponent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use crate::{
    adapters::repository_for,
    cli::{
        DEFAULT_TABLE_PATH,
        output::{format_number, format_percent, print_count, print_kv, print_section},
    },
    pipeline::{
        LoggingObserver, ProgressObserver, RandomOpponent, Trainer, TrainingConfig,
        TrainingResult,
    },
    q_learning::{ExplorationSchedule, Policy, TrajectoryLog, ValueTable},
};

#[derive(Parser, Debug)]
#[command(about = "Train the Q-learning agent")]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'n', default_value_t = TrainingConfig::default().episodes)]
    pub episodes: usize,

    /// Value table to resume from and save to (.msgpack/.mp for MessagePack)
    #[arg(long, short = 't', default_value = DEFAULT_TABLE_PATH)]
    pub table: PathBuf,

    /// Learning rate α
    #[arg(long, default_value_t = TrainingConfig::default().learning_rate)]
    pub alpha: f64,

    /// Discount factor γ
    #[arg(long, default_value_t = TrainingConfig::default().discount_factor)]
    pub gamma: f64,

    /// Starting exploration rate
    #[arg(long, default_value_t = ExplorationSchedule::default().rate)]
    pub epsilon: f64,

    /// Multiplicative exploration decay per episode
    #[arg(long, default_value_t = ExplorationSchedule::default().decay)]
    pub epsilon_decay: f64,

    /// Exploration floor
    #[arg(long, default_value_t = ExplorationSchedule::default().min_rate)]
    pub min_epsilon: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ignore any existing table and start from scratch
    #[arg(long)]
    pub fresh: bool,

    /// Trajectory log to append this run's episodes to
    #[arg(long)]
    pub trajectories: Option<PathBuf>,

    /// Fold the existing trajectory log into the table before training
    #[arg(long, requires = "trajectories")]
    pub replay: bool,

    /// Write a JSON training summary
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl TrainArgs {
    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig::default()
            .with_episodes(self.episodes)
            .with_learning_rate(self.alpha)
            .with_discount_factor(self.gamma)
            .with_exploration(ExplorationSchedule::new(
                self.epsilon,
                self.epsilon_decay,
                self.min_epsilon,
            ))
            .with_seed(self.seed)
            .with_record_trajectories(self.trajectories.is_some())
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.training_config();
    config.validate().context("invalid training parameters")?;

    let repository = repository_for(&args.table);
    let table = if args.fresh {
        info!("starting from an empty value table (--fresh)");
        ValueTable::new()
    } else {
        ValueTable::load_or_default(repository.as_ref(), &args.table)
    };
    let mut policy = config.build_policy(table);

    let mut trainer = Trainer::new(config.clone());
    if args.no_progress {
        let interval = (config.episodes / 10).max(1);
        trainer = trainer.with_observer(Box::new(LoggingObserver::new(interval)));
    } else {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }

    let mut log = match &args.trajectories {
        Some(path) => {
            TrajectoryLog::load_or_default(repository_for(path).as_ref(), path)
        }
        None => TrajectoryLog::new(),
    };
    if args.replay {
        let applied = trainer.replay(&mut policy, &log)?;
        println!("Replayed {} recorded episodes", format_number(applied));
    }

    print_section("Training");
    print_kv("Episodes", &format_number(config.episodes));
    print_kv("Learning rate", &config.learning_rate.to_string());
    print_kv("Discount factor", &config.discount_factor.to_string());
    print_kv(
        "Exploration",
        &format!(
            "{} -> {} (x{} per episode)",
            config.exploration.rate, config.exploration.min_rate, config.exploration.decay
        ),
    );
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut opponent = RandomOpponent::new("Random");
    let result = trainer
        .run(&mut policy, &mut opponent)
        .context("training failed")?;

    policy
        .table()
        .save(repository.as_ref(), &args.table)
        .with_context(|| format!("failed to save value table to {}", args.table.display()))?;

    if let Some(path) = &args.trajectories {
        log.extend(trainer.take_trajectories());
        log.save(repository_for(path).as_ref(), path)
            .with_context(|| format!("failed to save trajectories to {}", path.display()))?;
    }

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
    }

    print_result(&result, &policy, &args);
    Ok(())
}

fn print_result(result: &TrainingResult, policy: &Policy, args: &TrainArgs) {
    print_section("Training Results");
    print_count("Wins", result.wins, result.win_rate);
    print_count("Draws", result.draws, result.draw_rate);
    print_count("Losses", result.losses, result.loss_rate);
    print_kv("Final exploration", &format_percent(result.final_exploration));
    print_kv(
        "Table entries",
        &format!(
            "{} across {} states",
            format_number(policy.table().len()),
            format_number(policy.table().state_count())
        ),
    );
    print_kv("Saved to", &args.table.display().to_string());
}
