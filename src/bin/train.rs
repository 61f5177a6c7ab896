#![recursion_limit = "256"]

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use onitama_rl::ai::{Learner, PpoAgent};
use onitama_rl::config::AppConfig;
use onitama_rl::training::trainer::Trainer;

/// Train an Onitama agent via self-play.
#[derive(Parser)]
#[command(name = "train", about = "Train an Onitama agent via self-play")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Resume training from the latest checkpoint
    #[arg(long)]
    resume: bool,

    /// Override number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Override learning rate
    #[arg(long)]
    lr: Option<f64>,

    /// Seed for deals and the learner's sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Override checkpoint directory
    #[arg(long)]
    checkpoint_dir: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml().context("serializing default config")?);
        return Ok(());
    }

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(episodes) = cli.episodes {
        app_config.training.num_episodes = episodes;
    }
    if let Some(lr) = cli.lr {
        app_config.ppo.learning_rate = lr;
    }
    if let Some(seed) = cli.seed {
        app_config.ppo.seed = Some(seed);
        app_config.training.seed = Some(seed);
    }
    if let Some(dir) = cli.checkpoint_dir {
        app_config.checkpoint.checkpoint_dir = dir;
    }
    app_config
        .validate()
        .context("validating config after command-line overrides")?;

    let trainer = Trainer::new(app_config.training.clone(), app_config.checkpoint.clone());
    let mut agent = PpoAgent::new(app_config.ppo.clone());

    if cli.resume {
        trainer
            .checkpoint_manager()
            .restore_or_fresh(&mut agent)
            .context("restoring checkpoint")?;
    }

    let stop = Arc::new(AtomicBool::new(false));
    spawn_stop_listener(Arc::clone(&stop));
    log::info!("type 'q' and press enter to stop after the current iteration");

    let summary = trainer.train(&mut agent, &stop);
    if let Some(eval) = summary.final_eval {
        log::info!(
            "final eval vs random: {:.1}% win rate over {} games",
            eval.win_rate() * 100.0,
            eval.games()
        );
    }
    log::info!(
        "learner at episode {}, {} updates",
        agent.episode_count(),
        agent.step_count()
    );

    Ok(())
}

/// Raise `stop` when a line starting with `q` arrives on stdin.
fn spawn_stop_listener(stop: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().starts_with('q') {
                stop.store(true, Ordering::Relaxed);
                break;
            }
        }
    });
}
