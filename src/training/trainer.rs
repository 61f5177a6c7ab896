use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::ai::Learner;
use crate::checkpoint::{CheckpointManager, CheckpointManagerConfig, CheckpointMetrics};
use crate::game::{Player, MAX_TURNS};
use crate::training::episode::{episode_seed, evaluate, play_self_play_episode, EvalSummary};
use crate::training::experience_buffer::ExperienceBuffer;
use crate::training::metrics::TrainingMetrics;

/// Keeps evaluation deals apart from self-play deals.
const EVAL_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Trainer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub num_episodes: usize,
    /// Self-play episodes per outer iteration, before each update attempt.
    pub episodes_per_iteration: usize,
    /// Move cap per self-play episode.
    pub max_episode_steps: usize,
    pub log_interval: usize,
    /// Episodes between evaluations against the random agent. 0 disables.
    pub eval_interval: usize,
    pub eval_games: usize,
    /// Episodes between checkpoints. 0 saves only at the end.
    pub checkpoint_interval: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_episodes: 10_000,
            episodes_per_iteration: 4,
            max_episode_steps: 100,
            log_interval: 100,
            eval_interval: 500,
            eval_games: 50,
            checkpoint_interval: 50,
            seed: None,
        }
    }
}

/// What a training run did.
#[derive(Debug, Clone, Default)]
pub struct TrainingSummary {
    /// Episodes played in this run.
    pub episodes: usize,
    /// Updates that consumed a batch.
    pub updates: usize,
    pub stopped_early: bool,
    pub final_eval: Option<EvalSummary>,
}

/// Self-play training orchestrator.
pub struct Trainer {
    config: TrainerConfig,
    checkpoint_manager: CheckpointManager,
}

impl Trainer {
    pub fn new(config: TrainerConfig, checkpoint: CheckpointManagerConfig) -> Self {
        Trainer {
            config,
            checkpoint_manager: CheckpointManager::new(checkpoint),
        }
    }

    pub fn checkpoint_manager(&self) -> &CheckpointManager {
        &self.checkpoint_manager
    }

    /// Run the training loop until `num_episodes` more episodes are played or
    /// `stop` is raised. `stop` is checked between outer iterations only, so
    /// an episode or update in flight always completes.
    pub fn train<L: Learner + ?Sized>(&self, learner: &mut L, stop: &AtomicBool) -> TrainingSummary {
        let mut metrics = TrainingMetrics::new();
        let mut buffer = ExperienceBuffer::new();
        let mut summary = TrainingSummary::default();

        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        let per_iteration = self.config.episodes_per_iteration.max(1);
        let start_episode = learner.episode_count();
        let end_episode = start_episode + self.config.num_episodes;
        let mut episode = start_episode;

        log::info!(
            "starting {} training for {} episodes ({}..{}), seed {}",
            learner.name(),
            self.config.num_episodes,
            start_episode + 1,
            end_episode,
            base_seed
        );

        while episode < end_episode {
            if stop.load(Ordering::Relaxed) {
                log::info!("stop requested after episode {episode}");
                summary.stopped_early = true;
                break;
            }

            let iteration_start = episode;
            let iteration_end = (episode + per_iteration).min(end_episode);
            while episode < iteration_end {
                let seed = episode_seed(base_seed, episode);
                let trace = play_self_play_episode(learner, self.config.max_episode_steps, seed);
                buffer.extend(trace.transitions);
                metrics.record_episode(trace.result);
                learner.record_episode();
                episode += 1;
                summary.episodes += 1;
            }

            let update = learner.update(&mut buffer);
            if !update.is_skipped() {
                metrics.record_update(update.loss);
                summary.updates += 1;
                log::debug!(
                    "update {}: value loss {:.4}, policy loss {:?}, entropy {:?}, {} samples",
                    learner.step_count(),
                    update.loss,
                    update.policy_loss,
                    update.policy_entropy,
                    update.samples
                );
            }

            if crossed(iteration_start, episode, self.config.log_interval) {
                self.log_progress(learner, &metrics, episode, end_episode);
            }

            if self.config.eval_games > 0
                && crossed(iteration_start, episode, self.config.eval_interval)
            {
                let eval = self.evaluate(learner, base_seed, episode);
                metrics.record_evaluation(eval.win_rate());
            }

            if crossed(iteration_start, episode, self.config.checkpoint_interval) {
                self.checkpoint(learner, &mut metrics, base_seed, episode);
            }

            std::thread::yield_now();
        }

        if summary.episodes > 0
            && !(self.config.checkpoint_interval > 0
                && episode % self.config.checkpoint_interval == 0)
        {
            self.checkpoint(learner, &mut metrics, base_seed, episode);
        }

        if self.config.eval_games > 0 {
            let eval = self.evaluate(learner, base_seed, episode);
            summary.final_eval = Some(eval);
        }

        log::info!(
            "training finished: {} episodes, {} updates{}",
            summary.episodes,
            summary.updates,
            if summary.stopped_early { " (stopped early)" } else { "" }
        );

        summary
    }

    fn log_progress<L: Learner + ?Sized>(
        &self,
        learner: &L,
        metrics: &TrainingMetrics,
        episode: usize,
        end_episode: usize,
    ) {
        let window = self.config.log_interval;
        log::info!(
            "episode {}/{} | eps: {:.3} | loss: {:.4} | red: {:.1}% | blue: {:.1}% | draw: {:.1}% | truncated: {:.1}% | avg_len: {:.1}",
            episode,
            end_episode,
            learner.epsilon(true),
            metrics.average_loss(window),
            metrics.win_rate(Player::A, window) * 100.0,
            metrics.win_rate(Player::B, window) * 100.0,
            metrics.draw_rate(window) * 100.0,
            metrics.truncation_rate(window) * 100.0,
            metrics.average_game_length(window),
        );
    }

    fn evaluate<L: Learner + ?Sized>(&self, learner: &mut L, base_seed: u64, episode: usize) -> EvalSummary {
        // A match cannot outlast the turn ceiling.
        let max_steps = MAX_TURNS as usize + 1;
        let seed = episode_seed(base_seed ^ EVAL_SEED_SALT, episode);
        let eval = evaluate(learner, self.config.eval_games, max_steps, seed);
        log::info!(
            "eval vs random ({} games): {:.1}% win, {:.1}% draw",
            eval.games(),
            eval.win_rate() * 100.0,
            eval.draw_rate() * 100.0
        );
        eval
    }

    /// Save a checkpoint. Failures are logged and training goes on.
    fn checkpoint<L: Learner + ?Sized>(
        &self,
        learner: &mut L,
        metrics: &mut TrainingMetrics,
        base_seed: u64,
        episode: usize,
    ) {
        let win_rate = match metrics.last_eval_win_rate() {
            Some(wr) => wr,
            None if self.config.eval_games > 0 => {
                let wr = self.evaluate(learner, base_seed, episode).win_rate();
                metrics.record_evaluation(wr);
                wr
            }
            None => 0.0,
        };
        let window = self.config.log_interval;
        let ckpt_metrics = CheckpointMetrics {
            win_rate,
            draw_rate: metrics.draw_rate(window),
            average_game_length: metrics.average_game_length(window),
            current_loss: metrics.average_loss(window),
            training_steps: learner.step_count(),
        };
        match self
            .checkpoint_manager
            .save_checkpoint(learner, &ckpt_metrics, episode)
        {
            Ok(path) => log::info!("checkpoint saved: {}", path.display()),
            Err(e) => log::warn!("checkpoint at episode {episode} failed: {e}"),
        }
    }
}

/// True when a multiple of `interval` lies in `(from, to]`.
fn crossed(from: usize, to: usize, interval: usize) -> bool {
    interval > 0 && to / interval > from / interval
}
