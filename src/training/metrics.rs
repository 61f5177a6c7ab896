use std::collections::VecDeque;

use crate::game::Player;

/// Why a self-play episode stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeEnd {
    /// The match reached a win or the turn-ceiling draw.
    Finished,
    /// The side to move had no legal action.
    Stalled,
    /// The per-episode step cap was hit first.
    Truncated,
}

/// Result of a single episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeResult {
    pub winner: Option<Player>,
    pub game_length: usize,
    pub end: EpisodeEnd,
}

/// Training metrics tracker with rolling window computations.
pub struct TrainingMetrics {
    episode_results: VecDeque<EpisodeResult>,
    update_losses: VecDeque<f32>,
    capacity: usize,
    total_episodes: usize, // lifetime count, never capped
    last_eval_win_rate: Option<f32>,
}

impl TrainingMetrics {
    pub fn with_capacity(capacity: usize) -> Self {
        TrainingMetrics {
            episode_results: VecDeque::with_capacity(capacity),
            update_losses: VecDeque::with_capacity(capacity),
            capacity,
            total_episodes: 0,
            last_eval_win_rate: None,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn record_episode(&mut self, result: EpisodeResult) {
        self.total_episodes += 1;
        self.episode_results.push_back(result);
        if self.episode_results.len() > self.capacity {
            self.episode_results.pop_front();
        }
    }

    pub fn record_update(&mut self, loss: f32) {
        self.update_losses.push_back(loss);
        if self.update_losses.len() > self.capacity {
            self.update_losses.pop_front();
        }
    }

    pub fn record_evaluation(&mut self, win_rate: f32) {
        self.last_eval_win_rate = Some(win_rate);
    }

    /// Greedy win rate against the random agent, if evaluated yet.
    pub fn last_eval_win_rate(&self) -> Option<f32> {
        self.last_eval_win_rate
    }

    fn recent(&self, last_n: usize) -> impl Iterator<Item = &EpisodeResult> {
        self.episode_results.iter().rev().take(last_n)
    }

    fn fraction(&self, last_n: usize, pred: impl Fn(&EpisodeResult) -> bool) -> f32 {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        self.recent(n).filter(|&r| pred(r)).count() as f32 / n as f32
    }

    /// Share of the last N self-play episodes won by `player`.
    pub fn win_rate(&self, player: Player, last_n: usize) -> f32 {
        self.fraction(last_n, |r| r.winner == Some(player))
    }

    /// Share of the last N episodes without a winner, for any reason.
    pub fn draw_rate(&self, last_n: usize) -> f32 {
        self.fraction(last_n, |r| r.winner.is_none())
    }

    /// Share of the last N episodes cut off by the step cap.
    pub fn truncation_rate(&self, last_n: usize) -> f32 {
        self.fraction(last_n, |r| r.end == EpisodeEnd::Truncated)
    }

    /// Average loss over the last N updates.
    pub fn average_loss(&self, last_n: usize) -> f32 {
        let n = self.update_losses.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let sum: f32 = self.update_losses.iter().rev().take(n).sum();
        sum / n as f32
    }

    /// Average game length over the last N episodes.
    pub fn average_game_length(&self, last_n: usize) -> f32 {
        let n = self.episode_results.len().min(last_n);
        if n == 0 {
            return 0.0;
        }
        let total: usize = self.recent(n).map(|r| r.game_length).sum();
        total as f32 / n as f32
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new()
    }
}
