use std::path::Path;

use crate::checkpoint::{CheckpointMetadata, CheckpointMetrics};
use crate::error::CheckpointError;
use crate::game::{Action, MatchState, StateVector};
use crate::training::experience_buffer::ExperienceBuffer;

/// Metrics returned from a training update.
#[derive(Debug, Clone, Default)]
pub struct UpdateMetrics {
    /// Mean squared error of the value approximator, averaged over passes.
    pub loss: f32,
    pub policy_loss: Option<f32>,
    pub policy_entropy: Option<f32>,
    /// Transitions consumed. Zero when the update was skipped.
    pub samples: usize,
}

impl UpdateMetrics {
    pub fn is_skipped(&self) -> bool {
        self.samples == 0
    }
}

/// Universal interface for anything that picks moves.
pub trait Agent {
    /// Select an action for the side to move, or `None` when it has no legal
    /// action. `exploring` enables training-time exploration.
    fn select_action(&mut self, state: &MatchState, exploring: bool) -> Option<Action>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}

/// An agent that owns trainable approximators and learns from self-play.
pub trait Learner: Agent {
    /// Critic estimate for a feature vector.
    fn estimate_value(&self, features: &StateVector) -> f32;

    /// Learn from the buffer. Skipped, leaving the buffer untouched, when it
    /// holds fewer than one batch; otherwise drains it.
    fn update(&mut self, buffer: &mut ExperienceBuffer) -> UpdateMetrics;

    /// Log-probability the current policy gives `action` in `state`. Recorded
    /// with each transition as the old policy term of the update.
    fn action_log_prob(&self, _state: &MatchState, _action: &Action) -> Option<f32> {
        None
    }

    /// Exploration rate currently in effect.
    fn epsilon(&self, exploring: bool) -> f32;

    /// Completed learning updates.
    fn step_count(&self) -> usize;

    /// Self-play episodes seen, for resume offsets.
    fn episode_count(&self) -> usize;

    fn record_episode(&mut self);

    fn save_weights_to_dir(&self, dir: &Path) -> Result<(), CheckpointError>;

    fn load_weights_from_dir(&mut self, dir: &Path) -> Result<(), CheckpointError>;

    /// Serialize training state to JSON.
    fn training_state_json(&self) -> Result<String, CheckpointError>;

    fn restore_training_state_json(&mut self, json: &str) -> Result<(), CheckpointError>;

    /// Build checkpoint metadata for this learner.
    fn build_checkpoint_metadata(
        &self,
        metrics: &CheckpointMetrics,
        episode: usize,
        timestamp: u64,
    ) -> CheckpointMetadata;
}
