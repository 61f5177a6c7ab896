use serde::{Deserialize, Serialize};

/// Metrics snapshot at checkpoint time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointMetrics {
    /// Greedy win rate against the random agent at the last evaluation.
    pub win_rate: f32,
    pub draw_rate: f32,
    pub average_game_length: f32,
    pub current_loss: f32,
    pub training_steps: usize,
}

/// Hyperparameters recorded in checkpoint metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PpoHyperparameters {
    pub learning_rate: f64,
    pub gamma: f32,
    pub gae_lambda: f32,
    pub clip_ratio: f32,
    pub entropy_coeff: f32,
    pub epochs: usize,
    pub batch_size: usize,
    pub epsilon_start: f32,
    pub epsilon_floor: f32,
    pub epsilon_decay: f32,
}

/// Top-level checkpoint metadata written to metadata.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub episode: usize,
    pub timestamp: u64,
    pub algorithm: String,
    pub metrics: CheckpointMetrics,
    pub hyperparameters: PpoHyperparameters,
}

/// Learner state written to training_state.json.
///
/// The counters are required: a file without them is treated as malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PpoTrainingState {
    pub episode_count: usize,
    pub step_count: usize,
    pub learning_rate: f64,
    pub gamma: f32,
    pub gae_lambda: f32,
    pub clip_ratio: f32,
    pub entropy_coeff: f32,
    pub epochs: usize,
    pub batch_size: usize,
    #[serde(default = "default_train_policy")]
    pub train_policy: bool,
}

fn default_train_policy() -> bool {
    true
}
