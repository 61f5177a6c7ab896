use std::path::{Path, PathBuf};

use burn::backend::{Autodiff, NdArray};
use burn::module::AutodiffModule;
use burn::optim::adaptor::OptimizerAdaptor;
use burn::optim::{Adam, AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::record::DefaultRecorder;
use burn::tensor::activation::{log_softmax, softmax};
use burn::tensor::TensorData;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ai::agent::{Agent, Learner, UpdateMetrics};
use crate::ai::algorithms::afterstate::{afterstate_features, NetworkScorer};
use crate::ai::networks::{ScoringNetwork, ScoringNetworkConfig};
use crate::ai::state_encoding::{encode_batch, encode_features, to_vec};
use crate::checkpoint::{
    CheckpointMetadata, CheckpointMetrics, PpoHyperparameters, PpoTrainingState,
};
use crate::error::CheckpointError;
use crate::game::{Action, MatchState, StateVector, FEATURE_SIZE};
use crate::training::advantage::estimate_advantages;
use crate::training::experience_buffer::{ExperienceBuffer, Transition};

pub type InferBackend = NdArray<f32>;
pub type TrainBackend = Autodiff<InferBackend>;

type NetworkOptimizer = OptimizerAdaptor<Adam, ScoringNetwork<TrainBackend>, TrainBackend>;

const ACTOR_FILE: &str = "actor";
const CRITIC_FILE: &str = "critic";

/// Logit added to padded candidate slots.
const PAD_LOGIT: f32 = -1e9;

/// PPO hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PpoConfig {
    pub learning_rate: f64,
    pub gamma: f32,
    pub gae_lambda: f32,
    pub clip_ratio: f32,
    pub entropy_coeff: f32,
    /// Optimization passes over each drained batch.
    pub epochs: usize,
    /// Minimum buffered transitions before an update runs.
    pub batch_size: usize,
    pub epsilon_start: f32,
    pub epsilon_floor: f32,
    /// Epsilon decrease per completed update.
    pub epsilon_decay: f32,
    /// Fixed epsilon outside training.
    pub epsilon_eval: f32,
    pub advantage_epsilon: f64,
    /// When false only the critic is fitted.
    pub train_policy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PpoConfig {
    fn default() -> Self {
        PpoConfig {
            learning_rate: 5e-4,
            gamma: 0.99,
            gae_lambda: 0.95,
            clip_ratio: 0.2,
            entropy_coeff: 0.03,
            epochs: 3,
            batch_size: 32,
            epsilon_start: 0.5,
            epsilon_floor: 0.1,
            epsilon_decay: 1e-4,
            epsilon_eval: 0.05,
            advantage_epsilon: 1e-8,
            train_policy: true,
            seed: None,
        }
    }
}

/// One policy-update row: the afterstates of every legal action and which
/// one was played.
struct PolicySample {
    candidates: Vec<StateVector>,
    chosen: usize,
    advantage: f32,
    log_prob: Option<f32>,
}

/// Actor-critic learner. The actor scores afterstates and a softmax over
/// those scores is the policy; the critic estimates state value.
pub struct PpoAgent {
    actor: ScoringNetwork<TrainBackend>,
    critic: ScoringNetwork<TrainBackend>,
    actor_optimizer: NetworkOptimizer,
    critic_optimizer: NetworkOptimizer,
    config: PpoConfig,
    device: <TrainBackend as Backend>::Device,
    episode_count: usize,
    step_count: usize,
    rng: StdRng,
}

impl PpoAgent {
    pub fn new(config: PpoConfig) -> Self {
        let device = Default::default();
        let net_config = ScoringNetworkConfig {};
        let actor: ScoringNetwork<TrainBackend> = net_config.init(&device);
        let critic: ScoringNetwork<TrainBackend> = net_config.init(&device);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        PpoAgent {
            actor,
            critic,
            actor_optimizer: AdamConfig::new().init(),
            critic_optimizer: AdamConfig::new().init(),
            config,
            device,
            episode_count: 0,
            step_count: 0,
            rng,
        }
    }

    pub fn config(&self) -> &PpoConfig {
        &self.config
    }

    /// Inference copy of the actor for the afterstate selector.
    pub fn export_scorer(&self) -> NetworkScorer<InferBackend> {
        NetworkScorer::new(self.actor.valid(), self.device.clone())
    }

    /// Policy distribution over `state.legal_actions()`, in the same order.
    pub fn action_probabilities(&self, state: &MatchState) -> Vec<f32> {
        let actions = state.legal_actions();
        match afterstate_features(state, &actions) {
            Ok(candidates) if !candidates.is_empty() => softmax_probs(&self.actor_logits(&candidates)),
            _ => Vec::new(),
        }
    }

    fn actor_logits(&self, candidates: &[StateVector]) -> Vec<f32> {
        let input = encode_batch::<InferBackend>(candidates, &self.device);
        to_vec(self.actor.valid().forward(input))
    }

    fn pick_action(&mut self, state: &MatchState, exploring: bool) -> Option<Action> {
        let actions = state.legal_actions();
        if actions.is_empty() {
            return None;
        }

        let epsilon = self.epsilon(exploring);
        if self.rng.random::<f32>() < epsilon {
            return Some(actions[self.rng.random_range(0..actions.len())]);
        }

        let candidates = match afterstate_features(state, &actions) {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("could not expand afterstates, playing at random: {e}");
                return Some(actions[self.rng.random_range(0..actions.len())]);
            }
        };
        let probs = softmax_probs(&self.actor_logits(&candidates));

        let idx = if exploring {
            sample_categorical(&probs, &mut self.rng)
        } else {
            argmax(&probs)
        };
        Some(actions[idx])
    }

    /// Regress the critic onto the GAE returns. Returns the mean MSE over
    /// the passes.
    fn fit_value(&mut self, transitions: &[Transition], returns: &[f32]) -> f32 {
        let n = transitions.len();
        let features: Vec<StateVector> = transitions.iter().map(|t| t.features).collect();
        let epochs = self.config.epochs.max(1);

        let mut total = 0.0f32;
        for _ in 0..epochs {
            let input = encode_batch::<TrainBackend>(&features, &self.device);
            let targets = Tensor::<TrainBackend, 1>::from_data(
                TensorData::from(returns),
                &self.device,
            )
            .reshape([n as i32, 1]);

            let predicted = self.critic.forward(input);
            let diff = predicted - targets;
            let loss = (diff.clone() * diff).mean();
            total += scalar(loss.clone());

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &self.critic);
            self.critic =
                self.critic_optimizer
                    .step(self.config.learning_rate, self.critic.clone(), grads);
        }
        total / epochs as f32
    }

    /// Clipped-surrogate update of the actor. Returns mean policy loss and
    /// entropy, or `None` when no transition could be expanded.
    fn fit_policy(&mut self, transitions: &[Transition], advantages: &[f32]) -> Option<(f32, f32)> {
        let samples: Vec<PolicySample> = transitions
            .iter()
            .zip(advantages)
            .filter_map(|(t, &advantage)| {
                let actions = t.state.legal_actions();
                let chosen = actions.iter().position(|a| *a == t.action)?;
                let candidates = afterstate_features(&t.state, &actions).ok()?;
                Some(PolicySample {
                    candidates,
                    chosen,
                    advantage,
                    log_prob: t.log_prob,
                })
            })
            .collect();
        if samples.is_empty() {
            return None;
        }

        // Rows are padded to the widest candidate set and masked.
        let n = samples.len();
        let width = samples.iter().map(|s| s.candidates.len()).max().unwrap_or(1);
        let mut feature_data = vec![0.0f32; n * width * FEATURE_SIZE];
        let mut legal_mask = vec![PAD_LOGIT; n * width];
        let mut chosen_mask = vec![0.0f32; n * width];
        for (i, sample) in samples.iter().enumerate() {
            for (j, features) in sample.candidates.iter().enumerate() {
                let offset = (i * width + j) * FEATURE_SIZE;
                feature_data[offset..offset + FEATURE_SIZE].copy_from_slice(features);
                legal_mask[i * width + j] = 0.0;
            }
            chosen_mask[i * width + sample.chosen] = 1.0;
        }

        let old_log_probs = self.old_log_probs(&samples, &feature_data, width);
        let advantage_data: Vec<f32> = samples.iter().map(|s| s.advantage).collect();
        let clip = self.config.clip_ratio;
        let epochs = self.config.epochs.max(1);

        let mut total_loss = 0.0f32;
        let mut total_entropy = 0.0f32;
        for _ in 0..epochs {
            let input = Tensor::<TrainBackend, 1>::from_data(
                TensorData::from(feature_data.as_slice()),
                &self.device,
            )
            .reshape([(n * width) as i32, FEATURE_SIZE as i32]);
            let logits = self.actor.forward(input).reshape([n as i32, width as i32]);

            let mask = Tensor::<TrainBackend, 1>::from_data(
                TensorData::from(legal_mask.as_slice()),
                &self.device,
            )
            .reshape([n as i32, width as i32]);
            let masked_logits = logits + mask;
            let log_probs = log_softmax(masked_logits.clone(), 1);

            let chosen = Tensor::<TrainBackend, 1>::from_data(
                TensorData::from(chosen_mask.as_slice()),
                &self.device,
            )
            .reshape([n as i32, width as i32]);
            let selected = (log_probs.clone() * chosen).sum_dim(1).reshape([n as i32]);

            let old = Tensor::<TrainBackend, 1>::from_data(
                TensorData::from(old_log_probs.as_slice()),
                &self.device,
            );
            let adv = Tensor::<TrainBackend, 1>::from_data(
                TensorData::from(advantage_data.as_slice()),
                &self.device,
            );

            let ratio = (selected - old).exp();
            let surr1 = ratio.clone() * adv.clone();
            let surr2 = ratio.clamp(1.0 - clip, 1.0 + clip) * adv;

            // min(a, b) = (a + b - |a - b|) / 2
            let diff = surr1.clone() - surr2.clone();
            let abs_diff = diff.clone() * diff.sign();
            let objective = (surr1 + surr2 - abs_diff) / 2.0;
            let policy_loss = -objective.mean();

            let entropy = -(softmax(masked_logits, 1) * log_probs).sum_dim(1).mean();
            let loss = policy_loss.clone() - entropy.clone() * self.config.entropy_coeff;

            total_loss += scalar(policy_loss);
            total_entropy += scalar(entropy);

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &self.actor);
            self.actor = self
                .actor_optimizer
                .step(self.config.learning_rate, self.actor.clone(), grads);
        }

        Some((total_loss / epochs as f32, total_entropy / epochs as f32))
    }

    /// Log-probabilities of the played actions under the pre-update policy,
    /// unless the transition recorded one.
    fn old_log_probs(&self, samples: &[PolicySample], feature_data: &[f32], width: usize) -> Vec<f32> {
        let rows = samples.len() * width;
        let input = Tensor::<InferBackend, 1>::from_data(TensorData::from(feature_data), &self.device)
            .reshape([rows as i32, FEATURE_SIZE as i32]);
        let logits = to_vec(self.actor.valid().forward(input));

        samples
            .iter()
            .enumerate()
            .map(|(i, sample)| {
                sample.log_prob.unwrap_or_else(|| {
                    let start = i * width;
                    let row = &logits[start..start + sample.candidates.len()];
                    log_softmax_values(row)[sample.chosen]
                })
            })
            .collect()
    }

    fn training_state(&self) -> PpoTrainingState {
        PpoTrainingState {
            episode_count: self.episode_count,
            step_count: self.step_count,
            learning_rate: self.config.learning_rate,
            gamma: self.config.gamma,
            gae_lambda: self.config.gae_lambda,
            clip_ratio: self.config.clip_ratio,
            entropy_coeff: self.config.entropy_coeff,
            epochs: self.config.epochs,
            batch_size: self.config.batch_size,
            train_policy: self.config.train_policy,
        }
    }

    fn load_network(&self, dir: &Path, name: &str) -> Result<ScoringNetwork<TrainBackend>, CheckpointError> {
        let recorder = DefaultRecorder::default();
        ScoringNetworkConfig {}
            .init::<TrainBackend>(&self.device)
            .load_file(dir.join(name), &recorder, &self.device)
            .map_err(|e| CheckpointError::ApproximatorUnavailable {
                path: dir.join(format!("{name}.mpk")),
                reason: e.to_string(),
            })
    }
}

impl Agent for PpoAgent {
    fn select_action(&mut self, state: &MatchState, exploring: bool) -> Option<Action> {
        self.pick_action(state, exploring)
    }

    fn name(&self) -> &str {
        "PPO"
    }
}

impl Learner for PpoAgent {
    fn estimate_value(&self, features: &StateVector) -> f32 {
        let input = encode_features::<InferBackend>(features, &self.device);
        scalar(self.critic.valid().forward(input).reshape([1]))
    }

    fn action_log_prob(&self, state: &MatchState, action: &Action) -> Option<f32> {
        let index = state.legal_actions().iter().position(|a| a == action)?;
        let probs = self.action_probabilities(state);
        probs.get(index).map(|p| p.max(f32::MIN_POSITIVE).ln())
    }

    fn update(&mut self, buffer: &mut ExperienceBuffer) -> UpdateMetrics {
        if buffer.len() < self.config.batch_size.max(1) {
            log::debug!(
                "skipping update: {} of {} transitions buffered",
                buffer.len(),
                self.config.batch_size
            );
            return UpdateMetrics::default();
        }

        let transitions = buffer.drain();
        let targets = estimate_advantages(
            &transitions,
            self.config.gamma,
            self.config.gae_lambda,
            self.config.advantage_epsilon,
        );

        let loss = self.fit_value(&transitions, &targets.returns);
        let (policy_loss, policy_entropy) = if self.config.train_policy {
            match self.fit_policy(&transitions, &targets.advantages) {
                Some((l, e)) => (Some(l), Some(e)),
                None => (None, None),
            }
        } else {
            (None, None)
        };

        self.step_count += 1;

        UpdateMetrics {
            loss,
            policy_loss,
            policy_entropy,
            samples: transitions.len(),
        }
    }

    fn epsilon(&self, exploring: bool) -> f32 {
        if exploring {
            let decayed = self.config.epsilon_start - self.config.epsilon_decay * self.step_count as f32;
            decayed.max(self.config.epsilon_floor)
        } else {
            self.config.epsilon_eval
        }
    }

    fn step_count(&self) -> usize {
        self.step_count
    }

    fn episode_count(&self) -> usize {
        self.episode_count
    }

    fn record_episode(&mut self) {
        self.episode_count += 1;
    }

    fn save_weights_to_dir(&self, dir: &Path) -> Result<(), CheckpointError> {
        let recorder = DefaultRecorder::default();
        for (name, network) in [(ACTOR_FILE, &self.actor), (CRITIC_FILE, &self.critic)] {
            network
                .valid()
                .save_file(dir.join(name), &recorder)
                .map_err(|e| CheckpointError::ModelSave(e.to_string()))?;
        }
        Ok(())
    }

    fn load_weights_from_dir(&mut self, dir: &Path) -> Result<(), CheckpointError> {
        // Both must load before either is replaced.
        let actor = self.load_network(dir, ACTOR_FILE)?;
        let critic = self.load_network(dir, CRITIC_FILE)?;
        self.actor = actor;
        self.critic = critic;
        self.actor_optimizer = AdamConfig::new().init();
        self.critic_optimizer = AdamConfig::new().init();
        Ok(())
    }

    fn training_state_json(&self) -> Result<String, CheckpointError> {
        Ok(serde_json::to_string_pretty(&self.training_state())?)
    }

    /// Restores the counters. Hyperparameters stay as configured for this run.
    fn restore_training_state_json(&mut self, json: &str) -> Result<(), CheckpointError> {
        let state: PpoTrainingState =
            serde_json::from_str(json).map_err(|e| CheckpointError::MalformedCheckpoint {
                path: PathBuf::from("training_state.json"),
                reason: e.to_string(),
            })?;
        self.episode_count = state.episode_count;
        self.step_count = state.step_count;
        Ok(())
    }

    fn build_checkpoint_metadata(
        &self,
        metrics: &CheckpointMetrics,
        episode: usize,
        timestamp: u64,
    ) -> CheckpointMetadata {
        CheckpointMetadata {
            episode,
            timestamp,
            algorithm: "PPO".to_string(),
            metrics: metrics.clone(),
            hyperparameters: PpoHyperparameters {
                learning_rate: self.config.learning_rate,
                gamma: self.config.gamma,
                gae_lambda: self.config.gae_lambda,
                clip_ratio: self.config.clip_ratio,
                entropy_coeff: self.config.entropy_coeff,
                epochs: self.config.epochs,
                batch_size: self.config.batch_size,
                epsilon_start: self.config.epsilon_start,
                epsilon_floor: self.config.epsilon_floor,
                epsilon_decay: self.config.epsilon_decay,
            },
        }
    }
}

fn scalar<B: Backend>(tensor: Tensor<B, 1>) -> f32 {
    to_vec(tensor).first().copied().unwrap_or(0.0)
}

/// Numerically stable softmax.
fn softmax_probs(logits: &[f32]) -> Vec<f32> {
    let max_val = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max_val).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn log_softmax_values(logits: &[f32]) -> Vec<f32> {
    let max_val = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let log_sum = logits.iter().map(|&l| (l - max_val).exp()).sum::<f32>().ln();
    logits.iter().map(|&l| l - max_val - log_sum).collect()
}

fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Sample an index from a categorical distribution defined by probs.
fn sample_categorical(probs: &[f32], rng: &mut StdRng) -> usize {
    let r: f32 = rng.random_range(0.0..1.0);
    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if r < cumulative {
            return i;
        }
    }
    // Rounding left r above the total mass.
    probs.iter().rposition(|&p| p > 0.0).unwrap_or(0)
}
