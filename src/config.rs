use std::path::Path;

use crate::ai::PpoConfig;
use crate::checkpoint::CheckpointManagerConfig;
use crate::error::ConfigError;
use crate::training::trainer::TrainerConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ppo: PpoConfig,
    pub training: TrainerConfig,
    pub checkpoint: CheckpointManagerConfig,
}

fn check(ok: bool, message: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Validation(message.into()))
    }
}

fn unit_interval(value: f32) -> bool {
    (0.0..=1.0).contains(&value)
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ppo = &self.ppo;
        check(ppo.learning_rate > 0.0, "ppo.learning_rate must be > 0")?;
        check(unit_interval(ppo.gamma), "ppo.gamma must be in [0, 1]")?;
        check(unit_interval(ppo.gae_lambda), "ppo.gae_lambda must be in [0, 1]")?;
        check(ppo.clip_ratio > 0.0, "ppo.clip_ratio must be > 0")?;
        check(ppo.entropy_coeff >= 0.0, "ppo.entropy_coeff must be >= 0")?;
        check(ppo.epochs > 0, "ppo.epochs must be > 0")?;
        check(ppo.batch_size > 0, "ppo.batch_size must be > 0")?;
        check(unit_interval(ppo.epsilon_start), "ppo.epsilon_start must be in [0, 1]")?;
        check(unit_interval(ppo.epsilon_floor), "ppo.epsilon_floor must be in [0, 1]")?;
        check(unit_interval(ppo.epsilon_eval), "ppo.epsilon_eval must be in [0, 1]")?;
        check(
            ppo.epsilon_floor <= ppo.epsilon_start,
            "ppo.epsilon_floor must be <= ppo.epsilon_start",
        )?;
        check(ppo.epsilon_decay >= 0.0, "ppo.epsilon_decay must be >= 0")?;
        check(ppo.advantage_epsilon > 0.0, "ppo.advantage_epsilon must be > 0")?;

        let training = &self.training;
        check(training.num_episodes > 0, "training.num_episodes must be > 0")?;
        check(
            training.episodes_per_iteration > 0,
            "training.episodes_per_iteration must be >= 1",
        )?;
        check(
            training.max_episode_steps > 0,
            "training.max_episode_steps must be >= 1",
        )?;
        check(training.log_interval > 0, "training.log_interval must be > 0")?;

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}
