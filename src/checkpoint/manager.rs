use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ai::Learner;
use crate::checkpoint::metadata::{CheckpointMetadata, CheckpointMetrics};
use crate::error::CheckpointError;

const METADATA_FILE: &str = "metadata.json";
const TRAINING_STATE_FILE: &str = "training_state.json";
const LATEST_LINK: &str = "latest";

/// Configuration for the checkpoint manager.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CheckpointManagerConfig {
    pub checkpoint_dir: PathBuf,
    pub keep_last_n: usize,
    pub keep_best_n: usize,
}

impl Default for CheckpointManagerConfig {
    fn default() -> Self {
        CheckpointManagerConfig {
            checkpoint_dir: PathBuf::from("checkpoints"),
            keep_last_n: 5,
            keep_best_n: 3,
        }
    }
}

/// Checkpoint contents read back from disk. The learner parses its own
/// training state.
#[derive(Debug)]
pub struct CheckpointData {
    pub path: PathBuf,
    pub metadata: CheckpointMetadata,
    pub training_state_json: String,
}

/// Manages saving, loading, listing, and pruning checkpoints.
pub struct CheckpointManager {
    config: CheckpointManagerConfig,
}

impl CheckpointManager {
    pub fn new(config: CheckpointManagerConfig) -> Self {
        CheckpointManager { config }
    }

    pub fn checkpoint_dir(&self) -> &Path {
        &self.config.checkpoint_dir
    }

    /// Write a checkpoint for `learner` at `episode`. Files are staged in a
    /// `.tmp` directory and renamed into place.
    pub fn save_checkpoint<L: Learner + ?Sized>(
        &self,
        learner: &L,
        metrics: &CheckpointMetrics,
        episode: usize,
    ) -> Result<PathBuf, CheckpointError> {
        fs::create_dir_all(&self.config.checkpoint_dir)?;

        let dir_name = format!("checkpoint_{:07}", episode);
        let tmp_dir = self.config.checkpoint_dir.join(format!("{}.tmp", dir_name));
        let final_dir = self.config.checkpoint_dir.join(&dir_name);

        if tmp_dir.exists() {
            fs::remove_dir_all(&tmp_dir)?;
        }
        fs::create_dir_all(&tmp_dir)?;

        learner.save_weights_to_dir(&tmp_dir)?;
        fs::write(tmp_dir.join(TRAINING_STATE_FILE), learner.training_state_json()?)?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let metadata = learner.build_checkpoint_metadata(metrics, episode, timestamp);
        fs::write(
            tmp_dir.join(METADATA_FILE),
            serde_json::to_string_pretty(&metadata)?,
        )?;

        if final_dir.exists() {
            fs::remove_dir_all(&final_dir)?;
        }
        fs::rename(&tmp_dir, &final_dir)?;

        self.update_latest_symlink(&dir_name)?;
        self.prune_old_checkpoints()?;

        Ok(final_dir)
    }

    /// Read a checkpoint directory's metadata and training state.
    pub fn load_checkpoint(&self, dir: &Path) -> Result<CheckpointData, CheckpointError> {
        let metadata = read_metadata(&dir.join(METADATA_FILE))?;

        let ts_path = dir.join(TRAINING_STATE_FILE);
        let training_state_json =
            fs::read_to_string(&ts_path).map_err(|e| CheckpointError::MalformedCheckpoint {
                path: ts_path,
                reason: e.to_string(),
            })?;

        Ok(CheckpointData {
            path: dir.to_path_buf(),
            metadata,
            training_state_json,
        })
    }

    /// Read the checkpoint the `latest` link points at.
    pub fn load_latest(&self) -> Result<CheckpointData, CheckpointError> {
        let latest_link = self.config.checkpoint_dir.join(LATEST_LINK);
        let resolved =
            fs::read_link(&latest_link).map_err(|e| CheckpointError::ApproximatorUnavailable {
                path: latest_link.clone(),
                reason: e.to_string(),
            })?;
        let target = if resolved.is_relative() {
            self.config.checkpoint_dir.join(resolved)
        } else {
            resolved
        };
        if !target.is_dir() {
            return Err(CheckpointError::ApproximatorUnavailable {
                path: target,
                reason: "latest checkpoint directory is missing".into(),
            });
        }
        self.load_checkpoint(&target)
    }

    /// Restore `learner` from the latest checkpoint. On failure the learner
    /// is left as it was.
    pub fn restore_latest<L: Learner + ?Sized>(
        &self,
        learner: &mut L,
    ) -> Result<CheckpointMetadata, CheckpointError> {
        let data = self.load_latest()?;
        let previous = learner.training_state_json()?;

        learner
            .restore_training_state_json(&data.training_state_json)
            .map_err(|e| match e {
                CheckpointError::MalformedCheckpoint { reason, .. } => {
                    CheckpointError::MalformedCheckpoint {
                        path: data.path.join(TRAINING_STATE_FILE),
                        reason,
                    }
                }
                other => other,
            })?;

        if let Err(e) = learner.load_weights_from_dir(&data.path) {
            learner.restore_training_state_json(&previous)?;
            return Err(e);
        }

        Ok(data.metadata)
    }

    /// Like [`restore_latest`](Self::restore_latest), but a missing or
    /// damaged checkpoint means starting fresh rather than failing.
    pub fn restore_or_fresh<L: Learner + ?Sized>(
        &self,
        learner: &mut L,
    ) -> Result<Option<CheckpointMetadata>, CheckpointError> {
        match self.restore_latest(learner) {
            Ok(metadata) => {
                log::info!(
                    "resumed from {} at episode {}",
                    self.config.checkpoint_dir.display(),
                    metadata.episode
                );
                Ok(Some(metadata))
            }
            Err(e) if e.is_recoverable() => {
                log::warn!("no usable checkpoint ({e}), starting fresh");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// List all checkpoints sorted by episode (ascending). Directories whose
    /// metadata cannot be read are skipped.
    pub fn list_checkpoints(&self) -> Result<Vec<(PathBuf, CheckpointMetadata)>, CheckpointError> {
        let mut results = Vec::new();
        if !self.config.checkpoint_dir.is_dir() {
            return Ok(results);
        }
        for entry in fs::read_dir(&self.config.checkpoint_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() || path.is_symlink() {
                continue;
            }
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if !name_str.starts_with("checkpoint_") || name_str.ends_with(".tmp") {
                continue;
            }
            match read_metadata(&path.join(METADATA_FILE)) {
                Ok(metadata) => results.push((path, metadata)),
                Err(e) => log::warn!("ignoring checkpoint {}: {e}", path.display()),
            }
        }
        results.sort_by_key(|(_, m)| m.episode);
        Ok(results)
    }

    /// Prune old checkpoints, keeping the union of the last N and best N by win_rate.
    fn prune_old_checkpoints(&self) -> Result<(), CheckpointError> {
        let checkpoints = self.list_checkpoints()?;
        if checkpoints.len() <= self.config.keep_last_n {
            return Ok(());
        }

        let total = checkpoints.len();
        let mut keep: HashSet<usize> =
            (total.saturating_sub(self.config.keep_last_n)..total).collect();

        let mut by_win_rate: Vec<(usize, f32)> = checkpoints
            .iter()
            .enumerate()
            .map(|(i, (_, m))| (i, m.metrics.win_rate))
            .collect();
        by_win_rate.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        keep.extend(by_win_rate.iter().take(self.config.keep_best_n).map(|(i, _)| *i));

        for (i, (path, _)) in checkpoints.iter().enumerate() {
            if !keep.contains(&i) {
                fs::remove_dir_all(path)?;
            }
        }

        Ok(())
    }

    fn update_latest_symlink(&self, dir_name: &str) -> Result<(), CheckpointError> {
        let link_path = self.config.checkpoint_dir.join(LATEST_LINK);
        if link_path.symlink_metadata().is_ok() {
            fs::remove_file(&link_path)?;
        }
        std::os::unix::fs::symlink(dir_name, &link_path)?;
        Ok(())
    }
}

fn read_metadata(path: &Path) -> Result<CheckpointMetadata, CheckpointError> {
    let json = fs::read_to_string(path).map_err(|e| CheckpointError::MalformedCheckpoint {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&json).map_err(|e| CheckpointError::MalformedCheckpoint {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
