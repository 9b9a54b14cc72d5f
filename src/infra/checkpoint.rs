// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// File naming convention:
//   models/
//     weights-012-2_8411.mpk.gz  ← weights after epoch 12, loss 2.8411
//     weights-031-2_5102.mpk.gz  ← a later, better epoch
//     best.json                  ← pointer to the best checkpoint
//     train_config.json          ← hyperparameters of the run
//
// The loss-tagged filenames mean a long run that regresses near
// the end never clobbers an earlier, better checkpoint, and the
// best.json pointer means nobody has to hardcode a filename to
// load: generation always asks for "the best checkpoint of the
// most recent run".
//
// Whether an epoch deserves a checkpoint at all is the
// BestLossTracker's call: save if and only if the loss is
// strictly below every loss seen earlier in the run.
//
// Why save the config separately?
//   When loading for generation we need the exact architecture
//   (hidden size, window length, vocabulary size) to rebuild
//   the model before the weights can be loaded into it.
//
// Burn's CompactRecorder:
//   - Serialises model parameters to MessagePack, gzipped
//   - Type-safe: loading fails if the architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::ComposerError;
use crate::ml::model::ComposerModel;

// ─── Best-so-far policy ───────────────────────────────────────────────────────
/// Decides which epochs earn a checkpoint: only those whose loss is
/// strictly lower than every loss observed before in the run.
#[derive(Debug, Default)]
pub struct BestLossTracker {
    best: Option<f64>,
}

impl BestLossTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report one epoch's loss. Returns true when it is a new best
    /// (and remembers it), false otherwise.
    pub fn observe(&mut self, loss: f64) -> bool {
        match self.best {
            Some(best) if loss >= best => false,
            _ => {
                self.best = Some(loss);
                true
            }
        }
    }

    pub fn best(&self) -> Option<f64> {
        self.best
    }
}

// ─── Checkpoint pointer ───────────────────────────────────────────────────────
/// Contents of best.json: which checkpoint generation should load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestCheckpoint {
    pub epoch: usize,
    pub loss: f64,
    /// File stem of the weights (recorder adds the extension)
    pub file: String,
}

// ─── CheckpointManager ────────────────────────────────────────────────────────
/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Save model weights for an epoch and point best.json at them.
    /// The caller (the training loop) has already decided this epoch
    /// is the best so far.
    pub fn save_model<B: AutodiffBackend>(
        &self,
        model: &ComposerModel<B>,
        epoch: usize,
        loss: f64,
    ) -> Result<()> {
        // The recorder appends its own extension after the last dot,
        // so the loss tag must not contain one.
        let stem = format!("weights-{epoch:03}-{}", format!("{loss:.4}").replace('.', "_"));
        let path = self.dir.join(&stem);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("failed to save checkpoint '{}'", path.display()))?;

        let pointer = BestCheckpoint { epoch, loss, file: stem };
        let best_path = self.dir.join("best.json");
        fs::write(&best_path, serde_json::to_string_pretty(&pointer)?)
            .with_context(|| "failed to write best.json")?;

        tracing::debug!("Saved checkpoint: epoch {} (loss {:.4})", epoch, loss);
        Ok(())
    }

    /// Load the weights of the best checkpoint into the given model.
    /// The model must already have the architecture the checkpoint
    /// was trained with; the recorder rejects mismatched shapes.
    pub fn load_model<B: Backend>(
        &self,
        model: ComposerModel<B>,
        device: &B::Device,
    ) -> Result<ComposerModel<B>> {
        let best = self.best_checkpoint()?;
        let path = self.dir.join(&best.file);

        tracing::info!(
            "Loading checkpoint from epoch {} (loss {:.4})",
            best.epoch,
            best.loss
        );

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("cannot load checkpoint '{}'", path.display()))?;

        Ok(model.load_record(record))
    }

    /// Read best.json. Fails with ModelNotTrained if no training run
    /// has saved a checkpoint here yet.
    pub fn best_checkpoint(&self) -> Result<BestCheckpoint> {
        let path = self.dir.join("best.json");
        if !path.exists() {
            return Err(ComposerError::ModelNotTrained(self.dir.display().to_string()).into());
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("cannot read '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save the training configuration so generation can rebuild the
    /// exact architecture. Called before the first epoch runs.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("cannot write config to '{}'", path.display()))?;
        Ok(())
    }

    /// Load the training configuration of the most recent run.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");
        if !path.exists() {
            return Err(ComposerError::ModelNotTrained(self.dir.display().to_string()).into());
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("cannot read config from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}
