// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Persists everything needed to rebuild a model outside this
// process (e.g. for an external training harness to pick up):
//
//   1. model_config.json — NeuroTransNetConfig as pretty JSON
//   2. weights.mpk.gz    — every learned parameter and the
//                          BatchNorm running statistics
//
// The config is always needed first: the weights can only be
// loaded into a model whose architecture matches exactly.
//
// Weights use Burn's NamedMpkGzFileRecorder at full precision
// (MessagePack + gzip), so a saved model reloads bit-for-bit.
//
// File layout:
//   checkpoints/
//     model_config.json
//     weights.mpk.gz
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

use crate::ml::model::{NeuroTransNet, NeuroTransNetConfig};

const CONFIG_FILE:  &str = "model_config.json";
const WEIGHTS_STEM: &str = "weights";

type WeightRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

/// Manages saving and loading of the model configuration and weights.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Write the configuration as pretty JSON, creating the directory if needed.
    pub fn save_config(&self, cfg: &NeuroTransNetConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved model config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<NeuroTransNetConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. Run 'init' first.",
                    path.display()
                )
            })?;
        let cfg: NeuroTransNetConfig = serde_json::from_str(&json)
            .with_context(|| format!("Malformed config in '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Record all parameters of `model` into `weights.mpk.gz`.
    pub fn save_weights<B: Backend>(&self, model: &NeuroTransNet<B>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.dir.join(WEIGHTS_STEM);
        WeightRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save weights to '{}'", path.display()))?;

        tracing::debug!("Saved weights: {} parameters", model.num_params());
        Ok(())
    }

    /// Load the recorded parameters into `model`, which must have been built
    /// from the saved configuration.
    pub fn load_weights<B: Backend>(
        &self,
        model:  NeuroTransNet<B>,
        device: &B::Device,
    ) -> Result<NeuroTransNet<B>> {
        let path = self.dir.join(WEIGHTS_STEM);
        let record = WeightRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load weights from '{}'", path.display())
            })?;
        Ok(model.load_record(record))
    }

    pub fn has_weights(&self) -> bool {
        self.dir.join(format!("{WEIGHTS_STEM}.mpk.gz")).exists()
    }

    /// Rebuild the saved architecture and restore its weights.
    pub fn load_model<B: Backend>(&self, device: &B::Device) -> Result<(NeuroTransNetConfig, NeuroTransNet<B>)> {
        let cfg   = self.load_config()?;
        let model = cfg.init::<B>(device)?;
        let model = self.load_weights(model, device)?;
        tracing::info!("Loaded model from '{}'", self.dir.display());
        Ok((cfg, model))
    }
}
