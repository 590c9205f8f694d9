// ============================================================
// Layer 2 — InitUseCase
// ============================================================
// Orchestrates creating a fresh checkpoint:
//
//   Step 1: Validate config + build model  (Layer 5 - ml)
//   Step 2: Save config JSON               (Layer 6 - infra)
//   Step 3: Save initial weights           (Layer 6 - infra)
//
// The resulting directory is what `predict --checkpoint-dir`
// (or any external trainer) reads back.

use anyhow::Result;
use burn::{backend::NdArray, module::Module};

use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::NeuroTransNetConfig;

type InitBackend = NdArray<f32>;

pub struct InitUseCase {
    config:         NeuroTransNetConfig,
    checkpoint_dir: String,
}

impl InitUseCase {
    pub fn new(config: NeuroTransNetConfig, checkpoint_dir: impl Into<String>) -> Self {
        Self { config, checkpoint_dir: checkpoint_dir.into() }
    }

    /// Returns the number of parameters written.
    pub fn execute(&self) -> Result<usize> {
        // ── Step 1: Build model (fails fast on invalid config) ────────────────
        let device = Default::default();
        let model  = self.config.init::<InitBackend>(&device)?;
        tracing::info!("Model ready: {} parameters", model.num_params());

        // ── Step 2 + 3: Persist ───────────────────────────────────────────────
        let ckpt = CheckpointManager::new(&self.checkpoint_dir);
        ckpt.save_config(&self.config)?;
        ckpt.save_weights(&model)?;
        tracing::info!("Checkpoint written to '{}'", self.checkpoint_dir);

        Ok(model.num_params())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_checkpoint() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("ckpt").to_string_lossy().to_string();
        let cfg = NeuroTransNetConfig::new()
            .with_num_channels(2)
            .with_num_samples(40)
            .with_embed_dim(4)
            .with_num_heads(1)
            .with_pool_size(10)
            .with_pool_stride(10)
            .with_depth(1)
            .with_fusion_channels(2);

        let written = InitUseCase::new(cfg, dir.clone()).execute().unwrap();
        assert!(written > 0);

        let ckpt = CheckpointManager::new(&dir);
        assert!(ckpt.has_weights());
        let (loaded, model) = ckpt.load_model::<InitBackend>(&Default::default()).unwrap();
        assert_eq!(loaded.num_samples, 40);
        assert_eq!(model.num_params(), written);
    }

    #[test]
    fn test_invalid_config_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("ckpt").to_string_lossy().to_string();
        let cfg = NeuroTransNetConfig::new().with_num_heads(5);

        assert!(InitUseCase::new(cfg, dir.clone()).execute().is_err());
        assert!(!std::path::Path::new(&dir).exists());
    }
}
