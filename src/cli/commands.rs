// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `summary`, `init`, `predict`
// and all their configurable flags.
//
// Every command shares the same model flags (ModelArgs), which
// mirror NeuroTransNetConfig one-to-one. `--config FILE` loads
// a saved JSON config instead and ignores the other flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use std::fs;

use crate::application::predict_use_case::{ComputeDevice, PredictConfig};
use crate::ml::model::NeuroTransNetConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the stage-by-stage shapes and parameter counts
    Summary(SummaryArgs),

    /// Write a config and freshly initialised weights to a checkpoint directory
    Init(InitArgs),

    /// Run a forward pass over a seeded synthetic batch
    Predict(PredictArgs),
}

/// Architecture hyperparameters, fixed at model-build time.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Load the architecture from a JSON config file (other model flags are ignored)
    #[arg(long)]
    pub config: Option<String>,

    /// Number of target classes
    #[arg(long, default_value_t = 4)]
    pub num_classes: usize,

    /// Time samples per trial
    #[arg(long, default_value_t = 1000)]
    pub num_samples: usize,

    /// EEG electrodes per trial
    #[arg(long, default_value_t = 22)]
    pub num_channels: usize,

    /// Feature width; must be divisible by 4 and by num_heads
    #[arg(long, default_value_t = 32)]
    pub embed_dim: usize,

    /// Pooling window (time samples)
    #[arg(long, default_value_t = 50)]
    pub pool_size: usize,

    /// Pooling stride (time samples)
    #[arg(long, default_value_t = 15)]
    pub pool_stride: usize,

    /// Attention heads per block
    #[arg(long, default_value_t = 8)]
    pub num_heads: usize,

    /// Feed-forward hidden width as a multiple of embed_dim
    #[arg(long, default_value_t = 4)]
    pub fc_ratio: usize,

    /// Number of transformer blocks
    #[arg(long, default_value_t = 4)]
    pub depth: usize,

    /// Dropout after the attention output projection
    #[arg(long, default_value_t = 0.5)]
    pub attn_drop: f64,

    /// Dropout inside the feed-forward network
    #[arg(long, default_value_t = 0.5)]
    pub fc_drop: f64,

    /// Output channels of the fusion encoder
    #[arg(long, default_value_t = 64)]
    pub fusion_channels: usize,

    /// Kaiming (fan-out) convolutions, Xavier linear layers and zero biases
    #[arg(long)]
    pub reference_init: bool,
}

impl From<&ModelArgs> for NeuroTransNetConfig {
    fn from(a: &ModelArgs) -> Self {
        NeuroTransNetConfig::new()
            .with_num_classes(a.num_classes)
            .with_num_samples(a.num_samples)
            .with_num_channels(a.num_channels)
            .with_embed_dim(a.embed_dim)
            .with_pool_size(a.pool_size)
            .with_pool_stride(a.pool_stride)
            .with_num_heads(a.num_heads)
            .with_fc_ratio(a.fc_ratio)
            .with_depth(a.depth)
            .with_attn_drop(a.attn_drop)
            .with_fc_drop(a.fc_drop)
            .with_fusion_channels(a.fusion_channels)
            .with_reference_init(a.reference_init)
    }
}

impl ModelArgs {
    /// The config file if one was given, otherwise the flags.
    pub fn resolve(&self) -> Result<NeuroTransNetConfig> {
        match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Cannot read config file '{path}'"))?;
                serde_json::from_str(&json)
                    .with_context(|| format!("Malformed config file '{path}'"))
            }
            None => Ok(self.into()),
        }
    }
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Batch size used for the shape trace
    #[arg(long, default_value_t = 1)]
    pub batch_size: usize,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write model_config.json and weights.mpk.gz into
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceArg {
    Cpu,
    Gpu,
}

impl From<DeviceArg> for ComputeDevice {
    fn from(d: DeviceArg) -> Self {
        match d {
            DeviceArg::Cpu => ComputeDevice::Cpu,
            DeviceArg::Gpu => ComputeDevice::Gpu,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Load config and weights from this directory (fresh weights when omitted)
    #[arg(long)]
    pub checkpoint_dir: Option<String>,

    /// Number of synthetic trials
    #[arg(long, default_value_t = 2)]
    pub batch_size: usize,

    /// Seed for the synthetic trials
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Backend to run on
    #[arg(long, value_enum, default_value_t = DeviceArg::Cpu)]
    pub device: DeviceArg,

    #[command(flatten)]
    pub model: ModelArgs,
}

impl PredictArgs {
    pub fn to_config(&self) -> Result<PredictConfig> {
        Ok(PredictConfig {
            model:          self.model.resolve()?,
            checkpoint_dir: self.checkpoint_dir.clone(),
            batch_size:     self.batch_size,
            seed:           self.seed,
            device:         self.device.into(),
        })
    }
}
