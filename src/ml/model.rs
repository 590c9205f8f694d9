use anyhow::{ensure, Context, Result};
use burn::{
    nn::{pool::AvgPool1d, Dropout, DropoutConfig},
    prelude::*,
};

use crate::domain::geometry::{NetworkDims, PoolGeometry};
use crate::ml::{
    block::{TransformerBlock, TransformerBlockConfig},
    head::{FusionHead, FusionHeadConfig},
    pooling::{mean_pooling, VariancePooling},
    temporal::{
        MultiScaleTemporal, MultiScaleTemporalConfig, SpatialProjection, SpatialProjectionConfig,
        TEMPORAL_KERNELS,
    },
};

/// Dropout applied to both pooled sequences before the transformer stack
pub const SEQUENCE_DROPOUT: f64 = 0.5;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct NeuroTransNetConfig {
    #[config(default = 4)]
    pub num_classes:     usize,
    #[config(default = 1000)]
    pub num_samples:     usize,
    #[config(default = 22)]
    pub num_channels:    usize,
    #[config(default = 32)]
    pub embed_dim:       usize,
    #[config(default = 50)]
    pub pool_size:       usize,
    #[config(default = 15)]
    pub pool_stride:     usize,
    #[config(default = 8)]
    pub num_heads:       usize,
    #[config(default = 4)]
    pub fc_ratio:        usize,
    #[config(default = 4)]
    pub depth:           usize,
    #[config(default = 0.5)]
    pub attn_drop:       f64,
    #[config(default = 0.5)]
    pub fc_drop:         f64,
    /// Output channels of the fusion encoder
    #[config(default = 64)]
    pub fusion_channels: usize,
    /// Kaiming (fan-out) convolutions, Xavier linears and zero biases
    /// instead of Burn's defaults
    #[config(default = false)]
    pub reference_init:  bool,
}

impl NeuroTransNetConfig {
    /// Reject every configuration that could only fail later inside a tensor op.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.embed_dim > 0, "embed_dim must be positive");
        ensure!(
            self.embed_dim % TEMPORAL_KERNELS.len() == 0,
            "embed_dim ({}) must be divisible by {} (one share per temporal kernel)",
            self.embed_dim,
            TEMPORAL_KERNELS.len(),
        );
        ensure!(self.num_heads > 0, "num_heads must be positive");
        ensure!(
            self.embed_dim % self.num_heads == 0,
            "num_heads ({}) must divide embed_dim ({})",
            self.num_heads,
            self.embed_dim,
        );
        ensure!(self.num_channels > 0, "num_channels must be positive");
        ensure!(self.num_samples > 0, "num_samples must be positive");
        ensure!(self.num_classes > 0, "num_classes must be positive");
        ensure!(self.fc_ratio > 0, "fc_ratio must be positive");
        ensure!(self.fusion_channels > 0, "fusion_channels must be positive");
        ensure!(
            self.pool_size >= 2,
            "pool_size must be at least 2 (unbiased variance of a single sample is undefined), got {}",
            self.pool_size,
        );
        ensure!(self.pool_stride > 0, "pool_stride must be positive");
        ensure!(
            self.pool_size <= self.num_samples,
            "pool_size ({}) exceeds num_samples ({}): no pooling window fits",
            self.pool_size,
            self.num_samples,
        );
        for (name, rate) in [("attn_drop", self.attn_drop), ("fc_drop", self.fc_drop)] {
            ensure!(
                (0.0..1.0).contains(&rate),
                "{name} must be in [0, 1), got {rate}"
            );
        }
        Ok(())
    }

    pub fn pool_geometry(&self) -> PoolGeometry {
        PoolGeometry::new(self.pool_size, self.pool_stride)
    }

    pub fn dims(&self) -> NetworkDims {
        NetworkDims {
            num_channels:    self.num_channels,
            num_samples:     self.num_samples,
            embed_dim:       self.embed_dim,
            num_classes:     self.num_classes,
            fusion_channels: self.fusion_channels,
            pool:            self.pool_geometry(),
        }
    }

    /// Number of pooled windows, i.e. the transformer sequence length
    pub fn temporal_embedding_dim(&self) -> Result<usize> {
        self.pool_geometry()
            .output_len(self.num_samples)
            .with_context(|| {
                format!(
                    "pool window {} with stride {} does not fit {} samples",
                    self.pool_size, self.pool_stride, self.num_samples
                )
            })
    }

    /// Validate, then build every layer on `device`.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<NeuroTransNet<B>> {
        self.validate()?;
        let seq_len = self.temporal_embedding_dim()?;

        let temporal = MultiScaleTemporalConfig::new(self.embed_dim)
            .with_reference_init(self.reference_init)
            .init(device);
        let spatial = SpatialProjectionConfig::new(self.embed_dim, self.num_channels)
            .with_reference_init(self.reference_init)
            .init(device);

        let block_cfg = TransformerBlockConfig::new(self.embed_dim, self.num_heads, self.fc_ratio)
            .with_attn_drop(self.attn_drop)
            .with_fc_drop(self.fc_drop)
            .with_reference_init(self.reference_init);
        let blocks: Vec<TransformerBlock<B>> = (0..self.depth)
            .map(|_| block_cfg.init(device))
            .collect();

        let head = FusionHeadConfig::new(seq_len, self.embed_dim, self.fusion_channels, self.num_classes)
            .with_reference_init(self.reference_init)
            .init(device);

        tracing::debug!(
            "Built NeuroTransNet: {} blocks, embed_dim={}, seq_len={}, fusion_channels={}",
            self.depth, self.embed_dim, seq_len, self.fusion_channels,
        );

        Ok(NeuroTransNet {
            temporal,
            spatial,
            mean_pool:     mean_pooling(self.pool_geometry()),
            variance_pool: VariancePooling::new(self.pool_size, self.pool_stride),
            dropout:       DropoutConfig::new(SEQUENCE_DROPOUT).init(),
            blocks,
            head,
            num_channels:  self.num_channels,
            num_samples:   self.num_samples,
        })
    }
}

#[derive(Module, Debug)]
pub struct NeuroTransNet<B: Backend> {
    pub temporal:      MultiScaleTemporal<B>,
    pub spatial:       SpatialProjection<B>,
    pub mean_pool:     AvgPool1d,
    pub variance_pool: VariancePooling,
    pub dropout:       Dropout,
    /// One stack, applied to both pooled paths (tied weights)
    pub blocks:        Vec<TransformerBlock<B>>,
    pub head:          FusionHead<B>,
    pub num_channels:  usize,
    pub num_samples:   usize,
}

impl<B: Backend> NeuroTransNet<B> {
    /// signals: [batch, num_channels, num_samples] → logits: [batch, num_classes]
    pub fn forward(&self, signals: Tensor<B, 3>) -> Tensor<B, 2> {
        let (mean_path, variance_path) = self.encode(signals);
        self.head.forward(mean_path, variance_path)
    }

    /// Front end, dual pooling and the shared transformer stack.
    /// Returns the attended (mean, variance) sequences, each [batch, n, embed_dim].
    pub fn encode(&self, signals: Tensor<B, 3>) -> (Tensor<B, 3>, Tensor<B, 3>) {
        let [batch, channels, samples] = signals.dims();

        let x = signals.reshape([batch, 1, channels, samples]);
        let x = self.temporal.forward(x);
        let x = self.spatial.forward(x); // [batch, embed_dim, samples]

        // "b d n -> b n d"
        let mut mean_path = self
            .dropout
            .forward(self.mean_pool.forward(x.clone()))
            .swap_dims(1, 2);
        let mut variance_path = self
            .dropout
            .forward(self.variance_pool.forward(x))
            .swap_dims(1, 2);

        for block in &self.blocks {
            mean_path     = block.forward(mean_path);
            variance_path = block.forward(variance_path);
        }

        (mean_path, variance_path)
    }

    /// Expected `[channels, samples]` of every trial
    pub fn input_shape(&self) -> [usize; 2] {
        [self.num_channels, self.num_samples]
    }
}
