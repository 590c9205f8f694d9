// ============================================================
// Layer 5 — Multi-Scale Temporal + Spatial Front End
// ============================================================
// The raw trial [batch, channels, samples] is treated as a
// single-channel image [batch, 1, channels, samples].
//
// Temporal stage — four parallel (1 × k) convolutions, one per
// receptive field, each producing embed_dim/4 feature maps:
//
//   k = 15 ─┐
//   k = 25 ─┼─► concat (channel axis) ─► BatchNorm ─► [b, E, C, T]
//   k = 51 ─┤
//   k = 65 ─┘
//
// Padding k/2 keeps T unchanged for every (odd) kernel width.
//
// Spatial stage — one (C × 1) convolution mixes all electrodes
// per time step and feature, collapsing the electrode axis:
//
//   [b, E, C, T] ─► Conv2d(E→E, (C,1)) ─► BatchNorm ─► ELU ─► [b, E, T]
//
// Reference: Burn Book §3 (Building Blocks — Conv2d, BatchNorm)
//            Szegedy et al. (2015) Going Deeper with Convolutions

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig2d,
    },
    prelude::*,
};

use crate::ml::{activation::elu, initializer};

/// Temporal kernel widths, shortest to longest
pub const TEMPORAL_KERNELS: [usize; 4] = [15, 25, 51, 65];

// ─── Multi-scale temporal convolution ────────────────────────────────────────

#[derive(Config, Debug)]
pub struct MultiScaleTemporalConfig {
    pub embed_dim: usize,
    #[config(default = false)]
    pub reference_init: bool,
}

impl MultiScaleTemporalConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> MultiScaleTemporal<B> {
        let branch_channels = self.embed_dim / TEMPORAL_KERNELS.len();

        let branches = TEMPORAL_KERNELS
            .iter()
            .map(|&k| {
                let conv = Conv2dConfig::new([1, branch_channels], [1, k])
                    .with_padding(PaddingConfig2d::Explicit(0, k / 2));
                initializer::conv2d::<B>(conv, self.reference_init, device)
            })
            .collect();

        MultiScaleTemporal {
            branches,
            norm: BatchNormConfig::new(self.embed_dim).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct MultiScaleTemporal<B: Backend> {
    pub branches: Vec<Conv2d<B>>,
    pub norm:     BatchNorm<B>,
}

impl<B: Backend> MultiScaleTemporal<B> {
    /// x: [batch, 1, channels, samples] → [batch, embed_dim, channels, samples]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let maps: Vec<Tensor<B, 4>> = self
            .branches
            .iter()
            .map(|conv| conv.forward(x.clone()))
            .collect();
        self.norm.forward(Tensor::cat(maps, 1))
    }
}

// ─── Spatial projection ───────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct SpatialProjectionConfig {
    pub embed_dim:    usize,
    pub num_channels: usize,
    #[config(default = false)]
    pub reference_init: bool,
}

impl SpatialProjectionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SpatialProjection<B> {
        let conv = Conv2dConfig::new([self.embed_dim, self.embed_dim], [self.num_channels, 1]);

        SpatialProjection {
            conv: initializer::conv2d::<B>(conv, self.reference_init, device),
            norm: BatchNormConfig::new(self.embed_dim).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct SpatialProjection<B: Backend> {
    pub conv: Conv2d<B>,
    pub norm: BatchNorm<B>,
}

impl<B: Backend> SpatialProjection<B> {
    /// x: [batch, embed_dim, channels, samples] → [batch, embed_dim, samples]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 3> {
        let x = self.conv.forward(x);      // [b, E, 1, T]
        let x = elu(self.norm.forward(x));
        let [batch, features, _, time] = x.dims();
        x.reshape([batch, features, time])
    }
}
