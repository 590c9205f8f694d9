// ============================================================
// Layer 5 — Fusion Encoder + Classifier Head
// ============================================================
// The two attended sequences (mean path, variance path), each
// [batch, n, E], are stacked as two "rows":
//
//   [b, n, E] → [b, n, 1, E] ─┐
//                             ├─► cat(dim 2) → [b, n, 2, E]
//   [b, n, E] → [b, n, 1, E] ─┘
//
// The n pooled windows act as input channels of a (2 × 1)
// convolution that mixes the two paths:
//
//   Conv2d(n → F, (2,1)) → BatchNorm → ELU → [b, F, 1, E]
//   flatten → [b, F·E] → Linear → [b, num_classes]
//
// F is the `fusion_channels` configuration value. Logits are
// returned raw; softmax/cross-entropy belongs to the caller.
//
// Reference: Burn Book §3 (Building Blocks)

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        BatchNorm, BatchNormConfig, Linear, LinearConfig,
    },
    prelude::*,
};

use crate::ml::{activation::elu, initializer};

#[derive(Config, Debug)]
pub struct FusionHeadConfig {
    /// Pooled sequence length (input channels of the fusion conv)
    pub seq_len:         usize,
    pub embed_dim:       usize,
    pub fusion_channels: usize,
    pub num_classes:     usize,
    #[config(default = false)]
    pub reference_init:  bool,
}

impl FusionHeadConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> FusionHead<B> {
        let conv       = Conv2dConfig::new([self.seq_len, self.fusion_channels], [2, 1]);
        let classifier = LinearConfig::new(self.fusion_channels * self.embed_dim, self.num_classes);

        FusionHead {
            conv:       initializer::conv2d::<B>(conv, self.reference_init, device),
            norm:       BatchNormConfig::new(self.fusion_channels).init(device),
            classifier: initializer::linear::<B>(classifier, self.reference_init, device),
        }
    }
}

#[derive(Module, Debug)]
pub struct FusionHead<B: Backend> {
    pub conv:       Conv2d<B>,
    pub norm:       BatchNorm<B>,
    pub classifier: Linear<B>,
}

impl<B: Backend> FusionHead<B> {
    /// mean_path, variance_path: [batch, n, embed_dim] → logits [batch, num_classes]
    pub fn forward(&self, mean_path: Tensor<B, 3>, variance_path: Tensor<B, 3>) -> Tensor<B, 2> {
        let x = self.encode(mean_path, variance_path);
        self.classifier.forward(x.flatten::<2>(1, 3))
    }

    /// Stacked, convolved and activated features before flattening:
    /// [batch, fusion_channels, 1, embed_dim]
    pub fn encode(&self, mean_path: Tensor<B, 3>, variance_path: Tensor<B, 3>) -> Tensor<B, 4> {
        let stacked = Tensor::cat(
            vec![mean_path.unsqueeze_dim::<4>(2), variance_path.unsqueeze_dim::<4>(2)],
            2,
        );
        elu(self.norm.forward(self.conv.forward(stacked)))
    }
}
