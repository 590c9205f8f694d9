// ============================================================
// Layer 5 — Pre-Norm Transformer Block
// ============================================================
// Each block is:
//
//   x = x + Attention(LayerNorm₁(x))
//   x = x + FeedForward(LayerNorm₂(x))
//
// Normalisation happens *before* each sub-layer and the skip
// connection adds the un-normalised input back. The feed-forward
// sub-layer is position-wise:
//
//   Linear(d → d·ratio) → GELU → Dropout → Linear(d·ratio → d) → Dropout
//
// Reference: Burn Book §3 (Building Blocks)
//            Xiong et al. (2020) On Layer Normalization in the
//            Transformer Architecture

use burn::{
    nn::{Dropout, DropoutConfig, Gelu, LayerNorm, LayerNormConfig, Linear, LinearConfig},
    prelude::*,
};

use crate::ml::{
    attention::{MultiHeadSelfAttention, MultiHeadSelfAttentionConfig},
    initializer,
};

// ─── Feed-forward ─────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct FeedForwardConfig {
    pub d_model:  usize,
    pub d_hidden: usize,
    #[config(default = 0.5)]
    pub dropout:  f64,
    #[config(default = false)]
    pub reference_init: bool,
}

impl FeedForwardConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> FeedForward<B> {
        FeedForward {
            w_1:        initializer::linear::<B>(
                LinearConfig::new(self.d_model, self.d_hidden),
                self.reference_init,
                device,
            ),
            w_2:        initializer::linear::<B>(
                LinearConfig::new(self.d_hidden, self.d_model),
                self.reference_init,
                device,
            ),
            activation: Gelu::new(),
            dropout:    DropoutConfig::new(self.dropout).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct FeedForward<B: Backend> {
    pub w_1:        Linear<B>,
    pub w_2:        Linear<B>,
    pub activation: Gelu,
    pub dropout:    Dropout,
}

impl<B: Backend> FeedForward<B> {
    pub fn forward<const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, D> {
        let x = self.activation.forward(self.w_1.forward(x));
        let x = self.dropout.forward(x);
        let x = self.w_2.forward(x);
        self.dropout.forward(x)
    }
}

// ─── Transformer block ────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct TransformerBlockConfig {
    pub embed_dim: usize,
    pub num_heads: usize,
    pub fc_ratio:  usize,
    #[config(default = 0.5)]
    pub attn_drop: f64,
    #[config(default = 0.5)]
    pub fc_drop:   f64,
    #[config(default = false)]
    pub reference_init: bool,
}

impl TransformerBlockConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TransformerBlock<B> {
        TransformerBlock {
            attention: MultiHeadSelfAttentionConfig::new(self.embed_dim, self.num_heads)
                .with_dropout(self.attn_drop)
                .with_reference_init(self.reference_init)
                .init(device),
            feed_forward: FeedForwardConfig::new(self.embed_dim, self.embed_dim * self.fc_ratio)
                .with_dropout(self.fc_drop)
                .with_reference_init(self.reference_init)
                .init(device),
            norm1: LayerNormConfig::new(self.embed_dim).init(device),
            norm2: LayerNormConfig::new(self.embed_dim).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct TransformerBlock<B: Backend> {
    pub attention:    MultiHeadSelfAttention<B>,
    pub feed_forward: FeedForward<B>,
    pub norm1:        LayerNorm<B>,
    pub norm2:        LayerNorm<B>,
}

impl<B: Backend> TransformerBlock<B> {
    /// x: [batch, seq_len, embed_dim] → same shape
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let x = x.clone() + self.attention.forward(self.norm1.forward(x));
        x.clone() + self.feed_forward.forward(self.norm2.forward(x))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_feed_forward_shape() {
        let device = Default::default();
        let ff = FeedForwardConfig::new(32, 128).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 3>::random([2, 10, 32], Distribution::Default, &device);
        assert_eq!(ff.forward(x).dims(), [2, 10, 32]);
    }

    #[test]
    fn test_feed_forward_is_position_wise() {
        let device = Default::default();
        let ff = FeedForwardConfig::new(8, 16)
            .with_dropout(0.0)
            .init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 3>::random([1, 5, 8], Distribution::Default, &device);

        let full = ff.forward(x.clone());
        // Running a single token alone must give the same row
        let token = x.slice([0..1, 2..3, 0..8]);
        let alone = ff.forward(token);
        let row   = full.slice([0..1, 2..3, 0..8]);

        let a: Vec<f32> = alone.into_data().to_vec::<f32>().unwrap();
        let b: Vec<f32> = row.into_data().to_vec::<f32>().unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_block_preserves_shape() {
        let device = Default::default();
        let block = TransformerBlockConfig::new(32, 8, 4).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 3>::random([2, 64, 32], Distribution::Default, &device);
        assert_eq!(block.forward(x).dims(), [2, 64, 32]);
    }

    #[test]
    fn test_block_is_residual_around_both_sublayers() {
        let device = Default::default();
        let block = TransformerBlockConfig::new(8, 2, 2)
            .with_attn_drop(0.0)
            .with_fc_drop(0.0)
            .init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 3>::random([1, 4, 8], Distribution::Default, &device);

        let expected = {
            let h = x.clone() + block.attention.forward(block.norm1.forward(x.clone()));
            h.clone() + block.feed_forward.forward(block.norm2.forward(h))
        };
        let got = block.forward(x);

        let a: Vec<f32> = got.into_data().to_vec::<f32>().unwrap();
        let b: Vec<f32> = expected.into_data().to_vec::<f32>().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reference_init_zeroes_every_linear_bias() {
        let device = Default::default();
        let block = TransformerBlockConfig::new(8, 2, 2)
            .with_reference_init(true)
            .init::<TestBackend>(&device);

        let linears = [
            &block.attention.w_q,
            &block.attention.w_k,
            &block.attention.w_v,
            &block.attention.w_o,
            &block.feed_forward.w_1,
            &block.feed_forward.w_2,
        ];
        for linear in linears {
            let bias: Vec<f32> = linear.bias.as_ref().unwrap().val().into_data().to_vec::<f32>().unwrap();
            assert!(bias.iter().all(|&b| b == 0.0), "{bias:?}");
        }
    }
}
