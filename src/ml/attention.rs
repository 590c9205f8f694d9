// ============================================================
// Layer 5 — Multi-Head Self-Attention
// ============================================================
// Scaled dot-product attention (Vaswani et al., 2017):
//
//   Attention(Q, K, V) = softmax(Q·Kᵀ / √d) · V
//
// Burn ships its own MultiHeadAttention, but that one applies
// dropout to the attention weights. This network applies
// dropout to the *projected output* instead:
//
//   x ──► W_q ─┐
//   x ──► W_k ─┼─► split heads ─► attention ─► concat ─► W_o ─► dropout
//   x ──► W_v ─┘
//
// Only self-attention is exposed: query, key and value are
// always projections of the same tensor.
//
// Reference: Burn Book §3 (Building Blocks)
//            Vaswani et al. (2017) Attention Is All You Need

use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::softmax,
};

use crate::ml::initializer;

/// Scaled dot-product attention over tensors already split into heads.
///
/// `query`, `key`, `value`: `[batch, heads, seq_len, head_dim]`
///
/// Returns `(output, weights)` where `output` has the shape of `value`
/// and `weights` is `[batch, heads, seq_len, seq_len]`, softmax-normalised
/// over the key axis.
pub fn scaled_dot_product_attention<B: Backend>(
    query: Tensor<B, 4>,
    key:   Tensor<B, 4>,
    value: Tensor<B, 4>,
) -> (Tensor<B, 4>, Tensor<B, 4>) {
    let [_, _, _, head_dim] = query.dims();

    let scores  = query.matmul(key.transpose()).div_scalar((head_dim as f64).sqrt());
    let weights = softmax(scores, 3);
    let output  = weights.clone().matmul(value);

    (output, weights)
}

#[derive(Config, Debug)]
pub struct MultiHeadSelfAttentionConfig {
    pub d_model: usize,
    pub n_heads: usize,
    #[config(default = 0.5)]
    pub dropout: f64,
    #[config(default = false)]
    pub reference_init: bool,
}

impl MultiHeadSelfAttentionConfig {
    /// `d_model` must be divisible by `n_heads`; the model config checks
    /// this before any block is built.
    pub fn init<B: Backend>(&self, device: &B::Device) -> MultiHeadSelfAttention<B> {
        let head_dim = self.d_model / self.n_heads;
        let inner    = self.n_heads * head_dim;
        let project  = |d_in, d_out| {
            initializer::linear::<B>(LinearConfig::new(d_in, d_out), self.reference_init, device)
        };

        MultiHeadSelfAttention {
            w_q:      project(self.d_model, inner),
            w_k:      project(self.d_model, inner),
            w_v:      project(self.d_model, inner),
            w_o:      project(inner, self.d_model),
            dropout:  DropoutConfig::new(self.dropout).init(),
            n_heads:  self.n_heads,
            head_dim,
        }
    }
}

#[derive(Module, Debug)]
pub struct MultiHeadSelfAttention<B: Backend> {
    pub w_q:     Linear<B>,
    pub w_k:     Linear<B>,
    pub w_v:     Linear<B>,
    pub w_o:     Linear<B>,
    pub dropout: Dropout,
    pub n_heads:  usize,
    pub head_dim: usize,
}

impl<B: Backend> MultiHeadSelfAttention<B> {
    /// x: [batch, seq_len, d_model] → [batch, seq_len, d_model]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        self.forward_with_weights(x).0
    }

    /// Same as `forward`, also returning the `[batch, heads, seq_len, seq_len]`
    /// attention weights.
    pub fn forward_with_weights(&self, x: Tensor<B, 3>) -> (Tensor<B, 3>, Tensor<B, 4>) {
        let [batch, seq_len, _] = x.dims();

        let q = self.split_heads(self.w_q.forward(x.clone()));
        let k = self.split_heads(self.w_k.forward(x.clone()));
        let v = self.split_heads(self.w_v.forward(x));

        let (context, weights) = scaled_dot_product_attention(q, k, v);

        // "b h n d -> b n (h d)"
        let context = context
            .swap_dims(1, 2)
            .reshape([batch, seq_len, self.n_heads * self.head_dim]);

        (self.dropout.forward(self.w_o.forward(context)), weights)
    }

    /// "b n (h d) -> b h n d"
    fn split_heads(&self, x: Tensor<B, 3>) -> Tensor<B, 4> {
        let [batch, seq_len, _] = x.dims();
        x.reshape([batch, seq_len, self.n_heads, self.head_dim])
            .swap_dims(1, 2)
    }
}
