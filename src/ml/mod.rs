// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// The domain layer never imports burn; the application layer
// only talks to the config, the model and the predictor.
//
// What's in this layer:
//
//   activation.rs — ELU (exponential linear unit)
//
//   initializer.rs — Optional Kaiming / Xavier scheme with
//                    zeroed biases
//
//   temporal.rs   — Multi-scale temporal convolutions
//                   (kernels 15/25/51/65) and the spatial
//                   projection across electrodes
//
//   pooling.rs    — Dual-path pooling: Burn's AvgPool1d and
//                   the log-variance pooling operator
//
//   attention.rs  — Scaled dot-product attention and the
//                   multi-head self-attention module
//
//   block.rs      — Feed-forward network and the pre-norm
//                   transformer block
//
//   head.rs       — Fusion encoder over the two attended
//                   paths + linear classifier
//
//   model.rs      — NeuroTransNetConfig (validation, init)
//                   and the full NeuroTransNet forward pass
//
//   inferencer.rs — Predictor: shape checks, softmax, argmax
//
// Reference: Burn Book §3 (Building Blocks)
//            Vaswani et al. (2017) Attention Is All You Need

/// ELU activation
pub mod activation;

/// Reference weight initialisation
pub mod initializer;

/// Multi-scale temporal + spatial convolutional front end
pub mod temporal;

/// Mean and log-variance pooling
pub mod pooling;

/// Scaled dot-product and multi-head self-attention
pub mod attention;

/// Feed-forward network and pre-norm transformer block
pub mod block;

/// Fusion encoder and classifier head
pub mod head;

/// Full network and its configuration
pub mod model;

/// Evaluation-mode predictor
pub mod inferencer;
