// ============================================================
// Layer 5 — Activations
// ============================================================
// Exponential linear unit, used after the spatial projection
// and after the fusion encoder:
//
//   elu(x) = x                  for x > 0
//          = alpha * (e^x - 1)  for x <= 0
//
// Written as two clamps so that only one exp is evaluated
// and no boolean mask is needed:
//   max(x, 0) + alpha * (exp(min(x, 0)) - 1)

use burn::prelude::*;

/// ELU with the usual alpha = 1.0
pub fn elu<B: Backend, const D: usize>(x: Tensor<B, D>) -> Tensor<B, D> {
    elu_with_alpha(x, 1.0)
}

pub fn elu_with_alpha<B: Backend, const D: usize>(x: Tensor<B, D>, alpha: f64) -> Tensor<B, D> {
    let positive = x.clone().clamp_min(0.0);
    let negative = x.clamp_max(0.0).exp().sub_scalar(1.0).mul_scalar(alpha);
    positive + negative
}
