// ============================================================
// Layer 5 — Optional Reference Initialisation
// ============================================================
// With `reference_init` disabled every layer keeps Burn's own
// initializer. When enabled:
//
//   Conv2d  → Kaiming-normal weights (fan-out, ReLU gain √2), zero bias
//   Linear  → Xavier-normal weights (gain 1), zero bias
//
// BatchNorm and LayerNorm already start at weight 1 / bias 0.
//
// Burn hands the configured initializer to the bias as well,
// so the bias is zeroed after `init`.

use burn::{
    module::Param,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        Initializer, Linear, LinearConfig,
    },
    prelude::*,
};

pub fn kaiming_fan_out() -> Initializer {
    Initializer::KaimingNormal {
        gain:         std::f64::consts::SQRT_2,
        fan_out_only: true,
    }
}

pub fn xavier_normal() -> Initializer {
    Initializer::XavierNormal { gain: 1.0 }
}

/// Build a convolution, applying the reference scheme when `reference` is set.
pub fn conv2d<B: Backend>(config: Conv2dConfig, reference: bool, device: &B::Device) -> Conv2d<B> {
    if !reference {
        return config.init(device);
    }
    let mut conv = config.with_initializer(kaiming_fan_out()).init(device);
    conv.bias = zeroed(conv.bias);
    conv
}

/// Build a linear layer, applying the reference scheme when `reference` is set.
pub fn linear<B: Backend>(config: LinearConfig, reference: bool, device: &B::Device) -> Linear<B> {
    if !reference {
        return config.init(device);
    }
    let mut linear = config.with_initializer(xavier_normal()).init(device);
    linear.bias = zeroed(linear.bias);
    linear
}

fn zeroed<B: Backend>(bias: Option<Param<Tensor<B, 1>>>) -> Option<Param<Tensor<B, 1>>> {
    bias.map(|b| b.map(|t| t.zeros_like()))
}
