// ============================================================
// Layer 5 — Dual-Path Pooling
// ============================================================
// The spatially-collapsed feature map [batch, embed_dim, T] is
// summarised along time in two parallel ways:
//
//   mean path      AvgPool1d(window, stride)          (Burn)
//   variance path  log(clamp(var(window), 1e-6, 1e6)) (below)
//
// Log-variance of a band-limited EEG segment approximates its
// log band power, so the variance path carries spectral-energy
// information while the mean path carries the waveform trend.
//
// Both paths use the same PoolGeometry, so they produce the
// same number of windows and can be stacked later on.
//
// Reference: Burn Book §3 (Building Blocks — Pooling)

use burn::{
    nn::pool::{AvgPool1d, AvgPool1dConfig},
    prelude::*,
};

use crate::domain::geometry::PoolGeometry;

/// Lower clamp applied before the log (log(0) guard)
pub const VARIANCE_FLOOR: f64 = 1e-6;

/// Upper clamp applied before the log (overflow guard)
pub const VARIANCE_CEIL: f64 = 1e6;

/// Log-variance pooling over the last (time) axis.
///
/// Input `[batch, features, T]` → output `[batch, features, windows]`.
/// Variance is the unbiased sample variance of each window.
#[derive(Module, Clone, Debug)]
pub struct VariancePooling {
    kernel_size: usize,
    stride:      usize,
}

impl VariancePooling {
    pub fn new(kernel_size: usize, stride: usize) -> Self {
        Self { kernel_size, stride }
    }

    pub fn geometry(&self) -> PoolGeometry {
        PoolGeometry::new(self.kernel_size, self.stride)
    }

    pub fn forward<B: Backend>(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch, features, time] = x.dims();
        let geometry = self.geometry();

        // A signal shorter than one window is rejected when the model
        // configuration is validated; reaching here means a caller bypassed it.
        let windows = match geometry.output_len(time) {
            Some(n) => n,
            None => panic!(
                "variance pooling needs at least {} time steps, got {}",
                self.kernel_size, time
            ),
        };

        let pooled: Vec<Tensor<B, 3>> = (0..windows)
            .map(|i| {
                let start = geometry.window_start(i);
                x.clone()
                    .slice([0..batch, 0..features, start..start + self.kernel_size])
                    .var(2)                                   // [batch, features, 1]
                    .clamp(VARIANCE_FLOOR, VARIANCE_CEIL)
                    .log()
            })
            .collect();

        Tensor::cat(pooled, 2)
    }
}

/// Burn's average pooling configured with the same geometry as `VariancePooling`
pub fn mean_pooling(geometry: PoolGeometry) -> AvgPool1d {
    AvgPool1dConfig::new(geometry.window)
        .with_stride(geometry.stride)
        .init()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::TensorData;

    type TestBackend = NdArray<f32>;

    fn ramp(batch: usize, features: usize, time: usize) -> Tensor<TestBackend, 3> {
        let values: Vec<f32> = (0..batch * features * time)
            .map(|i| ((i % 17) as f32 * 0.37).sin() * 3.0)
            .collect();
        Tensor::from_data(TensorData::new(values, [batch, features, time]), &Default::default())
    }

    #[test]
    fn test_output_length_matches_mean_pooling() {
        for &(time, window, stride) in &[(1000, 50, 15), (100, 10, 3), (64, 64, 1), (37, 5, 7)] {
            let x = ramp(2, 3, time);
            let geometry = PoolGeometry::new(window, stride);

            let var_out  = VariancePooling::new(window, stride).forward(x.clone());
            let mean_out = mean_pooling(geometry).forward(x);

            let expected = (time - window) / stride + 1;
            assert_eq!(var_out.dims(),  [2, 3, expected]);
            assert_eq!(mean_out.dims(), [2, 3, expected]);
        }
    }

    #[test]
    fn test_constant_window_hits_floor() {
        let device = Default::default();
        let x = Tensor::<TestBackend, 3>::ones([1, 2, 20], &device).mul_scalar(4.2);
        let out: Vec<f32> = VariancePooling::new(5, 5)
            .forward(x)
            .into_data()
            .to_vec::<f32>()
            .unwrap();

        let floor = (VARIANCE_FLOOR as f32).ln();
        assert_eq!(out.len(), 8);
        for v in out {
            assert!((v - floor).abs() < 1e-4, "got {v}, want {floor}");
        }
    }

    #[test]
    fn test_known_variance() {
        let device = Default::default();
        // window [1, 2, 3, 4]: mean 2.5, unbiased variance 5/3
        // window [2, 4, 6, 8]: unbiased variance 20/3
        let x = Tensor::<TestBackend, 3>::from_data(
            TensorData::new(vec![1.0f32, 2.0, 3.0, 4.0, 2.0, 4.0, 6.0, 8.0], [1, 1, 8]),
            &device,
        );
        let out: Vec<f32> = VariancePooling::new(4, 4)
            .forward(x)
            .into_data()
            .to_vec::<f32>()
            .unwrap();

        assert!((out[0] - (5.0f32 / 3.0).ln()).abs() < 1e-5);
        assert!((out[1] - (20.0f32 / 3.0).ln()).abs() < 1e-5);
    }

    #[test]
    fn test_huge_variance_hits_ceiling() {
        let device = Default::default();
        let x = Tensor::<TestBackend, 3>::from_data(
            TensorData::new(vec![-1.0e5f32, 1.0e5, -1.0e5, 1.0e5], [1, 1, 4]),
            &device,
        );
        let out: Vec<f32> = VariancePooling::new(4, 1)
            .forward(x)
            .into_data()
            .to_vec::<f32>()
            .unwrap();
        let ceil = (VARIANCE_CEIL as f32).ln();
        assert!((out[0] - ceil).abs() < 1e-4);
    }

    #[test]
    fn test_windows_overlap_with_small_stride() {
        let device = Default::default();
        let x = Tensor::<TestBackend, 3>::from_data(
            TensorData::new(vec![0.0f32, 0.0, 0.0, 3.0, 3.0], [1, 1, 5]),
            &device,
        );
        let out: Vec<f32> = VariancePooling::new(3, 1)
            .forward(x)
            .into_data()
            .to_vec::<f32>()
            .unwrap();

        // [0,0,0] → floor, [0,0,3] → var 3, [0,3,3] → var 3
        assert_eq!(out.len(), 3);
        assert!((out[0] - (VARIANCE_FLOOR as f32).ln()).abs() < 1e-4);
        assert!((out[1] - 3.0f32.ln()).abs() < 1e-5);
        assert!((out[2] - 3.0f32.ln()).abs() < 1e-5);
    }
}
