// ============================================================
// Layer 3 — Pooling Geometry and Network Dimensions
// ============================================================
// Both pooling paths (mean and log-variance) slide the same
// window over the time axis with the same stride, so they
// always agree on the number of windows:
//
//   windows = floor((T - window) / stride) + 1
//
// Example with the default configuration:
//   T = 1000, window = 50, stride = 15
//   windows = (1000 - 50) / 15 + 1 = 63 + 1 = 64
//
// NetworkDims bundles every size that influences a tensor
// shape and produces the stage-by-stage shape trace.

use serde::{Deserialize, Serialize};

/// Window size and stride of a 1-D pooling operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolGeometry {
    pub window: usize,
    pub stride: usize,
}

impl PoolGeometry {
    pub fn new(window: usize, stride: usize) -> Self {
        Self { window, stride }
    }

    /// Number of complete windows that fit in a sequence of `time` steps.
    /// `None` when no window fits or the geometry is degenerate.
    pub fn output_len(&self, time: usize) -> Option<usize> {
        if self.window == 0 || self.stride == 0 || time < self.window {
            return None;
        }
        Some((time - self.window) / self.stride + 1)
    }

    /// First time index covered by window `index`
    pub fn window_start(&self, index: usize) -> usize {
        index * self.stride
    }
}

/// One named step of the forward pass and the shape it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub name:  &'static str,
    pub shape: Vec<usize>,
}

impl Stage {
    fn new(name: &'static str, shape: &[usize]) -> Self {
        Self { name, shape: shape.to_vec() }
    }
}

/// Every dimension that determines a tensor shape somewhere in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDims {
    pub num_channels:    usize,
    pub num_samples:     usize,
    pub embed_dim:       usize,
    pub num_classes:     usize,
    pub fusion_channels: usize,
    pub pool:            PoolGeometry,
}

impl NetworkDims {
    /// Length of the pooled token sequence fed to the transformer stack
    pub fn temporal_embedding_dim(&self) -> Option<usize> {
        self.pool.output_len(self.num_samples)
    }

    /// Width of the flattened fusion output, i.e. the classifier's input
    pub fn classifier_inputs(&self) -> usize {
        self.fusion_channels * self.embed_dim
    }

    /// Shape produced by each stage for a batch of `batch` trials.
    /// `None` when the pooling window does not fit in the signal.
    pub fn stages(&self, batch: usize) -> Option<Vec<Stage>> {
        let (c, t, e) = (self.num_channels, self.num_samples, self.embed_dim);
        let n = self.temporal_embedding_dim()?;
        let f = self.fusion_channels;

        Some(vec![
            Stage::new("input",           &[batch, c, t]),
            Stage::new("image",           &[batch, 1, c, t]),
            Stage::new("temporal_conv",   &[batch, e, c, t]),
            Stage::new("spatial_conv",    &[batch, e, t]),
            Stage::new("mean_pool",       &[batch, e, n]),
            Stage::new("variance_pool",   &[batch, e, n]),
            Stage::new("tokens",          &[batch, n, e]),
            Stage::new("transformer",     &[batch, n, e]),
            Stage::new("stacked_paths",   &[batch, n, 2, e]),
            Stage::new("feature_encoder", &[batch, f, 1, e]),
            Stage::new("flatten",         &[batch, f * e]),
            Stage::new("logits",          &[batch, self.num_classes]),
        ])
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn default_dims() -> NetworkDims {
        NetworkDims {
            num_channels:    22,
            num_samples:     1000,
            embed_dim:       32,
            num_classes:     4,
            fusion_channels: 64,
            pool:            PoolGeometry::new(50, 15),
        }
    }

    #[test]
    fn test_default_window_count() {
        assert_eq!(PoolGeometry::new(50, 15).output_len(1000), Some(64));
    }

    #[test]
    fn test_window_count_matches_formula() {
        for time in 1..120 {
            for window in 1..=time {
                for stride in 1..8 {
                    let expected = (time - window) / stride + 1;
                    let got = PoolGeometry::new(window, stride).output_len(time);
                    assert_eq!(got, Some(expected), "T={time} w={window} s={stride}");
                    // last window must end inside the sequence
                    let last = PoolGeometry::new(window, stride).window_start(expected - 1);
                    assert!(last + window <= time);
                }
            }
        }
    }

    #[test]
    fn test_window_larger_than_signal() {
        assert_eq!(PoolGeometry::new(50, 15).output_len(49), None);
        assert_eq!(PoolGeometry::new(50, 15).output_len(50), Some(1));
    }

    #[test]
    fn test_degenerate_geometry() {
        assert_eq!(PoolGeometry::new(0, 15).output_len(100), None);
        assert_eq!(PoolGeometry::new(10, 0).output_len(100), None);
    }

    #[test]
    fn test_stage_trace_defaults() {
        let stages = default_dims().stages(2).unwrap();
        let first = stages.first().unwrap();
        let last  = stages.last().unwrap();
        assert_eq!(first.shape, vec![2, 22, 1000]);
        assert_eq!(last.shape,  vec![2, 4]);

        let flatten = stages.iter().find(|s| s.name == "flatten").unwrap();
        // 64 fusion channels × 32 features == 32 features × 64 windows
        assert_eq!(flatten.shape, vec![2, 2048]);
        assert_eq!(default_dims().classifier_inputs(), 2048);
    }

    #[test]
    fn test_num_classes_only_changes_logits() {
        let base  = default_dims().stages(3).unwrap();
        let other = NetworkDims { num_classes: 7, ..default_dims() }.stages(3).unwrap();
        for (a, b) in base.iter().zip(other.iter()) {
            if a.name == "logits" {
                assert_eq!(b.shape, vec![3, 7]);
            } else {
                assert_eq!(a.shape, b.shape, "stage {}", a.name);
            }
        }
    }

    #[test]
    fn test_stages_none_when_window_does_not_fit() {
        let dims = NetworkDims { num_samples: 10, ..default_dims() };
        assert!(dims.stages(1).is_none());
    }
}
