// ============================================================
// Layer 5 — Predictor
// ============================================================
// Wraps a NeuroTransNet for evaluation-mode use: checks that a
// batch has the configured [channels, samples] layout, runs the
// forward pass and turns logits into probabilities and labels.
//
// On a non-autodiff backend (NdArray, Wgpu) every Dropout layer
// is inert, so predictions are deterministic.

use anyhow::{anyhow, ensure, Result};
use burn::{
    prelude::*,
    tensor::{activation::softmax, TensorData},
};

use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{NeuroTransNet, NeuroTransNetConfig};

pub struct Prediction<B: Backend> {
    /// Raw class scores — [batch, num_classes]
    pub logits:        Tensor<B, 2>,
    /// Softmax over classes — [batch, num_classes]
    pub probabilities: Tensor<B, 2>,
    /// Index of the highest score per trial — [batch]
    pub classes:       Tensor<B, 1, Int>,
}

/// Host-side copy of one trial's prediction
#[derive(Debug, Clone, PartialEq)]
pub struct TrialPrediction {
    pub class:         usize,
    pub logits:        Vec<f32>,
    pub probabilities: Vec<f32>,
}

impl<B: Backend> Prediction<B> {
    /// Copy the tensors back to the host, one entry per trial.
    pub fn to_trials(&self) -> Result<Vec<TrialPrediction>> {
        let [batch, num_classes] = self.logits.dims();

        let logits = self.logits.clone().into_data().convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Read logits: {e:?}"))?;
        let probs = self.probabilities.clone().into_data().convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Read probabilities: {e:?}"))?;
        let classes = self.classes.clone().into_data().convert::<i64>()
            .to_vec::<i64>()
            .map_err(|e| anyhow!("Read classes: {e:?}"))?;

        Ok((0..batch)
            .map(|i| TrialPrediction {
                class:         classes[i] as usize,
                logits:        logits[i * num_classes..(i + 1) * num_classes].to_vec(),
                probabilities: probs[i * num_classes..(i + 1) * num_classes].to_vec(),
            })
            .collect())
    }
}

pub struct Predictor<B: Backend> {
    model:  NeuroTransNet<B>,
    config: NeuroTransNetConfig,
    device: B::Device,
}

impl<B: Backend> Predictor<B> {
    /// Fresh (untrained) weights from `config`
    pub fn new(config: NeuroTransNetConfig, device: B::Device) -> Result<Self> {
        let model = config.init::<B>(&device)?;
        Ok(Self { model, config, device })
    }

    pub fn from_checkpoint(ckpt: &CheckpointManager, device: B::Device) -> Result<Self> {
        let (config, model) = ckpt.load_model::<B>(&device)?;
        Ok(Self { model, config, device })
    }

    pub fn config(&self) -> &NeuroTransNetConfig {
        &self.config
    }

    pub fn model(&self) -> &NeuroTransNet<B> {
        &self.model
    }

    /// signals: [batch, num_channels, num_samples]
    pub fn predict(&self, signals: Tensor<B, 3>) -> Result<Prediction<B>> {
        let [batch, channels, samples] = signals.dims();
        let [want_channels, want_samples] = self.model.input_shape();
        ensure!(batch > 0, "empty batch");
        ensure!(
            channels == want_channels && samples == want_samples,
            "expected trials of {want_channels} channels × {want_samples} samples, got {channels} × {samples}"
        );

        let logits        = self.model.forward(signals);
        let probabilities = softmax(logits.clone(), 1);
        let classes       = logits.clone().argmax(1).flatten::<1>(0, 1);

        Ok(Prediction { logits, probabilities, classes })
    }

    /// Predict from a flat row-major buffer of `batch` trials.
    pub fn predict_flat(&self, samples: &[f32], batch: usize) -> Result<Prediction<B>> {
        let [channels, time] = self.model.input_shape();
        ensure!(
            samples.len() == batch * channels * time,
            "buffer holds {} values, expected {batch} × {channels} × {time}",
            samples.len()
        );
        let signals = Tensor::<B, 3>::from_data(
            TensorData::new(samples.to_vec(), [batch, channels, time]),
            &self.device,
        );
        self.predict(signals)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray<f32>;

    fn predictor() -> Predictor<TestBackend> {
        let cfg = NeuroTransNetConfig::new()
            .with_num_channels(3)
            .with_num_samples(60)
            .with_embed_dim(8)
            .with_pool_size(10)
            .with_pool_stride(5)
            .with_num_heads(4)
            .with_depth(1)
            .with_fusion_channels(4)
            .with_num_classes(3);
        Predictor::new(cfg, Default::default()).unwrap()
    }

    #[test]
    fn test_probabilities_are_normalised() {
        let p = predictor();
        let x = Tensor::<TestBackend, 3>::random([4, 3, 60], Distribution::Default, &Default::default());
        let trials = p.predict(x).unwrap().to_trials().unwrap();

        assert_eq!(trials.len(), 4);
        for t in &trials {
            let sum: f32 = t.probabilities.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
            assert!(t.class < 3);
            // argmax of logits and probabilities agree
            let best = t.logits
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .map(|(i, _)| i)
                .unwrap();
            assert_eq!(best, t.class);
        }
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let p = predictor();
        let x = Tensor::<TestBackend, 3>::zeros([2, 4, 60], &Default::default());
        let err = p.predict(x).err().unwrap();
        assert!(err.to_string().contains("expected trials of 3 channels"));
    }

    #[test]
    fn test_flat_buffer_length_checked() {
        let p = predictor();
        assert!(p.predict_flat(&vec![0.0; 3 * 60], 2).is_err());
        let pred = p.predict_flat(&vec![0.5; 2 * 3 * 60], 2).unwrap();
        assert_eq!(pred.logits.dims(), [2, 3]);
    }
}
