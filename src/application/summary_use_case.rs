// ============================================================
// Layer 2 — SummaryUseCase
// ============================================================
// Builds the network on the CPU backend and reports:
//   - the shape produced by every stage (domain shape trace)
//   - the number of learnable parameters per component
//
// Nothing is written to disk and no forward pass is run.

use anyhow::{Context, Result};
use burn::{backend::NdArray, module::Module};

use crate::domain::geometry::Stage;
use crate::ml::model::NeuroTransNetConfig;

type SummaryBackend = NdArray<f32>;

#[derive(Debug, Clone)]
pub struct ArchitectureSummary {
    pub temporal_embedding_dim: usize,
    pub stages:                 Vec<Stage>,
    /// (component name, parameter count)
    pub components:             Vec<(&'static str, usize)>,
    pub total_params:           usize,
}

pub struct SummaryUseCase {
    config:     NeuroTransNetConfig,
    batch_size: usize,
}

impl SummaryUseCase {
    pub fn new(config: NeuroTransNetConfig, batch_size: usize) -> Self {
        Self { config, batch_size }
    }

    pub fn execute(&self) -> Result<ArchitectureSummary> {
        let cfg    = &self.config;
        let device = Default::default();
        let model  = cfg.init::<SummaryBackend>(&device)?;

        let stages = cfg
            .dims()
            .stages(self.batch_size)
            .context("pooling window does not fit the signal")?;

        let blocks: usize = model.blocks.iter().map(|b| b.num_params()).sum();
        let components = vec![
            ("temporal_conv",      model.temporal.num_params()),
            ("spatial_conv",       model.spatial.num_params()),
            ("transformer_blocks", blocks),
            ("feature_encoder",    model.head.conv.num_params() + model.head.norm.num_params()),
            ("classifier",         model.head.classifier.num_params()),
        ];

        tracing::info!(
            "Summarised NeuroTransNet: {} parameters, {} stages",
            model.num_params(),
            stages.len()
        );

        Ok(ArchitectureSummary {
            temporal_embedding_dim: cfg.temporal_embedding_dim()?,
            stages,
            components,
            total_params: model.num_params(),
        })
    }
}
