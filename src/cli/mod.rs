// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All work is delegated to Layer 2 (application); this layer
// only routes and prints.
//
// Three commands are supported:
//   1. `summary` — shape trace and parameter counts
//   2. `init`    — write config + initial weights to disk
//   3. `predict` — forward pass over a synthetic batch
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InitArgs, PredictArgs, SummaryArgs};

#[derive(Parser, Debug)]
#[command(
    name = "neurotrans",
    version,
    about = "Multi-scale convolutional / transformer EEG classifier (forward pass only)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Summary(args) => run_summary(args),
            Commands::Init(args)    => run_init(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_summary(args: SummaryArgs) -> Result<()> {
    use crate::application::summary_use_case::SummaryUseCase;

    let config  = args.model.resolve()?;
    let summary = SummaryUseCase::new(config, args.batch_size).execute()?;

    println!("Temporal embedding dim: {}", summary.temporal_embedding_dim);
    println!("\n{:<18} shape", "stage");
    for stage in &summary.stages {
        println!("{:<18} {:?}", stage.name, stage.shape);
    }
    println!("\n{:<18} params", "component");
    for (name, count) in &summary.components {
        println!("{:<18} {}", name, count);
    }
    println!("{:<18} {}", "total", summary.total_params);
    Ok(())
}

fn run_init(args: InitArgs) -> Result<()> {
    use crate::application::init_use_case::InitUseCase;

    tracing::info!("Initialising checkpoint in: {}", args.checkpoint_dir);
    let config  = args.model.resolve()?;
    let written = InitUseCase::new(config, args.checkpoint_dir.clone()).execute()?;

    println!("Wrote {} parameters to '{}'.", written, args.checkpoint_dir);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let trials = PredictUseCase::new(args.to_config()?).execute()?;

    for (i, t) in trials.iter().enumerate() {
        let probs: Vec<String> = t.probabilities.iter().map(|p| format!("{p:.3}")).collect();
        println!("trial {:>3} | class {} | p = [{}]", i, t.class, probs.join(", "));
    }
    Ok(())
}
