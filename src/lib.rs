#![recursion_limit = "256"]

//! NeuroTransNet: a multi-scale convolutional / transformer classifier for
//! multi-channel EEG trials, built on Burn.
//!
//! ```no_run
//! use burn::backend::NdArray;
//! use burn::tensor::{Distribution, Tensor};
//! use neurotrans::ml::model::NeuroTransNetConfig;
//!
//! let device = Default::default();
//! let model = NeuroTransNetConfig::new().init::<NdArray>(&device)?;
//! let trials = Tensor::<NdArray, 3>::random([2, 22, 1000], Distribution::Default, &device);
//! let logits = model.forward(trials); // [2, 4]
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod application;
pub mod domain;
pub mod ml;
pub mod infra;
