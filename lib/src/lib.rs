//! # horsepower-regression
//!
//! Learns the relationship between a car's engine horsepower and its fuel
//! efficiency (km per liter) from a small tabular dataset, and reports every
//! step of the run to a pluggable visualization sink.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: Models carry their training state in the type system
//!   (`Unfitted` vs `Fitted`), so an untrained model cannot predict and a trained
//!   one cannot be updated.
//! - **Training/Inference Separation**: Trained models contain only prediction parameters;
//!   losses, optimizers and the trainer live in separate components.
//! - **Backend Agnosticism**: The `Backend` trait hides tensor storage; a pure-Rust CPU
//!   backend is always available and an `ndarray` one sits behind a feature.
//! - **Pluggable I/O**: Records come from a [`data::DataSource`] and reports go to a
//!   [`viz::VisualizationSink`], so the pipeline runs the same against files, HTTP,
//!   or in-memory fixtures.
//!
//! ## Quick Start
//!
//! ```rust
//! use horsepower_regression::data::{RawRecord, StaticSource};
//! use horsepower_regression::viz::RecordingSink;
//! use horsepower_regression::{run_pipeline, PipelineConfig};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let records = (0..40)
//!     .map(|i| RawRecord::new(Some(40.0 - 0.1 * i as f64), Some(60.0 + 4.0 * i as f64)))
//!     .collect();
//! let source = StaticSource::new(records);
//! let mut sink = RecordingSink::new();
//!
//! let config = PipelineConfig::default().epochs(5).seed(Some(1));
//! let report = run_pipeline(&source, &mut sink, &config).await.unwrap();
//!
//! assert_eq!(report.training.epochs.len(), 5);
//! assert_eq!(report.predictions.predicted.len(), 300);
//! # });
//! ```
//!
//! ## Module Structure
//!
//! - `backend`: Tensor abstractions and computation primitives (`Tensor1D`, `Tensor2D`)
//! - `data`: Raw records, filtering, and data sources (file, HTTP, in-memory)
//! - `preprocessing`: Tensor building and min-max normalization
//! - `dataset`: Mini-batch access to normalized training data
//! - `model`: Two-layer dense regressor with stateful type parameters
//! - `loss`: Mean squared error
//! - `optimizer`: Adam
//! - `trainer`: Async training loop with per-epoch observers
//! - `predictor`: Prediction sweep and denormalization
//! - `viz`: Visualization sink trait and implementations
//! - `pipeline`: The end-to-end [`run_pipeline`] entry point and its backend-generic form

pub mod backend;

/// Raw records, record filtering, and data sources.
pub mod data;

/// Mini-batch access to in-memory training data.
pub mod dataset;

/// Global `tracing` subscriber setup.
pub mod logging;

/// Differentiable loss functions for model training.
pub mod loss;

/// Models with compile-time state safety.
pub mod model;

/// Optimization algorithms for parameter updates.
pub mod optimizer;

pub mod pipeline;

pub mod predictor;

/// Tensor construction and normalization.
pub mod preprocessing;

/// High-level training loop orchestration.
pub mod trainer;

/// Reporting surfaces for plots, summaries and epoch metrics.
pub mod viz;

/// Re-export of core backend types for convenient usage.
pub use backend::{Backend, CpuBackend, ScalarOps, Tensor1D, Tensor2D};
pub use pipeline::{run_pipeline, run_pipeline_on, PipelineConfig, PipelineError, PipelineReport};
