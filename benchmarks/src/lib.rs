//! Benchmark utilities for horsepower-regression.
//!
//! Provides what the criterion benches and the `run_pipeline` binary share:
//!
//! - Synthetic cars data with the same shape as the public dataset
//! - Wall-clock timing and summary statistics

pub mod data;
pub mod utils;

pub use data::{synthetic_cars, SyntheticCars};
pub use utils::{BenchmarkStats, Timer};
