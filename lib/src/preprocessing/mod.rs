//! Tensor construction and min-max normalization.
//!
//! Transformers follow a type-state split: a [`Transformer`] holds
//! configuration and learns from data, producing a [`FittedTransformer`] that
//! can transform and invert. [`normalize`] uses one fitted [`MinMaxScaler`]
//! per column and keeps both in the returned [`NormalizedData`], so the
//! predictor can map model outputs back into raw units.
//!
//! # Example
//! ```
//! use horsepower_regression::backend::CpuBackend;
//! use horsepower_regression::data::CleanRecord;
//! use horsepower_regression::preprocessing::{build_tensors, normalize};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let records = vec![
//!     CleanRecord { horsepower: 60.0, efficiency: 14.0 },
//!     CleanRecord { horsepower: 200.0, efficiency: 5.0 },
//! ];
//! let pair = build_tensors::<CpuBackend>(&records).unwrap();
//! let data = normalize(&pair, &mut StdRng::seed_from_u64(0)).unwrap();
//! assert_eq!(data.params().input_max, 200.0);
//! ```

pub mod error;
pub mod minmax;
pub mod normalizer;
pub mod tensors;
pub mod traits;

pub use error::PreprocessingError;
pub use minmax::{FittedMinMaxScaler, MinMaxScaler, MinMaxScalerParams};
pub use normalizer::{normalize, NormalizationParams, NormalizedData, INPUT_COLUMN, LABEL_COLUMN};
pub use tensors::{build_tensors, TensorPair};
pub use traits::{FittedTransformer, Transformer};
