//! Min-Max Scaler.
//!
//! Scales every feature column into `[0, 1]`:
//! ```text
//! X_scaled = (X - X_min) / (X_max - X_min)
//! ```
//! and back again with `inverse_transform`.
//!
//! # Example
//! ```
//! use horsepower_regression::backend::{CpuBackend, Tensor2D};
//! use horsepower_regression::preprocessing::{FittedTransformer, MinMaxScaler, Transformer};
//!
//! let data = Tensor2D::<CpuBackend>::new(vec![50.0, 100.0, 150.0], 3, 1);
//! let fitted = MinMaxScaler::new().with_feature_names(&["horsepower"]).fit(&data).unwrap();
//! assert_eq!(fitted.transform(&data).unwrap().to_vec(), vec![0.0, 0.5, 1.0]);
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Learned parameters of a fitted [`MinMaxScaler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerParams {
    /// Minimum of each feature.
    pub min_: Vec<f64>,
    /// Maximum of each feature.
    pub max_: Vec<f64>,
    pub n_features: usize,
}

/// MinMaxScaler transformer (unfitted).
///
/// Constant columns are rejected at fit time with
/// [`PreprocessingError::DegenerateRange`]; scaling them would divide by zero.
#[derive(Clone, Debug)]
pub struct MinMaxScaler<B: Backend> {
    feature_names: Vec<String>,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for MinMaxScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> MinMaxScaler<B> {
    pub fn new() -> Self {
        Self {
            feature_names: Vec::new(),
            _backend: PhantomData,
        }
    }

    /// Names used to identify columns in errors.
    pub fn with_feature_names(mut self, names: &[&str]) -> Self {
        self.feature_names = names.iter().map(|s| s.to_string()).collect();
        self
    }

    fn feature_name(&self, index: usize) -> String {
        self.feature_names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("feature {}", index))
    }
}

impl<B: Backend> Transformer<B> for MinMaxScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = MinMaxScalerParams;
    type Fitted = FittedMinMaxScaler<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.shape();

        if rows == 0 {
            return Err(PreprocessingError::InsufficientData(
                "Cannot fit MinMaxScaler on empty data".to_string(),
            ));
        }

        let min_ = data.col_min();
        let max_ = data.col_max();
        let range_ = max_.sub(&min_);

        // A spread that overflows to infinity would turn every scaled value into NaN.
        if let Some(index) = range_
            .to_vec()
            .iter()
            .position(|&r| !(r.is_finite() && r > 0.0))
        {
            return Err(PreprocessingError::DegenerateRange {
                column: self.feature_name(index),
            });
        }

        Ok(FittedMinMaxScaler {
            min_,
            max_,
            range_,
            n_features: cols,
        })
    }
}

/// Fitted MinMaxScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedMinMaxScaler<B: Backend> {
    min_: Tensor1D<B>,
    max_: Tensor1D<B>,
    range_: Tensor1D<B>,
    n_features: usize,
}

impl<B: Backend> FittedMinMaxScaler<B> {
    /// Get the minimum values for each feature.
    pub fn min(&self) -> &Tensor1D<B> {
        &self.min_
    }

    pub fn max(&self) -> &Tensor1D<B> {
        &self.max_
    }

    /// Get the data range (max - min) for each feature.
    pub fn data_range(&self) -> &Tensor1D<B> {
        &self.range_
    }

    fn check_features(&self, data: &Tensor2D<B>) -> Result<(), PreprocessingError> {
        let (_, cols) = data.shape();
        if cols != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: cols,
            });
        }
        Ok(())
    }
}

impl<B: Backend> FittedTransformer<B> for FittedMinMaxScaler<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = MinMaxScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.check_features(data)?;
        Ok(data.sub_rows(&self.min_).div_rows(&self.range_))
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        self.check_features(data)?;
        Ok(data.mul_rows(&self.range_).add_rows(&self.min_))
    }

    fn extract_params(&self) -> Self::Params {
        MinMaxScalerParams {
            min_: self.min_.to_vec(),
            max_: self.max_.to_vec(),
            n_features: self.n_features,
        }
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}
