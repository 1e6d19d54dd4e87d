//! Shuffling and min-max normalization of the training pair.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::minmax::{FittedMinMaxScaler, MinMaxScaler};
use crate::preprocessing::tensors::TensorPair;
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// Column name reported for a constant horsepower column.
pub const INPUT_COLUMN: &str = "horsepower";
/// Column name reported for a constant efficiency column.
pub const LABEL_COLUMN: &str = "efficiency";

/// Min and max of the raw input and label columns, as seen by the Normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams {
    pub input_min: f64,
    pub input_max: f64,
    pub label_min: f64,
    pub label_max: f64,
}

/// Shuffled, `[0, 1]`-scaled training data and the scalers that produced it.
#[derive(Clone, Debug)]
pub struct NormalizedData<B: Backend> {
    pub inputs: Tensor2D<B>,
    pub labels: Tensor2D<B>,
    input_scaler: FittedMinMaxScaler<B>,
    label_scaler: FittedMinMaxScaler<B>,
}

impl<B: Backend> NormalizedData<B> {
    pub fn input_scaler(&self) -> &FittedMinMaxScaler<B> {
        &self.input_scaler
    }

    pub fn label_scaler(&self) -> &FittedMinMaxScaler<B> {
        &self.label_scaler
    }

    pub fn len(&self) -> usize {
        self.inputs.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn params(&self) -> NormalizationParams {
        let inputs = self.input_scaler.extract_params();
        let labels = self.label_scaler.extract_params();
        NormalizationParams {
            input_min: inputs.min_[0],
            input_max: inputs.max_[0],
            label_min: labels.min_[0],
            label_max: labels.max_[0],
        }
    }
}

/// Shuffles a copy of `pair` and scales both columns into `[0, 1]`.
///
/// A single permutation is applied to inputs and labels, so every
/// `(horsepower, efficiency)` pair survives intact. `pair` itself is left
/// untouched.
///
/// # Errors
/// - [`PreprocessingError::InsufficientData`] for an empty pair.
/// - [`PreprocessingError::DegenerateRange`] when either column is constant.
pub fn normalize<B: Backend, R: Rng + ?Sized>(
    pair: &TensorPair<B>,
    rng: &mut R,
) -> Result<NormalizedData<B>, PreprocessingError> {
    let (rows, cols) = pair.inputs.shape();
    if pair.labels.shape() != (rows, cols) || cols != 1 {
        return Err(PreprocessingError::InvalidShape {
            expected: format!("[{}, 1] inputs and labels", rows),
            got: format!("{:?} and {:?}", (rows, cols), pair.labels.shape()),
        });
    }

    let mut order: Vec<usize> = (0..rows).collect();
    order.shuffle(rng);
    let inputs = pair.inputs.select_rows(&order);
    let labels = pair.labels.select_rows(&order);

    let input_scaler = MinMaxScaler::new()
        .with_feature_names(&[INPUT_COLUMN])
        .fit(&inputs)?;
    let label_scaler = MinMaxScaler::new()
        .with_feature_names(&[LABEL_COLUMN])
        .fit(&labels)?;

    let normalized = NormalizedData {
        inputs: input_scaler.transform(&inputs)?,
        labels: label_scaler.transform(&labels)?,
        input_scaler,
        label_scaler,
    };
    tracing::debug!(rows, params = ?normalized.params(), "normalized training data");
    Ok(normalized)
}
