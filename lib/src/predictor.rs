//! Prediction sweep over the input domain, mapped back to raw units.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::data::CleanRecord;
use crate::model::InferenceModel;
use crate::preprocessing::{FittedTransformer, NormalizedData, PreprocessingError};
use crate::viz::Point;

/// Number of evenly spaced inputs swept by default.
pub const DEFAULT_PREDICTION_SAMPLES: usize = 300;

/// Original data next to the model's predictions, both in raw units.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSeries {
    /// `(horsepower, efficiency)` of every clean record, in input order.
    pub original: Vec<Point>,
    /// Model output over a uniform horsepower sweep.
    pub predicted: Vec<Point>,
}

/// Runs `model` on `samples` evenly spaced normalized inputs in `[0, 1]` and
/// denormalizes inputs and outputs with the scalers stored in `data`.
///
/// The sweep therefore spans exactly the horsepower range seen during
/// normalization, whatever the number of records.
///
/// # Errors
/// [`PreprocessingError::InsufficientData`] when `samples == 0`.
pub fn predict_series<B, M>(
    model: &M,
    data: &NormalizedData<B>,
    records: &[CleanRecord],
    samples: usize,
) -> Result<PredictionSeries, PreprocessingError>
where
    B: Backend,
    M: InferenceModel<B, InputBatch = Tensor2D<B>, OutputBatch = Tensor1D<B>>,
{
    if samples == 0 {
        return Err(PreprocessingError::InsufficientData(
            "prediction needs at least one sample".to_string(),
        ));
    }

    let xs = Tensor2D::from_column(&Tensor1D::<B>::linspace(0.0, 1.0, samples));
    let preds = Tensor2D::from_column(&model.predict_batch(&xs));

    let horsepower = data.input_scaler().inverse_transform(&xs)?.to_vec();
    let efficiency = data.label_scaler().inverse_transform(&preds)?.to_vec();

    let predicted = horsepower
        .into_iter()
        .zip(efficiency)
        .map(|(x, y)| Point { x, y })
        .collect();
    let original = records
        .iter()
        .map(|r| Point {
            x: r.horsepower,
            y: r.efficiency,
        })
        .collect();

    Ok(PredictionSeries {
        original,
        predicted,
    })
}
