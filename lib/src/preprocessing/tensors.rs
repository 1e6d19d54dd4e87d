//! Feature/target matrix construction from clean records.

use crate::backend::{Backend, Tensor2D};
use crate::data::CleanRecord;
use crate::preprocessing::error::PreprocessingError;

/// Index-aligned `[N, 1]` horsepower inputs and efficiency labels.
#[derive(Clone, Debug)]
pub struct TensorPair<B: Backend> {
    pub inputs: Tensor2D<B>,
    pub labels: Tensor2D<B>,
}

impl<B: Backend> TensorPair<B> {
    pub fn len(&self) -> usize {
        self.inputs.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Copies clean records into two column matrices without altering values.
///
/// # Errors
/// [`PreprocessingError::InsufficientData`] when `records` is empty.
pub fn build_tensors<B: Backend>(
    records: &[CleanRecord],
) -> Result<TensorPair<B>, PreprocessingError> {
    if records.is_empty() {
        return Err(PreprocessingError::InsufficientData(
            "no clean records to build tensors from".to_string(),
        ));
    }

    let n = records.len();
    let (horsepower, efficiency): (Vec<f64>, Vec<f64>) = records
        .iter()
        .map(|r| (r.horsepower, r.efficiency))
        .unzip();

    Ok(TensorPair {
        inputs: Tensor2D::new(horsepower, n, 1),
        labels: Tensor2D::new(efficiency, n, 1),
    })
}
