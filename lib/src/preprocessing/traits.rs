//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: the configurable, unfitted state that learns from data.
//! - [`FittedTransformer`]: the learned state, ready to transform and invert.

use crate::backend::Backend;
use crate::preprocessing::error::PreprocessingError;

/// Trait for unfitted transformers with hyperparameters.
///
/// # Type Parameters
/// - `B`: The backend used for computation.
/// - `Input` / `Output`: Data types before and after transformation.
/// - `Params`: Plain-value description of the learned parameters.
/// - `Fitted`: The corresponding fitted transformer type.
pub trait Transformer<B: Backend>: Clone {
    type Input;
    type Output;
    type Params;
    type Fitted: FittedTransformer<
        B,
        Params = Self::Params,
        Input = Self::Input,
        Output = Self::Output,
    >;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the data is empty or its statistics
    /// make the transformation undefined.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit the transformer and transform the data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.fit(data)?.transform(data)
    }
}

/// Trait for fitted transformers.
///
/// `inverse_transform(transform(x))` reproduces `x` up to floating-point
/// error.
pub trait FittedTransformer<B: Backend>: Clone {
    type Input;
    type Output;
    type Params;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::FeatureMismatch`] if the input does not
    /// have the number of features seen during fit.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    /// Reverse the transformation.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input, PreprocessingError>;

    /// Extract learned parameters.
    fn extract_params(&self) -> Self::Params;

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize;
}
