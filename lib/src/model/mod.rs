//! Models with compile-time training state.
//!
//! A model is either [`Unfitted`] (implements [`TrainableModel`], used by the
//! trainer) or [`Fitted`] (implements [`InferenceModel`], used for
//! prediction). Converting with [`TrainableModel::into_fitted`] drops every
//! training-only capability, so an untrained model can never be asked to
//! predict and a trained one can never be updated again.

pub mod dense;
pub mod sequential;
pub mod state;
pub mod summary;

pub use dense::{Dense, DenseParams};
pub use sequential::{SequentialParams, SequentialRegressor};
pub use state::{Fitted, Unfitted};
pub use summary::{LayerSummary, ModelSummary};

use crate::backend::{Backend, Scalar};

/// Training-side interface: forward pass, backpropagation and parameter access.
pub trait TrainableModel<B: Backend> {
    type Input;
    type Prediction;
    type Params;
    type Gradients;
    type Output;

    fn forward(&self, input: &Self::Input) -> Self::Prediction;

    /// Gradients of the loss w.r.t. the parameters, given ∂L/∂prediction.
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;

    fn params(&self) -> &Self::Params;

    fn update_params(&mut self, new_params: &Self::Params);

    /// Consumes the trainable model and returns its inference-only form.
    fn into_fitted(self) -> Self::Output;
}

/// Element-wise arithmetic over a whole parameter set.
///
/// Lets optimizers treat any model's parameters as one flat vector of
/// numbers without knowing the layer structure.
pub trait ParamOps<B: Backend>: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, scalar: Scalar<B>) -> Self;
    /// Hadamard product.
    fn mul(&self, other: &Self) -> Self;
    /// Applies `f` to every parameter value.
    fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self;
    /// Total number of scalar parameters.
    fn num_params(&self) -> usize;

    /// Same structure, all zeros.
    fn zeros_like(&self) -> Self {
        self.map(|_| 0.0)
    }

    /// `true` when every value is finite.
    fn all_finite(&self) -> bool;
}

/// Inference-side interface of a fitted model.
pub trait InferenceModel<B: Backend> {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;
    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;
}
