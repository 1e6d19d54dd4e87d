//! Two stacked dense layers: `y = W2 · (W1 · x + b1) + b2`.
//!
//! Without an activation between them the stack is a single affine map in
//! disguise. It is kept as two layers so the model summary shows both and
//! each trains its own kernel and bias.

use rand::Rng;
use std::marker::PhantomData;

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::model::dense::{Dense, DenseParams};
use crate::model::summary::{LayerSummary, ModelSummary};
use crate::model::{Fitted, InferenceModel, ParamOps, TrainableModel, Unfitted};

/// Parameters of both layers.
#[derive(Clone, Debug)]
pub struct SequentialParams<B: Backend> {
    pub hidden: DenseParams<B>,
    pub output: DenseParams<B>,
}

impl<B: Backend> ParamOps<B> for SequentialParams<B> {
    fn add(&self, other: &Self) -> Self {
        Self {
            hidden: self.hidden.add(&other.hidden),
            output: self.output.add(&other.output),
        }
    }

    fn scale(&self, scalar: Scalar<B>) -> Self {
        Self {
            hidden: self.hidden.scale(scalar),
            output: self.output.scale(scalar),
        }
    }

    fn mul(&self, other: &Self) -> Self {
        Self {
            hidden: self.hidden.mul(&other.hidden),
            output: self.output.mul(&other.output),
        }
    }

    fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            hidden: self.hidden.map(&f),
            output: self.output.map(&f),
        }
    }

    fn num_params(&self) -> usize {
        self.hidden.num_params() + self.output.num_params()
    }

    fn all_finite(&self) -> bool {
        self.hidden.all_finite() && self.output.all_finite()
    }
}

const HIDDEN_LAYER: &str = "dense_Dense1";
const OUTPUT_LAYER: &str = "dense_Dense2";

/// A sequential regressor with its training state encoded at the type level.
///
/// - `S = Unfitted`: implements [`TrainableModel`].
/// - `S = Fitted`: implements [`InferenceModel`].
#[derive(Clone, Debug)]
pub struct SequentialRegressor<B: Backend, S> {
    params: SequentialParams<B>,
    _state: PhantomData<S>,
}

impl<B: Backend, S> SequentialRegressor<B, S> {
    fn assemble(params: SequentialParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    fn hidden(&self) -> Dense<'_, B> {
        Dense::new(HIDDEN_LAYER, &self.params.hidden)
    }

    fn output(&self) -> Dense<'_, B> {
        Dense::new(OUTPUT_LAYER, &self.params.output)
    }

    pub fn input_dim(&self) -> usize {
        self.hidden().input_dim()
    }

    /// Per-layer output shape and parameter count.
    pub fn summary(&self) -> ModelSummary {
        let describe = |layer: Dense<'_, B>| LayerSummary {
            name: layer.name().to_string(),
            layer_type: "Dense".to_string(),
            output_shape: vec![None, Some(1)],
            params: layer.params().num_params(),
        };
        ModelSummary::new(vec![describe(self.hidden()), describe(self.output())])
    }

    fn hidden_activations(&self, x: &Tensor2D<B>) -> Tensor2D<B> {
        Tensor2D::from_column(&self.hidden().forward(x))
    }

    fn run(&self, x: &Tensor2D<B>) -> Tensor1D<B> {
        self.output().forward(&self.hidden_activations(x))
    }
}

impl<B: Backend> SequentialRegressor<B, Unfitted> {
    /// Builds an untrained model for `input_dim` features.
    pub fn new<R: Rng + ?Sized>(input_dim: usize, rng: &mut R) -> Self {
        Self::assemble(SequentialParams {
            hidden: DenseParams::glorot(input_dim, rng),
            output: DenseParams::glorot(1, rng),
        })
    }

    /// Builds an untrained model from explicit parameters.
    pub fn from_params(params: SequentialParams<B>) -> Self {
        Self::assemble(params)
    }
}

impl<B: Backend> SequentialRegressor<B, Fitted> {
    pub fn new(params: SequentialParams<B>) -> Self {
        Self::assemble(params)
    }

    pub fn params(&self) -> &SequentialParams<B> {
        &self.params
    }
}

impl<B: Backend> TrainableModel<B> for SequentialRegressor<B, Unfitted> {
    type Input = Tensor2D<B>;
    type Prediction = Tensor1D<B>;
    type Params = SequentialParams<B>;
    type Gradients = SequentialParams<B>;
    type Output = SequentialRegressor<B, Fitted>;

    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        self.run(x)
    }

    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        let h = self.hidden_activations(x);
        let (output_grads, grad_h) = self.output().backward(&h, grad_output);
        let (hidden_grads, _) = self.hidden().backward(x, &grad_h.ravel());
        SequentialParams {
            hidden: hidden_grads,
            output: output_grads,
        }
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, new_params: &Self::Params) {
        self.params = new_params.clone();
    }

    fn into_fitted(self) -> Self::Output {
        SequentialRegressor::<B, Fitted>::new(self.params)
    }
}

impl<B: Backend> InferenceModel<B> for SequentialRegressor<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type OutputSingle = Scalar<B>;
    type InputBatch = Tensor2D<B>;
    type OutputBatch = Tensor1D<B>;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        let h = self.params.hidden.weights.dot(input) + self.params.hidden.bias;
        h * self.params.output.weights.sum() + self.params.output.bias
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        self.run(input)
    }
}
