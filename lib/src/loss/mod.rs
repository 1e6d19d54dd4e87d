use crate::backend::{Backend, Scalar, Tensor1D};

/// A trait for differentiable loss functions used during model training.
///
/// Implementors define:
/// - How to compute the scalar loss value (for logging/metrics).
/// - How to compute the gradient of the loss w.r.t. the model's predictions.
///
/// The gradient is passed to the model's `backward()` method.
pub trait Loss<B: Backend> {
    type Prediction;
    type Target;

    /// Computes the scalar loss value.
    fn loss(&self, prediction: &Self::Prediction, target: &Self::Target) -> Scalar<B>;

    /// Computes the gradient of the loss w.r.t. the prediction: ∂L/∂pred.
    fn grad_wrt_prediction(
        &self,
        prediction: &Self::Prediction,
        target: &Self::Target,
    ) -> Self::Prediction;
}

/// Mean Squared Error (MSE) loss: `L = (1/n) * Σ(pred_i - target_i)^2`
///
/// Gradient w.r.t. prediction: `∂L/∂pred = 2 (pred - target) / n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MSELoss;

impl<B: Backend> Loss<B> for MSELoss {
    type Prediction = Tensor1D<B>;
    type Target = Tensor1D<B>;

    fn loss(&self, pred: &Self::Prediction, target: &Self::Target) -> Scalar<B> {
        let diff = pred.sub(target);
        diff.dot(&diff) / Scalar::<B>::new(diff.len() as f64)
    }

    fn grad_wrt_prediction(&self, pred: &Self::Prediction, target: &Self::Target) -> Tensor1D<B> {
        let n = Scalar::<B>::new(2.0 / pred.len() as f64);
        pred.sub(target).scale(&n)
    }
}
