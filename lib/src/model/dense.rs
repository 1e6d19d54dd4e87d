//! Fully connected layer with a single output unit and no activation.
//!
//! `y = x · w + b` for every row `x` of the input. With one unit the kernel
//! is a vector of length `input_dim` and the bias a scalar.

use rand::Rng;

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::model::ParamOps;

/// Kernel and bias of a [`Dense`] layer.
#[derive(Clone, Debug)]
pub struct DenseParams<B: Backend> {
    pub weights: Tensor1D<B>,
    pub bias: Scalar<B>,
}

impl<B: Backend> ParamOps<B> for DenseParams<B> {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: self.weights.add(&other.weights),
            bias: self.bias + other.bias,
        }
    }

    fn scale(&self, scalar: Scalar<B>) -> Self {
        Self {
            weights: self.weights.scale(&scalar),
            bias: self.bias * scalar,
        }
    }

    fn mul(&self, other: &Self) -> Self {
        Self {
            weights: self.weights.mul(&other.weights),
            bias: self.bias * other.bias,
        }
    }

    fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            weights: Tensor1D::new(self.weights.to_vec().into_iter().map(&f).collect()),
            bias: Scalar::new(f(self.bias.to_f64())),
        }
    }

    fn num_params(&self) -> usize {
        self.weights.len() + 1
    }

    fn all_finite(&self) -> bool {
        self.bias.is_finite() && self.weights.to_vec().iter().all(|w| w.is_finite())
    }
}

impl<B: Backend> DenseParams<B> {
    /// Glorot-uniform kernel, zero bias.
    ///
    /// Kernel values are drawn from `U(-limit, limit)` with
    /// `limit = sqrt(6 / (fan_in + fan_out))`.
    pub fn glorot<R: Rng + ?Sized>(input_dim: usize, rng: &mut R) -> Self {
        let limit = (6.0 / (input_dim + 1) as f64).sqrt();
        let weights = (0..input_dim).map(|_| rng.gen_range(-limit..=limit)).collect();
        Self {
            weights: Tensor1D::new(weights),
            bias: Scalar::new(0.0),
        }
    }
}

/// A dense layer with `units = 1` and a bias term.
///
/// Borrows its parameters from the owning model, so a layer is only a named
/// view over a [`DenseParams`] slot.
#[derive(Clone, Copy, Debug)]
pub struct Dense<'a, B: Backend> {
    name: &'a str,
    params: &'a DenseParams<B>,
}

impl<'a, B: Backend> Dense<'a, B> {
    pub fn new(name: &'a str, params: &'a DenseParams<B>) -> Self {
        Self { name, params }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn input_dim(&self) -> usize {
        self.params.weights.len()
    }

    pub fn params(&self) -> &'a DenseParams<B> {
        self.params
    }

    pub fn forward(&self, x: &Tensor2D<B>) -> Tensor1D<B> {
        x.dot(&self.params.weights).add_scalar(&self.params.bias)
    }

    /// Returns parameter gradients and ∂L/∂x for a batch, given ∂L/∂y.
    ///
    /// ∇w = xᵀ · g, ∇b = Σ g, ∂L/∂x = g wᵀ.
    pub fn backward(&self, x: &Tensor2D<B>, grad_output: &Tensor1D<B>) -> (DenseParams<B>, Tensor2D<B>) {
        let grads = DenseParams {
            weights: x.tdot(grad_output),
            bias: grad_output.sum(),
        };
        let grad_input = Tensor2D::outer(grad_output, &self.params.weights);
        (grads, grad_input)
    }
}
