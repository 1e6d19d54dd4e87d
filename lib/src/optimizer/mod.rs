use crate::backend::{Backend, Scalar};
use crate::model::ParamOps;
use std::marker::PhantomData;

/// Trait for gradient-based optimizers.
///
/// Training logic (`Trainer`) is decoupled from the update rule: any model
/// whose parameters implement [`ParamOps`] can be paired with any optimizer.
///
/// # Type Parameters
/// * `B`: computation backend implementing [`Backend`]
/// * `P`: model parameters type
pub trait Optimizer<B: Backend, P> {
    /// Returns updated parameters for one step.
    ///
    /// Takes `&mut self` because adaptive optimizers keep running state
    /// between steps.
    fn step(&mut self, params: &P, gradients: &P) -> P;

    /// Clears accumulated state so the optimizer can start a fresh run.
    fn reset(&mut self) {}
}

/// Hyperparameters of [`Adam`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AdamConfig {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
        }
    }
}

/// Adam optimizer with bias-corrected first and second moment estimates.
///
/// ```text
/// m ← β1 m + (1 - β1) g
/// v ← β2 v + (1 - β2) g²
/// θ ← θ - η · m̂ / (√v̂ + ε),   m̂ = m / (1 - β1ᵗ),  v̂ = v / (1 - β2ᵗ)
/// ```
///
/// # Example
/// ```rust
/// use horsepower_regression::optimizer::Adam;
/// use horsepower_regression::backend::CpuBackend;
///
/// let adam = Adam::<CpuBackend, ()>::new(0.001);
/// assert_eq!(adam.learning_rate(), 0.001);
/// ```
#[derive(Clone, Debug)]
pub struct Adam<B: Backend, P> {
    config: AdamConfig,
    t: u64,
    m: Option<P>,
    v: Option<P>,
    _backend: PhantomData<B>,
}

impl<B: Backend, P> Adam<B, P> {
    /// Adam with the given learning rate and default betas and epsilon.
    pub fn new(learning_rate: f64) -> Self {
        Self::with_config(AdamConfig {
            learning_rate,
            ..AdamConfig::default()
        })
    }

    pub fn with_config(config: AdamConfig) -> Self {
        Self {
            config,
            t: 0,
            m: None,
            v: None,
            _backend: PhantomData,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    pub fn config(&self) -> &AdamConfig {
        &self.config
    }

    /// Number of steps taken so far.
    pub fn steps(&self) -> u64 {
        self.t
    }
}

impl<B: Backend, P> Default for Adam<B, P> {
    fn default() -> Self {
        Self::with_config(AdamConfig::default())
    }
}

impl<B: Backend, P: ParamOps<B>> Optimizer<B, P> for Adam<B, P> {
    fn step(&mut self, params: &P, grads: &P) -> P {
        let AdamConfig {
            learning_rate,
            beta1,
            beta2,
            epsilon,
        } = self.config;
        self.t += 1;

        let m_prev = self.m.take().unwrap_or_else(|| grads.zeros_like());
        let v_prev = self.v.take().unwrap_or_else(|| grads.zeros_like());

        let m = m_prev
            .scale(Scalar::new(beta1))
            .add(&grads.scale(Scalar::new(1.0 - beta1)));
        let v = v_prev
            .scale(Scalar::new(beta2))
            .add(&grads.mul(grads).scale(Scalar::new(1.0 - beta2)));

        let t = self.t as i32;
        let m_hat = m.scale(Scalar::new(1.0 / (1.0 - beta1.powi(t))));
        let inv_denom = v
            .scale(Scalar::new(1.0 / (1.0 - beta2.powi(t))))
            .map(|x| 1.0 / (x.sqrt() + epsilon));
        let update = m_hat.mul(&inv_denom).scale(Scalar::new(-learning_rate));

        self.m = Some(m);
        self.v = Some(v);
        params.add(&update)
    }

    fn reset(&mut self) {
        self.t = 0;
        self.m = None;
        self.v = None;
    }
}
