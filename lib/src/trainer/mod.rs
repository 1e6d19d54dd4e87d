use crate::{
    backend::{Backend, Scalar, Tensor1D, Tensor2D},
    dataset::Dataset,
    loss::{Loss, MSELoss},
    model::{ParamOps, TrainableModel},
    optimizer::Optimizer,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Metrics reported at the end of every epoch.
///
/// `epoch` is the zero-based epoch index. `loss` is the training loss and
/// `mse` the mean squared error, both averaged over all samples of the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub loss: f64,
    pub mse: f64,
}

impl EpochMetrics {
    pub fn is_finite(&self) -> bool {
        self.loss.is_finite() && self.mse.is_finite()
    }
}

/// Receives [`EpochMetrics`] synchronously before the next epoch starts.
pub trait EpochObserver {
    type Error: fmt::Display;

    fn on_epoch_end(&mut self, metrics: &EpochMetrics) -> Result<(), Self::Error>;
}

impl EpochObserver for () {
    type Error = std::convert::Infallible;

    fn on_epoch_end(&mut self, _metrics: &EpochMetrics) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl EpochObserver for Vec<EpochMetrics> {
    type Error = std::convert::Infallible;

    fn on_epoch_end(&mut self, metrics: &EpochMetrics) -> Result<(), Self::Error> {
        self.push(*metrics);
        Ok(())
    }
}

/// Shared flag that asks a running [`Trainer::fit`] to stop.
///
/// Checked before every batch.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a completed training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingLog {
    pub epochs: Vec<EpochMetrics>,
    /// Epoch reports the observer failed to accept.
    pub report_failures: usize,
}

impl TrainingLog {
    pub fn final_metrics(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }
}

/// Error type for training runs.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingError {
    EmptyDataset,
    InvalidConfig(String),
    /// A batch could not be loaded from the dataset.
    Data(String),
    /// The epoch loss, or a parameter after the epoch's last update, became NaN or infinite.
    NumericDivergence { epoch: usize, loss: f64 },
    Cancelled { epoch: usize },
}

impl fmt::Display for TrainingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingError::EmptyDataset => write!(f, "Dataset is empty"),
            TrainingError::InvalidConfig(msg) => write!(f, "Invalid trainer config: {}", msg),
            TrainingError::Data(msg) => write!(f, "Data error: {}", msg),
            TrainingError::NumericDivergence { epoch, loss } => {
                write!(f, "Training diverged at epoch {}: loss = {}", epoch, loss)
            }
            TrainingError::Cancelled { epoch } => {
                write!(f, "Training cancelled during epoch {}", epoch)
            }
        }
    }
}

impl std::error::Error for TrainingError {}

/// Orchestrates the training loop for a `TrainableModel`.
///
/// Once built via [`TrainerBuilder`] it is immutable and can be reused across
/// runs: every call to [`fit`](Trainer::fit) starts from a fresh copy of the
/// optimizer.
pub struct Trainer<B, L, O>
where
    B: Backend,
    L: Loss<B>,
{
    pub(crate) batch_size: usize,
    pub(crate) max_epochs: usize,
    pub(crate) shuffle: bool,
    pub(crate) seed: Option<u64>,
    pub(crate) verbose: bool,
    pub(crate) cancel: Option<CancellationFlag>,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    _phantom_backend: PhantomData<B>,
}

/// Fluent builder for constructing a `Trainer` with custom hyperparameters.
///
/// Defaults:
/// - `batch_size`: 32
/// - `max_epochs`: 50
/// - `shuffle`: true
/// - `seed`: none (shuffling is seeded from entropy)
/// - `verbose`: true
pub struct TrainerBuilder<B, L, O>
where
    B: Backend,
    L: Loss<B>,
{
    batch_size: usize,
    max_epochs: usize,
    shuffle: bool,
    seed: Option<u64>,
    verbose: bool,
    cancel: Option<CancellationFlag>,
    loss_fn: L,
    optimizer: O,
    _phantom_backend: PhantomData<B>,
}

impl<B, L, O> TrainerBuilder<B, L, O>
where
    B: Backend,
    L: Loss<B>,
{
    pub fn new(loss_fn: L, optimizer: O) -> Self {
        Self {
            batch_size: 32,
            max_epochs: 50,
            shuffle: true,
            seed: None,
            verbose: true,
            cancel: None,
            loss_fn,
            optimizer,
            _phantom_backend: PhantomData,
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// Reshuffle the sample order at the start of every epoch.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// When `true`, per-epoch losses are logged at `info` level instead of `debug`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn cancel_on(mut self, flag: CancellationFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn build(self) -> Trainer<B, L, O> {
        Trainer {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            shuffle: self.shuffle,
            seed: self.seed,
            verbose: self.verbose,
            cancel: self.cancel,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            _phantom_backend: PhantomData,
        }
    }
}

impl<B, L, O> Trainer<B, L, O>
where
    B: Backend,
    L: Loss<B>,
{
    /// Convenience constructor that starts the builder pattern.
    pub fn builder(loss_fn: L, optimizer: O) -> TrainerBuilder<B, L, O> {
        TrainerBuilder::new(loss_fn, optimizer)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn max_epochs(&self) -> usize {
        self.max_epochs
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationFlag::is_cancelled)
    }
}

impl<B, L, O> Trainer<B, L, O>
where
    B: Backend,
    L: Loss<B, Target = Tensor1D<B>, Prediction = Tensor1D<B>>,
{
    /// Trains `model` in place for `max_epochs` epochs.
    ///
    /// Each epoch walks the dataset in mini-batches (in a fresh random order
    /// when shuffling), applies one optimizer step per batch, then hands the
    /// epoch's metrics to `observer` and yields to the async runtime.
    ///
    /// Observer failures are logged and counted in
    /// [`TrainingLog::report_failures`]; they never stop training.
    ///
    /// # Errors
    /// - [`TrainingError::EmptyDataset`] / [`TrainingError::InvalidConfig`]
    ///   before any step is taken.
    /// - [`TrainingError::NumericDivergence`] after reporting the first epoch
    ///   whose loss or updated parameters are not finite.
    /// - [`TrainingError::Cancelled`] when the cancellation flag is set.
    /// - [`TrainingError::Data`] when a batch fails to load.
    pub async fn fit<M, P, D, Obs>(
        &self,
        model: &mut M,
        dataset: &D,
        observer: &mut Obs,
    ) -> Result<TrainingLog, TrainingError>
    where
        M: TrainableModel<B, Input = Tensor2D<B>, Prediction = Tensor1D<B>, Params = P, Gradients = P>,
        P: ParamOps<B>,
        O: Optimizer<B, P> + Clone,
        D: Dataset,
        Obs: EpochObserver,
    {
        if self.batch_size == 0 {
            return Err(TrainingError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        let n_total = dataset
            .len()
            .ok_or_else(|| TrainingError::InvalidConfig("dataset length unknown".to_string()))?;
        if n_total == 0 {
            return Err(TrainingError::EmptyDataset);
        }

        let mut optimizer = self.optimizer.clone();
        optimizer.reset();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut order: Vec<usize> = (0..n_total).collect();
        let mut log = TrainingLog::default();

        tracing::debug!(
            samples = n_total,
            batch_size = self.batch_size,
            epochs = self.max_epochs,
            "starting training"
        );

        for epoch in 0..self.max_epochs {
            if self.shuffle {
                order.shuffle(&mut rng);
            }

            let mut loss_sum = 0.0;
            let mut mse_sum = 0.0;
            for batch in dataset.batches_in_order::<B>(self.batch_size, order.clone()) {
                if self.is_cancelled() {
                    tracing::info!(epoch, "training cancelled");
                    return Err(TrainingError::Cancelled { epoch });
                }
                let (batch_x, batch_y) = batch.map_err(|e| TrainingError::Data(format!("{:?}", e)))?;
                let batch_n = Scalar::<B>::new(batch_y.len() as f64);

                let preds = model.forward(&batch_x);
                loss_sum += (self.loss_fn.loss(&preds, &batch_y) * batch_n).to_f64();
                mse_sum += (Loss::<B>::loss(&MSELoss, &preds, &batch_y) * batch_n).to_f64();

                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
                let grads = model.backward(&batch_x, &grad_preds);
                let new_params = optimizer.step(model.params(), &grads);
                model.update_params(&new_params);
            }

            let metrics = EpochMetrics {
                epoch,
                loss: loss_sum / n_total as f64,
                mse: mse_sum / n_total as f64,
            };
            if self.verbose {
                tracing::info!(epoch, loss = metrics.loss, mse = metrics.mse, "epoch finished");
            } else {
                tracing::debug!(epoch, loss = metrics.loss, mse = metrics.mse, "epoch finished");
            }

            if let Err(e) = observer.on_epoch_end(&metrics) {
                log.report_failures += 1;
                tracing::warn!(epoch, error = %e, "epoch report rejected by observer");
            }
            log.epochs.push(metrics);

            if !metrics.loss.is_finite() || !model.params().all_finite() {
                tracing::error!(epoch, loss = metrics.loss, "training diverged");
                return Err(TrainingError::NumericDivergence {
                    epoch,
                    loss: metrics.loss,
                });
            }

            tokio::task::yield_now().await;
        }

        Ok(log)
    }
}
