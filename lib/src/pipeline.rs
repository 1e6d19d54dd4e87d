//! The end-to-end run: fetch, filter, plot, build, normalize, train, predict, plot.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, CpuBackend};
use crate::data::{filter_records, DataError, DataSource};
use crate::dataset::InMemoryDataset;
use crate::loss::MSELoss;
use crate::model::{SequentialRegressor, TrainableModel, Unfitted};
use crate::optimizer::Adam;
use crate::predictor::{predict_series, PredictionSeries, DEFAULT_PREDICTION_SAMPLES};
use crate::preprocessing::{build_tensors, normalize, NormalizationParams, PreprocessingError};
use crate::trainer::{CancellationFlag, Trainer, TrainingError, TrainingLog};
use crate::viz::{
    EpochReporter, MultiSeriesPlot, PlotOptions, Point, ScatterPlot, SinkError, VisualizationSink,
};

pub const DATA_PLOT_NAME: &str = "Horsepower v Km per Liter";
pub const MODEL_SUMMARY_NAME: &str = "Model Summary";
pub const PREDICTION_PLOT_NAME: &str = "Model Predictions vs Original Data";
pub const ORIGINAL_SERIES: &str = "original";
pub const PREDICTED_SERIES: &str = "predicted";

const X_LABEL: &str = "Horsepower";
const Y_LABEL: &str = "Km per Liter";
const PLOT_HEIGHT: u32 = 300;

/// Run settings. Every field has a default, so `{}` is a valid JSON config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub batch_size: usize,
    pub epochs: usize,
    pub shuffle: bool,
    pub learning_rate: f64,
    pub prediction_samples: usize,
    /// Seeds initialization and shuffling; `None` draws from entropy.
    pub seed: Option<u64>,
    #[serde(skip)]
    pub cancel: Option<CancellationFlag>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            epochs: 50,
            shuffle: true,
            learning_rate: 0.001,
            prediction_samples: DEFAULT_PREDICTION_SAMPLES,
            seed: None,
            cancel: None,
        }
    }
}

impl PipelineConfig {
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn prediction_samples(mut self, samples: usize) -> Self {
        self.prediction_samples = samples;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn cancel_on(mut self, flag: CancellationFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.prediction_samples == 0 {
            return Err(PipelineError::InvalidConfig(
                "prediction_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub raw_records: usize,
    pub clean_records: usize,
    pub normalization: NormalizationParams,
    pub training: TrainingLog,
    pub predictions: PredictionSeries,
}

/// Fatal pipeline errors. No partial result accompanies any of them.
#[derive(Debug)]
pub enum PipelineError {
    InvalidConfig(String),
    /// The data source failed to deliver or its payload was malformed.
    DataUnavailable(DataError),
    /// No usable records after filtering.
    InsufficientData,
    DegenerateRange { column: String },
    NumericDivergence { epoch: usize, loss: f64 },
    Cancelled { epoch: usize },
    /// A plot or summary could not be rendered.
    Sink(SinkError),
    /// A component failed in a way the other variants do not describe.
    Internal(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidConfig(msg) => write!(f, "Invalid pipeline config: {}", msg),
            PipelineError::DataUnavailable(err) => write!(f, "{}", err),
            PipelineError::InsufficientData => {
                write!(f, "Insufficient data: no usable records after filtering")
            }
            PipelineError::DegenerateRange { column } => {
                write!(f, "Degenerate range: column '{}' is constant", column)
            }
            PipelineError::NumericDivergence { epoch, loss } => {
                write!(f, "Training diverged at epoch {}: loss = {}", epoch, loss)
            }
            PipelineError::Cancelled { epoch } => {
                write!(f, "Training cancelled during epoch {}", epoch)
            }
            PipelineError::Sink(err) => write!(f, "{}", err),
            PipelineError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::DataUnavailable(err) => Some(err),
            PipelineError::Sink(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DataError> for PipelineError {
    fn from(err: DataError) -> Self {
        PipelineError::DataUnavailable(err)
    }
}

impl From<SinkError> for PipelineError {
    fn from(err: SinkError) -> Self {
        PipelineError::Sink(err)
    }
}

impl From<PreprocessingError> for PipelineError {
    fn from(err: PreprocessingError) -> Self {
        match err {
            PreprocessingError::InsufficientData(_) => PipelineError::InsufficientData,
            PreprocessingError::DegenerateRange { column } => {
                PipelineError::DegenerateRange { column }
            }
            other => PipelineError::Internal(other.to_string()),
        }
    }
}

impl From<TrainingError> for PipelineError {
    fn from(err: TrainingError) -> Self {
        match err {
            TrainingError::NumericDivergence { epoch, loss } => {
                PipelineError::NumericDivergence { epoch, loss }
            }
            TrainingError::Cancelled { epoch } => PipelineError::Cancelled { epoch },
            TrainingError::InvalidConfig(msg) => PipelineError::InvalidConfig(msg),
            TrainingError::EmptyDataset => PipelineError::InsufficientData,
            other => PipelineError::Internal(other.to_string()),
        }
    }
}

fn plot_options() -> PlotOptions {
    PlotOptions::new()
        .x_label(X_LABEL)
        .y_label(Y_LABEL)
        .height(PLOT_HEIGHT)
}

/// Runs one full training and prediction cycle against `source` and `sink`
/// on the always-available [`CpuBackend`].
///
/// Sink calls happen in this order: the raw-data scatterplot, the model
/// summary, one epoch report per epoch, and the prediction comparison.
/// Nothing reaches the sink when the source fails or yields no usable
/// records. A failed epoch report is logged and training continues; any
/// other sink failure aborts the run.
pub async fn run_pipeline<S, V>(
    source: &S,
    sink: &mut V,
    config: &PipelineConfig,
) -> Result<PipelineReport, PipelineError>
where
    S: DataSource,
    V: VisualizationSink,
{
    run_pipeline_on::<CpuBackend, S, V>(source, sink, config).await
}

/// [`run_pipeline`] with the tensor backend chosen by the caller.
///
/// Given the same seed, every backend draws the same initial weights and
/// batch order, so runs differ only by floating-point rounding.
#[tracing::instrument(
    skip_all,
    fields(
        backend = std::any::type_name::<B>(),
        source = %source.describe(),
        epochs = config.epochs
    )
)]
pub async fn run_pipeline_on<B, S, V>(
    source: &S,
    sink: &mut V,
    config: &PipelineConfig,
) -> Result<PipelineReport, PipelineError>
where
    B: Backend,
    S: DataSource,
    V: VisualizationSink,
{
    config.validate()?;

    let raw = source.fetch().await?;
    let records = filter_records(&raw);
    tracing::info!(raw = raw.len(), clean = records.len(), "loaded records");
    if records.is_empty() {
        return Err(PipelineError::InsufficientData);
    }

    let scatter = ScatterPlot {
        values: records
            .iter()
            .map(|r| Point {
                x: r.horsepower,
                y: r.efficiency,
            })
            .collect(),
    };
    sink.render_scatterplot(DATA_PLOT_NAME, &scatter, &plot_options())?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut model = SequentialRegressor::<B, Unfitted>::new(1, &mut rng);
    sink.show_model_summary(MODEL_SUMMARY_NAME, &model.summary())?;

    let data = {
        let pair = build_tensors::<B>(&records)?;
        normalize(&pair, &mut rng)?
    };
    let normalization = data.params();
    tracing::info!(?normalization, "normalized training data");

    let training = {
        let dataset = InMemoryDataset::from_normalized(&data);
        let optimizer = Adam::<B, _>::new(config.learning_rate);
        let mut builder = Trainer::<B, _, _>::builder(MSELoss, optimizer)
            .batch_size(config.batch_size)
            .max_epochs(config.epochs)
            .shuffle(config.shuffle)
            .seed(Some(rng.gen()))
            .verbose(false);
        if let Some(flag) = &config.cancel {
            builder = builder.cancel_on(flag.clone());
        }
        builder
            .build()
            .fit(&mut model, &dataset, &mut EpochReporter(&mut *sink))
            .await?
    };
    if let Some(last) = training.final_metrics() {
        tracing::info!(
            epochs = training.epochs.len(),
            loss = last.loss,
            report_failures = training.report_failures,
            "training finished"
        );
    }

    let fitted = model.into_fitted();
    let predictions = predict_series(&fitted, &data, &records, config.prediction_samples)?;

    let comparison = MultiSeriesPlot {
        values: vec![predictions.original.clone(), predictions.predicted.clone()],
        series: vec![ORIGINAL_SERIES.to_string(), PREDICTED_SERIES.to_string()],
    };
    sink.render_series(PREDICTION_PLOT_NAME, &comparison, &plot_options())?;
    tracing::info!(points = predictions.predicted.len(), "rendered predictions");

    Ok(PipelineReport {
        raw_records: raw.len(),
        clean_records: records.len(),
        normalization,
        training,
        predictions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.batch_size, 32);
        assert_eq!(config.epochs, 50);
        assert!(config.shuffle);
        assert_eq!(config.learning_rate, 0.001);
        assert_eq!(config.prediction_samples, 300);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: PipelineConfig = serde_json::from_str(r#"{"epochs": 5, "seed": 7}"#).unwrap();
        assert_eq!(config.epochs, 5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.batch_size, 32);
    }

    #[test]
    fn test_config_validation() {
        assert!(PipelineConfig::default().validate().is_ok());
        assert!(matches!(
            PipelineConfig::default().batch_size(0).validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
        assert!(matches!(
            PipelineConfig::default().learning_rate(-1.0).validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
        assert!(matches!(
            PipelineConfig::default().prediction_samples(0).validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_error_conversions() {
        let err: PipelineError = PreprocessingError::DegenerateRange {
            column: "horsepower".into(),
        }
        .into();
        assert!(
            matches!(err, PipelineError::DegenerateRange { ref column } if column == "horsepower")
        );

        let err: PipelineError = TrainingError::Cancelled { epoch: 2 }.into();
        assert!(matches!(err, PipelineError::Cancelled { epoch: 2 }));

        let err: PipelineError = DataError::Unavailable("offline".into()).into();
        assert!(err.to_string().contains("offline"));
    }
}
