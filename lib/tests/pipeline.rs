//! End-to-end runs of `run_pipeline` against in-memory and file sources.
//!
//! These tests check:
//! - One finite epoch report per epoch, in order
//! - The prediction sweep spans the observed horsepower range
//! - Constant columns and empty inputs fail before training
//! - Sink call order and failure handling
//! - Backends agree on a seeded run

use approx::assert_abs_diff_eq;
use horsepower_regression::data::{JsonFileSource, RawRecord, StaticSource};
use horsepower_regression::model::ModelSummary;
use horsepower_regression::pipeline::{
    DATA_PLOT_NAME, MODEL_SUMMARY_NAME, PREDICTION_PLOT_NAME,
};
use horsepower_regression::trainer::{CancellationFlag, EpochMetrics};
use horsepower_regression::viz::{
    MultiSeriesPlot, PlotOptions, RecordingSink, ScatterPlot, SinkError, SinkEvent,
    VisualizationSink,
};
use horsepower_regression::{run_pipeline, run_pipeline_on, CpuBackend, PipelineConfig, PipelineError};
use std::io::Write;

/// 300 usable cars, horsepower 46..=230, efficiency falling with horsepower,
/// plus a handful of incomplete rows.
fn synthetic_cars() -> Vec<RawRecord> {
    let mut records: Vec<RawRecord> = (0..300)
        .map(|i| {
            let hp = 46.0 + (i % 185) as f64;
            let noise = ((i * 7) % 5) as f64 * 0.3;
            RawRecord::new(Some(46.0 - 0.15 * hp + noise), Some(hp))
        })
        .collect();
    records.push(RawRecord::new(None, Some(120.0)));
    records.push(RawRecord::new(Some(20.0), None));
    records.push(RawRecord::new(None, None));
    records
}

fn seeded(epochs: usize) -> PipelineConfig {
    PipelineConfig::default().epochs(epochs).seed(Some(42))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FailOn {
    Scatterplot,
    Summary,
    EpochEnd,
    Series,
}

/// Records everything like `RecordingSink`, but rejects one kind of call.
struct FailingSink {
    inner: RecordingSink,
    fail_on: FailOn,
}

impl FailingSink {
    fn new(fail_on: FailOn) -> Self {
        Self {
            inner: RecordingSink::new(),
            fail_on,
        }
    }

    fn check(&self, call: FailOn) -> Result<(), SinkError> {
        if self.fail_on == call {
            Err(SinkError::Rejected(format!("{:?} unavailable", call)))
        } else {
            Ok(())
        }
    }
}

impl VisualizationSink for FailingSink {
    fn render_scatterplot(
        &mut self,
        name: &str,
        data: &ScatterPlot,
        options: &PlotOptions,
    ) -> Result<(), SinkError> {
        self.check(FailOn::Scatterplot)?;
        self.inner.render_scatterplot(name, data, options)
    }

    fn render_series(
        &mut self,
        name: &str,
        data: &MultiSeriesPlot,
        options: &PlotOptions,
    ) -> Result<(), SinkError> {
        self.check(FailOn::Series)?;
        self.inner.render_series(name, data, options)
    }

    fn show_model_summary(&mut self, name: &str, summary: &ModelSummary) -> Result<(), SinkError> {
        self.check(FailOn::Summary)?;
        self.inner.show_model_summary(name, summary)
    }

    fn on_epoch_end(&mut self, metrics: &EpochMetrics) -> Result<(), SinkError> {
        self.check(FailOn::EpochEnd)?;
        self.inner.on_epoch_end(metrics)
    }
}

#[tokio::test]
async fn test_reports_every_epoch_with_finite_metrics() {
    let source = StaticSource::new(synthetic_cars());
    let mut sink = RecordingSink::new();

    let report = run_pipeline(&source, &mut sink, &seeded(50)).await.unwrap();

    let reports = sink.epoch_reports();
    assert_eq!(reports.len(), 50);
    for (i, metrics) in reports.iter().enumerate() {
        assert_eq!(metrics.epoch, i);
        assert!(metrics.is_finite(), "epoch {} not finite: {:?}", i, metrics);
    }
    assert_eq!(report.training.epochs, reports);
    assert_eq!(report.training.report_failures, 0);
    assert_eq!(report.raw_records, 303);
    assert_eq!(report.clean_records, 300);

    let first = reports.first().unwrap().loss;
    let last = reports.last().unwrap().loss;
    assert!(last < first, "loss did not improve: {} -> {}", first, last);
}

#[tokio::test]
async fn test_prediction_sweep_spans_horsepower_range() {
    let source = StaticSource::new(synthetic_cars());
    let mut sink = RecordingSink::new();

    let report = run_pipeline(&source, &mut sink, &seeded(10)).await.unwrap();

    let predicted = &report.predictions.predicted;
    assert_eq!(predicted.len(), 300);
    assert_abs_diff_eq!(predicted[0].x, 46.0, epsilon = 1e-9);
    assert_abs_diff_eq!(predicted[299].x, 230.0, epsilon = 1e-9);
    assert!(predicted.windows(2).all(|w| w[1].x > w[0].x));
    assert!(predicted.iter().all(|p| p.y.is_finite()));

    assert_eq!(report.predictions.original.len(), 300);
    assert_abs_diff_eq!(report.normalization.input_min, 46.0);
    assert_abs_diff_eq!(report.normalization.input_max, 230.0);
}

#[tokio::test]
async fn test_sink_call_order() {
    let source = StaticSource::new(synthetic_cars());
    let mut sink = RecordingSink::new();

    run_pipeline(&source, &mut sink, &seeded(50)).await.unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 1 + 1 + 50 + 1);

    match &events[0] {
        SinkEvent::Scatterplot {
            name,
            data,
            options,
        } => {
            assert_eq!(name, DATA_PLOT_NAME);
            assert_eq!(data.values.len(), 300);
            assert_eq!(options.x_label.as_deref(), Some("Horsepower"));
            assert_eq!(options.y_label.as_deref(), Some("Km per Liter"));
            assert_eq!(options.height, Some(300));
        }
        other => panic!("expected scatterplot first, got {:?}", other),
    }
    match &events[1] {
        SinkEvent::ModelSummary { name, summary } => {
            assert_eq!(name, MODEL_SUMMARY_NAME);
            assert_eq!(summary.layers.len(), 2);
            assert_eq!(summary.total_params, 4);
        }
        other => panic!("expected model summary second, got {:?}", other),
    }
    assert!(events[2..52]
        .iter()
        .all(|e| matches!(e, SinkEvent::EpochEnd { .. })));
    match &events[52] {
        SinkEvent::Series { name, data, .. } => {
            assert_eq!(name, PREDICTION_PLOT_NAME);
            assert_eq!(data.series, vec!["original", "predicted"]);
            assert_eq!(data.values.len(), 2);
            assert_eq!(data.values[1].len(), 300);
        }
        other => panic!("expected prediction series last, got {:?}", other),
    }
}

#[tokio::test]
async fn test_constant_horsepower_fails_before_training() {
    let records = (0..20)
        .map(|i| RawRecord::new(Some(15.0 + i as f64), Some(100.0)))
        .collect();
    let source = StaticSource::new(records);
    let mut sink = RecordingSink::new();

    let err = run_pipeline(&source, &mut sink, &seeded(50)).await.unwrap_err();

    match err {
        PipelineError::DegenerateRange { column } => assert_eq!(column, "horsepower"),
        other => panic!("expected DegenerateRange, got {:?}", other),
    }
    assert!(sink.epoch_reports().is_empty());
}

#[tokio::test]
async fn test_constant_efficiency_fails_before_training() {
    let records = (0..20)
        .map(|i| RawRecord::new(Some(25.0), Some(80.0 + i as f64)))
        .collect();
    let source = StaticSource::new(records);
    let mut sink = RecordingSink::new();

    let err = run_pipeline(&source, &mut sink, &seeded(50)).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::DegenerateRange { ref column } if column == "efficiency"
    ));
    assert!(sink.epoch_reports().is_empty());
}

#[tokio::test]
async fn test_no_usable_records_touches_no_sink() {
    for records in [
        Vec::new(),
        vec![RawRecord::new(None, Some(90.0)), RawRecord::new(Some(30.0), None)],
    ] {
        let source = StaticSource::new(records);
        let mut sink = RecordingSink::new();

        let err = run_pipeline(&source, &mut sink, &seeded(50)).await.unwrap_err();

        assert!(matches!(err, PipelineError::InsufficientData));
        assert!(sink.events().is_empty());
    }
}

#[tokio::test]
async fn test_single_record_is_degenerate() {
    let source = StaticSource::new(vec![RawRecord::new(Some(18.0), Some(130.0))]);
    let mut sink = RecordingSink::new();

    let err = run_pipeline(&source, &mut sink, &seeded(5)).await.unwrap_err();

    assert!(matches!(err, PipelineError::DegenerateRange { .. }));
}

#[tokio::test]
async fn test_failed_render_aborts_run() {
    let source = StaticSource::new(synthetic_cars());

    let mut sink = FailingSink::new(FailOn::Series);
    let err = run_pipeline(&source, &mut sink, &seeded(5)).await.unwrap_err();
    assert!(matches!(err, PipelineError::Sink(SinkError::Rejected(_))));
    assert_eq!(sink.inner.epoch_reports().len(), 5);

    let mut sink = FailingSink::new(FailOn::Scatterplot);
    let err = run_pipeline(&source, &mut sink, &seeded(5)).await.unwrap_err();
    assert!(matches!(err, PipelineError::Sink(_)));
    assert!(sink.inner.events().is_empty());

    let mut sink = FailingSink::new(FailOn::Summary);
    let err = run_pipeline(&source, &mut sink, &seeded(5)).await.unwrap_err();
    assert!(matches!(err, PipelineError::Sink(_)));
    assert!(sink.inner.epoch_reports().is_empty());
}

#[tokio::test]
async fn test_failed_epoch_reports_do_not_stop_training() {
    let source = StaticSource::new(synthetic_cars());
    let mut sink = FailingSink::new(FailOn::EpochEnd);

    let report = run_pipeline(&source, &mut sink, &seeded(8)).await.unwrap();

    assert_eq!(report.training.epochs.len(), 8);
    assert_eq!(report.training.report_failures, 8);
    assert_eq!(report.predictions.predicted.len(), 300);
    assert!(matches!(
        sink.inner.events().last(),
        Some(SinkEvent::Series { .. })
    ));
}

#[tokio::test]
async fn test_same_seed_same_run() {
    let source = StaticSource::new(synthetic_cars());

    let a = run_pipeline(&source, &mut RecordingSink::new(), &seeded(5))
        .await
        .unwrap();
    let b = run_pipeline(&source, &mut RecordingSink::new(), &seeded(5))
        .await
        .unwrap();

    assert_eq!(a.training, b.training);
    assert_eq!(a.predictions, b.predictions);
}

#[tokio::test]
async fn test_run_pipeline_is_the_cpu_backend_run() {
    let source = StaticSource::new(synthetic_cars());

    let default = run_pipeline(&source, &mut RecordingSink::new(), &seeded(3))
        .await
        .unwrap();
    let mut sink = RecordingSink::new();
    let explicit = run_pipeline_on::<CpuBackend, _, _>(&source, &mut sink, &seeded(3))
        .await
        .unwrap();

    assert_eq!(default.training, explicit.training);
    assert_eq!(default.predictions, explicit.predictions);
}

#[cfg(feature = "ndarray")]
#[tokio::test]
async fn test_ndarray_backend_matches_cpu_backend() {
    use horsepower_regression::backend::NdarrayBackend;

    let source = StaticSource::new(synthetic_cars());
    let mut cpu_sink = RecordingSink::new();
    let mut sink = RecordingSink::new();

    let cpu = run_pipeline_on::<CpuBackend, _, _>(&source, &mut cpu_sink, &seeded(5))
        .await
        .unwrap();
    let nd = run_pipeline_on::<NdarrayBackend, _, _>(&source, &mut sink, &seeded(5))
        .await
        .unwrap();

    assert_eq!(sink.events().len(), 2 + 5 + 1);
    assert_eq!(cpu.normalization, nd.normalization);
    assert_eq!(cpu.training.epochs.len(), nd.training.epochs.len());
    for (a, b) in cpu.training.epochs.iter().zip(&nd.training.epochs) {
        assert_abs_diff_eq!(a.loss, b.loss, epsilon = 1e-9);
    }
    assert_eq!(cpu.predictions.original, nd.predictions.original);
    for (a, b) in cpu.predictions.predicted.iter().zip(&nd.predictions.predicted) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-6);
    }
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let flag = CancellationFlag::new();
    flag.cancel();
    let source = StaticSource::new(synthetic_cars());
    let mut sink = RecordingSink::new();

    let err = run_pipeline(&source, &mut sink, &seeded(50).cancel_on(flag))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Cancelled { epoch: 0 }));
    assert!(sink.epoch_reports().is_empty());
}

#[tokio::test]
async fn test_invalid_config_is_rejected_up_front() {
    let source = StaticSource::new(synthetic_cars());
    let mut sink = RecordingSink::new();

    let err = run_pipeline(&source, &mut sink, &seeded(5).batch_size(0))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::InvalidConfig(_)));
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn test_json_file_source() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let mut rows = Vec::new();
    for i in 0..60 {
        let hp = 60.0 + 2.5 * i as f64;
        rows.push(serde_json::json!({
            "Name": format!("car {}", i),
            "Miles_per_Gallon": 42.0 - 0.12 * hp,
            "Horsepower": hp,
            "Origin": "USA",
        }));
    }
    rows.push(serde_json::json!({ "Name": "no mpg", "Miles_per_Gallon": null, "Horsepower": 95 }));
    rows.push(serde_json::json!({ "Name": "no hp", "Miles_per_Gallon": 25 }));
    write!(file, "{}", serde_json::Value::Array(rows)).unwrap();

    let source = JsonFileSource::new(file.path());
    let mut sink = RecordingSink::new();
    let report = run_pipeline(&source, &mut sink, &seeded(3)).await.unwrap();

    assert_eq!(report.raw_records, 62);
    assert_eq!(report.clean_records, 60);
    assert_eq!(report.training.epochs.len(), 3);
}

#[tokio::test]
async fn test_missing_file_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonFileSource::new(dir.path().join("cars.json"));
    let mut sink = RecordingSink::new();

    let err = run_pipeline(&source, &mut sink, &seeded(3)).await.unwrap_err();

    assert!(matches!(err, PipelineError::DataUnavailable(_)));
    assert!(sink.events().is_empty());
}
