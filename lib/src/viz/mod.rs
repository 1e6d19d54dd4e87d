//! Visualization-sink contract and the in-tree sinks.
//!
//! The pipeline talks to a charting surface through [`VisualizationSink`].
//! Payloads serialize to the shapes charting front ends expect:
//!
//! ```text
//! scatterplot: {"values": [{"x": .., "y": ..}], "xLabel": .., "yLabel": .., "height": ..}
//! series:      {"values": [[..], [..]], "series": ["original", "predicted"]}
//! ```

mod error;
mod jsonl;
mod recording;

pub use error::SinkError;
pub use jsonl::JsonLinesSink;
pub use recording::RecordingSink;

use serde::{Deserialize, Serialize};

use crate::model::ModelSummary;
use crate::trainer::{EpochMetrics, EpochObserver};

/// One point of a scatterplot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Single-series scatterplot data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPlot {
    pub values: Vec<Point>,
}

/// Several named series drawn on the same axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSeriesPlot {
    pub values: Vec<Vec<Point>>,
    pub series: Vec<String>,
}

/// Axis labels and height of a plot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl PlotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }
}

/// Everything a sink can be asked to do, as a serializable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SinkEvent {
    Scatterplot {
        name: String,
        data: ScatterPlot,
        options: PlotOptions,
    },
    Series {
        name: String,
        data: MultiSeriesPlot,
        options: PlotOptions,
    },
    ModelSummary {
        name: String,
        summary: ModelSummary,
    },
    EpochEnd {
        #[serde(flatten)]
        metrics: EpochMetrics,
    },
}

/// A charting surface the pipeline reports to.
pub trait VisualizationSink {
    fn render_scatterplot(
        &mut self,
        name: &str,
        data: &ScatterPlot,
        options: &PlotOptions,
    ) -> Result<(), SinkError>;

    fn render_series(
        &mut self,
        name: &str,
        data: &MultiSeriesPlot,
        options: &PlotOptions,
    ) -> Result<(), SinkError>;

    fn show_model_summary(&mut self, name: &str, summary: &ModelSummary) -> Result<(), SinkError>;

    /// Called once per epoch, in epoch order.
    fn on_epoch_end(&mut self, metrics: &EpochMetrics) -> Result<(), SinkError>;
}

impl<S: VisualizationSink + ?Sized> VisualizationSink for &mut S {
    fn render_scatterplot(
        &mut self,
        name: &str,
        data: &ScatterPlot,
        options: &PlotOptions,
    ) -> Result<(), SinkError> {
        (**self).render_scatterplot(name, data, options)
    }

    fn render_series(
        &mut self,
        name: &str,
        data: &MultiSeriesPlot,
        options: &PlotOptions,
    ) -> Result<(), SinkError> {
        (**self).render_series(name, data, options)
    }

    fn show_model_summary(&mut self, name: &str, summary: &ModelSummary) -> Result<(), SinkError> {
        (**self).show_model_summary(name, summary)
    }

    fn on_epoch_end(&mut self, metrics: &EpochMetrics) -> Result<(), SinkError> {
        (**self).on_epoch_end(metrics)
    }
}

/// Forwards trainer epoch reports to a sink.
pub struct EpochReporter<'a, S: VisualizationSink + ?Sized>(pub &'a mut S);

impl<S: VisualizationSink + ?Sized> EpochObserver for EpochReporter<'_, S> {
    type Error = SinkError;

    fn on_epoch_end(&mut self, metrics: &EpochMetrics) -> Result<(), Self::Error> {
        self.0.on_epoch_end(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scatterplot_payload_shape() {
        let data = ScatterPlot {
            values: vec![Point { x: 130.0, y: 7.6 }],
        };
        let options = PlotOptions::new()
            .x_label("Horsepower")
            .y_label("Km per Liter")
            .height(300);

        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"values": [{"x": 130.0, "y": 7.6}]})
        );
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"xLabel": "Horsepower", "yLabel": "Km per Liter", "height": 300})
        );
    }

    #[test]
    fn test_empty_options_serialize_to_empty_object() {
        assert_eq!(serde_json::to_value(PlotOptions::new()).unwrap(), json!({}));
    }

    #[test]
    fn test_series_payload_shape() {
        let plot = MultiSeriesPlot {
            values: vec![vec![Point { x: 1.0, y: 2.0 }], vec![]],
            series: vec!["original".into(), "predicted".into()],
        };
        assert_eq!(
            serde_json::to_value(&plot).unwrap(),
            json!({"values": [[{"x": 1.0, "y": 2.0}], []], "series": ["original", "predicted"]})
        );
    }

    #[test]
    fn test_epoch_event_is_flat() {
        let event = SinkEvent::EpochEnd {
            metrics: EpochMetrics {
                epoch: 4,
                loss: 0.5,
                mse: 0.5,
            },
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "epochEnd", "epoch": 4, "loss": 0.5, "mse": 0.5})
        );
    }

    #[test]
    fn test_epoch_reporter_forwards() {
        let mut sink = RecordingSink::new();
        let mut reporter = EpochReporter(&mut sink);
        let metrics = EpochMetrics {
            epoch: 0,
            loss: 1.0,
            mse: 1.0,
        };
        reporter.on_epoch_end(&metrics).unwrap();
        assert_eq!(sink.epoch_reports(), vec![metrics]);
    }
}
