use std::io::Write;

use crate::model::ModelSummary;
use crate::trainer::EpochMetrics;
use crate::viz::{MultiSeriesPlot, PlotOptions, ScatterPlot, SinkError, SinkEvent, VisualizationSink};

/// Writes one JSON object per request, newline-delimited.
///
/// ```
/// use horsepower_regression::viz::{JsonLinesSink, VisualizationSink};
/// use horsepower_regression::trainer::EpochMetrics;
///
/// let mut sink = JsonLinesSink::new(Vec::new());
/// sink.on_epoch_end(&EpochMetrics { epoch: 0, loss: 0.25, mse: 0.25 }).unwrap();
/// let out = String::from_utf8(sink.into_inner()).unwrap();
/// assert_eq!(out, "{\"event\":\"epochEnd\",\"epoch\":0,\"loss\":0.25,\"mse\":0.25}\n");
/// ```
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, event: &SinkEvent) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> VisualizationSink for JsonLinesSink<W> {
    fn render_scatterplot(
        &mut self,
        name: &str,
        data: &ScatterPlot,
        options: &PlotOptions,
    ) -> Result<(), SinkError> {
        self.emit(&SinkEvent::Scatterplot {
            name: name.to_string(),
            data: data.clone(),
            options: options.clone(),
        })
    }

    fn render_series(
        &mut self,
        name: &str,
        data: &MultiSeriesPlot,
        options: &PlotOptions,
    ) -> Result<(), SinkError> {
        self.emit(&SinkEvent::Series {
            name: name.to_string(),
            data: data.clone(),
            options: options.clone(),
        })
    }

    fn show_model_summary(&mut self, name: &str, summary: &ModelSummary) -> Result<(), SinkError> {
        self.emit(&SinkEvent::ModelSummary {
            name: name.to_string(),
            summary: summary.clone(),
        })
    }

    fn on_epoch_end(&mut self, metrics: &EpochMetrics) -> Result<(), SinkError> {
        self.emit(&SinkEvent::EpochEnd { metrics: *metrics })
    }
}
