use crate::model::ModelSummary;
use crate::trainer::EpochMetrics;
use crate::viz::{MultiSeriesPlot, PlotOptions, ScatterPlot, SinkError, SinkEvent, VisualizationSink};

/// Keeps every request in memory, in call order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<SinkEvent> {
        self.events
    }

    pub fn epoch_reports(&self) -> Vec<EpochMetrics> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::EpochEnd { metrics } => Some(*metrics),
                _ => None,
            })
            .collect()
    }
}

impl VisualizationSink for RecordingSink {
    fn render_scatterplot(
        &mut self,
        name: &str,
        data: &ScatterPlot,
        options: &PlotOptions,
    ) -> Result<(), SinkError> {
        self.events.push(SinkEvent::Scatterplot {
            name: name.to_string(),
            data: data.clone(),
            options: options.clone(),
        });
        Ok(())
    }

    fn render_series(
        &mut self,
        name: &str,
        data: &MultiSeriesPlot,
        options: &PlotOptions,
    ) -> Result<(), SinkError> {
        self.events.push(SinkEvent::Series {
            name: name.to_string(),
            data: data.clone(),
            options: options.clone(),
        });
        Ok(())
    }

    fn show_model_summary(&mut self, name: &str, summary: &ModelSummary) -> Result<(), SinkError> {
        self.events.push(SinkEvent::ModelSummary {
            name: name.to_string(),
            summary: summary.clone(),
        });
        Ok(())
    }

    fn on_epoch_end(&mut self, metrics: &EpochMetrics) -> Result<(), SinkError> {
        self.events.push(SinkEvent::EpochEnd { metrics: *metrics });
        Ok(())
    }
}
