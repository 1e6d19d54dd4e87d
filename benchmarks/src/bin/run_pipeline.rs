use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use benchmarks::{synthetic_cars, BenchmarkStats, Timer};
use clap::{Parser, ValueEnum};
#[cfg(feature = "ndarray")]
use horsepower_regression::backend::NdarrayBackend;
#[cfg(feature = "http")]
use horsepower_regression::data::HttpSource;
use horsepower_regression::data::{DataError, DataSource, JsonFileSource, RawRecord, StaticSource};
use horsepower_regression::logging::install_logger;
use horsepower_regression::viz::{JsonLinesSink, VisualizationSink};
use horsepower_regression::{run_pipeline_on, CpuBackend, PipelineConfig, PipelineReport};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    Cpu,
    /// Needs the `ndarray` feature
    Ndarray,
}

/// Train the horsepower to km-per-liter regressor and stream its plots as JSON lines.
#[derive(Parser)]
struct Cli {
    /// JSON file with an array of raw car records
    #[arg(short, long, value_name = "PATH")]
    data: Option<PathBuf>,
    /// Fetch the records from this URL (needs the `http` feature)
    #[arg(long)]
    url: Option<String>,
    /// Number of synthetic records used when neither --data nor --url is given
    #[arg(long, value_name = "INT", default_value_t = 400)]
    synthetic: usize,
    /// Pipeline settings as JSON; the flags below override it
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(short, long, value_name = "INT")]
    epochs: Option<usize>,
    #[arg(long, value_name = "INT")]
    batch_size: Option<usize>,
    #[arg(long)]
    learning_rate: Option<f64>,
    #[arg(long)]
    seed: Option<u64>,
    /// Write events to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,
    /// Tensor backend used for training and prediction
    #[arg(long, value_enum, default_value_t = BackendKind::Cpu)]
    backend: BackendKind,
    /// Run the pipeline this many times and log timing statistics
    #[arg(long, value_name = "INT", default_value_t = 1)]
    repeat: usize,
}

enum Source {
    File(JsonFileSource),
    Static(StaticSource),
    #[cfg(feature = "http")]
    Http(HttpSource),
}

impl DataSource for Source {
    async fn fetch(&self) -> Result<Vec<RawRecord>, DataError> {
        match self {
            Source::File(s) => s.fetch().await,
            Source::Static(s) => s.fetch().await,
            #[cfg(feature = "http")]
            Source::Http(s) => s.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Source::File(s) => s.describe(),
            Source::Static(s) => s.describe(),
            #[cfg(feature = "http")]
            Source::Http(s) => s.describe(),
        }
    }
}

fn select_source(cli: &Cli) -> Result<Source, Box<dyn Error>> {
    if let Some(url) = &cli.url {
        #[cfg(feature = "http")]
        return Ok(Source::Http(HttpSource::new(url.clone())));
        #[cfg(not(feature = "http"))]
        return Err(format!("cannot fetch {}: built without the `http` feature", url).into());
    }
    Ok(match &cli.data {
        Some(path) => Source::File(JsonFileSource::new(path.clone())),
        None => Source::Static(StaticSource::new(synthetic_cars(
            cli.synthetic,
            cli.seed.unwrap_or(0),
        ))),
    })
}

fn load_config(cli: &Cli) -> Result<PipelineConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => PipelineConfig::default(),
    };
    if let Some(epochs) = cli.epochs {
        config = config.epochs(epochs);
    }
    if let Some(batch_size) = cli.batch_size {
        config = config.batch_size(batch_size);
    }
    if let Some(learning_rate) = cli.learning_rate {
        config = config.learning_rate(learning_rate);
    }
    if cli.seed.is_some() {
        config = config.seed(cli.seed);
    }
    Ok(config)
}

async fn run_once<S, V>(
    backend: BackendKind,
    source: &S,
    sink: &mut V,
    config: &PipelineConfig,
) -> Result<PipelineReport, Box<dyn Error>>
where
    S: DataSource,
    V: VisualizationSink,
{
    match backend {
        BackendKind::Cpu => Ok(run_pipeline_on::<CpuBackend, _, _>(source, sink, config).await?),
        #[cfg(feature = "ndarray")]
        BackendKind::Ndarray => {
            Ok(run_pipeline_on::<NdarrayBackend, _, _>(source, sink, config).await?)
        }
        #[cfg(not(feature = "ndarray"))]
        BackendKind::Ndarray => Err("built without the `ndarray` feature".into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    install_logger()?;
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let source = select_source(&cli)?;
    let writer: Box<dyn Write> = match &cli.out {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    let mut sink = JsonLinesSink::new(writer);

    let mut times = Vec::with_capacity(cli.repeat);
    for run in 0..cli.repeat.max(1) {
        let mut timer = Timer::new();
        timer.start();
        let report = run_once(cli.backend, &source, &mut sink, &config).await?;
        timer.stop();
        times.push(timer.total_ms());

        if let Some(last) = report.training.final_metrics() {
            tracing::info!(
                run,
                records = report.clean_records,
                loss = last.loss,
                mse = last.mse,
                elapsed_ms = timer.total_ms(),
                "pipeline finished"
            );
        }
    }

    if let Some(stats) = BenchmarkStats::from_times(times).filter(|s| s.runs > 1) {
        tracing::info!(
            backend = ?cli.backend,
            runs = stats.runs,
            mean_ms = stats.mean_ms,
            std_dev_ms = stats.std_dev_ms,
            median_ms = stats.median_ms,
            min_ms = stats.min_ms,
            max_ms = stats.max_ms,
            "timing summary"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use horsepower_regression::viz::RecordingSink;

    #[test]
    fn test_backend_flag() {
        let cli = Cli::try_parse_from(["run_pipeline"]).unwrap();
        assert_eq!(cli.backend, BackendKind::Cpu);

        let cli = Cli::try_parse_from(["run_pipeline", "--backend", "ndarray"]).unwrap();
        assert_eq!(cli.backend, BackendKind::Ndarray);
    }

    #[tokio::test]
    async fn test_run_once_on_each_backend() {
        let source = StaticSource::new(synthetic_cars(60, 3));
        let config = PipelineConfig::default().epochs(2).seed(Some(3));

        let cpu = run_once(BackendKind::Cpu, &source, &mut RecordingSink::new(), &config)
            .await
            .unwrap();
        assert_eq!(cpu.training.epochs.len(), 2);

        let nd = run_once(BackendKind::Ndarray, &source, &mut RecordingSink::new(), &config).await;
        assert_eq!(nd.is_ok(), cfg!(feature = "ndarray"));
    }
}
