use std::time::{Duration, Instant};

/// Timer for measuring elapsed time across `await` points.
#[derive(Debug)]
pub struct Timer {
    start: Option<Instant>,
    total: Duration,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: None,
            total: Duration::ZERO,
        }
    }

    pub fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    /// Stop the timer and add the elapsed time to the total.
    pub fn stop(&mut self) -> Duration {
        if let Some(start) = self.start.take() {
            let elapsed = start.elapsed();
            self.total += elapsed;
            elapsed
        } else {
            Duration::ZERO
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn total_ms(&self) -> f64 {
        self.total.as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of repeated run times, in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkStats {
    pub runs: usize,
    pub mean_ms: f64,
    pub std_dev_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub median_ms: f64,
}

impl BenchmarkStats {
    /// Returns `None` for an empty list.
    pub fn from_times(mut times: Vec<f64>) -> Option<Self> {
        if times.is_empty() {
            return None;
        }
        times.sort_by(f64::total_cmp);

        let n = times.len();
        let mean = times.iter().sum::<f64>() / n as f64;
        let variance = times.iter().map(|&t| (t - mean).powi(2)).sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (times[n / 2 - 1] + times[n / 2]) / 2.0
        } else {
            times[n / 2]
        };

        Some(Self {
            runs: n,
            mean_ms: mean,
            std_dev_ms: variance.sqrt(),
            min_ms: times[0],
            max_ms: times[n - 1],
            median_ms: median,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_accumulates() {
        let mut timer = Timer::new();
        assert_eq!(timer.stop(), Duration::ZERO);
        timer.start();
        std::thread::sleep(Duration::from_millis(2));
        let first = timer.stop();
        assert!(first >= Duration::from_millis(2));
        assert_eq!(timer.total(), first);
    }

    #[test]
    fn test_stats() {
        let stats = BenchmarkStats::from_times(vec![4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.runs, 4);
        assert_eq!(stats.mean_ms, 2.5);
        assert_eq!(stats.median_ms, 2.5);
        assert_eq!(stats.min_ms, 1.0);
        assert_eq!(stats.max_ms, 4.0);
        assert!((stats.std_dev_ms - 1.25_f64.sqrt()).abs() < 1e-12);

        assert!(BenchmarkStats::from_times(Vec::new()).is_none());
    }
}
