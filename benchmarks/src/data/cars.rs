use horsepower_regression::data::RawRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generator for raw car records.
///
/// Horsepower is drawn uniformly from the range of the real dataset and
/// fuel economy falls linearly with it, plus uniform noise. A share of the
/// records has one field missing, so the filter has work to do.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticCars {
    pub samples: usize,
    /// Probability that a record loses one of its two fields.
    pub missing_rate: f64,
    /// Half-width of the noise added to miles per gallon.
    pub noise: f64,
    pub seed: u64,
}

impl Default for SyntheticCars {
    fn default() -> Self {
        Self {
            samples: 400,
            missing_rate: 0.02,
            noise: 2.0,
            seed: 0,
        }
    }
}

impl SyntheticCars {
    pub fn generate(&self) -> Vec<RawRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..self.samples)
            .map(|_| {
                let horsepower = rng.gen_range(46.0_f64..=230.0).round();
                let noise = rng.gen_range(-self.noise..=self.noise);
                let mpg = (45.0 - 0.14 * horsepower + noise).max(9.0);
                if rng.gen_bool(self.missing_rate) {
                    if rng.gen_bool(0.5) {
                        RawRecord::new(None, Some(horsepower))
                    } else {
                        RawRecord::new(Some(mpg), None)
                    }
                } else {
                    RawRecord::new(Some(mpg), Some(horsepower))
                }
            })
            .collect()
    }
}

/// `samples` records from the default generator with the given seed.
pub fn synthetic_cars(samples: usize, seed: u64) -> Vec<RawRecord> {
    SyntheticCars {
        samples,
        seed,
        ..SyntheticCars::default()
    }
    .generate()
}
