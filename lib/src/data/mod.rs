//! Raw car records, the record filter and the data-source collaborators.
//!
//! The upstream dataset is a JSON array of car descriptions in which every
//! field may be `null`. Only two fields matter here: `Miles_per_Gallon` and
//! `Horsepower`. [`filter_records`] converts miles per gallon to kilometres
//! per litre and drops every record that does not end up with two finite
//! numbers.
//!
//! # Example
//! ```
//! use horsepower_regression::data::{filter_records, RawRecord};
//!
//! let raw = vec![
//!     RawRecord::new(Some(23.52), Some(100.0)),
//!     RawRecord::new(None, Some(90.0)),
//! ];
//! let clean = filter_records(&raw);
//! assert_eq!(clean.len(), 1);
//! assert!((clean[0].efficiency - 10.0).abs() < 1e-12);
//! ```

pub mod error;
pub mod source;

pub use error::DataError;
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{DataSource, JsonFileSource, StaticSource, DEFAULT_DATA_URL};

use serde::{Deserialize, Deserializer, Serialize};

/// Miles per US gallon in one kilometre per litre.
pub const MPG_PER_KM_PER_LITER: f64 = 2.352;

/// One entry of the upstream cars dataset.
///
/// Values that are `null`, missing, or not numbers at all deserialize to
/// `None`; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(
        rename = "Miles_per_Gallon",
        default,
        deserialize_with = "lenient_number"
    )]
    pub miles_per_gallon: Option<f64>,
    #[serde(rename = "Horsepower", default, deserialize_with = "lenient_number")]
    pub horsepower: Option<f64>,
}

impl RawRecord {
    pub fn new(miles_per_gallon: Option<f64>, horsepower: Option<f64>) -> Self {
        Self {
            miles_per_gallon,
            horsepower,
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// A validated `(horsepower, efficiency)` pair; efficiency is in km per litre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub horsepower: f64,
    pub efficiency: f64,
}

impl CleanRecord {
    /// Converts one raw record, or `None` if either field is unusable.
    ///
    /// The unit conversion runs first, so a record whose conversion produces
    /// a non-finite value is rejected by the same check as a missing one.
    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        let efficiency = raw.miles_per_gallon.map(|mpg| mpg / MPG_PER_KM_PER_LITER);
        match (raw.horsepower, efficiency) {
            (Some(horsepower), Some(efficiency))
                if horsepower.is_finite() && efficiency.is_finite() =>
            {
                Some(Self {
                    horsepower,
                    efficiency,
                })
            }
            _ => None,
        }
    }
}

/// Cleans raw records into [`CleanRecord`]s, dropping incomplete rows.
///
/// Input order is kept, although nothing downstream relies on it. An empty
/// result is valid output.
pub fn filter_records(raw: &[RawRecord]) -> Vec<CleanRecord> {
    let clean: Vec<CleanRecord> = raw.iter().filter_map(CleanRecord::from_raw).collect();
    tracing::debug!(
        kept = clean.len(),
        dropped = raw.len() - clean.len(),
        "filtered raw records"
    );
    clean
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_conversion_factor() {
        let clean = CleanRecord::from_raw(&RawRecord::new(Some(18.0), Some(130.0))).unwrap();
        assert_eq!(clean.horsepower, 130.0);
        assert!((clean.efficiency - 18.0 / 2.352).abs() < 1e-12);
    }

    #[test]
    fn test_missing_fields_are_dropped() {
        let raw = vec![
            RawRecord::new(None, Some(100.0)),
            RawRecord::new(Some(20.0), None),
            RawRecord::new(None, None),
            RawRecord::new(Some(20.0), Some(100.0)),
        ];
        let clean = filter_records(&raw);
        assert_eq!(clean.len(), 1);
        assert_eq!(clean[0].horsepower, 100.0);
    }

    #[test]
    fn test_non_finite_values_are_dropped() {
        let raw = vec![
            RawRecord::new(Some(f64::NAN), Some(100.0)),
            RawRecord::new(Some(20.0), Some(f64::INFINITY)),
        ];
        assert!(filter_records(&raw).is_empty());
    }

    #[test]
    fn test_empty_input_is_valid() {
        assert!(filter_records(&[]).is_empty());
    }

    #[test]
    fn test_deserialize_upstream_shape() {
        let json = r#"[
            {"Name": "chevrolet chevelle malibu", "Miles_per_Gallon": 18, "Cylinders": 8, "Horsepower": 130},
            {"Name": "citroen ds-21 pallas", "Miles_per_Gallon": null, "Horsepower": 115},
            {"Name": "ford pinto", "Miles_per_Gallon": 25},
            {"Name": "odd", "Miles_per_Gallon": "n/a", "Horsepower": 88}
        ]"#;
        let raw: Vec<RawRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(raw.len(), 4);
        assert_eq!(raw[0], RawRecord::new(Some(18.0), Some(130.0)));
        assert_eq!(raw[1], RawRecord::new(None, Some(115.0)));
        assert_eq!(raw[2], RawRecord::new(Some(25.0), None));
        assert_eq!(raw[3], RawRecord::new(None, Some(88.0)));

        assert_eq!(filter_records(&raw).len(), 1);
    }

    fn arb_field() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![
            Just(None),
            Just(Some(f64::NAN)),
            Just(Some(f64::INFINITY)),
            (-1.0e6..1.0e6f64).prop_map(Some),
        ]
    }

    proptest! {
        #[test]
        fn prop_filter_output_is_bounded_and_finite(
            raw in prop::collection::vec((arb_field(), arb_field()), 0..64)
        ) {
            let raw: Vec<RawRecord> = raw.into_iter().map(|(m, h)| RawRecord::new(m, h)).collect();
            let clean = filter_records(&raw);
            prop_assert!(clean.len() <= raw.len());
            for record in &clean {
                prop_assert!(record.horsepower.is_finite());
                prop_assert!(record.efficiency.is_finite());
            }
        }
    }
}
