//! Collaborators that produce raw records.

use std::path::PathBuf;

use super::{DataError, RawRecord};

/// Location of the public cars dataset the pipeline was built around.
pub const DEFAULT_DATA_URL: &str = "https://storage.googleapis.com/tfjs-tutorials/carsData.json";

/// Something that can asynchronously hand over the full list of raw records.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    async fn fetch(&self) -> Result<Vec<RawRecord>, DataError>;

    /// Short human-readable description, used in log lines.
    fn describe(&self) -> String;
}

/// Records held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<RawRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}

impl DataSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<RawRecord>, DataError> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }
}

/// A JSON file holding an array of raw records.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<RawRecord>, DataError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DataError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A JSON array of raw records served over HTTP(S).
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpSource {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_URL)
    }
}

#[cfg(feature = "http")]
impl DataSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<RawRecord>, DataError> {
        let records = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<RawRecord>>()
            .await?;
        Ok(records)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_static_source_returns_records() {
        let source = StaticSource::new(vec![RawRecord::new(Some(20.0), Some(100.0))]);
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(source.describe(), "1 in-memory records");
    }

    #[tokio::test]
    async fn test_json_file_source_reads_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"Miles_per_Gallon": 18, "Horsepower": 130}}, {{"Miles_per_Gallon": null, "Horsepower": 90}}]"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].miles_per_gallon, None);
    }

    #[tokio::test]
    async fn test_json_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("absent.json"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, DataError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_json_file_source_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"not": "an array"}}"#).unwrap();

        let err = JsonFileSource::new(file.path()).fetch().await.unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }
}
