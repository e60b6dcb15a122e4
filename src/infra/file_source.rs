use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::app::ports::StudentSourcePort;
use crate::domain::FilterState;
use crate::error::{Result, SeatError, SourceFailure};
use crate::pipeline::{decode_records, Ingested};

/// Records from a local JSON file shaped like the HTTP response body.
/// The whole file is returned; filtering happens in the pipeline.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StudentSourcePort for JsonFileSource {
    async fn fetch(&self, _filter: &FilterState) -> Result<Ingested> {
        info!(path = %self.path.display(), "reading student records");
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            SeatError::SourceUnavailable(SourceFailure::Network(format!(
                "cannot read {}: {}",
                self.path.display(),
                e
            )))
        })?;
        decode_records(&bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_records_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"_id":"a","instCode":"X"}},{{"_id":"b"}}]"#).unwrap();

        let source = JsonFileSource::new(file.path());
        let ingested = source.fetch(&FilterState::new()).await.unwrap();
        assert_eq!(ingested.records.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_source_unavailable() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        let err = source.fetch(&FilterState::new()).await.unwrap_err();
        assert!(err.is_source_unavailable());
    }
}
