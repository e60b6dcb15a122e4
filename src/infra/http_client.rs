use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use crate::app::ports::StudentSourcePort;
use crate::config::SourceConfig;
use crate::constants::STUDENTS_PATH;
use crate::domain::FilterState;
use crate::error::{Result, SeatError, SourceFailure};
use crate::pipeline::{decode_records, Ingested};

/// `GET {base_url}/students` over HTTP
pub struct ReqwestStudentSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
    forward_filters: bool,
}

impl ReqwestStudentSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SeatError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: format!("{}{}", config.base_url.trim_end_matches('/'), STUDENTS_PATH),
            timeout,
            forward_filters: config.forward_filters,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build the request for `filter`; "no filter" dimensions are left out
    /// of the query string.
    pub fn build_request(&self, filter: &FilterState) -> reqwest::Result<reqwest::Request> {
        let mut request = self.client.get(&self.url);
        if self.forward_filters {
            request = request.query(&filter.query_pairs());
        }
        request.build()
    }

    fn classify(&self, err: reqwest::Error) -> SeatError {
        if err.is_timeout() {
            SourceFailure::Timeout(self.timeout).into()
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl StudentSourcePort for ReqwestStudentSource {
    async fn fetch(&self, filter: &FilterState) -> Result<Ingested> {
        let request = self.build_request(filter).map_err(|e| self.classify(e))?;
        info!(url = %request.url(), "fetching student records");

        let resp = self.client.execute(request).await.map_err(|e| self.classify(e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceFailure::Status(status.as_u16()).into());
        }
        let bytes = resp.bytes().await.map_err(|e| self.classify(e))?;
        debug!(bytes = bytes.len(), "received response body");

        decode_records(&bytes)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
