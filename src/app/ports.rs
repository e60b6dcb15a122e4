use async_trait::async_trait;

use crate::domain::FilterState;
use crate::error::Result;
use crate::pipeline::Ingested;

/// Where raw student records come from. Implementations may use the filter
/// to narrow what they return, but the pipeline re-applies it regardless.
#[async_trait]
pub trait StudentSourcePort: Send + Sync {
    async fn fetch(&self, filter: &FilterState) -> Result<Ingested>;

    /// Short description for logs
    fn describe(&self) -> String;
}
