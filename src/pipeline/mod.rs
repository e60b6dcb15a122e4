// Record pipeline: ingestion, then canonicalize -> filter -> sort -> project

pub mod ingestion;
pub mod processing;
pub mod result_set;

pub use ingestion::{decode_records, decode_value, IngestReport, Ingested};
pub use processing::{ColumnKey, ProjectedRow};
pub use result_set::ResultSet;

use tracing::{debug, warn};

use crate::domain::{FilterState, StudentRecord};

/// Turn a raw record set and a filter into the deduplicated, sorted,
/// column-projected result. Pure: the same inputs always give the same
/// result, and nothing is retained between calls.
pub fn resolve(raw: Vec<StudentRecord>, filter: &FilterState) -> ResultSet {
    for warning in filter.warnings() {
        warn!(%warning, "filter will not match as expected");
    }

    let columns = processing::project_columns(filter);
    let received = raw.len();
    let unique = processing::canonicalize(raw);
    let matched = processing::filter_all(unique, filter);
    let sorted = processing::sort(matched);
    let rows = processing::project(&sorted, &columns);

    debug!(received, rows = rows.len(), columns = columns.len(), "resolved result set");
    ResultSet { columns, rows }
}
