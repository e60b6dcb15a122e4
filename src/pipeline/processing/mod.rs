pub mod canonicalize;
pub mod collate;
pub mod filter;
pub mod projection;

pub use canonicalize::canonicalize;
pub use collate::{collate, collation_key, sort};
pub use filter::{filter_all, matches};
pub use projection::{project, project_columns, project_row, ColumnKey, ProjectedRow};
