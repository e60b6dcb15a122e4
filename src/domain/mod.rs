//! Domain data shapes shared across layers

pub mod category;
pub mod filter;
pub mod record;

pub use category::{CasteGroup, CasteSelector, Category};
pub use filter::{FilterState, FilterWarning, FILTER_KEYS};
pub use record::{parse_leading_int, RankValue, RecordId, StudentRecord};
