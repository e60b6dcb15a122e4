pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod logging;
pub mod pipeline;

// Domain data shapes shared across layers
pub mod domain;

// Use-cases with their ports, and the adapters that implement them
pub mod app;
pub mod infra;

pub use domain::{CasteGroup, CasteSelector, Category, FilterState, RankValue, StudentRecord};
pub use error::{Result, SeatError, SourceFailure};
pub use pipeline::{resolve, ColumnKey, ResultSet};
