pub mod ports;
pub mod search_use_case;

pub use search_use_case::{SearchController, SearchEvent, SearchOutcome, ViewState};
