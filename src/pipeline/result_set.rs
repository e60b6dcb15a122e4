use serde::Serialize;

use super::processing::{ColumnKey, ProjectedRow};
use crate::domain::Category;

/// `{columns, rows}`: the single contract shared by display and export.
/// Every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<ColumnKey>,
    pub rows: Vec<ProjectedRow>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.label()).collect()
    }

    /// The rank category when this is a single-category result
    pub fn single_category(&self) -> Option<Category> {
        let mut ranks = self.columns.iter().filter_map(|c| match c {
            ColumnKey::Rank(category) => Some(*category),
            _ => None,
        });
        match (ranks.next(), ranks.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    /// Cell for a row and column, if the column is projected
    pub fn cell<'a>(&self, row: &'a ProjectedRow, column: ColumnKey) -> Option<&'a str> {
        let index = self.columns.iter().position(|c| *c == column)?;
        row.cells.get(index).map(String::as_str)
    }
}
