use serde::{Serialize, Serializer};
use std::fmt;

use crate::domain::{Category, FilterState, RecordId, StudentRecord};

/// One column of a projected result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    InstCode,
    InstituteName,
    BranchCode,
    DistCode,
    Rank(Category),
}

impl ColumnKey {
    pub const IDENTITY: [ColumnKey; 4] = [
        ColumnKey::InstCode,
        ColumnKey::InstituteName,
        ColumnKey::BranchCode,
        ColumnKey::DistCode,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ColumnKey::InstCode => "Inst Code",
            ColumnKey::InstituteName => "Institute",
            ColumnKey::BranchCode => "Branch",
            ColumnKey::DistCode => "District",
            ColumnKey::Rank(category) => category.label(),
        }
    }

    pub fn is_rank(self) -> bool {
        matches!(self, ColumnKey::Rank(_))
    }

    /// Cell text for `record`. Rank cells carry the raw value, or an empty
    /// placeholder when the field is absent.
    pub fn cell(self, record: &StudentRecord) -> String {
        match self {
            ColumnKey::InstCode => record.inst_code.clone(),
            ColumnKey::InstituteName => record.institute_name.clone(),
            ColumnKey::BranchCode => record.branch_code.clone(),
            ColumnKey::DistCode => record.dist_code.clone(),
            ColumnKey::Rank(category) => {
                record.rank(category).map(ToString::to_string).unwrap_or_default()
            }
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ColumnKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Columns a query produces: the identity columns, then one rank column in
/// single-category mode or all 18 in canonical order otherwise.
pub fn project_columns(filter: &FilterState) -> Vec<ColumnKey> {
    let mut columns = ColumnKey::IDENTITY.to_vec();
    match filter.caste.single_category() {
        Some(category) => columns.push(ColumnKey::Rank(category)),
        None => columns.extend(Category::ALL.into_iter().map(ColumnKey::Rank)),
    }
    columns
}

/// A record reduced to the cells named by a column list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedRow {
    pub id: RecordId,
    pub cells: Vec<String>,
}

impl ProjectedRow {
    /// Institute code cell; identity columns always lead the row.
    pub fn inst_code(&self) -> &str {
        self.cells.first().map(String::as_str).unwrap_or_default()
    }
}

pub fn project_row(record: &StudentRecord, columns: &[ColumnKey]) -> ProjectedRow {
    ProjectedRow {
        id: record.id.clone(),
        cells: columns.iter().map(|column| column.cell(record)).collect(),
    }
}

pub fn project(records: &[StudentRecord], columns: &[ColumnKey]) -> Vec<ProjectedRow> {
    records.iter().map(|record| project_row(record, columns)).collect()
}
