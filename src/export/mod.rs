//! Rendering of a [`ResultSet`] for export.
//!
//! The exported table has exactly the columns and row order of the result
//! set. A short free-text header block (student name, rank, caste) and a
//! page-size hint accompany it; neither affects which rows are exported.

pub mod delimited;
pub mod table;

pub use table::{render_table, NO_RESULTS};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::error::{Result, SeatError};
use crate::pipeline::ResultSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            other => Err(SeatError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ext())
    }
}

/// Page-size hint: a single-category result fits a narrower page than the
/// full category matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageSize {
    A4,
    A3,
}

impl PageSize {
    pub fn for_result(result: &ResultSet) -> Self {
        if result.single_category().is_some() {
            PageSize::A4
        } else {
            PageSize::A3
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::A4 => f.write_str("A4"),
            PageSize::A3 => f.write_str("A3"),
        }
    }
}

/// Free-text labels printed above the table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportHeader {
    pub name: String,
    pub rank: String,
    pub caste: String,
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

impl ExportHeader {
    fn lines(&self) -> [(&'static str, &str); 3] {
        [
            ("Name", or_dash(&self.name)),
            ("Rank", or_dash(&self.rank)),
            ("Caste", or_dash(&self.caste)),
        ]
    }
}

pub struct ExportDocument<'a> {
    pub title: &'a str,
    pub header: &'a ExportHeader,
    pub result: &'a ResultSet,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    title: &'a str,
    generated_at: String,
    header: &'a ExportHeader,
    page_size: PageSize,
    columns: Vec<&'static str>,
    rows: Vec<&'a [String]>,
}

impl<'a> ExportDocument<'a> {
    pub fn page_size(&self) -> PageSize {
        PageSize::for_result(self.result)
    }

    /// Render the document. Zero rows yields the header block and column
    /// headers only.
    pub fn render(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Csv => self.render_delimited(','),
            ExportFormat::Tsv => self.render_delimited('\t'),
            ExportFormat::Json => {
                let doc = JsonDocument {
                    title: self.title,
                    generated_at: Utc::now().to_rfc3339(),
                    header: self.header,
                    page_size: self.page_size(),
                    columns: self.result.headers(),
                    rows: self.result.rows.iter().map(|r| r.cells.as_slice()).collect(),
                };
                Ok(serde_json::to_string_pretty(&doc)?)
            }
        }
    }

    fn render_delimited(&self, sep: char) -> Result<String> {
        let mut out: Vec<u8> = Vec::new();
        delimited::write_row(&mut out, &[self.title], sep)?;
        for (label, value) in self.header.lines() {
            delimited::write_row(&mut out, &[label, value], sep)?;
        }
        let page = self.page_size().to_string();
        delimited::write_row(&mut out, &["Page", page.as_str()], sep)?;
        out.push(b'\n');

        delimited::write_row(&mut out, &self.result.headers(), sep)?;
        for row in &self.result.rows {
            delimited::write_row(&mut out, &row.cells, sep)?;
        }
        String::from_utf8(out)
            .map_err(|e| SeatError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// Render and write to `path`, creating parent directories
    pub fn write_to(&self, path: &Path, format: ExportFormat) -> Result<()> {
        let text = self.render(format)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, text)?;
        info!(
            path = %path.display(),
            rows = self.result.len(),
            columns = self.result.columns.len(),
            page = %self.page_size(),
            "export written"
        );
        Ok(())
    }
}
