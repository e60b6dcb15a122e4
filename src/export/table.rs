use std::fmt::Write;

use crate::pipeline::ResultSet;

pub const NO_RESULTS: &str = "No results found for the selected filters.";

/// Fixed-width text table for terminal display
pub fn render_table(result: &ResultSet) -> String {
    let headers = result.headers();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &result.rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);

    if result.is_empty() {
        out.push_str(NO_RESULTS);
        out.push('\n');
        return out;
    }
    for row in &result.rows {
        push_line(&mut out, row.cells.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.zip(widths).enumerate() {
        if i > 0 {
            line.push_str(" | ");
        }
        let _ = write!(line, "{:<width$}", cell, width = *width);
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, FilterState, StudentRecord};
    use crate::pipeline::resolve;

    #[test]
    fn aligns_cells_under_headers() {
        let record = StudentRecord {
            inst_code: "JNTH".to_string(),
            institute_name: "JNTU College of Engineering".to_string(),
            branch_code: "CSE".to_string(),
            dist_code: "HYD".to_string(),
            ..StudentRecord::new("1")
        }
        .with_rank(Category::OcBoys, 1200);
        let result = resolve(vec![record], &FilterState::new().with_caste("OC Boys"));

        let table = render_table(&result);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Inst Code | Institute"));
        assert!(lines[2].starts_with("JNTH      | JNTU College of Engineering | CSE"));
        assert!(lines[2].ends_with("1200"));
    }

    #[test]
    fn empty_result_shows_no_results_line() {
        let result = resolve(Vec::new(), &FilterState::new());
        let table = render_table(&result);
        assert!(table.lines().next().unwrap().contains("EWS Girls OU"));
        assert_eq!(table.lines().last(), Some(NO_RESULTS));
    }
}
