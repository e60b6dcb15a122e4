use anyhow::Result;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

use seat_matrix::export::{ExportDocument, ExportFormat, ExportHeader, PageSize};
use seat_matrix::pipeline::{decode_value, resolve};
use seat_matrix::FilterState;

fn records() -> Vec<seat_matrix::StudentRecord> {
    decode_value(json!([
        { "_id": "1", "instCode": "VJEC", "instituteName": "VNR VJIET",
          "branchCode": "CSE", "distCode": "MDL", "ocBoys": 2400, "ocGirls": 2900 },
        { "_id": "2", "instCode": "cvrh", "instituteName": "CVR College",
          "branchCode": "CSE", "distCode": "RR", "ocBoys": "3100" }
    ]))
    .unwrap()
    .records
}

#[test]
fn single_category_export_is_five_columns_on_a4() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("nested").join("students.csv");

    let result = resolve(records(), &FilterState::new().with_caste("OC Boys"));
    let header = ExportHeader {
        name: "Asha".to_string(),
        rank: "2500".to_string(),
        caste: "OC Girls".to_string(),
    };
    let doc = ExportDocument { title: "Students Data", header: &header, result: &result };
    assert_eq!(doc.page_size(), PageSize::A4);
    doc.write_to(&path, ExportFormat::Csv)?;

    let text = fs::read_to_string(&path)?;
    let table: Vec<_> = text.split("\n\n").nth(1).unwrap().lines().collect();
    assert_eq!(table[0], "Inst Code,Institute,Branch,District,OC Boys");
    assert_eq!(table[1], "cvrh,CVR College,CSE,RR,3100");
    assert_eq!(table[2], "VJEC,VNR VJIET,CSE,MDL,2400");
    Ok(())
}

#[test]
fn full_matrix_tsv_has_22_columns() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("students.tsv");

    let result = resolve(records(), &FilterState::new());
    let header = ExportHeader::default();
    let doc = ExportDocument { title: "Students Data", header: &header, result: &result };
    assert_eq!(doc.page_size(), PageSize::A3);
    doc.write_to(&path, ExportFormat::Tsv)?;

    let text = fs::read_to_string(&path)?;
    assert!(text.contains("Page\tA3"));
    let table: Vec<_> = text.split("\n\n").nth(1).unwrap().lines().collect();
    assert_eq!(table.len(), 3);
    assert!(table.iter().all(|line| line.split('\t').count() == 22));
    Ok(())
}

#[test]
fn empty_result_exports_headers_only() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("students.json");

    let result = resolve(records(), &FilterState::new().with_branch("MEC"));
    assert!(result.is_empty());
    let header = ExportHeader::default();
    let doc = ExportDocument { title: "Students Data", header: &header, result: &result };
    doc.write_to(&path, ExportFormat::Json)?;

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(value["columns"].as_array().unwrap().len(), 22);
    assert!(value["rows"].as_array().unwrap().is_empty());
    assert_eq!(value["header"]["name"], "");

    let csv = doc.render(ExportFormat::Csv)?;
    let table: Vec<_> = csv.split("\n\n").nth(1).unwrap().lines().collect();
    assert_eq!(table.len(), 1);
    Ok(())
}
