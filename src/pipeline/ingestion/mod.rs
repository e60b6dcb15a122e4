use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::StudentRecord;
use crate::error::{Result, SeatError};

/// Outcome of decoding one response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub accepted: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone)]
pub struct Ingested {
    pub records: Vec<StudentRecord>,
    pub report: IngestReport,
}

/// Decode a response body into records. The body must be a JSON array;
/// elements that do not fit the record schema are dropped and counted.
pub fn decode_records(bytes: &[u8]) -> Result<Ingested> {
    let body: Value = serde_json::from_slice(bytes)
        .map_err(|e| SeatError::malformed(format!("response is not JSON: {}", e)))?;
    decode_value(body)
}

pub fn decode_value(body: Value) -> Result<Ingested> {
    let elements = match body {
        Value::Array(elements) => elements,
        other => {
            return Err(SeatError::malformed(format!(
                "expected an array of records, found {}",
                kind_of(&other)
            )))
        }
    };

    let mut report = IngestReport::default();
    let mut records = Vec::with_capacity(elements.len());
    for (index, mut element) in elements.into_iter().enumerate() {
        promote_id(&mut element);
        match serde_json::from_value::<StudentRecord>(element) {
            Ok(record) => {
                report.accepted += 1;
                records.push(record);
            }
            Err(e) => {
                report.rejected += 1;
                warn!(index, error = %e, "dropping malformed record");
            }
        }
    }

    debug!(accepted = report.accepted, rejected = report.rejected, "decoded records");
    Ok(Ingested { records, report })
}

/// Some sources send the key as `id`, others send both `_id` and `id`.
/// `_id` wins when present and non-null; `id` is dropped either way.
fn promote_id(element: &mut Value) {
    if let Value::Object(fields) = element {
        let has_key = fields.get("_id").map_or(false, |id| !id.is_null());
        if let Some(id) = fields.remove("id") {
            if !has_key {
                fields.insert("_id".to_string(), id);
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceFailure;
    use serde_json::json;

    #[test]
    fn decodes_arrays_and_flags_bad_elements() {
        let body = json!([
            { "_id": "a", "instCode": "X", "ocBoys": 10 },
            { "instCode": "no id" },
            "not an object",
            { "_id": "b", "scGirls": "220" }
        ]);
        let ingested = decode_value(body).unwrap();
        assert_eq!(ingested.report, IngestReport { accepted: 2, rejected: 2 });
        assert_eq!(ingested.records.len(), 2);
    }

    #[test]
    fn records_carrying_both_id_keys_are_kept() {
        let body = json!([
            { "_id": "64fa", "id": "64fa", "instCode": "A", "ocBoys": 10 },
            { "_id": "64fb", "instCode": "B" },
            { "id": 17, "instCode": "C" },
            { "_id": null, "id": "64fc", "instCode": "D" },
            { "_id": "64fd", "id": "other", "instCode": "E" }
        ]);
        let ingested = decode_value(body).unwrap();
        assert_eq!(ingested.report, IngestReport { accepted: 5, rejected: 0 });

        let ids: Vec<_> = ingested.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["64fa", "64fb", "17", "64fc", "64fd"]);
    }

    #[test]
    fn non_array_body_is_malformed() {
        let err = decode_value(json!({ "students": [] })).unwrap_err();
        match err {
            SeatError::SourceUnavailable(SourceFailure::Malformed(msg)) => {
                assert!(msg.contains("an object"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = decode_records(b"<html>").unwrap_err();
        assert!(err.is_source_unavailable());
    }

    #[test]
    fn empty_array_is_fine() {
        let ingested = decode_records(b"[]").unwrap();
        assert!(ingested.records.is_empty());
        assert_eq!(ingested.report, IngestReport::default());
    }
}
