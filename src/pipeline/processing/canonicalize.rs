use std::collections::HashMap;
use tracing::debug;

use crate::domain::{RecordId, StudentRecord};

/// Collapse records sharing an `id`; the last occurrence wins outright.
///
/// Callers must not rely on the output order. It is deterministic for a
/// given input (first-seen key order) so that resolving the same input
/// twice gives the same tie-breaks in the collator.
pub fn canonicalize(raw: Vec<StudentRecord>) -> Vec<StudentRecord> {
    let total = raw.len();
    let mut slots: HashMap<RecordId, usize> = HashMap::with_capacity(total);
    let mut unique: Vec<StudentRecord> = Vec::with_capacity(total);

    for record in raw {
        match slots.get(&record.id) {
            Some(&slot) => unique[slot] = record,
            None => {
                slots.insert(record.id.clone(), unique.len());
                unique.push(record);
            }
        }
    }

    if unique.len() < total {
        debug!(total, unique = unique.len(), "collapsed duplicate record ids");
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, inst_code: &str) -> StudentRecord {
        StudentRecord { inst_code: inst_code.to_string(), ..StudentRecord::new(id) }
    }

    #[test]
    fn last_occurrence_wins_without_merging() {
        let mut first = record("x1", "B");
        first.institute_name = "Old Name".to_string();
        let second = record("x1", "A");

        let out = canonicalize(vec![first, second]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].inst_code, "A");
        assert_eq!(out[0].institute_name, "");
    }

    #[test]
    fn distinct_ids_are_all_kept() {
        let raw = vec![record("a", "1"), record("b", "2"), record("a", "3"), record("c", "4")];
        let out = canonicalize(raw);
        let ids: Vec<_> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(out[0].inst_code, "3");
    }

    #[test]
    fn empty_input() {
        assert!(canonicalize(Vec::new()).is_empty());
    }
}
