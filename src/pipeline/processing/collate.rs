use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::StudentRecord;

/// Base-level collation key: lowercase, decompose, then drop combining marks.
pub fn collation_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase).nfd() {
        if is_combining_mark(c) {
            continue;
        }
        // Letters with no canonical decomposition
        match c {
            'ß' => key.push_str("ss"),
            'æ' => key.push_str("ae"),
            'œ' => key.push_str("oe"),
            'ı' => key.push('i'),
            'ł' => key.push('l'),
            'ø' => key.push('o'),
            'đ' => key.push('d'),
            other => key.push(other),
        }
    }
    key
}

pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

/// Order records by institute code under base-level collation. The sort is
/// stable, so codes that collate equal keep their incoming order.
pub fn sort(mut records: Vec<StudentRecord>) -> Vec<StudentRecord> {
    records.sort_by_cached_key(|r| collation_key(&r.inst_code));
    records
}
