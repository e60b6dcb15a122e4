use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use super::category::Category;

/// Opaque record identifier (`_id` on the wire). Integers are kept in their
/// decimal form so that `7` and `"7"` collapse to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) if !s.is_empty() => Ok(RecordId(s)),
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(RecordId(n.to_string())),
            other => Err(serde::de::Error::custom(format!("invalid record id: {}", other))),
        }
    }
}

/// A rank exactly as the source sent it. Parsing happens in the filter
/// evaluator; display and export use the raw form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RankValue {
    Number(serde_json::Number),
    Text(String),
}

impl RankValue {
    /// Integer value of the rank, if it has one. Strings use their leading
    /// integer prefix; non-integral numbers truncate toward zero.
    pub fn parse_rank(&self) -> Option<i64> {
        match self {
            RankValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Some(i);
                }
                let f = n.as_f64()?;
                if f.is_finite() && f.abs() < i64::MAX as f64 {
                    Some(f.trunc() as i64)
                } else {
                    None
                }
            }
            RankValue::Text(s) => parse_leading_int(s),
        }
    }
}

impl fmt::Display for RankValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankValue::Number(n) => write!(f, "{}", n),
            RankValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RankValue {
    fn from(value: i64) -> Self {
        RankValue::Number(value.into())
    }
}

impl From<i32> for RankValue {
    fn from(value: i32) -> Self {
        RankValue::Number(value.into())
    }
}

impl From<&str> for RankValue {
    fn from(value: &str) -> Self {
        RankValue::Text(value.to_string())
    }
}

/// Parse the leading integer of `s`: optional whitespace, an optional sign,
/// then decimal digits. Anything after the digits is ignored.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn nullable_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(serde::de::Error::custom(format!("expected text, found {}", other))),
    }
}

/// One institute/branch admission-seat row as served by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "nullable_text")]
    pub inst_code: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub institute_name: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub branch_code: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub dist_code: String,

    pub oc_boys: Option<RankValue>,
    pub oc_girls: Option<RankValue>,
    pub bc_a_boys: Option<RankValue>,
    pub bc_a_girls: Option<RankValue>,
    pub bc_b_boys: Option<RankValue>,
    pub bc_b_girls: Option<RankValue>,
    pub bc_c_boys: Option<RankValue>,
    pub bc_c_girls: Option<RankValue>,
    pub bc_d_boys: Option<RankValue>,
    pub bc_d_girls: Option<RankValue>,
    pub bc_e_boys: Option<RankValue>,
    pub bc_e_girls: Option<RankValue>,
    pub sc_boys: Option<RankValue>,
    pub sc_girls: Option<RankValue>,
    pub st_boys: Option<RankValue>,
    pub st_girls: Option<RankValue>,
    pub ews_gen_ou: Option<RankValue>,
    pub ews_girls_ou: Option<RankValue>,
}

impl StudentRecord {
    /// A record with identity fields only and no ranks
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(id),
            inst_code: String::new(),
            institute_name: String::new(),
            branch_code: String::new(),
            dist_code: String::new(),
            oc_boys: None,
            oc_girls: None,
            bc_a_boys: None,
            bc_a_girls: None,
            bc_b_boys: None,
            bc_b_girls: None,
            bc_c_boys: None,
            bc_c_girls: None,
            bc_d_boys: None,
            bc_d_girls: None,
            bc_e_boys: None,
            bc_e_girls: None,
            sc_boys: None,
            sc_girls: None,
            st_boys: None,
            st_girls: None,
            ews_gen_ou: None,
            ews_girls_ou: None,
        }
    }

    pub fn rank(&self, category: Category) -> Option<&RankValue> {
        self.rank_slot(category).as_ref()
    }

    pub fn set_rank(&mut self, category: Category, value: Option<RankValue>) {
        *self.rank_slot_mut(category) = value;
    }

    /// Builder used by fixtures and the file source
    pub fn with_rank(mut self, category: Category, value: impl Into<RankValue>) -> Self {
        self.set_rank(category, Some(value.into()));
        self
    }

    fn rank_slot(&self, category: Category) -> &Option<RankValue> {
        match category {
            Category::OcBoys => &self.oc_boys,
            Category::OcGirls => &self.oc_girls,
            Category::BcABoys => &self.bc_a_boys,
            Category::BcAGirls => &self.bc_a_girls,
            Category::BcBBoys => &self.bc_b_boys,
            Category::BcBGirls => &self.bc_b_girls,
            Category::BcCBoys => &self.bc_c_boys,
            Category::BcCGirls => &self.bc_c_girls,
            Category::BcDBoys => &self.bc_d_boys,
            Category::BcDGirls => &self.bc_d_girls,
            Category::BcEBoys => &self.bc_e_boys,
            Category::BcEGirls => &self.bc_e_girls,
            Category::ScBoys => &self.sc_boys,
            Category::ScGirls => &self.sc_girls,
            Category::StBoys => &self.st_boys,
            Category::StGirls => &self.st_girls,
            Category::EwsGenOu => &self.ews_gen_ou,
            Category::EwsGirlsOu => &self.ews_girls_ou,
        }
    }

    fn rank_slot_mut(&mut self, category: Category) -> &mut Option<RankValue> {
        match category {
            Category::OcBoys => &mut self.oc_boys,
            Category::OcGirls => &mut self.oc_girls,
            Category::BcABoys => &mut self.bc_a_boys,
            Category::BcAGirls => &mut self.bc_a_girls,
            Category::BcBBoys => &mut self.bc_b_boys,
            Category::BcBGirls => &mut self.bc_b_girls,
            Category::BcCBoys => &mut self.bc_c_boys,
            Category::BcCGirls => &mut self.bc_c_girls,
            Category::BcDBoys => &mut self.bc_d_boys,
            Category::BcDGirls => &mut self.bc_d_girls,
            Category::BcEBoys => &mut self.bc_e_boys,
            Category::BcEGirls => &mut self.bc_e_girls,
            Category::ScBoys => &mut self.sc_boys,
            Category::ScGirls => &mut self.sc_girls,
            Category::StBoys => &mut self.st_boys,
            Category::StGirls => &mut self.st_girls,
            Category::EwsGenOu => &mut self.ews_gen_ou,
            Category::EwsGirlsOu => &mut self.ews_girls_ou,
        }
    }
}
