use serde::Serialize;
use std::fmt;

use super::category::CasteSelector;
use super::record::parse_leading_int;
use crate::constants::NO_FILTER;

/// The user's active query. Construction normalizes branch and district
/// codes to upper case; the evaluator compares them exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub branch: Option<String>,
    pub district: Option<String>,
    pub caste: CasteSelector,
    pub min_rank: Option<i64>,
    pub max_rank: Option<i64>,
}

/// Conditions worth telling the user about. None of them fail a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterWarning {
    InvertedRange { min: i64, max: i64 },
    UnknownCategory { selector: String },
    RankBoundsIgnored,
}

impl fmt::Display for FilterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterWarning::InvertedRange { min, max } => {
                write!(f, "min rank {} is greater than max rank {}; nothing can match", min, max)
            }
            FilterWarning::UnknownCategory { selector } => {
                write!(f, "caste '{}' does not name any category; nothing can match", selector)
            }
            FilterWarning::RankBoundsIgnored => {
                f.write_str("rank bounds only apply when a caste is selected")
            }
        }
    }
}

/// Filter keys accepted by [`FilterState::with_param`]
pub const FILTER_KEYS: [&str; 5] = ["branch", "district", "caste", "minRank", "maxRank"];

fn code_filter(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(NO_FILTER) {
        None
    } else {
        Some(value.to_ascii_uppercase())
    }
}

fn rank_bound(value: &str) -> Option<i64> {
    parse_leading_int(value)
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branch(self, branch: &str) -> Self {
        Self { branch: code_filter(branch), ..self }
    }

    pub fn with_district(self, district: &str) -> Self {
        Self { district: code_filter(district), ..self }
    }

    pub fn with_caste(self, caste: &str) -> Self {
        Self { caste: CasteSelector::parse(caste), ..self }
    }

    pub fn with_caste_selector(self, caste: CasteSelector) -> Self {
        Self { caste, ..self }
    }

    pub fn with_min_rank(self, min_rank: Option<i64>) -> Self {
        Self { min_rank, ..self }
    }

    pub fn with_max_rank(self, max_rank: Option<i64>) -> Self {
        Self { max_rank, ..self }
    }

    /// Apply one string-encoded parameter, as a form or query string would
    /// carry it. An empty value clears the dimension. Returns `None` for an
    /// unrecognized key.
    pub fn with_param(&self, key: &str, value: &str) -> Option<Self> {
        let next = self.clone();
        let updated = match key {
            "branch" => next.with_branch(value),
            "district" => next.with_district(value),
            "caste" => next.with_caste(value),
            "minRank" | "min_rank" | "min-rank" => next.with_min_rank(rank_bound(value)),
            "maxRank" | "max_rank" | "max-rank" => next.with_max_rank(rank_bound(value)),
            _ => return None,
        };
        Some(updated)
    }

    /// True when rank bounds take part in evaluation
    pub fn applies_rank_bounds(&self) -> bool {
        self.caste.is_active()
    }

    pub fn rank_in_bounds(&self, rank: i64) -> bool {
        self.min_rank.map_or(true, |min| rank >= min)
            && self.max_rank.map_or(true, |max| rank <= max)
    }

    pub fn warnings(&self) -> Vec<FilterWarning> {
        let mut warnings = Vec::new();
        if let (Some(min), Some(max)) = (self.min_rank, self.max_rank) {
            if min > max {
                warnings.push(FilterWarning::InvertedRange { min, max });
            }
        }
        if let CasteSelector::Unknown(selector) = &self.caste {
            warnings.push(FilterWarning::UnknownCategory { selector: selector.clone() });
        }
        if !self.caste.is_active() && (self.min_rank.is_some() || self.max_rank.is_some()) {
            warnings.push(FilterWarning::RankBoundsIgnored);
        }
        warnings
    }

    /// Query parameters for the remote source; "no filter" dimensions are
    /// omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(branch) = &self.branch {
            pairs.push(("branch", branch.clone()));
        }
        if let Some(district) = &self.district {
            pairs.push(("district", district.clone()));
        }
        if let Some(caste) = self.caste.query_value() {
            pairs.push(("caste", caste));
        }
        if let Some(min) = self.min_rank {
            pairs.push(("minRank", min.to_string()));
        }
        if let Some(max) = self.max_rank {
            pairs.push(("maxRank", max.to_string()));
        }
        pairs
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| NO_FILTER.to_string());
        let bound = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "branch={} district={} caste={} rank=[{}, {}]",
            show(&self.branch),
            show(&self.district),
            self.caste,
            bound(self.min_rank),
            bound(self.max_rank)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CasteGroup, Category};

    #[test]
    fn builder_normalizes_codes_and_sentinels() {
        let filter = FilterState::new().with_branch(" cse ").with_district("All").with_caste("oc");
        assert_eq!(filter.branch.as_deref(), Some("CSE"));
        assert_eq!(filter.district, None);
        assert_eq!(filter.caste, CasteSelector::Group(CasteGroup::Oc));
    }

    #[test]
    fn string_params_follow_form_semantics() {
        let filter = FilterState::new()
            .with_param("minRank", "1000")
            .and_then(|f| f.with_param("maxRank", "1500.5"))
            .and_then(|f| f.with_param("caste", "OC Boys"))
            .unwrap();
        assert_eq!(filter.min_rank, Some(1000));
        assert_eq!(filter.max_rank, Some(1500));
        assert_eq!(filter.caste, CasteSelector::Single(Category::OcBoys));

        let cleared = filter.with_param("maxRank", "").unwrap();
        assert_eq!(cleared.max_rank, None);
        assert!(filter.with_param("tuitionFee", "1").is_none());
    }

    #[test]
    fn bounds_are_inclusive_and_open_ended() {
        let filter = FilterState::new().with_min_rank(Some(10)).with_max_rank(Some(20));
        assert!(filter.rank_in_bounds(10));
        assert!(filter.rank_in_bounds(20));
        assert!(!filter.rank_in_bounds(9));
        assert!(!filter.rank_in_bounds(21));
        assert!(FilterState::new().rank_in_bounds(i64::MIN));
    }

    #[test]
    fn warnings_report_non_fatal_conditions() {
        let inverted = FilterState::new()
            .with_caste("SC Boys")
            .with_min_rank(Some(50))
            .with_max_rank(Some(10));
        assert_eq!(inverted.warnings(), vec![FilterWarning::InvertedRange { min: 50, max: 10 }]);

        let unknown = FilterState::new().with_caste("martian");
        assert_eq!(
            unknown.warnings(),
            vec![FilterWarning::UnknownCategory { selector: "martian".to_string() }]
        );

        let ignored = FilterState::new().with_min_rank(Some(1));
        assert_eq!(ignored.warnings(), vec![FilterWarning::RankBoundsIgnored]);
        assert!(FilterState::new().warnings().is_empty());
    }

    #[test]
    fn query_pairs_skip_inactive_dimensions() {
        let filter =
            FilterState::new().with_branch("ece").with_caste("bcA").with_max_rank(Some(900));
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("branch", "ECE".to_string()),
                ("caste", "bcA".to_string()),
                ("maxRank", "900".to_string()),
            ]
        );
        assert!(FilterState::new().query_pairs().is_empty());
    }
}
