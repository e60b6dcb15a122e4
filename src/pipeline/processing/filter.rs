use tracing::debug;

use crate::domain::{FilterState, RankValue, StudentRecord};

/// Evaluate every condition of `filter` against one record.
///
/// Branch and district are exact string matches. With a caste selector
/// active, the record passes when at least one of the resolved rank fields
/// parses to an integer inside the inclusive bounds; unparseable fields are
/// skipped, and a selector that resolves to nothing excludes the record.
/// Without a caste selector the rank bounds are not consulted.
pub fn matches(record: &StudentRecord, filter: &FilterState) -> bool {
    if let Some(branch) = &filter.branch {
        if record.branch_code != *branch {
            return false;
        }
    }
    if let Some(district) = &filter.district {
        if record.dist_code != *district {
            return false;
        }
    }
    if !filter.applies_rank_bounds() {
        return true;
    }

    filter
        .caste
        .resolve()
        .iter()
        .filter_map(|&category| record.rank(category).and_then(RankValue::parse_rank))
        .any(|rank| filter.rank_in_bounds(rank))
}

pub fn filter_all(records: Vec<StudentRecord>, filter: &FilterState) -> Vec<StudentRecord> {
    let before = records.len();
    let kept: Vec<StudentRecord> = records.into_iter().filter(|r| matches(r, filter)).collect();
    debug!(before, after = kept.len(), %filter, "applied filter");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn seat(id: &str, branch: &str, district: &str) -> StudentRecord {
        StudentRecord {
            branch_code: branch.to_string(),
            dist_code: district.to_string(),
            ..StudentRecord::new(id)
        }
    }

    #[test]
    fn branch_and_district_are_exact() {
        let filter = FilterState::new().with_branch("CSE").with_district("HYD");
        assert!(matches(&seat("1", "CSE", "HYD"), &filter));
        assert!(!matches(&seat("2", "ECE", "HYD"), &filter));
        assert!(!matches(&seat("3", "CSE", "RR"), &filter));
        assert!(!matches(&seat("4", "cse", "HYD"), &filter));
    }

    #[test]
    fn single_category_range() {
        let record = seat("1", "CSE", "HYD").with_rank(Category::OcBoys, 1200);
        let filter = FilterState::new().with_caste("OC Boys").with_min_rank(Some(1000));
        assert!(matches(&record, &filter.clone().with_max_rank(Some(1500))));
        assert!(!matches(&record, &filter.with_max_rank(Some(1100))));
    }

    #[test]
    fn single_category_requires_a_parseable_rank() {
        let filter = FilterState::new().with_caste("SC Girls");
        assert!(!matches(&seat("1", "CSE", "HYD"), &filter));
        assert!(!matches(&seat("2", "CSE", "HYD").with_rank(Category::ScGirls, "NA"), &filter));
        assert!(matches(&seat("3", "CSE", "HYD").with_rank(Category::ScGirls, "880"), &filter));
    }

    #[test]
    fn group_passes_when_any_member_is_in_range() {
        let record = seat("1", "CSE", "HYD")
            .with_rank(Category::BcBBoys, 9000)
            .with_rank(Category::BcBGirls, "400");
        let filter = FilterState::new().with_caste("bcB").with_max_rank(Some(500));
        assert!(matches(&record, &filter));

        let none_in_range = FilterState::new().with_caste("bcB").with_max_rank(Some(100));
        assert!(!matches(&record, &none_in_range));
    }

    #[test]
    fn unparseable_group_member_is_skipped() {
        let record = seat("1", "CSE", "HYD")
            .with_rank(Category::StBoys, "-")
            .with_rank(Category::StGirls, 300);
        assert!(matches(&record, &FilterState::new().with_caste("st").with_max_rank(Some(300))));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let record = seat("1", "CSE", "HYD").with_rank(Category::OcGirls, 50);
        let filter = FilterState::new()
            .with_caste("OC Girls")
            .with_min_rank(Some(100))
            .with_max_rank(Some(10));
        assert!(!matches(&record, &filter));
    }

    #[test]
    fn unknown_category_matches_nothing() {
        let record = seat("1", "CSE", "HYD").with_rank(Category::OcBoys, 1);
        assert!(!matches(&record, &FilterState::new().with_caste("nope")));
    }

    #[test]
    fn rank_bounds_without_caste_are_ignored() {
        let record = seat("1", "CSE", "HYD");
        let filter = FilterState::new().with_min_rank(Some(10)).with_max_rank(Some(5));
        assert!(matches(&record, &filter));
    }

    #[test]
    fn filter_all_keeps_matching_records() {
        let kept = filter_all(
            vec![seat("1", "CSE", "HYD"), seat("2", "ECE", "HYD"), seat("3", "CSE", "RR")],
            &FilterState::new().with_branch("CSE"),
        );
        let ids: Vec<_> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
