use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the 18 admission-quota categories. Each category owns exactly one
/// rank field on [`StudentRecord`](super::StudentRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    OcBoys,
    OcGirls,
    BcABoys,
    BcAGirls,
    BcBBoys,
    BcBGirls,
    BcCBoys,
    BcCGirls,
    BcDBoys,
    BcDGirls,
    BcEBoys,
    BcEGirls,
    ScBoys,
    ScGirls,
    StBoys,
    StGirls,
    EwsGenOu,
    EwsGirlsOu,
}

impl Category {
    /// Canonical order, used for column projection.
    pub const ALL: [Category; 18] = [
        Category::OcBoys,
        Category::OcGirls,
        Category::BcABoys,
        Category::BcAGirls,
        Category::BcBBoys,
        Category::BcBGirls,
        Category::BcCBoys,
        Category::BcCGirls,
        Category::BcDBoys,
        Category::BcDGirls,
        Category::BcEBoys,
        Category::BcEGirls,
        Category::ScBoys,
        Category::ScGirls,
        Category::StBoys,
        Category::StGirls,
        Category::EwsGenOu,
        Category::EwsGirlsOu,
    ];

    /// Human-readable label shown in column headers
    pub fn label(self) -> &'static str {
        match self {
            Category::OcBoys => "OC Boys",
            Category::OcGirls => "OC Girls",
            Category::BcABoys => "BC-A Boys",
            Category::BcAGirls => "BC-A Girls",
            Category::BcBBoys => "BC-B Boys",
            Category::BcBGirls => "BC-B Girls",
            Category::BcCBoys => "BC-C Boys",
            Category::BcCGirls => "BC-C Girls",
            Category::BcDBoys => "BC-D Boys",
            Category::BcDGirls => "BC-D Girls",
            Category::BcEBoys => "BC-E Boys",
            Category::BcEGirls => "BC-E Girls",
            Category::ScBoys => "SC Boys",
            Category::ScGirls => "SC Girls",
            Category::StBoys => "ST Boys",
            Category::StGirls => "ST Girls",
            Category::EwsGenOu => "EWS GEN OU",
            Category::EwsGirlsOu => "EWS Girls OU",
        }
    }

    /// JSON key of the rank field this category reads
    pub fn field_key(self) -> &'static str {
        match self {
            Category::OcBoys => "ocBoys",
            Category::OcGirls => "ocGirls",
            Category::BcABoys => "bcABoys",
            Category::BcAGirls => "bcAGirls",
            Category::BcBBoys => "bcBBoys",
            Category::BcBGirls => "bcBGirls",
            Category::BcCBoys => "bcCBoys",
            Category::BcCGirls => "bcCGirls",
            Category::BcDBoys => "bcDBoys",
            Category::BcDGirls => "bcDGirls",
            Category::BcEBoys => "bcEBoys",
            Category::BcEGirls => "bcEGirls",
            Category::ScBoys => "scBoys",
            Category::ScGirls => "scGirls",
            Category::StBoys => "stBoys",
            Category::StGirls => "stGirls",
            Category::EwsGenOu => "ewsGenOu",
            Category::EwsGirlsOu => "ewsGirlsOu",
        }
    }

    /// Look a category up by its label or field key, ignoring case.
    pub fn lookup(name: &str) -> Option<Category> {
        let name = name.trim();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.label().eq_ignore_ascii_case(name) || c.field_key().eq_ignore_ascii_case(name)
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A caste group expands to every category of that caste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CasteGroup {
    Oc,
    BcA,
    BcB,
    BcC,
    BcD,
    BcE,
    Sc,
    St,
    EwsGenOu,
    EwsGirlsOu,
}

impl CasteGroup {
    pub const ALL: [CasteGroup; 10] = [
        CasteGroup::Oc,
        CasteGroup::BcA,
        CasteGroup::BcB,
        CasteGroup::BcC,
        CasteGroup::BcD,
        CasteGroup::BcE,
        CasteGroup::Sc,
        CasteGroup::St,
        CasteGroup::EwsGenOu,
        CasteGroup::EwsGirlsOu,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CasteGroup::Oc => "oc",
            CasteGroup::BcA => "bcA",
            CasteGroup::BcB => "bcB",
            CasteGroup::BcC => "bcC",
            CasteGroup::BcD => "bcD",
            CasteGroup::BcE => "bcE",
            CasteGroup::Sc => "sc",
            CasteGroup::St => "st",
            CasteGroup::EwsGenOu => "ewsGenOu",
            CasteGroup::EwsGirlsOu => "ewsGirlsOu",
        }
    }

    pub fn members(self) -> &'static [Category] {
        match self {
            CasteGroup::Oc => &[Category::OcBoys, Category::OcGirls],
            CasteGroup::BcA => &[Category::BcABoys, Category::BcAGirls],
            CasteGroup::BcB => &[Category::BcBBoys, Category::BcBGirls],
            CasteGroup::BcC => &[Category::BcCBoys, Category::BcCGirls],
            CasteGroup::BcD => &[Category::BcDBoys, Category::BcDGirls],
            CasteGroup::BcE => &[Category::BcEBoys, Category::BcEGirls],
            CasteGroup::Sc => &[Category::ScBoys, Category::ScGirls],
            CasteGroup::St => &[Category::StBoys, Category::StGirls],
            CasteGroup::EwsGenOu => &[Category::EwsGenOu],
            CasteGroup::EwsGirlsOu => &[Category::EwsGirlsOu],
        }
    }

    pub fn lookup(key: &str) -> Option<CasteGroup> {
        let key = key.trim();
        CasteGroup::ALL.into_iter().find(|g| g.key().eq_ignore_ascii_case(key))
    }
}

/// The caste dimension of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CasteSelector {
    /// No caste filter; rank bounds are not applied
    #[default]
    Any,
    Single(Category),
    Group(CasteGroup),
    /// A selector that maps to no field. Matches nothing.
    Unknown(String),
}

impl CasteSelector {
    /// Parse a selector. Empty input and `All` mean no filter. Category labels
    /// and field keys win over group keys.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case(crate::constants::NO_FILTER) {
            return CasteSelector::Any;
        }
        if let Some(category) = Category::lookup(input) {
            return CasteSelector::Single(category);
        }
        if let Some(group) = CasteGroup::lookup(input) {
            return CasteSelector::Group(group);
        }
        CasteSelector::Unknown(input.to_string())
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, CasteSelector::Any)
    }

    /// Categories whose rank fields this selector checks. Empty for `Any`
    /// and `Unknown`.
    pub fn resolve(&self) -> &[Category] {
        match self {
            CasteSelector::Any | CasteSelector::Unknown(_) => &[],
            CasteSelector::Single(category) => std::slice::from_ref(category),
            CasteSelector::Group(group) => group.members(),
        }
    }

    /// The one category this selector names, if it resolves to exactly one.
    pub fn single_category(&self) -> Option<Category> {
        match self.resolve() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Value sent to the remote source as the `caste` query parameter
    pub fn query_value(&self) -> Option<String> {
        match self {
            CasteSelector::Any => None,
            CasteSelector::Single(category) => Some(category.label().to_string()),
            CasteSelector::Group(group) => Some(group.key().to_string()),
            CasteSelector::Unknown(raw) => Some(raw.clone()),
        }
    }
}

impl fmt::Display for CasteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CasteSelector::Any => f.write_str(crate::constants::NO_FILTER),
            CasteSelector::Single(category) => f.write_str(category.label()),
            CasteSelector::Group(group) => f.write_str(group.key()),
            CasteSelector::Unknown(raw) => f.write_str(raw),
        }
    }
}
