/// Selector value meaning "no filter on this dimension"
pub const NO_FILTER: &str = "All";

/// Default data source, matching the reference backend
pub const DEFAULT_SOURCE_URL: &str = "http://localhost:5000";
pub const STUDENTS_PATH: &str = "/students";

pub const EXPORT_TITLE: &str = "Students Data";
pub const EXPORT_FILE_STEM: &str = "students";

/// Branch codes offered by the catalogue's branch selector
pub const BRANCHES: &[&str] = &[
    "CIV", "CSE", "ECE", "MEC", "CSD", "CSM", "EEE", "INF", "PHM", "AGR", "AIM", "MIN", "PET",
    "EIE", "CAD", "AID", "AUT", "CSC", "COS", "CAI", "DS", "ECA", "EVT", "FDE", "CHE", "PEE", "PHE",
    "PHD", "CS", "CIT", "CSG", "CSB", "CSO", "CIC", "CBA", "EII", "IOT", "ASE", "CSER", "AI",
    "CSEB", "BIO", "GIN", "IST", "MET", "NAM", "MRB", "ECM", "CSS", "CST", "ECT", "RBT", "FDT",
    "CSN", "CCC", "CIA", "EBM", "CN", "CSBS", "CSW", "MMM", "BDT", "SWE", "GDT",
];

/// District codes offered by the catalogue's district selector
pub const DISTRICTS: &[&str] = &[
    "HYD", "MDL", "RR", "KGM", "SRP", "WGL", "KHM", "MED", "SRD", "KMR", "NZB", "SDP", "JTL", "MHB",
    "PDL", "SRC", "WNP", "MBN", "HNK", "NLG", "YBG",
];

pub fn is_known_branch(code: &str) -> bool {
    BRANCHES.contains(&code)
}

pub fn is_known_district(code: &str) -> bool {
    DISTRICTS.contains(&code)
}
