//! Recording-structure codes to canonical visual-area labels.

/// Structure code and the canonical label it maps to
pub const AREA_MAPPING: [(&str, &str); 6] = [
    ("VISal", "AL"),
    ("VISam", "AM"),
    ("VISl", "LM"),
    ("VISp", "V1"),
    ("VISpm", "PM"),
    ("VISrl", "RL"),
];

/// Canonical label for a structure code, if it is a mapped visual area.
pub fn canonical_area(code: &str) -> Option<&'static str> {
    AREA_MAPPING
        .iter()
        .find(|(from, _)| *from == code)
        .map(|(_, to)| *to)
}
