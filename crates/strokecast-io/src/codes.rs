//! Static category-code tables for the stroke dataset.
//!
//! The tables are immutable, process-wide mappings shared by the CSV
//! loader and the patient-input path of the CLI. Matching is ASCII
//! case-insensitive; unrecognized strings map to `None`.

/// Gender labels and their numeric codes.
pub const GENDER_CODES: [(&str, f64); 3] = [("Male", 0.0), ("Female", 1.0), ("Other", 2.0)];

/// Smoking-status labels and their numeric codes.
pub const SMOKING_CODES: [(&str, f64); 4] = [
    ("never smoked", 0.0),
    ("formerly smoked", 1.0),
    ("smokes", 2.0),
    ("Unknown", 3.0),
];

/// Numeric code for a gender label.
#[must_use]
pub fn gender_code(value: &str) -> Option<f64> {
    lookup(&GENDER_CODES, value)
}

/// Numeric code for a smoking-status label.
#[must_use]
pub fn smoking_code(value: &str) -> Option<f64> {
    lookup(&SMOKING_CODES, value)
}

fn lookup(table: &[(&str, f64)], value: &str) -> Option<f64> {
    table
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(value))
        .map(|&(_, code)| code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_codes_match_table() {
        assert_eq!(gender_code("Male"), Some(0.0));
        assert_eq!(gender_code("Female"), Some(1.0));
        assert_eq!(gender_code("Other"), Some(2.0));
    }

    #[test]
    fn smoking_codes_match_table() {
        assert_eq!(smoking_code("never smoked"), Some(0.0));
        assert_eq!(smoking_code("formerly smoked"), Some(1.0));
        assert_eq!(smoking_code("smokes"), Some(2.0));
        assert_eq!(smoking_code("Unknown"), Some(3.0));
    }

    #[test]
    fn matching_ignores_ascii_case() {
        assert_eq!(gender_code("male"), Some(0.0));
        assert_eq!(smoking_code("NEVER SMOKED"), Some(0.0));
    }

    #[test]
    fn unrecognized_labels_map_to_none() {
        assert_eq!(gender_code(""), None);
        assert_eq!(gender_code("unknown"), None);
        assert_eq!(smoking_code("vapes"), None);
    }
}
