//! Normalizes free-form US locations into the provider's
//! `"City,State,United States"` form.
//!
//! Best effort only: unknown state codes and unrecognized shapes fall back to
//! appending the country rather than failing.

use std::sync::LazyLock;

use regex::Regex;

const COUNTRY: &str = "United States";

static CITY_STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<city>[^,]+?)\s*,\s*(?P<state>[A-Za-z]{2})$").expect("valid city/state regex")
});

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(?:-\d{4})?$").expect("valid zip regex"));

/// Two-letter USPS codes for the 50 states plus DC.
pub const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Looks up the full state name for a two-letter code, case-insensitively.
#[must_use]
pub fn state_name(code: &str) -> Option<&'static str> {
    US_STATES
        .iter()
        .find(|(abbr, _)| abbr.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Converts a location string to the provider's expected form.
///
/// Rules, first match wins:
/// 1. Already mentions `United States`: returned unchanged.
/// 2. `City, ST` with a known state code: `City,StateName,United States`.
/// 3. Bare ZIP or ZIP+4: the ZIP itself, without surrounding whitespace.
/// 4. Anything else: trimmed input with `,United States` appended.
#[must_use]
pub fn normalize_location(input: &str) -> String {
    if input.contains(COUNTRY) {
        return input.to_owned();
    }

    let trimmed = input.trim();

    if let Some(caps) = CITY_STATE_RE.captures(trimmed) {
        if let Some(state) = state_name(&caps["state"]) {
            let city = caps["city"].trim();
            return format!("{city},{state},{COUNTRY}");
        }
    }

    if ZIP_RE.is_match(trimmed) {
        return trimmed.to_owned();
    }

    format!("{trimmed},{COUNTRY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_table_has_fifty_one_entries() {
        assert_eq!(US_STATES.len(), 51);
    }

    #[test]
    fn city_and_state_code_expand() {
        assert_eq!(
            normalize_location("Seattle, WA"),
            "Seattle,Washington,United States"
        );
        assert_eq!(
            normalize_location("  New York,ny "),
            "New York,New York,United States"
        );
        assert_eq!(
            normalize_location("Washington, DC"),
            "Washington,District of Columbia,United States"
        );
    }

    #[test]
    fn zip_codes_pass_through() {
        assert_eq!(normalize_location("98101"), "98101");
        assert_eq!(normalize_location("98101-1234"), "98101-1234");
    }

    #[test]
    fn padded_zip_is_trimmed_not_suffixed() {
        assert_eq!(normalize_location("  98101\n"), "98101");
        assert_eq!(normalize_location(" 98101-1234 "), "98101-1234");
    }

    #[test]
    fn already_normalized_is_unchanged() {
        let input = "Chicago,Illinois,United States";
        assert_eq!(normalize_location(input), input);
    }

    #[test]
    fn unknown_state_code_falls_back_to_country_suffix() {
        assert_eq!(normalize_location("Toronto, ON"), "Toronto, ON,United States");
    }

    #[test]
    fn free_form_gets_country_suffix() {
        assert_eq!(normalize_location(" Portland "), "Portland,United States");
        assert_eq!(
            normalize_location("Austin, Texas"),
            "Austin, Texas,United States"
        );
    }
}
