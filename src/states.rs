/// Region codes accepted for a US recipient: the fifty states plus DC.
pub const US_STATES: [&str; 51] = [
    "AK", "AL", "AR", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "HI", "IA", "ID", "IL",
    "IN", "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MS", "MT", "NC", "ND", "NE",
    "NH", "NJ", "NM", "NV", "NY", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VA", "VT", "WA", "WI", "WV", "WY",
];

pub fn is_valid_state(code: &str) -> bool {
    US_STATES.binary_search(&code).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_state_table_is_sorted() {
        assert!(US_STATES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test_case("NY", true; "new york")]
    #[test_case("DC", true; "district of columbia")]
    #[test_case("WY", true; "wyoming")]
    #[test_case("ZZ", false; "unknown code")]
    #[test_case("ny", false; "lower case")]
    #[test_case("", false; "empty")]
    fn test_is_valid_state(code: &str, expected: bool) {
        assert_eq!(is_valid_state(code), expected);
    }
}
