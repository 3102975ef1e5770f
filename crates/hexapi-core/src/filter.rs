//! # Range Filters
//!
//! Airbus catalogues take numeric and date filters as bracketed ranges:
//!
//! - a comma separates the start value from the end value
//! - either value can be omitted, meaning the range is open on that side
//! - a leading `[` includes the start value, a leading `]` excludes it
//! - a trailing `[` includes the end value, a trailing `]` excludes it
//!
//! So `[2018-01-01,2018-02-01[` is "from Jan 1st to Feb 1st, both included"
//! and `10[` is "up to and including 10".

use std::fmt::Display;

/// Encode a closed range with both ends included.
///
/// ```
/// use hexapi_core::included_range;
///
/// assert_eq!(included_range("2018-01-01", "2018-02-01"), "[2018-01-01,2018-02-01[");
/// ```
pub fn included_range(start: impl Display, end: impl Display) -> String {
    format!("[{start},{end}[")
}

/// Encode an upper bound (value included).
///
/// ```
/// use hexapi_core::less_than_or_equal;
///
/// assert_eq!(less_than_or_equal(10), "10[");
/// assert_eq!(less_than_or_equal(12.5), "12.5[");
/// ```
pub fn less_than_or_equal(value: impl Display) -> String {
    format!("{value}[")
}

/// `less_than_or_equal` for an optional float filter where zero means unset.
pub(crate) fn upper_bound(value: Option<f64>) -> Option<String> {
    value.filter(|v| *v != 0.0).map(less_than_or_equal)
}

/// `included_range` for an optional pair of dates.
pub(crate) fn date_range(range: Option<&(String, String)>) -> Option<String> {
    range.map(|(start, end)| included_range(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn included_range_with_dates() {
        assert_eq!(
            included_range("2018-01-01", "2018-02-01"),
            "[2018-01-01,2018-02-01["
        );
    }

    #[test]
    fn included_range_with_numbers() {
        assert_eq!(included_range(1, 20), "[1,20[");
    }

    #[test]
    fn less_than_or_equal_integer() {
        assert_eq!(less_than_or_equal(10), "10[");
    }

    #[test]
    fn less_than_or_equal_float_uses_shortest_form() {
        assert_eq!(less_than_or_equal(10.0_f64), "10[");
        assert_eq!(less_than_or_equal(0.5_f64), "0.5[");
    }

    #[test]
    fn upper_bound_treats_zero_as_unset() {
        assert_eq!(upper_bound(Some(0.0)), None);
        assert_eq!(upper_bound(None), None);
        assert_eq!(upper_bound(Some(30.0)), Some("30[".to_string()));
    }

    #[test]
    fn date_range_maps_pair() {
        let pair = ("2020-01-01".to_string(), "2020-02-01".to_string());
        assert_eq!(
            date_range(Some(&pair)),
            Some("[2020-01-01,2020-02-01[".to_string())
        );
        assert_eq!(date_range(None), None);
    }
}
