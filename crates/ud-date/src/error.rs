//! Rejection reasons for date input.
//!
//! [`DateParser::parse`](crate::DateParser::parse) collapses every rejection
//! to `None` so form components can show an inline message without error
//! plumbing. [`DateParser::parse_detailed`](crate::DateParser::parse_detailed)
//! keeps the reason for logging and tests.

/// Why an input string did not produce a date.
///
/// # Examples
///
/// ```
/// use ud_date::{DateParser, DateRejection};
///
/// let parser = DateParser::default();
/// assert_eq!(parser.parse_detailed("  "), Err(DateRejection::Empty));
/// assert_eq!(
///     parser.parse_detailed("31-02-2025"),
///     Err(DateRejection::NotACalendarDate { day: 31, month: 2, year: 2025 }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateRejection {
    /// The input was empty after trimming.
    #[error("empty date input")]
    Empty,

    /// Separated input did not have exactly three non-empty parts.
    #[error("expected day, month and year, found {found} part(s)")]
    PartCount {
        /// Number of non-empty parts found.
        found: usize,
    },

    /// A separated part was not a number.
    #[error("'{0}' is not a number")]
    NonNumeric(String),

    /// Digit-only input had too few or too many digits.
    #[error("expected 6 to 8 digits, found {0}")]
    DigitCount(usize),

    /// No day/month split of digit-only input was in range.
    #[error("no plausible day and month in '{0}'")]
    NoPlausibleSplit(String),

    /// Day, month or year is outside its coarse bounds.
    #[error("{day}-{month}-{year} is out of range")]
    OutOfRange {
        /// Parsed day.
        day: u32,
        /// Parsed month.
        month: u32,
        /// Parsed year.
        year: u32,
    },

    /// The triple is in range but names no real day (e.g. 31 February).
    #[error("{day}-{month}-{year} is not a calendar date")]
    NotACalendarDate {
        /// Parsed day.
        day: u32,
        /// Parsed month.
        month: u32,
        /// Parsed year.
        year: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(DateRejection::Empty.to_string(), "empty date input");
        assert_eq!(
            DateRejection::PartCount { found: 2 }.to_string(),
            "expected day, month and year, found 2 part(s)"
        );
        assert_eq!(
            DateRejection::OutOfRange {
                day: 13,
                month: 13,
                year: 2025
            }
            .to_string(),
            "13-13-2025 is out of range"
        );
    }
}
