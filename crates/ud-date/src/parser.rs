//! Day-month-year parsing.
//!
//! Two input shapes are accepted:
//!
//! - **Separated**: contains `-` or `/`, e.g. `5-3-2024`, `05/03/24`.
//!   Exactly three parts in day, month, year order.
//! - **Digit-only**: anything else; non-digits are stripped and 6 to 8
//!   digits must remain, e.g. `050324`, `5032024`, `05032024`.
//!
//! Digit-only input is ambiguous between two- and four-digit years. The
//! last four digits are tried as the year first; if that year falls outside
//! 1900-2100 the last two digits are used instead. The leading digits are
//! then split into day and month, trying a one-digit day before a two-digit
//! day when there are three of them.

use chrono::{Datelike, NaiveDate};
use smallvec::SmallVec;
use tracing::trace;
use ud_core::DateConfig;

use crate::error::DateRejection;

/// Earliest accepted year.
pub const MIN_YEAR: u32 = 1900;

/// Latest accepted year.
pub const MAX_YEAR: u32 = 2100;

/// A day/month/year triple before calendar validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParsedDate {
    day: u32,
    month: u32,
    year: u32,
}

impl ParsedDate {
    /// Applies the coarse bounds check, then requires that the triple
    /// survives a round trip through the calendar unchanged.
    fn into_date(self) -> Result<NaiveDate, DateRejection> {
        let Self { day, month, year } = self;
        let in_bounds = (1..=31).contains(&day)
            && (1..=12).contains(&month)
            && (MIN_YEAR..=MAX_YEAR).contains(&year);
        let out_of_range = DateRejection::OutOfRange { day, month, year };
        if !in_bounds {
            return Err(out_of_range);
        }
        let signed_year = i32::try_from(year).map_err(|_| out_of_range)?;

        let not_a_date = DateRejection::NotACalendarDate { day, month, year };
        let date = NaiveDate::from_ymd_opt(signed_year, month, day).ok_or_else(|| not_a_date.clone())?;
        if date.day() != day || date.month() != month || date.year() != signed_year {
            return Err(not_a_date);
        }
        Ok(date)
    }
}

/// Parses loosely formatted day-month-year input.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ud_date::DateParser;
///
/// let parser = DateParser::default();
/// assert_eq!(parser.parse("5-3-24"), NaiveDate::from_ymd_opt(2024, 3, 5));
/// assert_eq!(parser.parse("05/03/1995"), NaiveDate::from_ymd_opt(1995, 3, 5));
/// assert_eq!(parser.parse("05032024"), NaiveDate::from_ymd_opt(2024, 3, 5));
/// assert_eq!(parser.parse("31-02-2025"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
    century_pivot: u8,
}

impl Default for DateParser {
    fn default() -> Self {
        Self::from_config(&DateConfig::default())
    }
}

impl DateParser {
    /// Creates a parser with the given two-digit year pivot.
    ///
    /// Two-digit years below `century_pivot` map to 20xx, the rest to 19xx.
    #[must_use]
    pub const fn new(century_pivot: u8) -> Self {
        Self { century_pivot }
    }

    /// Creates a parser from configuration.
    #[must_use]
    pub const fn from_config(config: &DateConfig) -> Self {
        Self::new(config.century_pivot)
    }

    /// Returns the two-digit year pivot.
    #[must_use]
    pub const fn century_pivot(&self) -> u8 {
        self.century_pivot
    }

    /// Maps a two-digit year (0-99) to a full year.
    ///
    /// ```
    /// use ud_date::DateParser;
    ///
    /// let parser = DateParser::default();
    /// assert_eq!(parser.expand_year(29), 2029);
    /// assert_eq!(parser.expand_year(30), 1930);
    /// ```
    #[must_use]
    pub fn expand_year(&self, two_digit: u32) -> u32 {
        if two_digit < u32::from(self.century_pivot) {
            2000 + two_digit
        } else {
            1900 + two_digit
        }
    }

    /// Parses input, returning `None` if it is not a valid date.
    #[must_use]
    pub fn parse(&self, input: &str) -> Option<NaiveDate> {
        match self.parse_detailed(input) {
            Ok(date) => Some(date),
            Err(reason) => {
                trace!(input, %reason, "Rejected date input");
                None
            }
        }
    }

    /// Parses input, reporting why it was rejected.
    ///
    /// # Errors
    ///
    /// Returns the [`DateRejection`] for the first rule the input breaks.
    pub fn parse_detailed(&self, input: &str) -> Result<NaiveDate, DateRejection> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DateRejection::Empty);
        }

        let parsed = if trimmed.contains(['-', '/']) {
            self.parse_separated(trimmed)?
        } else {
            self.parse_digits(trimmed)?
        };
        parsed.into_date()
    }

    fn parse_separated(&self, input: &str) -> Result<ParsedDate, DateRejection> {
        let parts: SmallVec<[&str; 3]> = input.split(['-', '/']).collect();
        let non_empty = parts.iter().filter(|p| !p.trim().is_empty()).count();
        if parts.len() != 3 || non_empty != 3 {
            return Err(DateRejection::PartCount { found: non_empty });
        }

        let day = parse_part(parts[0])?;
        let month = parse_part(parts[1])?;
        let year = parse_part(parts[2])?;
        let year = if year < 100 { self.expand_year(year) } else { year };

        Ok(ParsedDate { day, month, year })
    }

    fn parse_digits(&self, input: &str) -> Result<ParsedDate, DateRejection> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();
        let len = digits.len();
        if !(6..=8).contains(&len) {
            return Err(DateRejection::DigitCount(len));
        }

        let (head, tail) = digits.split_at(len - 4);
        let four_digit_year = parse_digits_value(tail);
        let (year, day_month) = if (MIN_YEAR..=MAX_YEAR).contains(&four_digit_year) {
            (four_digit_year, head)
        } else {
            let (head, tail) = digits.split_at(len - 2);
            (self.expand_year(parse_digits_value(tail)), head)
        };

        let (day, month) = day_month_candidates(day_month)
            .into_iter()
            .find(|(day, month)| (1..=31).contains(day) && (1..=12).contains(month))
            .ok_or_else(|| DateRejection::NoPlausibleSplit(day_month.to_owned()))?;

        Ok(ParsedDate { day, month, year })
    }
}

/// Enumerates (day, month) splits in preference order.
fn day_month_candidates(digits: &str) -> SmallVec<[(u32, u32); 2]> {
    let split = |at: usize| {
        let (day, month) = digits.split_at(at);
        (parse_digits_value(day), parse_digits_value(month))
    };
    match digits.len() {
        4 => smallvec::smallvec![split(2)],
        3 => smallvec::smallvec![split(1), split(2)],
        2 => smallvec::smallvec![split(1)],
        _ => SmallVec::new(),
    }
}

/// Parses a string of ASCII digits known to be short enough for `u32`.
fn parse_digits_value(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

fn parse_part(part: &str) -> Result<u32, DateRejection> {
    let trimmed = part.trim();
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateRejection::NonNumeric(trimmed.to_owned()));
    }
    trimmed
        .parse()
        .map_err(|_| DateRejection::NonNumeric(trimmed.to_owned()))
}

/// Parses input with the default parser.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
///
/// assert_eq!(ud_date::parse_date("2022025"), NaiveDate::from_ymd_opt(2025, 2, 2));
/// assert_eq!(ud_date::parse_date(""), None);
/// ```
#[must_use]
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    DateParser::default().parse(input)
}

/// Formats a date as `DD-MM-YYYY`, the form [`parse_date`] reads back.
///
/// ```
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 2, 2).unwrap();
/// assert_eq!(ud_date::format_date(date), "02-02-2025");
/// ```
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}
