//! Flexible day-month-year date parsing for form inputs.
//!
//! Date fields in the component demos accept whatever a user types: with
//! separators (`5-3-24`, `05/03/2024`) or without (`050324`, `5032024`).
//! [`DateParser`] turns that into a [`chrono::NaiveDate`] or rejects it;
//! [`format_date`] writes the canonical `DD-MM-YYYY` form back.
//!
//! Every accepted date is a real calendar date between 1900 and 2100.
//! Two-digit years are expanded around a configurable pivot
//! ([`ud_core::DateConfig::century_pivot`]).
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ud_date::{DateParser, format_date};
//!
//! let parser = DateParser::new(30);
//! let date = parser.parse("2022025").unwrap();
//! assert_eq!(date, NaiveDate::from_ymd_opt(2025, 2, 2).unwrap());
//! assert_eq!(format_date(date), "02-02-2025");
//! assert_eq!(parser.parse("13-13-2025"), None);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod parser;

pub use error::DateRejection;
pub use parser::{DateParser, MAX_YEAR, MIN_YEAR, format_date, parse_date};
