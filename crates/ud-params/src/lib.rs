//! Schema-validated synchronization between typed state and URL query parameters.
//!
//! The documentation site keeps list state (page, filters, sort order) in
//! the address bar. This crate maps that state to and from query
//! parameters, validating against a declared [`Schema`] in both directions.
//!
//! # Overview
//!
//! ```text
//!   URL layer                    SearchParamBinder                  UI code
//! ┌─────────────┐  RawQueryParams ┌──────────────────┐   State    ┌─────────┐
//! │ QueryString │ ──────────────► │ read: coerce,    │ ─────────► │         │
//! │             │                 │ merge, validate  │            │         │
//! │             │   QueryUpdate   │ write: merge,    │   Update   │         │
//! │   apply()   │ ◄────────────── │ validate, encode │ ◄───────── │         │
//! └─────────────┘                 └──────────────────┘            └─────────┘
//! ```
//!
//! # Coercion Rules
//!
//! | Base kind | Raw input | Result |
//! |-----------|-----------|--------|
//! | number | decimal numeral | number, otherwise the raw string |
//! | boolean | `true` or `1` | `true`; anything else `false` |
//! | array | repeated key | values as-is |
//! | array | `a,b,,c` | split on commas, empty segments dropped |
//! | array | `a` | one-element array |
//! | string, enum | anything | unchanged |
//! | any nullable kind | `null` | null |
//!
//! A write renders null as `key=null` and an empty list as `key=,`, so both
//! read back unchanged.
//!
//! # Example
//!
//! ```
//! use ud_params::{FieldKind, Partial, PrimitiveKind, QueryString, Schema, SearchParamBinder, Value};
//!
//! let schema = Schema::builder()
//!     .field("page", FieldKind::Number.with_default(1))
//!     .field("tags", FieldKind::array(PrimitiveKind::String).with_default(Vec::<Value>::new()))
//!     .field("sortBy", FieldKind::enumeration(["name", "date", "popularity"]).with_default("date"))
//!     .build()?;
//! let binder = SearchParamBinder::from_schema(schema)?;
//!
//! let mut url = QueryString::new();
//! let state = binder.read(&url.to_raw());
//! assert_eq!(state.get("page"), Some(&Value::from(1)));
//!
//! url.apply(&binder.write(&state, Partial::new().set("page", 2))?);
//! assert_eq!(binder.read(&url.to_raw()).get("page"), Some(&Value::from(2)));
//!
//! // Invalid updates are rejected and leave the URL alone.
//! assert!(binder.write(&state, Partial::new().set("sortBy", "invalid")).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod binder;
pub mod coerce;
pub mod error;
pub mod query;
pub mod schema;
pub mod state;
pub mod value;

pub use binder::SearchParamBinder;
pub use coerce::coerce;
pub use error::{SchemaError, ValidationError, WriteError};
pub use query::{
    EMPTY_LIST_MARKER, NULL_MARKER, QueryParam, QueryString, QueryUpdate, QueryValue,
    RawQueryParams,
};
pub use schema::{Field, FieldKind, PrimitiveKind, Schema, SchemaBuilder};
pub use state::{Partial, State, Update};
pub use value::Value;
