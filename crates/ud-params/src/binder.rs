//! Bidirectional binding between validated state and query parameters.
//!
//! # Contract
//!
//! - [`SearchParamBinder::read`] is defensive: any validation failure is
//!   logged and the binder's default value is returned. A malformed URL
//!   never produces a partially applied state.
//! - [`SearchParamBinder::write`] is strict: an update that does not
//!   validate is rejected in full and nothing is emitted. The caller's
//!   current state remains in effect.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::coerce::coerce;
use crate::error::{ValidationError, WriteError};
use crate::query::{QueryParam, QueryUpdate, RawQueryParams};
use crate::schema::Schema;
use crate::state::{State, Update};
use crate::value::Value;

/// Keeps a typed state synchronized with URL query parameters.
///
/// The schema is fixed for the binder's lifetime.
///
/// # Examples
///
/// ```
/// use ud_params::{FieldKind, Partial, QueryString, Schema, SearchParamBinder, Value};
///
/// let schema = Schema::builder()
///     .field("page", FieldKind::Number.with_default(1))
///     .field("q", FieldKind::String.optional())
///     .build()?;
/// let binder = SearchParamBinder::from_schema(schema)?;
///
/// let mut url = QueryString::parse("page=3");
/// let state = binder.read(&url.to_raw());
/// assert_eq!(state.get("page"), Some(&Value::from(3)));
///
/// let update = binder.write(&state, Partial::new().set("q", "button"))?;
/// url.apply(&update);
/// assert_eq!(url.to_string(), "page=3&q=button");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct SearchParamBinder {
    schema: Schema,
    default_value: State,
}

impl SearchParamBinder {
    /// Creates a binder that falls back to `default_value` on invalid input.
    #[must_use]
    pub const fn new(schema: Schema, default_value: State) -> Self {
        Self {
            schema,
            default_value,
        }
    }

    /// Creates a binder whose default value is the schema's defaults.
    ///
    /// # Errors
    ///
    /// Fails if a required field has no default.
    pub fn from_schema(schema: Schema) -> Result<Self, ValidationError> {
        let default_value = schema.defaults()?;
        Ok(Self::new(schema, default_value))
    }

    /// Returns the schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the fallback state.
    #[must_use]
    pub const fn default_value(&self) -> &State {
        &self.default_value
    }

    /// Coerces the schema fields present in `raw`.
    ///
    /// Fields absent from `raw` and keys the schema does not declare are
    /// omitted.
    #[must_use]
    pub fn parse_query(&self, raw: &RawQueryParams) -> BTreeMap<String, Value> {
        self.schema
            .fields()
            .iter()
            .filter_map(|field| {
                raw.get(&field.name)
                    .map(|value| (field.name.clone(), coerce(&field.kind, value)))
            })
            .collect()
    }

    /// Reads validated state from query parameters.
    ///
    /// The default value is overlaid with the coerced parameters and the
    /// result validated. On failure the default value is returned unchanged.
    #[must_use]
    pub fn read(&self, raw: &RawQueryParams) -> State {
        let parsed = self.parse_query(raw);
        let mut candidate = self.default_value.fields().clone();
        candidate.extend(parsed);

        match self.schema.validate(&candidate) {
            Ok(state) => state,
            Err(err) if err.is_type_mismatch() => {
                warn!(field = err.field(), error = %err, "Search param type mismatch, using defaults");
                self.default_value.clone()
            }
            Err(err) => {
                warn!(field = err.field(), error = %err, "Search params failed validation, using defaults");
                self.default_value.clone()
            }
        }
    }

    /// Validates an update and converts the merged state to query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Rejected`] if the merged state does not
    /// validate. No update is produced in that case.
    pub fn write<'a>(
        &self,
        current: &State,
        update: impl Into<Update<'a>>,
    ) -> Result<QueryUpdate, WriteError> {
        let partial = update.into().resolve(current);
        debug!(changes = partial.len(), "Writing search params");
        let merged = current.merged_with(partial);

        let validated = self.schema.validate(&merged).map_err(|err| {
            warn!(field = err.field(), error = %err, "Rejected search param update");
            WriteError::Rejected(err)
        })?;

        Ok(to_query(&validated))
    }
}

fn to_query(state: &State) -> QueryUpdate {
    let params = state
        .iter()
        .map(|(name, value)| (name.to_owned(), to_param(value)))
        .collect();
    QueryUpdate::new(params)
}

fn to_param(value: &Value) -> QueryParam {
    match value {
        Value::Null => QueryParam::Null,
        Value::Array(items) => {
            QueryParam::List(items.iter().filter_map(Value::to_query_text).collect())
        }
        scalar => scalar
            .to_query_text()
            .map_or(QueryParam::Null, QueryParam::Scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryString, QueryValue};
    use crate::schema::{FieldKind, PrimitiveKind};
    use crate::state::Partial;

    fn binder() -> SearchParamBinder {
        let schema = Schema::builder()
            .field("page", FieldKind::Number.with_default(1))
            .field("open", FieldKind::Boolean.with_default(false))
            .field("tags", FieldKind::array(PrimitiveKind::String).with_default(Vec::<Value>::new()))
            .field("from", FieldKind::String.nullable().optional())
            .build()
            .unwrap();
        SearchParamBinder::from_schema(schema).unwrap()
    }

    fn raw(query: &str) -> RawQueryParams {
        QueryString::parse(query).to_raw()
    }

    #[test]
    fn test_parse_query_omits_absent_and_unknown() {
        let parsed = binder().parse_query(&raw("page=2&utm=x"));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("page"), Some(&Value::from(2)));
    }

    #[test]
    fn test_read_applies_query_over_defaults() {
        let state = binder().read(&raw("page=4&open=1&tags=a,b"));
        assert_eq!(state.get("page"), Some(&Value::from(4)));
        assert_eq!(state.get("open"), Some(&Value::from(true)));
        assert_eq!(state.get("tags"), Some(&Value::from(vec!["a", "b"])));
        assert!(state.get("from").is_none());
    }

    #[test]
    fn test_read_is_atomic() {
        let b = binder();
        // `open` is valid but `page` is not: nothing from the query is kept.
        let state = b.read(&raw("open=true&page=abc"));
        assert_eq!(&state, b.default_value());
    }

    #[test]
    fn test_read_with_caller_default_value() {
        let schema = Schema::builder()
            .field("view", FieldKind::enumeration(["grid", "list"]))
            .build()
            .unwrap();
        let fallback = schema
            .validate(&[("view".to_owned(), Value::from("grid"))].into_iter().collect())
            .unwrap();
        let b = SearchParamBinder::new(schema, fallback.clone());

        assert_eq!(b.read(&RawQueryParams::default()), fallback);
        assert_eq!(b.read(&raw("view=list")).get("view"), Some(&Value::from("list")));
        assert_eq!(b.read(&raw("view=table")), fallback);
    }

    #[test]
    fn test_write_emits_every_defined_field() {
        let b = binder();
        let current = b.default_value().clone();
        let update = b.write(&current, Partial::new().set("page", 2)).unwrap();

        assert_eq!(update.get("page"), Some(&QueryParam::Scalar("2".to_owned())));
        assert_eq!(update.get("open"), Some(&QueryParam::Scalar("false".to_owned())));
        assert_eq!(update.get("tags"), Some(&QueryParam::List(Vec::new())));
        assert!(update.get("from").is_none());
    }

    #[test]
    fn test_write_preserves_explicit_null() {
        let b = binder();
        let current = b.default_value().clone();
        let update = b.write(&current, Partial::new().set("from", Value::Null)).unwrap();
        assert_eq!(update.get("from"), Some(&QueryParam::Null));
    }

    #[test]
    fn test_write_unset_falls_back_to_default() {
        let b = binder();
        let current = b.read(&raw("page=9"));
        let update = b.write(&current, Partial::new().unset("page")).unwrap();
        assert_eq!(update.get("page"), Some(&QueryParam::Scalar("1".to_owned())));
    }

    #[test]
    fn test_write_updater_sees_current_state() {
        let b = binder();
        let current = b.read(&raw("page=2"));
        let update = b
            .write(
                &current,
                Update::updater(|s| {
                    let page = s.get("page").and_then(Value::as_f64).unwrap_or(1.0);
                    Partial::new().set("page", page + 1.0)
                }),
            )
            .unwrap();
        assert_eq!(update.get("page"), Some(&QueryParam::Scalar("3".to_owned())));
    }

    #[test]
    fn test_write_rejects_invalid_update() {
        let b = binder();
        let current = b.default_value().clone();
        let err = b
            .write(&current, Partial::new().set("tags", vec![1, 2]))
            .unwrap_err();
        assert!(matches!(
            err.validation(),
            ValidationError::InvalidElement { index: 0, .. }
        ));
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let b = binder();
        let mut url = QueryString::parse("ref=nav");
        let current = b.read(&url.to_raw());

        let update = b
            .write(
                &current,
                Partial::new()
                    .set("page", 5)
                    .set("open", true)
                    .set("tags", vec!["x", "y"]),
            )
            .unwrap();
        url.apply(&update);

        let state = b.read(&url.to_raw());
        assert_eq!(state.get("page"), Some(&Value::from(5)));
        assert_eq!(state.get("open"), Some(&Value::from(true)));
        assert_eq!(state.get("tags"), Some(&Value::from(vec!["x", "y"])));
        assert_eq!(url.to_raw().get("ref"), Some(&QueryValue::from("nav")));
    }

    #[test]
    fn test_null_and_empty_list_survive_round_trip() {
        let schema = Schema::builder()
            .field("from", FieldKind::String.nullable().with_default("2024-01-01"))
            .field("tags", FieldKind::array(PrimitiveKind::String).with_default(vec!["ui"]))
            .build()
            .unwrap();
        let b = SearchParamBinder::from_schema(schema).unwrap();
        let mut url = QueryString::new();
        let current = b.read(&url.to_raw());

        let update = b
            .write(
                &current,
                Partial::new().set("from", Value::Null).set("tags", Vec::<Value>::new()),
            )
            .unwrap();
        url.apply(&update);
        assert_eq!(url.to_string(), "from=null&tags=%2C");

        let state = b.read(&url.to_raw());
        assert_eq!(state.get("from"), Some(&Value::Null));
        assert_eq!(state.get("tags"), Some(&Value::Array(Vec::new())));
    }

    #[test]
    fn test_query_update_snapshot() {
        let b = binder();
        let update = b
            .write(
                b.default_value(),
                Partial::new().set("tags", vec!["a", "b"]).set("from", "2024-01-01"),
            )
            .unwrap();
        insta::assert_json_snapshot!(update, @r#"
        {
          "from": "2024-01-01",
          "open": "false",
          "page": "1",
          "tags": [
            "a",
            "b"
          ]
        }
        "#);
    }
}
