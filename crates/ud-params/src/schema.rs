//! Declarative field schemas.
//!
//! A [`Schema`] is an ordered, immutable list of uniquely named [`Field`]s.
//! Each field's [`FieldKind`] is a tagged variant: a base kind (string,
//! number, boolean, array of a primitive, enumeration of strings) optionally
//! wrapped in `Optional`, `Nullable` and `Default` modifiers. Modifiers are
//! unwrapped with [`FieldKind::unwrap_kind`] when coercing query values and
//! applied in order during [`Schema::validate`].
//!
//! # JSON Form
//!
//! Schemas (de)serialize with serde, so they can be declared in a file:
//!
//! ```
//! use ud_params::Schema;
//!
//! let schema: Schema = serde_json::from_str(r#"{
//!     "fields": [
//!         {"name": "page", "kind": {"type": "default", "inner": {"type": "number"}, "value": 1}},
//!         {"name": "q", "kind": {"type": "optional", "inner": {"type": "string"}}}
//!     ]
//! }"#)?;
//! assert_eq!(schema.len(), 2);
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SchemaError, ValidationError};
use crate::state::State;
use crate::value::Value;

/// Element kinds allowed inside an array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// Any string.
    String,
    /// A finite number.
    Number,
    /// A boolean.
    Boolean,
}

impl PrimitiveKind {
    /// Returns the kind's name as used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::String, Value::String(_))
                | (Self::Number, Value::Number(_))
                | (Self::Boolean, Value::Bool(_))
        )
    }
}

/// The declared kind of a field, including modifiers.
///
/// # Examples
///
/// ```
/// use ud_params::{FieldKind, PrimitiveKind};
///
/// let kind = FieldKind::array(PrimitiveKind::String).nullable().optional();
/// assert_eq!(kind.unwrap_kind(), &FieldKind::array(PrimitiveKind::String));
/// assert_eq!(kind.to_string(), "optional<nullable<array<string>>>");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Any string.
    String,
    /// A finite number.
    Number,
    /// A boolean.
    Boolean,
    /// An array whose elements are all of one primitive kind.
    Array {
        /// The element kind.
        items: PrimitiveKind,
    },
    /// A string restricted to a fixed set of options.
    Enum {
        /// The allowed options, in declaration order.
        options: Vec<String>,
    },
    /// The field may be undefined.
    Optional {
        /// The wrapped kind.
        inner: Box<FieldKind>,
    },
    /// The field may be an explicit null.
    Nullable {
        /// The wrapped kind.
        inner: Box<FieldKind>,
    },
    /// An undefined field takes `value`.
    Default {
        /// The wrapped kind.
        inner: Box<FieldKind>,
        /// Value used when the field is undefined.
        value: Value,
    },
}

impl FieldKind {
    /// An array of `items`.
    #[must_use]
    pub const fn array(items: PrimitiveKind) -> Self {
        Self::Array { items }
    }

    /// An enumeration of the given options.
    #[must_use]
    pub fn enumeration<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Wraps this kind so the field may be undefined.
    #[must_use]
    pub fn optional(self) -> Self {
        Self::Optional {
            inner: Box::new(self),
        }
    }

    /// Wraps this kind so the field may be null.
    #[must_use]
    pub fn nullable(self) -> Self {
        Self::Nullable {
            inner: Box::new(self),
        }
    }

    /// Wraps this kind with a default for undefined values.
    #[must_use]
    pub fn with_default(self, value: impl Into<Value>) -> Self {
        Self::Default {
            inner: Box::new(self),
            value: value.into(),
        }
    }

    /// Strips `Optional`, `Nullable` and `Default` wrappers, recursively.
    #[must_use]
    pub fn unwrap_kind(&self) -> &Self {
        match self {
            Self::Optional { inner } | Self::Nullable { inner } | Self::Default { inner, .. } => {
                inner.unwrap_kind()
            }
            base => base,
        }
    }

    /// Returns `true` if a `Nullable` wrapper appears anywhere above the base kind.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Nullable { .. } => true,
            Self::Optional { inner } | Self::Default { inner, .. } => inner.is_nullable(),
            _ => false,
        }
    }

    /// Returns the default value of the outermost `Default` wrapper, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        match self {
            Self::Default { value, .. } => Some(value),
            Self::Optional { inner } | Self::Nullable { inner } => inner.default_value(),
            _ => None,
        }
    }

    /// Validates one field value against this kind.
    ///
    /// `value` is `None` when the field is undefined. Returns the value to
    /// store, or `None` when the field legitimately stays undefined.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first violation.
    pub fn validate(&self, field: &str, value: Option<&Value>) -> Result<Option<Value>, ValidationError> {
        match self {
            Self::Default { inner, value: default } => inner.validate(field, value.or(Some(default))),
            Self::Optional { inner } => match value {
                None => Ok(None),
                Some(v) => inner.validate(field, Some(v)),
            },
            Self::Nullable { inner } => match value {
                Some(Value::Null) => Ok(Some(Value::Null)),
                other => inner.validate(field, other),
            },
            base => {
                let Some(value) = value else {
                    return Err(ValidationError::Missing {
                        field: field.to_owned(),
                    });
                };
                base.validate_base(field, value).map(Some)
            }
        }
    }

    fn validate_base(&self, field: &str, value: &Value) -> Result<Value, ValidationError> {
        let mismatch = || ValidationError::TypeMismatch {
            field: field.to_owned(),
            expected: self.to_string(),
            found: value.kind_name(),
        };
        match (self, value) {
            (Self::String, Value::String(_)) | (Self::Boolean, Value::Bool(_)) => Ok(value.clone()),
            (Self::Number, Value::Number(n)) if n.is_finite() => Ok(value.clone()),
            (Self::Array { items }, Value::Array(elements)) => {
                if let Some((index, bad)) = elements
                    .iter()
                    .enumerate()
                    .find(|(_, element)| !items.accepts(element))
                {
                    return Err(ValidationError::InvalidElement {
                        field: field.to_owned(),
                        index,
                        expected: items.name(),
                        found: bad.kind_name(),
                    });
                }
                Ok(value.clone())
            }
            (Self::Enum { options }, Value::String(s)) => {
                if options.iter().any(|option| option == s) {
                    Ok(value.clone())
                } else {
                    Err(ValidationError::NotInEnum {
                        field: field.to_owned(),
                        value: s.clone(),
                        options: options.clone(),
                    })
                }
            }
            _ => Err(mismatch()),
        }
    }

    /// Checks declarations that can be wrong independent of any input.
    fn check(&self, field: &str) -> Result<(), SchemaError> {
        match self {
            Self::Enum { options } if options.is_empty() => Err(SchemaError::EmptyEnum {
                field: field.to_owned(),
            }),
            Self::Optional { inner } | Self::Nullable { inner } => inner.check(field),
            Self::Default { inner, value } => {
                inner.check(field)?;
                inner
                    .validate(field, Some(value))
                    .map(|_| ())
                    .map_err(|source| SchemaError::InvalidDefault {
                        field: field.to_owned(),
                        source,
                    })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
            Self::Array { items } => write!(f, "array<{}>", items.name()),
            Self::Enum { options } => write!(f, "enum({})", options.join("|")),
            Self::Optional { inner } => write!(f, "optional<{inner}>"),
            Self::Nullable { inner } => write!(f, "nullable<{inner}>"),
            Self::Default { inner, .. } => write!(f, "default<{inner}>"),
        }
    }
}

/// A named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// The field name, also used as the query parameter key.
    pub name: String,
    /// The declared kind.
    pub kind: FieldKind,
}

impl Field {
    /// Creates a field.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SchemaDef {
    fields: Vec<Field>,
}

/// An immutable set of uniquely named fields.
///
/// # Examples
///
/// ```
/// use ud_params::{FieldKind, PrimitiveKind, Schema, Value};
///
/// let schema = Schema::builder()
///     .field("page", FieldKind::Number.with_default(1))
///     .field("tags", FieldKind::array(PrimitiveKind::String).with_default(Vec::<Value>::new()))
///     .field("sortBy", FieldKind::enumeration(["name", "date", "popularity"]).with_default("date"))
///     .build()?;
///
/// let defaults = schema.defaults()?;
/// assert_eq!(defaults.get("sortBy"), Some(&Value::from("date")));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaDef", into = "SchemaDef")]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Creates a schema, checking names, enum options and defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for an empty or duplicate name, an enum
    /// without options, or a default that fails its own kind.
    pub fn new(fields: Vec<Field>) -> Result<Self, SchemaError> {
        let mut seen = FxHashSet::default();
        for field in &fields {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            field.kind.check(&field.name)?;
        }
        Ok(Self { fields })
    }

    /// Starts a [`SchemaBuilder`].
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validates a candidate object, applying defaults.
    ///
    /// Keys the schema does not declare are stripped. All-or-nothing: the
    /// first failing field aborts validation.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] in field declaration order.
    pub fn validate(&self, candidate: &BTreeMap<String, Value>) -> Result<State, ValidationError> {
        for key in candidate.keys() {
            if self.field(key).is_none() {
                debug!(key = %key, "Stripping key not declared in schema");
            }
        }

        let mut validated = BTreeMap::new();
        for field in &self.fields {
            if let Some(value) = field.kind.validate(&field.name, candidate.get(&field.name))? {
                validated.insert(field.name.clone(), value);
            }
        }
        Ok(State::new(validated))
    }

    /// Validates the empty object, yielding the schema's default state.
    ///
    /// # Errors
    ///
    /// Fails with [`ValidationError::Missing`] if a required field has no default.
    pub fn defaults(&self) -> Result<State, ValidationError> {
        self.validate(&BTreeMap::new())
    }
}

impl TryFrom<SchemaDef> for Schema {
    type Error = SchemaError;

    fn try_from(def: SchemaDef) -> Result<Self, Self::Error> {
        Self::new(def.fields)
    }
}

impl From<Schema> for SchemaDef {
    fn from(schema: Schema) -> Self {
        Self {
            fields: schema.fields,
        }
    }
}

/// Incremental [`Schema`] construction.
#[derive(Debug, Default, Clone)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Appends a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(Field::new(name, kind));
        self
    }

    /// Finishes the schema.
    ///
    /// # Errors
    ///
    /// See [`Schema::new`].
    pub fn build(self) -> Result<Schema, SchemaError> {
        Schema::new(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    fn listing_schema() -> Schema {
        Schema::builder()
            .field("page", FieldKind::Number.with_default(1))
            .field(
                "tags",
                FieldKind::array(PrimitiveKind::String).with_default(Vec::<Value>::new()),
            )
            .field(
                "sortBy",
                FieldKind::enumeration(["name", "date", "popularity"]).with_default("date"),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_unwrap_kind_is_recursive() {
        let kind = FieldKind::Number.nullable().with_default(3).optional();
        assert_eq!(kind.unwrap_kind(), &FieldKind::Number);
        assert_eq!(FieldKind::Boolean.unwrap_kind(), &FieldKind::Boolean);
    }

    #[test]
    fn test_is_nullable_looks_through_wrappers() {
        assert!(FieldKind::String.nullable().is_nullable());
        assert!(FieldKind::Number.nullable().with_default(1).optional().is_nullable());
        assert!(!FieldKind::Boolean.optional().with_default(false).is_nullable());
        assert!(!FieldKind::array(PrimitiveKind::String).is_nullable());
    }

    #[test]
    fn test_default_value_lookup() {
        let kind = FieldKind::Number.with_default(3).nullable();
        assert_eq!(kind.default_value(), Some(&Value::from(3)));
        assert_eq!(FieldKind::Number.optional().default_value(), None);
    }

    #[test]
    fn test_defaults_fill_undefined_fields() {
        let state = listing_schema().defaults().unwrap();
        assert_eq!(state.get("page"), Some(&Value::from(1)));
        assert_eq!(state.get("tags"), Some(&Value::Array(vec![])));
        assert_eq!(state.get("sortBy"), Some(&Value::from("date")));
    }

    #[test]
    fn test_required_field_missing() {
        let schema = Schema::builder().field("q", FieldKind::String).build().unwrap();
        assert_eq!(
            schema.defaults().unwrap_err(),
            ValidationError::Missing {
                field: "q".to_owned()
            }
        );
    }

    #[test]
    fn test_optional_stays_undefined() {
        let schema = Schema::builder()
            .field("q", FieldKind::String.optional())
            .build()
            .unwrap();
        let state = schema.defaults().unwrap();
        assert!(state.get("q").is_none());
        assert!(state.is_empty());
    }

    #[test]
    fn test_nullable_accepts_null_only_when_declared() {
        let schema = Schema::builder()
            .field("from", FieldKind::String.nullable())
            .field("to", FieldKind::String.optional())
            .build()
            .unwrap();
        let ok = schema.validate(&candidate(&[("from", Value::Null)])).unwrap();
        assert_eq!(ok.get("from"), Some(&Value::Null));

        let err = schema
            .validate(&candidate(&[("from", Value::Null), ("to", Value::Null)]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { ref field, found: "null", .. } if field == "to"));
    }

    #[test]
    fn test_number_field_rejects_string() {
        let err = listing_schema()
            .validate(&candidate(&[("page", Value::from("abc"))]))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                field: "page".to_owned(),
                expected: "number".to_owned(),
                found: "string",
            }
        );
    }

    #[test]
    fn test_enum_membership() {
        let err = listing_schema()
            .validate(&candidate(&[("sortBy", Value::from("invalid"))]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::NotInEnum { ref value, .. } if value == "invalid"));
    }

    #[test]
    fn test_array_elements_checked() {
        let schema = Schema::builder()
            .field("ids", FieldKind::array(PrimitiveKind::Number))
            .build()
            .unwrap();
        let err = schema
            .validate(&candidate(&[(
                "ids",
                Value::Array(vec![Value::from(1), Value::from("x")]),
            )]))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidElement {
                field: "ids".to_owned(),
                index: 1,
                expected: "number",
                found: "string",
            }
        );
    }

    #[test]
    fn test_unknown_keys_are_stripped() {
        let state = listing_schema()
            .validate(&candidate(&[("utm_source", Value::from("mail"))]))
            .unwrap();
        assert!(state.get("utm_source").is_none());
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        let err = Schema::builder()
            .field("page", FieldKind::Number)
            .field("page", FieldKind::String)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("page".to_owned()));
    }

    #[test]
    fn test_schema_rejects_bad_declarations() {
        assert_eq!(
            Schema::builder().field("", FieldKind::String).build().unwrap_err(),
            SchemaError::EmptyName
        );
        assert!(matches!(
            Schema::builder()
                .field("sort", FieldKind::enumeration(Vec::<String>::new()))
                .build(),
            Err(SchemaError::EmptyEnum { .. })
        ));
        assert!(matches!(
            Schema::builder()
                .field("sort", FieldKind::enumeration(["a", "b"]).with_default("c"))
                .build(),
            Err(SchemaError::InvalidDefault { .. })
        ));
    }

    #[test]
    fn test_schema_json_round_trip_and_validation() {
        let schema = listing_schema();
        let json = serde_json::to_string(&schema).unwrap();
        let parsed: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schema);

        let duplicate = r#"{"fields": [
            {"name": "a", "kind": {"type": "string"}},
            {"name": "a", "kind": {"type": "number"}}
        ]}"#;
        assert!(serde_json::from_str::<Schema>(duplicate).is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(
            FieldKind::enumeration(["name", "date"]).to_string(),
            "enum(name|date)"
        );
        assert_eq!(
            FieldKind::array(PrimitiveKind::Boolean).with_default(Vec::<Value>::new()).to_string(),
            "default<array<boolean>>"
        );
    }
}
