//! Conversion of raw query values to field values.
//!
//! Coercion is permissive: it never fails. Values that cannot be converted
//! are passed through as strings and left for schema validation to reject.

use crate::query::{NULL_MARKER, QueryValue};
use crate::schema::{FieldKind, PrimitiveKind};
use crate::value::Value;

/// Converts a raw query value according to the field's base kind.
///
/// Modifiers are unwrapped first, so `optional<number>` coerces like
/// `number`. A field with a `nullable` modifier reads a lone
/// [`NULL_MARKER`] as null.
///
/// # Examples
///
/// ```
/// use ud_params::{coerce, FieldKind, PrimitiveKind, QueryValue, Value};
///
/// assert_eq!(coerce(&FieldKind::Number, &QueryValue::from("2")), Value::from(2));
/// assert_eq!(coerce(&FieldKind::Boolean, &QueryValue::from("1")), Value::from(true));
/// assert_eq!(
///     coerce(&FieldKind::array(PrimitiveKind::String), &QueryValue::from("a,b")),
///     Value::from(vec!["a", "b"]),
/// );
/// ```
#[must_use]
pub fn coerce(kind: &FieldKind, raw: &QueryValue) -> Value {
    if kind.is_nullable() && matches!(raw, QueryValue::Single(s) if s == NULL_MARKER) {
        return Value::Null;
    }

    match kind.unwrap_kind() {
        FieldKind::Number => match raw {
            QueryValue::Single(s) => number_or_string(s),
            QueryValue::Multiple(_) => passthrough(raw),
        },
        FieldKind::Boolean => {
            Value::Bool(matches!(raw, QueryValue::Single(s) if is_truthy(s)))
        }
        FieldKind::Array { items } => {
            let parts: Vec<&str> = match raw {
                QueryValue::Multiple(values) => values.iter().map(String::as_str).collect(),
                QueryValue::Single(s) if s.contains(',') => {
                    s.split(',').filter(|part| !part.is_empty()).collect()
                }
                QueryValue::Single(s) => vec![s.as_str()],
            };
            Value::Array(parts.into_iter().map(|p| coerce_element(*items, p)).collect())
        }
        // Strings and enums pass through; wrappers cannot remain after unwrap_kind.
        FieldKind::String
        | FieldKind::Enum { .. }
        | FieldKind::Optional { .. }
        | FieldKind::Nullable { .. }
        | FieldKind::Default { .. } => passthrough(raw),
    }
}

fn coerce_element(kind: PrimitiveKind, raw: &str) -> Value {
    match kind {
        PrimitiveKind::String => Value::from(raw),
        PrimitiveKind::Number => number_or_string(raw),
        PrimitiveKind::Boolean => Value::Bool(is_truthy(raw)),
    }
}

fn passthrough(raw: &QueryValue) -> Value {
    match raw {
        QueryValue::Single(s) => Value::from(s.as_str()),
        QueryValue::Multiple(values) => {
            Value::Array(values.iter().map(|v| Value::from(v.as_str())).collect())
        }
    }
}

fn is_truthy(s: &str) -> bool {
    s == "true" || s == "1"
}

fn number_or_string(s: &str) -> Value {
    parse_number(s).map_or_else(|| Value::from(s), Value::Number)
}

/// Parses a decimal numeral into a finite number.
fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
