//! Error types for the ud-params crate.
//!
//! - [`SchemaError`] - a schema declaration is malformed
//! - [`ValidationError`] - a candidate object does not match its schema
//! - [`WriteError`] - a query parameter update was rejected
//!
//! # Recovery Strategy
//!
//! Validation failures never escape [`SearchParamBinder::read`]: it logs the
//! error and returns the binder's default value. [`SearchParamBinder::write`]
//! surfaces them as [`WriteError::Rejected`] and emits no update.
//!
//! [`SearchParamBinder::read`]: crate::SearchParamBinder::read
//! [`SearchParamBinder::write`]: crate::SearchParamBinder::write

/// Errors raised while building a [`Schema`](crate::Schema).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// A field name was empty.
    #[error("schema field names must not be empty")]
    EmptyName,

    /// Two fields share a name.
    #[error("duplicate schema field '{0}'")]
    DuplicateField(String),

    /// An enumeration field declares no options.
    #[error("enum field '{field}' has no options")]
    EmptyEnum {
        /// The offending field.
        field: String,
    },

    /// A default value does not satisfy the kind it decorates.
    #[error("default for field '{field}' is invalid: {source}")]
    InvalidDefault {
        /// The offending field.
        field: String,
        /// Why the default failed validation.
        source: ValidationError,
    },
}

/// A candidate object failed schema validation.
///
/// # Examples
///
/// ```
/// use ud_params::ValidationError;
///
/// let err = ValidationError::TypeMismatch {
///     field: "page".to_owned(),
///     expected: "number".to_owned(),
///     found: "string",
/// };
/// assert_eq!(err.field(), "page");
/// assert!(err.is_type_mismatch());
/// assert_eq!(err.to_string(), "field 'page': type mismatch, expected number, found string");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is undefined and has no default.
    #[error("field '{field}' is required")]
    Missing {
        /// The field name.
        field: String,
    },

    /// The value has the wrong shape for the field.
    #[error("field '{field}': type mismatch, expected {expected}, found {found}")]
    TypeMismatch {
        /// The field name.
        field: String,
        /// Description of the declared kind.
        expected: String,
        /// Kind of the value that was supplied.
        found: &'static str,
    },

    /// A string is not one of the enumeration's options.
    #[error("field '{field}': '{value}' is not one of [{}]", options.join(", "))]
    NotInEnum {
        /// The field name.
        field: String,
        /// The rejected value.
        value: String,
        /// The allowed options.
        options: Vec<String>,
    },

    /// An array element has the wrong kind.
    #[error("field '{field}': element {index} expected {expected}, found {found}")]
    InvalidElement {
        /// The field name.
        field: String,
        /// Position of the bad element.
        index: usize,
        /// The declared element kind.
        expected: &'static str,
        /// Kind of the element that was supplied.
        found: &'static str,
    },
}

impl ValidationError {
    /// Returns the name of the field that failed.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field }
            | Self::TypeMismatch { field, .. }
            | Self::NotInEnum { field, .. }
            | Self::InvalidElement { field, .. } => field,
        }
    }

    /// Returns `true` if a value of the wrong kind caused the failure.
    ///
    /// A numeric query parameter that could not be parsed reaches validation
    /// as a string and is reported this way.
    #[inline]
    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            Self::TypeMismatch { .. } | Self::InvalidElement { .. }
        )
    }
}

/// A call to [`SearchParamBinder::write`](crate::SearchParamBinder::write) was rejected.
///
/// The previous state stays in effect and no query update is emitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// The merged state failed validation.
    #[error("search param update rejected: {0}")]
    Rejected(#[from] ValidationError),
}

impl WriteError {
    /// Returns the underlying validation failure.
    #[must_use]
    pub const fn validation(&self) -> &ValidationError {
        match self {
            Self::Rejected(err) => err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_display() {
        let err = ValidationError::Missing {
            field: "page".to_owned(),
        };
        assert_eq!(err.to_string(), "field 'page' is required");
        assert!(!err.is_type_mismatch());
    }

    #[test]
    fn test_not_in_enum_display() {
        let err = ValidationError::NotInEnum {
            field: "sortBy".to_owned(),
            value: "invalid".to_owned(),
            options: vec!["name".to_owned(), "date".to_owned()],
        };
        assert_eq!(
            err.to_string(),
            "field 'sortBy': 'invalid' is not one of [name, date]"
        );
        assert_eq!(err.field(), "sortBy");
    }

    #[test]
    fn test_invalid_element_is_type_mismatch() {
        let err = ValidationError::InvalidElement {
            field: "ids".to_owned(),
            index: 2,
            expected: "number",
            found: "string",
        };
        assert!(err.is_type_mismatch());
        assert!(err.to_string().contains("element 2"));
    }

    #[test]
    fn test_write_error_wraps_validation() {
        let inner = ValidationError::Missing {
            field: "q".to_owned(),
        };
        let err = WriteError::from(inner.clone());
        assert_eq!(err.validation(), &inner);
        assert!(err.to_string().starts_with("search param update rejected"));
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::InvalidDefault {
            field: "page".to_owned(),
            source: ValidationError::TypeMismatch {
                field: "page".to_owned(),
                expected: "number".to_owned(),
                found: "string",
            },
        };
        assert!(err.to_string().starts_with("default for field 'page' is invalid"));
        assert_eq!(
            SchemaError::DuplicateField("tags".to_owned()).to_string(),
            "duplicate schema field 'tags'"
        );
    }
}
