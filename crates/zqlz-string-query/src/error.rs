//! String query errors

use thiserror::Error;

use crate::binding::{BindingKind, ParameterIdentifier};

/// Result type for templated query parsing and binding lookups.
pub type StringQueryResult<T> = Result<T, StringQueryError>;

/// Errors raised while parsing a query template or looking up its bindings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StringQueryError {
    /// An embedded expression (`:#{` or `?#{`) was opened but its braces never balanced.
    #[error("unterminated expression starting at byte {offset}: missing closing '}}'")]
    MalformedExpression { offset: usize },

    /// A parameter was used twice with incompatible binding shapes.
    #[error("conflicting bindings for parameter {identifier}: already bound as {existing}, found {conflicting}")]
    ConflictingBinding {
        identifier: ParameterIdentifier,
        existing: BindingKind,
        conflicting: BindingKind,
    },

    /// A positional marker used position 0 or a number too large to address.
    #[error("invalid parameter position at byte {offset}: positions start at 1")]
    InvalidPosition { offset: usize },

    /// A binding lookup was attempted without a name or position.
    #[error(
        "cannot look up a parameter binding without a name or position; \
         did you forget to annotate the method parameter with @Param?"
    )]
    MissingIdentifierForLookup,

    /// No binding exists for the requested identifier.
    #[error("no binding for parameter {0}")]
    UnknownParameter(ParameterIdentifier),

    /// Parser options could not be loaded.
    #[error("invalid string query options: {0}")]
    Options(String),
}

impl From<toml::de::Error> for StringQueryError {
    fn from(err: toml::de::Error) -> Self {
        StringQueryError::Options(err.to_string())
    }
}
