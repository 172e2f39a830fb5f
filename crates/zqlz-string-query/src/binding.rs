//! Parameter Binding Model
//!
//! Describes how each placeholder of a parsed query template has to be
//! supplied at execution time: which parameter it refers to and whether the
//! value is bound as-is, as a `LIKE` pattern, or as an `IN` collection.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// Identifies the parameter a marker refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterIdentifier {
    /// A named parameter like `:name`.
    Name(String),
    /// A 1-based positional parameter like `?1`.
    Position(usize),
}

impl ParameterIdentifier {
    /// Create a named identifier.
    pub fn name(name: impl Into<String>) -> Self {
        ParameterIdentifier::Name(name.into())
    }

    /// Create a positional identifier.
    pub fn position(position: usize) -> Self {
        ParameterIdentifier::Position(position)
    }

    /// Returns the parameter name if this is a named identifier.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            ParameterIdentifier::Name(name) => Some(name),
            ParameterIdentifier::Position(_) => None,
        }
    }

    /// Returns the position if this is a positional identifier.
    pub fn as_position(&self) -> Option<usize> {
        match self {
            ParameterIdentifier::Name(_) => None,
            ParameterIdentifier::Position(position) => Some(*position),
        }
    }
}

/// Formats as the marker text of a canonical query (`:name` or `?1`).
impl fmt::Display for ParameterIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterIdentifier::Name(name) => write!(f, ":{}", name),
            ParameterIdentifier::Position(position) => write!(f, "?{}", position),
        }
    }
}

/// Wildcard placement of a `LIKE` binding, derived from `%` decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeMode {
    /// `%:x%`
    Contains,
    /// `:x%`
    StartsWith,
    /// `%:x`
    EndsWith,
    /// `:x` with no wildcard
    Equals,
}

impl LikeMode {
    /// Derive the mode from the presence of leading and trailing `%`.
    pub fn from_wildcards(leading: bool, trailing: bool) -> Self {
        match (leading, trailing) {
            (true, true) => LikeMode::Contains,
            (false, true) => LikeMode::StartsWith,
            (true, false) => LikeMode::EndsWith,
            (false, false) => LikeMode::Equals,
        }
    }

    /// Wrap an (already escaped) value with the wildcards this mode stands for.
    pub fn decorate(self, value: &str) -> String {
        match self {
            LikeMode::Contains => format!("%{}%", value),
            LikeMode::StartsWith => format!("{}%", value),
            LikeMode::EndsWith => format!("%{}", value),
            LikeMode::Equals => value.to_string(),
        }
    }
}

impl fmt::Display for LikeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LikeMode::Contains => "contains",
            LikeMode::StartsWith => "starts with",
            LikeMode::EndsWith => "ends with",
            LikeMode::Equals => "equals",
        };
        f.write_str(name)
    }
}

/// How a parameter value is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BindingKind {
    /// Bound as-is (`= :x`, `> ?1`, ...).
    Simple,
    /// Bound as a `LIKE` pattern.
    Like {
        mode: LikeMode,
        escape: Option<char>,
    },
    /// Bound as the collection of an `IN` predicate.
    InCollection,
}

impl BindingKind {
    /// Create a `LIKE` kind without an escape character.
    pub fn like(mode: LikeMode) -> Self {
        BindingKind::Like { mode, escape: None }
    }

    /// Returns true if this is a `LIKE` binding.
    pub fn is_like(&self) -> bool {
        matches!(self, BindingKind::Like { .. })
    }

    /// Returns true if this is an `IN` collection binding.
    pub fn is_in_collection(&self) -> bool {
        matches!(self, BindingKind::InCollection)
    }

    /// Returns the `LIKE` mode, if any.
    pub fn like_mode(&self) -> Option<LikeMode> {
        match self {
            BindingKind::Like { mode, .. } => Some(*mode),
            _ => None,
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::Simple => f.write_str("simple"),
            BindingKind::InCollection => f.write_str("in-collection"),
            BindingKind::Like { mode, escape: None } => write!(f, "like ({})", mode),
            BindingKind::Like {
                mode,
                escape: Some(escape),
            } => write!(f, "like ({}, escape '{}')", mode, escape),
        }
    }
}

/// A parameter binding extracted from a query template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterBinding {
    /// The parameter the marker refers to.
    pub identifier: ParameterIdentifier,
    /// How the value is bound.
    pub kind: BindingKind,
    /// Source text of the embedded expression this binding was synthesized for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl ParameterBinding {
    /// Create a binding for a plain marker.
    pub fn new(identifier: ParameterIdentifier, kind: BindingKind) -> Self {
        Self {
            identifier,
            kind,
            expression: None,
        }
    }

    /// Attach the embedded expression the binding's value is computed from.
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Returns true if the binding refers to the given name.
    pub fn has_name(&self, name: &str) -> bool {
        self.identifier.as_name() == Some(name)
    }

    /// Returns true if the binding refers to the given position.
    pub fn has_position(&self, position: usize) -> bool {
        self.identifier.as_position() == Some(position)
    }

    /// Returns true if the value comes from an embedded expression.
    pub fn is_expression(&self) -> bool {
        self.expression.is_some()
    }

    /// Two bindings are compatible when they bind the same parameter the same way.
    pub fn is_compatible_with(&self, other: &ParameterBinding) -> bool {
        self.identifier == other.identifier && self.kind == other.kind
    }

    /// Turn a raw value into the pattern to bind for this parameter.
    ///
    /// `LIKE` bindings escape `%`, `_` and the escape character itself when an
    /// `ESCAPE` clause was declared, then add the wildcards of their mode. Every
    /// other kind returns the value unchanged.
    pub fn prepare_like_value<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match self.kind {
            BindingKind::Like { mode, escape } => {
                let escaped = match escape {
                    Some(escape) => escape_wildcards(value, escape),
                    None => Cow::Borrowed(value),
                };
                Cow::Owned(mode.decorate(&escaped))
            }
            BindingKind::Simple | BindingKind::InCollection => Cow::Borrowed(value),
        }
    }
}

impl fmt::Display for ParameterBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.identifier, self.kind)?;
        if let Some(expression) = &self.expression {
            write!(f, " <- #{{{}}}", expression)?;
        }
        Ok(())
    }
}

fn escape_wildcards(value: &str, escape: char) -> Cow<'_, str> {
    if !value.chars().any(|c| c == '%' || c == '_' || c == escape) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if c == '%' || c == '_' || c == escape {
            escaped.push(escape);
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}
