//! Parsed query templates

use std::str::FromStr;

use serde::Serialize;

use crate::binding::{ParameterBinding, ParameterIdentifier};
use crate::error::{StringQueryError, StringQueryResult};
use crate::options::StringQueryOptions;
use crate::{detect, rewriter, scanner};

/// A query template parsed once into its executable form and parameter bindings.
///
/// Immutable after construction; share it freely between threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedQuery {
    original: String,
    canonical: String,
    bindings: Vec<ParameterBinding>,
    has_constructor_expression: bool,
    alias: Option<String>,
}

impl ParsedQuery {
    /// Parse a query template with default options.
    pub fn parse(raw: &str) -> StringQueryResult<Self> {
        Self::parse_with_options(raw, &StringQueryOptions::default())
    }

    /// Parse a query template.
    ///
    /// Fails with `MalformedExpression` for unbalanced expression braces,
    /// `InvalidPosition` for `?0`, and `ConflictingBinding` when a parameter is
    /// bound in two incompatible ways. No partial result is produced.
    pub fn parse_with_options(raw: &str, options: &StringQueryOptions) -> StringQueryResult<Self> {
        options.validate()?;
        tracing::trace!(sql_preview = %raw.chars().take(100).collect::<String>(), "parsing query template");

        let spans = scanner::scan(raw, options)?;
        let rewritten = rewriter::rewrite(raw, &spans, options)?;

        let masked = scanner::mask_opaque(raw, options);
        let has_constructor_expression = detect::has_constructor_expression(&masked);
        let alias = detect::detect_alias(&masked);

        tracing::debug!(
            bindings = rewritten.bindings.len(),
            constructor_expression = has_constructor_expression,
            alias = ?alias,
            "parsed query template"
        );

        Ok(Self {
            original: raw.to_string(),
            canonical: rewritten.canonical,
            bindings: rewritten.bindings,
            has_constructor_expression,
            alias,
        })
    }

    /// The template as written.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The executable query: only plain `:name` and `?N` markers remain.
    pub fn query_string(&self) -> &str {
        &self.canonical
    }

    /// Returns true if the query has at least one parameter binding.
    pub fn has_parameter_bindings(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Bindings in order of first occurrence in the template.
    pub fn parameter_bindings(&self) -> &[ParameterBinding] {
        &self.bindings
    }

    /// Returns true if any binding is computed from an embedded expression.
    pub fn uses_expressions(&self) -> bool {
        self.bindings.iter().any(ParameterBinding::is_expression)
    }

    /// Returns true for `select new Dto(...)` projections.
    pub fn has_constructor_expression(&self) -> bool {
        self.has_constructor_expression
    }

    /// Alias of the root entity (`u` in `select u from User u`).
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Looks up the binding for a parameter.
    ///
    /// Passing `None` fails with `MissingIdentifierForLookup`, which tells the
    /// caller to name the parameter with `@Param`.
    pub fn binding_for(
        &self,
        identifier: Option<&ParameterIdentifier>,
    ) -> StringQueryResult<&ParameterBinding> {
        let identifier = identifier.ok_or(StringQueryError::MissingIdentifierForLookup)?;
        self.bindings
            .iter()
            .find(|binding| &binding.identifier == identifier)
            .ok_or_else(|| StringQueryError::UnknownParameter(identifier.clone()))
    }

    /// Looks up the binding of a named parameter.
    pub fn binding_for_name(&self, name: &str) -> StringQueryResult<&ParameterBinding> {
        self.binding_for(Some(&ParameterIdentifier::name(name)))
    }

    /// Looks up the binding of a positional parameter.
    pub fn binding_for_position(&self, position: usize) -> StringQueryResult<&ParameterBinding> {
        self.binding_for(Some(&ParameterIdentifier::Position(position)))
    }
}

impl FromStr for ParsedQuery {
    type Err = StringQueryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

/// Parse a query template with default options.
///
/// # Example
///
/// ```
/// use zqlz_string_query::{BindingKind, LikeMode, parse};
///
/// let query = parse("select u from User u where u.lastname like %:name").unwrap();
/// assert_eq!(query.query_string(), "select u from User u where u.lastname like :name");
///
/// let binding = &query.parameter_bindings()[0];
/// assert!(binding.has_name("name"));
/// assert_eq!(binding.kind, BindingKind::like(LikeMode::EndsWith));
/// ```
pub fn parse(raw: &str) -> StringQueryResult<ParsedQuery> {
    ParsedQuery::parse(raw)
}
