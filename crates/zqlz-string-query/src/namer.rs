//! Synthetic identifiers for embedded expressions
//!
//! `:#{...}` markers are replaced by `:<prefix>1`, `:<prefix>2`, ... and
//! `?#{...}` markers by the next positions after the highest explicit `?N`.
//! The same expression text always maps to the same identifier.

use std::collections::{HashMap, HashSet};

use crate::binding::ParameterIdentifier;
use crate::error::{StringQueryError, StringQueryResult};
use crate::scanner::{MarkerTarget, Span};

pub(crate) struct SyntheticNamer<'a> {
    prefix: String,
    explicit_names: HashSet<&'a str>,
    named: HashMap<&'a str, String>,
    positional: HashMap<&'a str, usize>,
    named_counter: usize,
    last_position: usize,
}

impl<'a> SyntheticNamer<'a> {
    /// Create a namer that avoids every name and position written explicitly in `spans`.
    pub fn for_spans(spans: &[Span<'a>], prefix: &str) -> Self {
        let mut explicit_names = HashSet::new();
        let mut last_position = 0;

        for span in spans {
            if let Span::Marker(marker) = span {
                match marker.target {
                    MarkerTarget::Named(name) => {
                        explicit_names.insert(name);
                    }
                    MarkerTarget::Positional(position) => {
                        last_position = last_position.max(position);
                    }
                    MarkerTarget::NamedExpression(_) | MarkerTarget::PositionalExpression(_) => {}
                }
            }
        }

        Self {
            prefix: prefix.to_string(),
            explicit_names,
            named: HashMap::new(),
            positional: HashMap::new(),
            named_counter: 0,
            last_position,
        }
    }

    /// Identifier for a `:#{expression}` marker.
    pub fn name_for(&mut self, expression: &'a str) -> ParameterIdentifier {
        if let Some(name) = self.named.get(expression) {
            return ParameterIdentifier::Name(name.clone());
        }

        let name = loop {
            self.named_counter += 1;
            let candidate = format!("{}{}", self.prefix, self.named_counter);
            if !self.explicit_names.contains(candidate.as_str()) {
                break candidate;
            }
        };

        tracing::trace!(expression = %expression, name = %name, "minted synthetic parameter name");
        self.named.insert(expression, name.clone());
        ParameterIdentifier::Name(name)
    }

    /// Identifier for a `?#{expression}` marker found at `offset`.
    ///
    /// Fails with `InvalidPosition` once the highest position is taken.
    pub fn position_for(
        &mut self,
        expression: &'a str,
        offset: usize,
    ) -> StringQueryResult<ParameterIdentifier> {
        if let Some(&position) = self.positional.get(expression) {
            return Ok(ParameterIdentifier::Position(position));
        }

        let position = self
            .last_position
            .checked_add(1)
            .ok_or(StringQueryError::InvalidPosition { offset })?;
        self.last_position = position;

        tracing::trace!(expression = %expression, position, "minted synthetic parameter position");
        self.positional.insert(expression, position);
        Ok(ParameterIdentifier::Position(position))
    }
}
