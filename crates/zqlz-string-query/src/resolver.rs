//! Binding conflict resolution
//!
//! Records the first binding seen for every parameter and rejects later
//! occurrences that bind the same parameter differently.

use std::collections::HashMap;

use crate::binding::{ParameterBinding, ParameterIdentifier};
use crate::error::{StringQueryError, StringQueryResult};

#[derive(Debug, Default)]
pub(crate) struct BindingResolver {
    bindings: Vec<ParameterBinding>,
    index: HashMap<ParameterIdentifier, usize>,
}

impl BindingResolver {
    /// Add an occurrence of a parameter.
    ///
    /// The first occurrence fixes the binding kind. A compatible repeat is
    /// merged into it; an incompatible one fails with `ConflictingBinding`.
    pub fn register(&mut self, binding: ParameterBinding) -> StringQueryResult<()> {
        let Some(&slot) = self.index.get(&binding.identifier) else {
            self.index
                .insert(binding.identifier.clone(), self.bindings.len());
            self.bindings.push(binding);
            return Ok(());
        };

        let existing = &self.bindings[slot];
        if existing.is_compatible_with(&binding) {
            tracing::trace!(parameter = %binding.identifier, "merged repeated parameter occurrence");
            return Ok(());
        }

        tracing::debug!(
            parameter = %binding.identifier,
            existing = %existing.kind,
            conflicting = %binding.kind,
            "conflicting parameter bindings"
        );
        Err(StringQueryError::ConflictingBinding {
            identifier: binding.identifier,
            existing: existing.kind,
            conflicting: binding.kind,
        })
    }

    /// Bindings in order of first occurrence.
    pub fn into_bindings(self) -> Vec<ParameterBinding> {
        self.bindings
    }
}
