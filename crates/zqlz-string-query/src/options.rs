//! Parser options
//!
//! Options can be built in code or loaded from a TOML table:
//!
//! ```toml
//! synthetic_prefix = "__synthetic__"
//! skip_comments = true
//! detect_escape_clause = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{StringQueryError, StringQueryResult};
use crate::scanner::is_word_char;

/// Prefix used for identifiers minted for named embedded expressions.
pub const DEFAULT_SYNTHETIC_PREFIX: &str = "__synthetic__";

/// Configuration options for parsing query templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringQueryOptions {
    /// Prefix of the names substituted for `:#{...}` expressions (`<prefix>1`, `<prefix>2`, ...)
    pub synthetic_prefix: String,
    /// Treat `--` line comments and `/* */` block comments as opaque text
    pub skip_comments: bool,
    /// Record `ESCAPE '<c>'` clauses following `LIKE` markers on the binding
    pub detect_escape_clause: bool,
}

impl StringQueryOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(toml_str: &str) -> StringQueryResult<Self> {
        let mut options: StringQueryOptions = toml::from_str(toml_str)?;
        if options.synthetic_prefix.is_empty() {
            options.synthetic_prefix = DEFAULT_SYNTHETIC_PREFIX.to_string();
        }
        options.validate()?;
        tracing::debug!(
            synthetic_prefix = %options.synthetic_prefix,
            skip_comments = options.skip_comments,
            detect_escape_clause = options.detect_escape_clause,
            "loaded string query options"
        );
        Ok(options)
    }

    /// Check that synthetic names built from these options are valid named markers.
    pub fn validate(&self) -> StringQueryResult<()> {
        if self.synthetic_prefix.is_empty() {
            return Err(StringQueryError::Options(
                "synthetic_prefix must not be empty".to_string(),
            ));
        }
        if !self.synthetic_prefix.chars().all(is_word_char) {
            return Err(StringQueryError::Options(format!(
                "synthetic_prefix '{}' must consist of word characters only",
                self.synthetic_prefix
            )));
        }
        Ok(())
    }

    /// Set the synthetic identifier prefix. An empty prefix falls back to the default.
    pub fn with_synthetic_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.synthetic_prefix = if prefix.is_empty() {
            DEFAULT_SYNTHETIC_PREFIX.to_string()
        } else {
            prefix
        };
        self
    }

    /// Enable comment skipping
    pub fn with_skip_comments(mut self, skip: bool) -> Self {
        self.skip_comments = skip;
        self
    }

    /// Enable `ESCAPE` clause detection
    pub fn with_detect_escape_clause(mut self, detect: bool) -> Self {
        self.detect_escape_clause = detect;
        self
    }
}

impl Default for StringQueryOptions {
    fn default() -> Self {
        Self {
            synthetic_prefix: DEFAULT_SYNTHETIC_PREFIX.to_string(),
            skip_comments: false,
            detect_escape_clause: true,
        }
    }
}
