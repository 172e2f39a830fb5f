//! Query shape detection
//!
//! Both detectors run on masked text (see `scanner::mask_opaque`) so that
//! keywords inside string literals are ignored.

use regex::Regex;
use std::sync::LazyLock;

// `select ... new some.Type(`, the constructor may follow other select items
static CONSTRUCTOR_EXPRESSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bselect\b.*?\bnew\s+[\w.]+\s*\(").expect("valid regex")
});

static ALIAS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfrom\s+[\w.]+\s+(?:as\s+)?(\w+)").expect("valid regex")
});

// Words that can follow the entity name without being an alias
const NON_ALIAS_KEYWORDS: &[&str] = &[
    "as", "cross", "fetch", "full", "group", "having", "inner", "join", "left", "limit", "natural",
    "offset", "on", "order", "outer", "right", "set", "union", "where", "with",
];

/// Returns true if the query constructs its result objects (`select new Dto(...)`).
///
/// A type reference without an argument list (`select new Dto from ...`) does not count.
pub(crate) fn has_constructor_expression(masked: &str) -> bool {
    CONSTRUCTOR_EXPRESSION_REGEX.is_match(masked)
}

/// Alias of the first entity in the `from` clause, if declared.
pub(crate) fn detect_alias(masked: &str) -> Option<String> {
    let alias = ALIAS_REGEX.captures(masked)?.get(1)?.as_str();
    if NON_ALIAS_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(alias))
    {
        return None;
    }
    Some(alias.to_string())
}
