//! Query Template Scanner
//!
//! Walks a query template once, left to right, and splits it into literal
//! text and parameter markers:
//!
//! - Named markers: `:name` (unicode word characters)
//! - Positional markers: `?1`, `?2`, ...
//! - Expression markers: `:#{...}` and `?#{...}` (braces balanced, payload opaque)
//!
//! Markers may be decorated with `%` on either side. The scanner also records
//! whether a marker directly follows a `LIKE` or `IN` keyword. Quoted text is
//! never searched for markers.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{StringQueryError, StringQueryResult};
use crate::options::StringQueryOptions;

static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+").expect("valid regex"));

/// Returns true for unicode word characters (letters of any script, marks, digits, `_`).
pub(crate) fn is_word_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    IDENTIFIER_REGEX.is_match(c.encode_utf8(&mut buf))
}

/// What a marker refers to, before any synthetic naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkerTarget<'a> {
    /// `:name`
    Named(&'a str),
    /// `?N`
    Positional(usize),
    /// `:#{expr}`, carrying the expression text
    NamedExpression(&'a str),
    /// `?#{expr}`, carrying the expression text
    PositionalExpression(&'a str),
}

/// Keyword found directly before a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkerContext {
    Plain,
    Like,
    In,
}

/// A parameter marker and its surroundings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Marker<'a> {
    /// Byte offset of the marker, including a leading `%`.
    pub start: usize,
    /// Byte offset just past the marker, including a trailing `%`.
    pub end: usize,
    /// The marker as written, without `%` decorations.
    pub text: &'a str,
    pub target: MarkerTarget<'a>,
    pub leading_wildcard: bool,
    pub trailing_wildcard: bool,
    pub context: MarkerContext,
    /// Character of an `ESCAPE '<c>'` clause following a `LIKE` marker.
    pub escape: Option<char>,
}

impl Marker<'_> {
    /// The full marker text including `%` decorations.
    pub fn raw<'s>(&self, sql: &'s str) -> &'s str {
        &sql[self.start..self.end]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Span<'a> {
    Literal(&'a str),
    Marker(Marker<'a>),
}

/// Splits a query template into literal and marker spans.
pub(crate) fn scan<'a>(
    sql: &'a str,
    options: &StringQueryOptions,
) -> StringQueryResult<Vec<Span<'a>>> {
    let mut scanner = Scanner {
        sql,
        bytes: sql.as_bytes(),
        pos: 0,
        literal_start: 0,
        spans: Vec::new(),
        options,
    };

    while scanner.pos < scanner.bytes.len() {
        if let Some(end) = opaque_end(scanner.bytes, scanner.pos, options) {
            scanner.pos = end;
            continue;
        }

        match scanner.bytes[scanner.pos] {
            b'%' | b':' | b'?' => match scanner.marker_at(scanner.pos)? {
                Some(marker) => scanner.push_marker(marker),
                None => scanner.pos += 1,
            },
            _ => scanner.pos += 1,
        }
    }
    scanner.flush_literal(sql.len());

    tracing::trace!(spans = scanner.spans.len(), "scanned query template");
    Ok(scanner.spans)
}

/// Replaces quoted text (and comments, when skipped) with a single space each.
///
/// Used by the detectors so that keywords inside string literals are never matched.
pub(crate) fn mask_opaque(sql: &str, options: &StringQueryOptions) -> String {
    let bytes = sql.as_bytes();
    let mut masked = String::with_capacity(sql.len());
    let mut pos = 0;
    let mut copied = 0;

    while pos < bytes.len() {
        match opaque_end(bytes, pos, options) {
            Some(end) => {
                masked.push_str(&sql[copied..pos]);
                masked.push(' ');
                pos = end;
                copied = end;
            }
            None => pos += 1,
        }
    }
    masked.push_str(&sql[copied..]);
    masked
}

struct Scanner<'a, 'o> {
    sql: &'a str,
    bytes: &'a [u8],
    pos: usize,
    literal_start: usize,
    spans: Vec<Span<'a>>,
    options: &'o StringQueryOptions,
}

impl<'a> Scanner<'a, '_> {
    fn flush_literal(&mut self, until: usize) {
        if until > self.literal_start {
            self.spans
                .push(Span::Literal(&self.sql[self.literal_start..until]));
        }
    }

    fn push_marker(&mut self, marker: Marker<'a>) {
        self.flush_literal(marker.start);
        self.pos = marker.end;
        self.literal_start = marker.end;
        self.spans.push(Span::Marker(marker));
    }

    /// Tries to read a marker (optionally `%`-decorated) starting at `start`.
    fn marker_at(&self, start: usize) -> StringQueryResult<Option<Marker<'a>>> {
        let leading_wildcard = self.bytes[start] == b'%';
        let marker_start = if leading_wildcard { start + 1 } else { start };

        let Some((target, marker_end)) = self.target_at(marker_start)? else {
            return Ok(None);
        };

        let trailing_wildcard = self.bytes.get(marker_end) == Some(&b'%');
        let end = if trailing_wildcard {
            marker_end + 1
        } else {
            marker_end
        };

        let context = keyword_context(&self.sql[self.literal_start..start]);
        let escape = if context == MarkerContext::Like && self.options.detect_escape_clause {
            escape_clause(&self.sql[end..])
        } else {
            None
        };

        Ok(Some(Marker {
            start,
            end,
            text: &self.sql[marker_start..marker_end],
            target,
            leading_wildcard,
            trailing_wildcard,
            context,
            escape,
        }))
    }

    /// Reads the undecorated marker at `pos`, returning its target and end offset.
    fn target_at(&self, pos: usize) -> StringQueryResult<Option<(MarkerTarget<'a>, usize)>> {
        match self.bytes.get(pos) {
            Some(b':') => {
                // `::` is a cast, not a parameter
                if pos > 0 && self.bytes[pos - 1] == b':' {
                    return Ok(None);
                }
                match self.bytes.get(pos + 1) {
                    Some(b':') => Ok(None),
                    Some(b'#') if self.bytes.get(pos + 2) == Some(&b'{') => {
                        let (expression, end) = self.expression_at(pos, pos + 2)?;
                        Ok(Some((MarkerTarget::NamedExpression(expression), end)))
                    }
                    _ => Ok(IDENTIFIER_REGEX
                        .find(&self.sql[pos + 1..])
                        .map(|m| (MarkerTarget::Named(m.as_str()), pos + 1 + m.end()))),
                }
            }
            Some(b'?') => match self.bytes.get(pos + 1) {
                Some(b'#') if self.bytes.get(pos + 2) == Some(&b'{') => {
                    let (expression, end) = self.expression_at(pos, pos + 2)?;
                    Ok(Some((MarkerTarget::PositionalExpression(expression), end)))
                }
                Some(digit) if digit.is_ascii_digit() => {
                    let digits_end = self.bytes[pos + 1..]
                        .iter()
                        .position(|b| !b.is_ascii_digit())
                        .map_or(self.bytes.len(), |offset| pos + 1 + offset);
                    match self.sql[pos + 1..digits_end].parse::<usize>() {
                        Ok(position) if position > 0 => {
                            Ok(Some((MarkerTarget::Positional(position), digits_end)))
                        }
                        _ => Err(StringQueryError::InvalidPosition { offset: pos }),
                    }
                }
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }

    /// Reads a brace-balanced expression whose opening `{` is at `open`.
    fn expression_at(&self, marker: usize, open: usize) -> StringQueryResult<(&'a str, usize)> {
        let mut depth = 0usize;
        for (offset, byte) in self.bytes[open..].iter().enumerate() {
            match byte {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        let close = open + offset;
                        return Ok((&self.sql[open + 1..close], close + 1));
                    }
                }
                _ => {}
            }
        }

        tracing::debug!(offset = marker, "unterminated expression marker");
        Err(StringQueryError::MalformedExpression { offset: marker })
    }
}

/// Returns the end of a quoted literal or skipped comment starting at `pos`.
fn opaque_end(bytes: &[u8], pos: usize, options: &StringQueryOptions) -> Option<usize> {
    let next = bytes.get(pos + 1).copied();
    match bytes[pos] {
        quote @ (b'\'' | b'"') => Some(quoted_end(bytes, pos, quote)),
        b'-' if options.skip_comments && next == Some(b'-') => Some(
            bytes[pos..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(bytes.len(), |offset| pos + offset + 1),
        ),
        b'/' if options.skip_comments && next == Some(b'*') => Some(
            bytes[pos + 2..]
                .windows(2)
                .position(|w| w == b"*/")
                .map_or(bytes.len(), |offset| pos + 2 + offset + 2),
        ),
        _ => None,
    }
}

/// End of a quoted literal; doubled quotes are escapes. Unterminated quotes run to the end.
fn quoted_end(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// Classifies a marker by the keyword ending the literal text before it.
fn keyword_context(preceding: &str) -> MarkerContext {
    let trimmed = preceding.trim_end();

    if let Some(inner) = trimmed.strip_suffix('(') {
        return if ends_with_keyword(inner.trim_end(), "in") {
            MarkerContext::In
        } else {
            MarkerContext::Plain
        };
    }

    if ends_with_keyword(trimmed, "like") {
        MarkerContext::Like
    } else if ends_with_keyword(trimmed, "in") {
        MarkerContext::In
    } else {
        MarkerContext::Plain
    }
}

fn ends_with_keyword(text: &str, keyword: &str) -> bool {
    let Some(split) = text.len().checked_sub(keyword.len()) else {
        return false;
    };
    if !text.is_char_boundary(split) || !text[split..].eq_ignore_ascii_case(keyword) {
        return false;
    }
    !text[..split].chars().next_back().is_some_and(is_word_char)
}

/// Reads `ESCAPE '<c>'` at the start of the text following a marker.
fn escape_clause(following: &str) -> Option<char> {
    const KEYWORD: &str = "escape";

    let rest = following.trim_start();
    if !rest.get(..KEYWORD.len())?.eq_ignore_ascii_case(KEYWORD) {
        return None;
    }
    let rest = &rest[KEYWORD.len()..];
    if rest.chars().next().is_some_and(is_word_char) {
        return None;
    }

    let mut chars = rest.trim_start().chars();
    if chars.next()? != '\'' {
        return None;
    }
    let escape = chars.next()?;
    (chars.next()? == '\'').then_some(escape)
}

#[cfg(test)]
mod tests;
