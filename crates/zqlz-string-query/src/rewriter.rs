//! Canonical query rewriting
//!
//! Runs the single binding pass over the scanned spans and emits the query
//! the execution layer accepts: literal text verbatim, `LIKE` wildcards
//! removed, expression markers replaced by their synthetic identifiers.

use crate::binding::ParameterBinding;
use crate::error::StringQueryResult;
use crate::extractor;
use crate::namer::SyntheticNamer;
use crate::options::StringQueryOptions;
use crate::resolver::BindingResolver;
use crate::scanner::{Marker, MarkerTarget, Span};

/// Output of the binding pass.
#[derive(Debug)]
pub(crate) struct Rewritten {
    pub canonical: String,
    pub bindings: Vec<ParameterBinding>,
}

pub(crate) fn rewrite<'a>(
    sql: &'a str,
    spans: &[Span<'a>],
    options: &StringQueryOptions,
) -> StringQueryResult<Rewritten> {
    let mut namer = SyntheticNamer::for_spans(spans, &options.synthetic_prefix);
    let mut resolver = BindingResolver::default();
    let mut canonical = String::with_capacity(sql.len());

    for span in spans {
        match span {
            Span::Literal(text) => canonical.push_str(text),
            Span::Marker(marker) => {
                let binding = extractor::extract(marker, &mut namer)?;
                write_marker(&mut canonical, marker, &binding);
                if let Err(err) = resolver.register(binding) {
                    tracing::debug!(marker = marker.raw(sql), offset = marker.start, "rejected parameter marker");
                    return Err(err);
                }
            }
        }
    }

    Ok(Rewritten {
        canonical,
        bindings: resolver.into_bindings(),
    })
}

fn write_marker(out: &mut String, marker: &Marker<'_>, binding: &ParameterBinding) {
    // `%` is only a decoration next to LIKE; elsewhere it stays part of the query text
    let keep_wildcards = !binding.kind.is_like();

    if keep_wildcards && marker.leading_wildcard {
        out.push('%');
    }
    match marker.target {
        MarkerTarget::Named(_) | MarkerTarget::Positional(_) => out.push_str(marker.text),
        MarkerTarget::NamedExpression(_) | MarkerTarget::PositionalExpression(_) => {
            out.push_str(&binding.identifier.to_string())
        }
    }
    if keep_wildcards && marker.trailing_wildcard {
        out.push('%');
    }
}
