//! Binding extraction
//!
//! Turns a scanned marker into a `ParameterBinding`: the keyword before the
//! marker decides the binding kind, `%` decorations decide the `LIKE` mode.

use crate::binding::{BindingKind, LikeMode, ParameterBinding, ParameterIdentifier};
use crate::error::StringQueryResult;
use crate::namer::SyntheticNamer;
use crate::scanner::{Marker, MarkerContext, MarkerTarget};

/// Binding kind implied by the marker's context and wildcards.
pub(crate) fn binding_kind(marker: &Marker<'_>) -> BindingKind {
    match marker.context {
        MarkerContext::Like => BindingKind::Like {
            mode: LikeMode::from_wildcards(marker.leading_wildcard, marker.trailing_wildcard),
            escape: marker.escape,
        },
        MarkerContext::In => BindingKind::InCollection,
        MarkerContext::Plain => BindingKind::Simple,
    }
}

/// Build the binding for a marker, naming embedded expressions on the way.
pub(crate) fn extract<'a>(
    marker: &Marker<'a>,
    namer: &mut SyntheticNamer<'a>,
) -> StringQueryResult<ParameterBinding> {
    let kind = binding_kind(marker);
    let binding = match marker.target {
        MarkerTarget::Named(name) => ParameterBinding::new(ParameterIdentifier::name(name), kind),
        MarkerTarget::Positional(position) => {
            ParameterBinding::new(ParameterIdentifier::Position(position), kind)
        }
        MarkerTarget::NamedExpression(expression) => {
            ParameterBinding::new(namer.name_for(expression), kind).with_expression(expression)
        }
        MarkerTarget::PositionalExpression(expression) => {
            ParameterBinding::new(namer.position_for(expression, marker.start)?, kind)
                .with_expression(expression)
        }
    };
    Ok(binding)
}
