//! `absolute-schema-nodeid` and `descendant-schema-nodeid` productions.

use smallvec::SmallVec;
use yangc_ir::{QName, SchemaNodeId};

use crate::identifier::node_identifier_at;
use crate::{ArgumentError, BindingContext, Production};

/// Parse `/step/step...`, as taken by top-level `augment` and `deviation`.
pub fn parse_absolute_schema_nodeid<C: BindingContext + ?Sized>(
    ctx: &C,
    text: &str,
) -> Result<SchemaNodeId, ArgumentError> {
    let production = Production::AbsoluteSchemaNodeId;
    let Some(body) = text.strip_prefix('/') else {
        return Err(match text.chars().next() {
            Some(found) => ArgumentError::UnexpectedChar {
                production,
                found,
                offset: 1,
            },
            None => ArgumentError::UnexpectedEnd {
                production,
                offset: 1,
            },
        });
    };
    let steps = parse_steps(ctx, body, 2, production)?;
    Ok(SchemaNodeId::absolute(steps))
}

/// Parse `step/step...`, as taken by `refine` and `augment` inside `uses`.
pub fn parse_descendant_schema_nodeid<C: BindingContext + ?Sized>(
    ctx: &C,
    text: &str,
) -> Result<SchemaNodeId, ArgumentError> {
    let production = Production::DescendantSchemaNodeId;
    if text.starts_with('/') {
        return Err(ArgumentError::EmptyStep {
            production,
            offset: 1,
        });
    }
    let steps = parse_steps(ctx, text, 1, production)?;
    Ok(SchemaNodeId::descendant(steps))
}

/// Parse either form, chosen by the leading character.
pub fn parse_schema_nodeid<C: BindingContext + ?Sized>(
    ctx: &C,
    text: &str,
) -> Result<SchemaNodeId, ArgumentError> {
    if text.starts_with('/') {
        parse_absolute_schema_nodeid(ctx, text)
    } else {
        parse_descendant_schema_nodeid(ctx, text)
    }
}

/// Parse `/`-separated node identifiers. `base` is the 1-based offset of
/// the first character of `body` within the whole argument.
fn parse_steps<C: BindingContext + ?Sized>(
    ctx: &C,
    body: &str,
    base: usize,
    production: Production,
) -> Result<SmallVec<[QName; 4]>, ArgumentError> {
    let mut steps = SmallVec::new();
    let mut offset = base;
    for segment in body.split('/') {
        if segment.is_empty() {
            // The slash that opened this step sits just before it; the very
            // first step of a descendant id has no opening slash.
            if offset == 1 {
                return Err(ArgumentError::UnexpectedEnd { production, offset });
            }
            return Err(ArgumentError::EmptyStep {
                production,
                offset: offset - 1,
            });
        }
        steps.push(node_identifier_at(ctx, segment, offset, production)?);
        offset += segment.chars().count() + 1;
    }
    Ok(steps)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
