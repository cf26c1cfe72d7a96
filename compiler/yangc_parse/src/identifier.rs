//! `identifier` and `node-identifier` productions.

use yangc_ir::QName;

use crate::{ArgumentError, BindingContext, Production};

/// First character of an identifier: ASCII letter or `_`.
#[inline]
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Subsequent identifier characters: ASCII letters, digits, `_`, `-`, `.`.
#[inline]
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Check that `text` is a bare identifier. `base` is the 1-based offset of
/// its first character within the whole argument.
pub(crate) fn check_identifier(
    text: &str,
    base: usize,
    production: Production,
) -> Result<(), ArgumentError> {
    let mut chars = text.chars();
    match chars.next() {
        None => Err(ArgumentError::UnexpectedEnd {
            production,
            offset: base,
        }),
        Some(c) if !is_identifier_start(c) => Err(ArgumentError::UnexpectedChar {
            production,
            found: c,
            offset: base,
        }),
        Some(_) => {
            for (i, c) in chars.enumerate() {
                if !is_identifier_char(c) {
                    return Err(ArgumentError::UnexpectedChar {
                        production,
                        found: c,
                        offset: base + 1 + i,
                    });
                }
            }
            Ok(())
        }
    }
}

/// Parse a bare identifier, bound to the current module.
pub fn parse_identifier<C: BindingContext + ?Sized>(
    ctx: &C,
    text: &str,
) -> Result<QName, ArgumentError> {
    check_identifier(text, 1, Production::Identifier)?;
    Ok(ctx.interner().qname_str(ctx.current_module(), text))
}

/// Parse `[prefix:]identifier`.
///
/// Unprefixed names bind to the current module; prefixed names bind to the
/// module the context resolves the prefix to.
pub fn parse_node_identifier<C: BindingContext + ?Sized>(
    ctx: &C,
    text: &str,
) -> Result<QName, ArgumentError> {
    node_identifier_at(ctx, text, 1, Production::NodeIdentifier)
}

pub(crate) fn node_identifier_at<C: BindingContext + ?Sized>(
    ctx: &C,
    text: &str,
    base: usize,
    production: Production,
) -> Result<QName, ArgumentError> {
    let Some((prefix, local)) = text.split_once(':') else {
        check_identifier(text, base, production)?;
        return Ok(ctx.interner().qname_str(ctx.current_module(), text));
    };

    check_identifier(prefix, base, production)?;
    check_identifier(local, base + prefix.chars().count() + 1, production)?;
    let module = ctx
        .resolve_prefix(prefix)
        .ok_or_else(|| ArgumentError::UnknownPrefix {
            prefix: prefix.to_owned(),
            offset: base,
        })?;
    Ok(ctx.interner().qname_str(module, local))
}
