//! Type introspection helpers.
//!
//! The check is shallow: a field whose type is exactly one of the item's
//! generic parameters is described as a bound type variable, anything else
//! is left to its `Describe` implementation.

use syn::{Ident, Type};

/// Strips invisible groups and parentheses around a type.
fn unwrap_group(ty: &Type) -> &Type {
    match ty {
        Type::Group(group) => unwrap_group(&group.elem),
        Type::Paren(paren) => unwrap_group(&paren.elem),
        other => other,
    }
}

/// Returns the generic parameter `ty` names, if it is one of `params`.
pub(crate) fn generic_param<'a>(ty: &Type, params: &'a [Ident]) -> Option<&'a Ident> {
    let Type::Path(p) = unwrap_group(ty) else {
        return None;
    };
    if p.qself.is_some() {
        return None;
    }
    let ident = p.path.get_ident()?;
    params.iter().find(|param| *param == ident)
}
