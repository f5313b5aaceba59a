//! Serde attribute parsing helpers.
//!
//! The runtime assembles a JSON value and hands it to serde, so every key the
//! derive emits must match the key serde reads. These helpers mirror
//! `#[serde(rename = "...")]`, `#[serde(rename_all = "...")]`,
//! `#[serde(default)]` and `#[serde(skip)]` on containers, fields and
//! variants.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::meta::ParseNestedMeta;
use syn::{Attribute, ExprPath, LitStr, Token};

/// Supported `#[serde(rename_all = "...")]` rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SerdeRenameAll {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl SerdeRenameAll {
    fn parse(value: &LitStr) -> syn::Result<Self> {
        match value.value().as_str() {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            "SCREAMING-KEBAB-CASE" => Ok(Self::ScreamingKebab),
            other => Err(syn::Error::new(
                value.span(),
                format!(
                    "unsupported serde rename_all value '{other}'; expected one of \
\"lowercase\", \"UPPERCASE\", \"PascalCase\", \"camelCase\", \"snake_case\", \
\"SCREAMING_SNAKE_CASE\", \"kebab-case\", or \"SCREAMING-KEBAB-CASE\""
                ),
            )),
        }
    }

    pub(crate) fn apply(self, name: &str) -> String {
        match self {
            Self::Lower => name.to_ascii_lowercase(),
            Self::Upper => name.to_ascii_uppercase(),
            Self::Pascal => name.to_upper_camel_case(),
            Self::Camel => name.to_lower_camel_case(),
            Self::Snake => name.to_snake_case(),
            Self::ScreamingSnake => name.to_shouty_snake_case(),
            Self::Kebab => name.to_kebab_case(),
            Self::ScreamingKebab => name.to_shouty_kebab_case(),
        }
    }
}

/// Serde settings of a struct or enum.
#[derive(Clone, Debug, Default)]
pub(crate) struct SerdeContainer {
    pub rename_all: Option<SerdeRenameAll>,
    /// Set when the enum uses an internal, adjacent or untagged
    /// representation.
    pub non_external_tagging: bool,
}

/// How serde fills a field absent from the input.
#[derive(Clone, Debug)]
pub(crate) enum SerdeDefault {
    /// `#[serde(default)]`: the field type's `Default`.
    Trait,
    /// `#[serde(default = "path")]`.
    Path(ExprPath),
}

/// Serde settings of a field or variant.
#[derive(Clone, Debug, Default)]
pub(crate) struct SerdeField {
    pub rename: Option<String>,
    /// Only meaningful on struct variants, where it renames their fields.
    pub rename_all: Option<SerdeRenameAll>,
    pub default: Option<SerdeDefault>,
    pub skip: bool,
    pub flatten: bool,
}

fn serde_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("serde"))
}

/// Parse container-level serde settings.
pub(crate) fn serde_container(attrs: &[Attribute]) -> syn::Result<SerdeContainer> {
    let mut out = SerdeContainer::default();
    for attr in serde_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                return parse_rename_all(&meta, &mut out.rename_all);
            }
            if meta.path.is_ident("tag")
                || meta.path.is_ident("content")
                || meta.path.is_ident("untagged")
            {
                out.non_external_tagging = true;
            }
            super::discard_unknown(&meta)
        })?;
    }
    Ok(out)
}

/// Parse serde settings of a field or variant.
pub(crate) fn serde_field(attrs: &[Attribute]) -> syn::Result<SerdeField> {
    let mut out = SerdeField::default();
    for attr in serde_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                return parse_rename(&meta, &mut out.rename);
            }
            if meta.path.is_ident("rename_all") {
                return parse_rename_all(&meta, &mut out.rename_all);
            }
            if meta.path.is_ident("default") {
                out.default = Some(parse_default(&meta)?);
                return Ok(());
            }
            if meta.path.is_ident("skip") || meta.path.is_ident("skip_deserializing") {
                out.skip = true;
            } else if meta.path.is_ident("flatten") {
                out.flatten = true;
            }
            super::discard_unknown(&meta)
        })?;
    }
    Ok(out)
}

fn parse_rename(meta: &ParseNestedMeta, rename: &mut Option<String>) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let value = meta.value()?.parse::<LitStr>()?;
        *rename = Some(value.value());
        return Ok(());
    }
    if !meta.input.peek(syn::token::Paren) {
        return Ok(());
    }
    meta.parse_nested_meta(|nested| {
        if !nested.path.is_ident("deserialize") {
            return super::discard_unknown(&nested);
        }
        let value = nested.value()?.parse::<LitStr>()?;
        *rename = Some(value.value());
        Ok(())
    })
}

fn parse_rename_all(
    meta: &ParseNestedMeta,
    rename_all: &mut Option<SerdeRenameAll>,
) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let value = meta.value()?.parse::<LitStr>()?;
        *rename_all = Some(SerdeRenameAll::parse(&value)?);
        return Ok(());
    }
    meta.parse_nested_meta(|nested| {
        if !nested.path.is_ident("deserialize") {
            return super::discard_unknown(&nested);
        }
        let value = nested.value()?.parse::<LitStr>()?;
        *rename_all = Some(SerdeRenameAll::parse(&value)?);
        Ok(())
    })
}

fn parse_default(meta: &ParseNestedMeta) -> syn::Result<SerdeDefault> {
    if !meta.input.peek(Token![=]) {
        return Ok(SerdeDefault::Trait);
    }
    let value = meta.value()?.parse::<LitStr>()?;
    let path = value.parse::<ExprPath>()?;
    Ok(SerdeDefault::Path(path))
}

/// Compute the key serde reads for an item named `name`.
pub(crate) fn serde_key(
    name: &str,
    field: &SerdeField,
    rename_all: Option<SerdeRenameAll>,
) -> String {
    if let Some(rename) = &field.rename {
        return rename.clone();
    }
    rename_all.map_or_else(|| name.to_owned(), |rule| rule.apply(name))
}
