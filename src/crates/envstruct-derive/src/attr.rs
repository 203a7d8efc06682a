//! `#[env(...)]` field attribute parsing

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Lit, LitStr, Token};

/// Parsed `#[env(...)]` attribute of one field
#[derive(Default)]
pub struct FieldAttrs {
    pub name: Option<LitStr>,
    pub default: Option<LitStr>,
    pub required: Option<LitStr>,
    pub separator: Option<LitStr>,
    pub expand: Option<LitStr>,
    pub custom: bool,
    pub nested: bool,
}

/// How the walker treats a field
pub enum FieldKind {
    Mapped(FieldAttrs),
    Nested,
}

impl FieldKind {
    /// `Ok(None)` for fields without an `#[env]` attribute
    pub fn from_attrs(attrs: &[Attribute], span: Span) -> syn::Result<Option<Self>> {
        let mut found = false;
        let mut out = FieldAttrs::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("env")) {
            found = true;
            attr.parse_nested_meta(|meta| parse_item(&mut out, meta))?;
        }
        if !found {
            return Ok(None);
        }

        if out.nested {
            let extra = out.name.is_some()
                || out.default.is_some()
                || out.required.is_some()
                || out.separator.is_some()
                || out.expand.is_some()
                || out.custom;
            if extra {
                return Err(syn::Error::new(
                    span,
                    "`nested` cannot be combined with other env options",
                ));
            }
            return Ok(Some(FieldKind::Nested));
        }

        if out.name.is_none() {
            return Err(syn::Error::new(
                span,
                "expected `name = \"...\"` or `nested` in #[env(...)]",
            ));
        }
        Ok(Some(FieldKind::Mapped(out)))
    }
}

fn parse_item(out: &mut FieldAttrs, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
    let ident = meta
        .path
        .get_ident()
        .map(|i| i.to_string())
        .unwrap_or_default();

    match ident.as_str() {
        "name" => set_once(&mut out.name, string_value(&meta)?, &meta),
        "default" => set_once(&mut out.default, string_value(&meta)?, &meta),
        "separator" => set_once(&mut out.separator, string_value(&meta)?, &meta),
        "required" => set_once(&mut out.required, flag_value(&meta)?, &meta),
        "expand" => set_once(&mut out.expand, flag_value(&meta)?, &meta),
        "custom" => {
            out.custom = true;
            Ok(())
        }
        "nested" => {
            out.nested = true;
            Ok(())
        }
        _ => Err(meta.error(
            "unsupported env option, expected one of: name, default, required, separator, expand, custom, nested",
        )),
    }
}

fn set_once(slot: &mut Option<LitStr>, value: LitStr, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate env option"));
    }
    *slot = Some(value);
    Ok(())
}

fn string_value(meta: &ParseNestedMeta<'_>) -> syn::Result<LitStr> {
    meta.value()?.parse()
}

/// `flag`, `flag = "raw"` or `flag = true`
///
/// String values are kept verbatim and interpreted at parse time.
fn flag_value(meta: &ParseNestedMeta<'_>) -> syn::Result<LitStr> {
    if !meta.input.peek(Token![=]) {
        return Ok(LitStr::new("true", meta.path.span()));
    }
    match meta.value()?.parse::<Lit>()? {
        Lit::Str(s) => Ok(s),
        Lit::Bool(b) => Ok(LitStr::new(if b.value { "true" } else { "false" }, b.span)),
        other => Err(syn::Error::new(
            other.span(),
            "expected a string or boolean literal",
        )),
    }
}
