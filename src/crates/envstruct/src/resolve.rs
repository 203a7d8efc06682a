//! Field resolution: key lookup, default substitution, required check and
//! variable expansion

use crate::convert::parse_bool;
use crate::error::FieldErrorKind;
use crate::field::FieldMeta;
use crate::source::Source;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Resolve the string value of one field
///
/// An empty result means "nothing to set": the key is absent and there is no
/// default, or the value itself is empty.
pub(crate) fn resolve(
    meta: &FieldMeta,
    prefix: &str,
    source: &dyn Source,
) -> Result<String, FieldErrorKind> {
    let key = meta.key(prefix);
    let required = required_flag(meta)?;

    let value = match source.lookup(&key) {
        Some(value) => value,
        None if required => return Err(FieldErrorKind::MissingRequired { key }),
        None => meta.default.unwrap_or_default().to_string(),
    };
    tracing::trace!(key = %key, "Resolved environment key");

    if meta.expands() {
        return Ok(expand(&value, |name| source.lookup(name).unwrap_or_default()));
    }
    Ok(value)
}

/// Interpret the raw required flag
pub(crate) fn required_flag(meta: &FieldMeta) -> Result<bool, FieldErrorKind> {
    match meta.required {
        None => Ok(false),
        Some(raw) => parse_bool(raw).ok_or_else(|| FieldErrorKind::InvalidRequiredFlag {
            value: raw.to_string(),
        }),
    }
}

/// `${NAME}`, a one-character special name, `$NAME`, or an unclosed `${`
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{([^}]*)\}|([*#$@!?\-0-9])|([A-Za-z0-9_]+))|\$\{")
        .expect("valid expansion pattern")
});

/// Replace `${NAME}` and `$NAME` references in `text` using `lookup`
///
/// Follows shell conventions: a `$` not followed by a name is kept, `${}` and
/// an unclosed `${` are dropped, unknown names expand to what `lookup`
/// returns for them.
pub fn expand<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> String,
{
    REFERENCE
        .replace_all(text, |caps: &Captures<'_>| {
            match caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) {
                Some(name) if !name.as_str().is_empty() => lookup(name.as_str()),
                _ => String::new(),
            }
        })
        .into_owned()
}
