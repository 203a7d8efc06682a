//! String to typed-value conversion
//!
//! Conversion is layered:
//!
//! 1. [`Converters`]: caller-registered functions keyed by the exact field
//!    type, consulted before anything else.
//! 2. [`EnvValue`]: the static conversion of a field type. Scalars, `Vec<T>`
//!    (split on the field separator) and `Option<T>` are covered.
//! 3. [`FromEnvText`]: the text capability. Every built-in scalar implements
//!    it, `url::Url` included, and user types implement it to become usable as
//!    fields and slice elements.

mod duration;

pub use duration::parse_duration;

use crate::error::{BoxError, ConvertError};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Types that can be decoded from a single piece of text
///
/// `url::Url` only accepts absolute URLs: a relative reference such as
/// `/api/v1` has no base to resolve against and fails to convert. Declare
/// such fields as `String` or `PathBuf` instead.
///
/// # Example
///
/// ```rust
/// use envstruct::{BoxError, FromEnvText};
///
/// #[derive(Debug, PartialEq)]
/// enum Level {
///     Low,
///     High,
/// }
///
/// impl FromEnvText for Level {
///     fn from_env_text(text: &str) -> Result<Self, BoxError> {
///         match text {
///             "low" => Ok(Level::Low),
///             "high" => Ok(Level::High),
///             other => Err(format!("unknown level {:?}", other).into()),
///         }
///     }
/// }
///
/// assert_eq!(Level::from_env_text("high").unwrap(), Level::High);
/// ```
pub trait FromEnvText: Sized {
    fn from_env_text(text: &str) -> Result<Self, BoxError>;
}

/// Types a mapped field may have
///
/// Implemented for every [`FromEnvText`] type, for `Vec<T>` and for
/// `Option<T>`. Not meant to be implemented directly; implement
/// [`FromEnvText`] instead.
pub trait EnvValue: Sized + 'static {
    fn from_env_value(raw: &str, separator: &str) -> Result<Self, ConvertError>;
}

impl<T: FromEnvText + 'static> EnvValue for T {
    fn from_env_value(raw: &str, _separator: &str) -> Result<Self, ConvertError> {
        T::from_env_text(raw).map_err(|source| ConvertError::invalid::<T>(raw, source))
    }
}

impl<T: FromEnvText + 'static> EnvValue for Vec<T> {
    fn from_env_value(raw: &str, separator: &str) -> Result<Self, ConvertError> {
        raw.split(separator)
            .map(|item| {
                T::from_env_text(item).map_err(|source| ConvertError::invalid::<T>(item, source))
            })
            .collect()
    }
}

impl<T: EnvValue> EnvValue for Option<T> {
    fn from_env_value(raw: &str, separator: &str) -> Result<Self, ConvertError> {
        T::from_env_value(raw, separator).map(Some)
    }
}

impl FromEnvText for String {
    fn from_env_text(text: &str) -> Result<Self, BoxError> {
        Ok(text.to_string())
    }
}

impl FromEnvText for bool {
    fn from_env_text(text: &str) -> Result<Self, BoxError> {
        parse_bool(text).ok_or_else(|| "invalid syntax".into())
    }
}

impl FromEnvText for Duration {
    fn from_env_text(text: &str) -> Result<Self, BoxError> {
        parse_duration(text).map_err(Into::into)
    }
}

/// Absolute URLs only
impl FromEnvText for url::Url {
    fn from_env_text(text: &str) -> Result<Self, BoxError> {
        url::Url::parse(text).map_err(Into::into)
    }
}

macro_rules! from_str_text {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromEnvText for $ty {
                fn from_env_text(text: &str) -> Result<Self, BoxError> {
                    text.parse::<$ty>().map_err(Into::into)
                }
            }
        )*
    };
}

// Integer parsing is base 10 at the width of the declared type.
from_str_text!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
from_str_text!(f32, f64, char, PathBuf, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);

/// Parse a boolean in the conventional strict forms
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

type ConvertFn = Arc<dyn Fn(&str) -> Result<Box<dyn Any>, BoxError> + Send + Sync>;

/// Registry of custom converters keyed by field type
///
/// A converter is used for fields whose declared type is exactly `T`; it is
/// consulted before the built-in conversion. The registry is read-only while a
/// parse runs.
#[derive(Clone, Default)]
pub struct Converters {
    by_type: HashMap<TypeId, (&'static str, ConvertFn)>,
}

impl Converters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `convert` for fields of type `T`, replacing any previous one
    pub fn register<T, E, F>(&mut self, convert: F) -> &mut Self
    where
        T: Any,
        E: Into<BoxError>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        let erased: ConvertFn = Arc::new(move |raw: &str| {
            convert(raw)
                .map(|value| Box::new(value) as Box<dyn Any>)
                .map_err(Into::into)
        });
        self.by_type
            .insert(TypeId::of::<T>(), (std::any::type_name::<T>(), erased));
        self
    }

    /// Builder form of [`Converters::register`]
    pub fn with<T, E, F>(mut self, convert: F) -> Self
    where
        T: Any,
        E: Into<BoxError>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.register(convert);
        self
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    pub(crate) fn convert(
        &self,
        type_id: TypeId,
        raw: &str,
    ) -> Option<Result<Box<dyn Any>, BoxError>> {
        self.by_type.get(&type_id).map(|(_, convert)| convert(raw))
    }
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.by_type.values().map(|(name, _)| name))
            .finish()
    }
}
