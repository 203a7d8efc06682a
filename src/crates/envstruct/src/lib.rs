//! Typed configuration from environment variables.
//!
//! This crate populates configuration structures from environment variables.
//! Each field declares the variable it reads, an optional default, whether it
//! is required, a slice separator and whether `${VAR}` references are
//! expanded. Values are converted to the field's declared type and every
//! failure across the structure is reported at once.
//!
//! # Example
//!
//! ```rust,ignore
//! use envstruct::EnvStruct;
//! use std::time::Duration;
//!
//! #[derive(Debug, Default, EnvStruct)]
//! struct Database {
//!     #[env(name = "DB_URL", required)]
//!     url: url::Url,
//!
//!     #[env(name = "DB_TIMEOUT", default = "5s")]
//!     timeout: Duration,
//! }
//!
//! #[derive(Debug, Default, EnvStruct)]
//! struct Config {
//!     #[env(name = "HOST", default = "localhost")]
//!     host: String,
//!
//!     #[env(name = "PORT", default = "8080")]
//!     port: u16,
//!
//!     #[env(name = "PEERS", separator = ";")]
//!     peers: Vec<String>,
//!
//!     #[env(nested)]
//!     database: Database,
//! }
//!
//! let mut config = Config::default();
//! envstruct::parse_with_prefix(&mut config, "APP_")?;
//! ```
//!
//! # Modules
//!
//! - `field` - the [`EnvStruct`] descriptor seam and [`Slot`]
//! - `convert` - built-in conversions, [`FromEnvText`] and [`Converters`]
//! - `inspect` - [`get_all_vars`] and required-variable checks
//! - `hooks` - on-set callback and debug sink
//!
//! # Features
//!
//! - `derive` - `#[derive(EnvStruct)]` (enabled by default)

// Lets the derive's `::envstruct` paths resolve inside this crate
extern crate self as envstruct;

pub mod convert;
pub mod error;
pub mod field;
pub mod hooks;
pub mod inspect;
pub mod parser;
pub mod source;

mod from_env;
mod resolve;
mod walk;

pub use convert::{parse_bool, parse_duration, Converters, EnvValue, FromEnvText};
pub use error::{BoxError, ConvertError, Error, FieldError, FieldErrorKind, ParseErrors, Result};
pub use field::{
    type_label, type_label_of, EnvStruct, FieldInspector, FieldMeta, FieldVisitor, NestedStruct,
    Slot,
};
pub use from_env::FromEnv;
pub use hooks::{enable_debug_logging, set_on_var_set, DebugSink, OnVarSet};
pub use inspect::{get_all_vars, get_required_vars, validate_required, VarInfo};
pub use parser::EnvParser;
pub use resolve::expand;
pub use source::{ProcessEnv, Source};

#[cfg(feature = "derive")]
pub use envstruct_derive::EnvStruct;

/// Populate `target` from the process environment
pub fn parse<T: EnvStruct + ?Sized>(target: &mut T) -> Result<()> {
    EnvParser::new().parse(target)
}

/// Populate `target`, prepending `prefix` to every key
///
/// `prefix` must be empty or end with `_`, otherwise nothing is read and
/// [`Error::InvalidPrefix`] is returned.
pub fn parse_with_prefix<T: EnvStruct + ?Sized>(target: &mut T, prefix: &str) -> Result<()> {
    EnvParser::new().with_prefix(prefix).parse(target)
}

/// Populate `target` using custom converters for specific field types
pub fn parse_with_funcs<T: EnvStruct + ?Sized>(
    target: &mut T,
    converters: &Converters,
) -> Result<()> {
    EnvParser::new().with_converters(converters).parse(target)
}

/// Populate `target` with both a prefix and custom converters
pub fn parse_with_prefix_funcs<T: EnvStruct + ?Sized>(
    target: &mut T,
    prefix: &str,
    converters: &Converters,
) -> Result<()> {
    EnvParser::new()
        .with_prefix(prefix)
        .with_converters(converters)
        .parse(target)
}
