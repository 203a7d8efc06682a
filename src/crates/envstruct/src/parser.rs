//! Configurable parser
//!
//! [`EnvParser`] bundles the three inputs of a parse call: a key prefix, a
//! custom-converter registry and a lookup source. The free functions at the
//! crate root are shorthands for common combinations.

use crate::convert::Converters;
use crate::error::{Error, Result};
use crate::field::EnvStruct;
use crate::inspect::{self, VarInfo};
use crate::source::{ProcessEnv, Source};
use crate::walk::Walker;
use std::borrow::Cow;
use std::fmt;

/// Character every non-empty prefix must end with
pub const PREFIX_SEPARATOR: char = '_';

/// Builder-style parser
///
/// # Example
///
/// ```rust,ignore
/// use envstruct::{Converters, EnvParser};
///
/// let converters = Converters::new().with(|s: &str| s.parse::<Level>());
/// let mut config = Config::default();
///
/// EnvParser::new()
///     .with_prefix("APP_")
///     .with_converters(&converters)
///     .parse(&mut config)?;
/// ```
pub struct EnvParser<'a> {
    prefix: String,
    converters: Cow<'a, Converters>,
    source: Box<dyn Source + 'a>,
}

impl<'a> EnvParser<'a> {
    /// Parser reading the process environment, with no prefix and no custom
    /// converters
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            converters: Cow::Owned(Converters::new()),
            source: Box::new(ProcessEnv),
        }
    }

    /// Prefix prepended to every key; must be empty or end with `_`
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_converters(mut self, converters: &'a Converters) -> Self {
        self.converters = Cow::Borrowed(converters);
        self
    }

    /// Look keys up in `source` instead of the process environment
    pub fn with_source(mut self, source: impl Source + 'a) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn converters(&self) -> &Converters {
        &self.converters
    }

    /// Check the prefix without parsing anything
    pub fn validate_prefix(&self) -> Result<()> {
        if self.prefix.is_empty() || self.prefix.ends_with(PREFIX_SEPARATOR) {
            Ok(())
        } else {
            Err(Error::InvalidPrefix(self.prefix.clone()))
        }
    }

    /// Populate `target` from the source
    ///
    /// Fails immediately on an invalid prefix. Otherwise every field is
    /// attempted; fields that resolve and convert are set even when siblings
    /// fail, and all failures are returned together.
    pub fn parse<T: EnvStruct + ?Sized>(&self, target: &mut T) -> Result<()> {
        self.validate_prefix()?;

        let struct_name = target.struct_name();
        tracing::debug!(r#struct = struct_name, prefix = %self.prefix, "Parsing environment");

        let errors = Walker::new(&self.prefix, self.source.as_ref(), &self.converters).run(target);
        if errors.is_empty() {
            tracing::debug!(r#struct = struct_name, "Parsed environment");
            Ok(())
        } else {
            tracing::debug!(
                r#struct = struct_name,
                failures = errors.len(),
                "Environment parse failed"
            );
            Err(Error::Parse(errors))
        }
    }

    /// Every variable `target` reads under this parser's prefix
    pub fn get_all_vars<T: EnvStruct + ?Sized>(&self, target: &T) -> Vec<VarInfo> {
        inspect::get_all_vars(target, &self.prefix)
    }

    /// Check that every required variable of `target` is present in the source
    pub fn validate_required<T: EnvStruct + ?Sized>(&self, target: &T) -> Result<()> {
        inspect::validate_required_in(target, &self.prefix, self.source.as_ref())
    }
}

impl Default for EnvParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvParser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvParser")
            .field("prefix", &self.prefix)
            .field("converters", &self.converters)
            .finish_non_exhaustive()
    }
}
