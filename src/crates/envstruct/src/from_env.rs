//! Construct-and-parse conveniences for `Default` structures
//!
//! Three error styles for the call site:
//!
//! - [`FromEnv::from_env`] propagates the error
//! - [`FromEnv::from_env_or`] falls back to a caller-supplied value
//! - [`FromEnv::must_from_env`] panics, for startup code that cannot continue

use crate::error::Result;
use crate::field::EnvStruct;
use crate::parser::EnvParser;

/// Trait for types that can be loaded from environment variables
pub trait FromEnv: Sized {
    /// Load from the process environment with no prefix
    fn from_env() -> Result<Self> {
        Self::from_env_with_prefix("")
    }

    /// Load from the process environment with the given prefix
    fn from_env_with_prefix(prefix: &str) -> Result<Self>;

    /// Load from the process environment, returning `fallback` on any error
    ///
    /// Fields parsed before the error are discarded with the partial value.
    fn from_env_or(fallback: Self) -> Self {
        match Self::from_env() {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "Using fallback configuration");
                fallback
            }
        }
    }

    /// Load from the process environment, panicking on any error
    fn must_from_env() -> Self {
        match Self::from_env() {
            Ok(value) => value,
            Err(err) => panic!(
                "failed to load {} from environment: {}",
                std::any::type_name::<Self>(),
                err
            ),
        }
    }
}

impl<T: EnvStruct + Default> FromEnv for T {
    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut value = T::default();
        EnvParser::new().with_prefix(prefix).parse(&mut value)?;
        Ok(value)
    }
}
