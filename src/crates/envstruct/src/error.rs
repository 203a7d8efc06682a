//! Error types for environment parsing

use std::fmt;
use thiserror::Error;

/// Boxed error returned by text conversions and custom converters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for envstruct operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the parse and validation entry points
#[derive(Debug, Error)]
pub enum Error {
    /// A non-empty prefix did not end with the key separator
    #[error("prefix must end with underscore, got: {0:?}")]
    InvalidPrefix(String),

    /// One or more fields failed to resolve or convert
    #[error(transparent)]
    Parse(#[from] ParseErrors),

    /// Required variables are not present in the source
    #[error("missing required environment variables: {0:?}")]
    MissingRequired(Vec<String>),
}

impl Error {
    /// Get the canonical error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPrefix(_) => "E_INVALID_PREFIX",
            Self::Parse(_) => "E_PARSE",
            Self::MissingRequired(_) => "E_MISSING_REQUIRED",
        }
    }

    /// Field-level failures carried by this error, empty for the other kinds
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Parse(errors) => errors.as_slice(),
            _ => &[],
        }
    }
}

/// A single failing field
#[derive(Debug, Error)]
#[error("field '{path}' in {struct_name}: {kind}")]
pub struct FieldError {
    /// Dotted path of the field, rooted at the parsed structure
    pub path: String,
    /// Name of the structure that declares the field
    pub struct_name: &'static str,
    /// What went wrong
    #[source]
    pub kind: FieldErrorKind,
}

/// Cause of a field failure
#[derive(Debug, Error)]
pub enum FieldErrorKind {
    /// The key is absent and the field is marked required
    #[error("env var {key} was missing and is required")]
    MissingRequired { key: String },

    /// The required flag is not a recognizable boolean
    #[error("invalid required flag {value:?}: expected a boolean")]
    InvalidRequiredFlag { value: String },

    /// The resolved value could not be converted
    #[error(transparent)]
    Conversion(#[from] ConvertError),
}

impl FieldErrorKind {
    /// Get the canonical error code for this failure
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingRequired { .. } => "E_MISSING_REQUIRED",
            Self::InvalidRequiredFlag { .. } => "E_INVALID_METADATA",
            Self::Conversion(ConvertError::UnsupportedType { .. })
            | Self::Conversion(ConvertError::UnsupportedSliceType { .. }) => "E_UNSUPPORTED_TYPE",
            Self::Conversion(_) => "E_CONVERSION",
        }
    }
}

/// Failure converting a resolved string to a field's declared type
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The text is not valid for the target type
    #[error("unable to parse {value:?} as {type_name}: {source}")]
    Invalid {
        value: String,
        type_name: String,
        #[source]
        source: BoxError,
    },

    /// A registered custom converter rejected the value
    #[error("custom parser error: {0}")]
    Custom(#[source] BoxError),

    /// A custom converter produced a value of another type
    #[error("custom parser for {expected} returned a value of another type")]
    TypeMismatch { expected: String },

    /// The field type has no conversion
    #[error("type is not supported: {type_name}")]
    UnsupportedType { type_name: String },

    /// The field is a slice whose element type has no conversion
    #[error("unsupported slice type: {type_name}")]
    UnsupportedSliceType { type_name: String },
}

impl ConvertError {
    /// Wrap a text conversion failure for `T`
    pub fn invalid<T: ?Sized>(value: &str, source: impl Into<BoxError>) -> Self {
        Self::Invalid {
            value: value.to_string(),
            type_name: crate::field::type_label::<T>(),
            source: source.into(),
        }
    }
}

/// Aggregate of every field failure from one parse call, in declaration order
#[derive(Debug, Default)]
pub struct ParseErrors(Vec<FieldError>);

impl ParseErrors {
    pub(crate) fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Dotted paths of the failing fields
    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.path.as_str()).collect()
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => Ok(()),
            [single] => write!(f, "{}", single),
            errors => {
                write!(f, "multiple parsing errors ({}):", errors.len())?;
                for (i, err) in errors.iter().enumerate() {
                    write!(f, "\n  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ParseErrors {}

impl IntoIterator for ParseErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
