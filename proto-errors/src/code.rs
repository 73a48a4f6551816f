//! Error code identifiers

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Anything that identifies a registered error by its code
pub trait HasCode {
    /// The error code string, e.g. `"ERROR_NOT_FOUND"`
    fn code(&self) -> &str;
}

impl<T: HasCode + ?Sized> HasCode for &T {
    fn code(&self) -> &str {
        (**self).code()
    }
}

impl HasCode for str {
    fn code(&self) -> &str {
        self
    }
}

impl HasCode for String {
    fn code(&self) -> &str {
        self
    }
}

/// A statically known error code
///
/// Generated code declares one constant of this type per error:
///
/// ```
/// use proto_errors::ErrorCode;
///
/// pub const USER_NOT_FOUND: ErrorCode = ErrorCode::new("ERROR_USER_NOT_FOUND");
/// assert_eq!(USER_NOT_FOUND.as_str(), "ERROR_USER_NOT_FOUND");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// Wrap a code string
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    /// The code string
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl HasCode for ErrorCode {
    fn code(&self) -> &str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl AsRef<str> for ErrorCode {
    fn as_ref(&self) -> &str {
        self.0
    }
}

/// An error value carrying a domain error code
///
/// Constructed statuses carry one as their `source`. Two coded errors are
/// equal when their codes are equal, regardless of message, so a sentinel
/// built with [`CodedError::sentinel`] matches any error of that code.
#[derive(Debug, Clone)]
pub struct CodedError {
    code: String,
    message: String,
    source: Option<Arc<dyn StdError + Send + Sync + 'static>>,
}

impl CodedError {
    /// Coded error with a formatted message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error this one wraps
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Message-less value used only for comparisons
    pub fn sentinel(code: ErrorCode) -> Self {
        Self::new(code.as_str(), String::new())
    }

    /// The formatted message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl HasCode for CodedError {
    fn code(&self) -> &str {
        &self.code
    }
}

impl PartialEq for CodedError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for CodedError {}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for CodedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}
