//! Outbound notification error types.

/// Specific error conditions for social/messaging adapters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SocialErrorKind {
    /// The integration's credentials are absent from the environment
    #[display("{} integration not configured", _0)]
    NotConfigured(String),
    /// HTTP transport failure
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// The platform API rejected the request
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or description
        message: String,
    },
}

/// Error type for outbound notification operations.
///
/// # Examples
///
/// ```
/// use ton_error::{SocialError, SocialErrorKind};
///
/// let err = SocialError::new(SocialErrorKind::NotConfigured("telegram".to_string()));
/// assert!(err.kind.is_not_configured());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Social Error: {} at line {} in {}", kind, line, file)]
pub struct SocialError {
    /// The specific error condition
    pub kind: SocialErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SocialErrorKind {
    /// True if the failure is the silent "credentials absent" case.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, SocialErrorKind::NotConfigured(_))
    }
}

impl SocialError {
    /// Create a new SocialError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SocialErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Convenience constructor for the unconfigured case.
    #[track_caller]
    pub fn not_configured(platform: impl Into<String>) -> Self {
        Self::new(SocialErrorKind::NotConfigured(platform.into()))
    }
}
