//! Top-level error wrapper types.

use crate::{ConfigError, FlowError, GeminiError, RenderError, SocialError, StoreError};

/// Foundation error enum covering every workspace domain.
///
/// # Examples
///
/// ```
/// use ton_error::{TonError, StoreError, StoreErrorKind};
///
/// let store_err = StoreError::new(StoreErrorKind::Connection("refused".to_string()));
/// let err: TonError = store_err.into();
/// assert!(format!("{}", err).contains("connection"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TonErrorKind {
    /// AI flow orchestration error
    #[from(FlowError)]
    Flow(FlowError),
    /// Persistence error
    #[from(StoreError)]
    Store(StoreError),
    /// Gemini backend error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Outbound notification error
    #[from(SocialError)]
    Social(SocialError),
    /// Rendering error
    #[from(RenderError)]
    Render(RenderError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Talk of Nations error with kind discrimination.
///
/// # Examples
///
/// ```
/// use ton_error::{TonResult, ConfigError};
///
/// fn might_fail() -> TonResult<()> {
///     Err(ConfigError::new("missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Talk of Nations Error: {}", _0)]
pub struct TonError(Box<TonErrorKind>);

impl TonError {
    /// Create a new error from a kind.
    pub fn new(kind: TonErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TonErrorKind {
        &self.0
    }
}

impl<T> From<T> for TonError
where
    T: Into<TonErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Talk of Nations operations.
pub type TonResult<T> = std::result::Result<T, TonError>;
