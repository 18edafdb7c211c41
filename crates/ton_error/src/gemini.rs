//! Gemini backend error types.

/// Specific error conditions for the Gemini backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// GEMINI_API_KEY environment variable is not set
    #[display("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
    /// Failed to construct a client for a model
    #[display("Failed to create Gemini client: {}", _0)]
    ClientCreation(String),
    /// API request failed without a recoverable status code
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// API request failed with an HTTP status code
    #[display("Gemini HTTP error {}: {}", status_code, message)]
    HttpError {
        /// HTTP status code returned by the API
        status_code: u16,
        /// Error description from the API
        message: String,
    },
    /// The API returned a response with no usable content
    #[display("Gemini returned an empty response")]
    EmptyResponse,
    /// A long-running job finished in a failed state
    #[display("Gemini job '{}' failed: {}", name, message)]
    JobFailed {
        /// Operation name of the job
        name: String,
        /// Provider-reported failure message
        message: String,
    },
}

/// Error type for Gemini backend operations.
///
/// # Examples
///
/// ```
/// use ton_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The specific error condition
    pub kind: GeminiErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
