//! Flow orchestration error types.

/// Specific error conditions for AI flow orchestrators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FlowErrorKind {
    /// Caller input failed validation; no external call was made
    #[display("Invalid input: {}", _0)]
    Validation(String),
    /// The capability is turned off by its feature flag
    #[display("Feature '{}' is disabled", _0)]
    FeatureDisabled(String),
    /// The model returned no output or output that does not match the declared shape
    #[display("Model output invalid: {}", _0)]
    ModelOutput(String),
    /// Network or HTTP failure calling the model provider or a tool's external API
    #[display("Upstream API failure: {}", _0)]
    UpstreamApi(String),
    /// A long-running generation job exceeded its deadline
    #[display("Operation timed out after {} seconds", elapsed_secs)]
    Timeout {
        /// Seconds elapsed before giving up
        elapsed_secs: u64,
    },
    /// A long-running generation job was cancelled by the caller
    #[display("Operation cancelled")]
    Cancelled,
}

/// Error type for AI flow operations.
///
/// # Examples
///
/// ```
/// use ton_error::{FlowError, FlowErrorKind};
///
/// let err = FlowError::new(FlowErrorKind::FeatureDisabled("ask_diano".to_string()));
/// assert!(format!("{}", err).contains("disabled"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Flow Error: {} at line {} in {}", kind, line, file)]
pub struct FlowError {
    /// The specific error condition
    pub kind: FlowErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl FlowError {
    /// Create a new FlowError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FlowErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Convenience constructor for validation failures.
    #[track_caller]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(FlowErrorKind::Validation(msg.into()))
    }

    /// Convenience constructor for malformed model output.
    #[track_caller]
    pub fn model_output(msg: impl Into<String>) -> Self {
        Self::new(FlowErrorKind::ModelOutput(msg.into()))
    }

    /// Convenience constructor for upstream API failures.
    #[track_caller]
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::new(FlowErrorKind::UpstreamApi(msg.into()))
    }

    /// True if this error is the explicit, user-facing feature-disabled case.
    pub fn is_feature_disabled(&self) -> bool {
        matches!(self.kind, FlowErrorKind::FeatureDisabled(_))
    }
}
