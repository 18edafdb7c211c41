//! Persistence error types.

/// Specific error conditions for store operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// Failed to reach the backing database
    #[display("Database connection failed: {}", _0)]
    Connection(String),
    /// A query failed
    #[display("Query failed: {}", _0)]
    Query(String),
    /// The requested document does not exist
    #[display("Not found: {}", _0)]
    NotFound(String),
    /// The store rejected the request for quota reasons (resource exhausted /
    /// failed precondition); reads treat this as a soft failure
    #[display("Store quota exhausted: {}", _0)]
    ResourceExhausted(String),
    /// A document could not be serialized or deserialized
    #[display("Serialization failed: {}", _0)]
    Serialization(String),
    /// Failed to persist a generated artifact
    #[display("Artifact write failed: {}", _0)]
    Artifact(String),
}

/// Error type for persistence operations.
///
/// # Examples
///
/// ```
/// use ton_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::NotFound("post 'kenya-tech'".to_string()));
/// assert!(err.kind.is_not_found());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The specific error condition
    pub kind: StoreErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoreErrorKind {
    /// True if the error means the primary store should be bypassed in favor
    /// of fixture data (unreachable store or exhausted quota).
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            StoreErrorKind::Connection(_) | StoreErrorKind::ResourceExhausted(_)
        )
    }

    /// True if the error is a missing-document condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreErrorKind::NotFound(_))
    }
}

impl StoreError {
    /// Create a new StoreError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Convenience constructor for connection failures.
    #[track_caller]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Connection(msg.into()))
    }

    /// Convenience constructor for query failures.
    #[track_caller]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Query(msg.into()))
    }

    /// Convenience constructor for missing documents.
    #[track_caller]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound(what.into()))
    }
}
