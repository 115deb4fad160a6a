//! Error types for row sources and cursor navigation.

use thiserror::Error;

/// Errors reported by a row source while rows are being pulled.
///
/// Sources surface engine-side failures (execution errors, cancellation)
/// through this type; the cursor propagates them unchanged and leaves its
/// position at the last successfully reached row.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying query execution failed.
    #[error("query execution failed: {0}")]
    Execution(String),

    /// The underlying query was cancelled.
    #[error("query cancelled")]
    Cancelled,

    /// The source exhausted before yielding its declared row count.
    #[error("row source ended after {got} rows, expected {expected}")]
    TruncatedResult {
        /// The row count the source declared.
        expected: u64,
        /// The number of rows actually yielded.
        got: u64,
    },
}

/// Result type for row source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors reported by cursor navigation.
#[derive(Debug, Error)]
pub enum CursorError {
    /// An operation was attempted after `close()`.
    #[error("cursor is closed")]
    Closed,

    /// A forward-only cursor was asked to move to a position behind its
    /// current one.
    #[error("forward-only cursor cannot move backward")]
    UnsupportedBackwardMove,

    /// A requested target position was rejected outright.
    ///
    /// Reserved for sources that refuse a target rather than clamping it;
    /// the built-in cursors clamp wherever clamping is the documented
    /// behavior.
    #[error("row target {0} is out of range")]
    OutOfRange(i64),

    /// The row source failed while being pulled.
    #[error("row source failure: {0}")]
    Source(#[from] SourceError),
}

/// Result type for cursor operations.
pub type CursorResult<T> = Result<T, CursorError>;
