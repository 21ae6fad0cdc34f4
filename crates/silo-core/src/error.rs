//! Storage engine error types.
//!
//! [`StoreError`] is the typed failure surface of the storage engine. The
//! HTTP dispatcher maps variants to S3 error codes by context (a `NotFound`
//! under GET becomes `NoSuchKey`, a `NoSuchUpload` becomes its own 404, and
//! any `Io` becomes an opaque `InternalError`). Raw I/O details never reach
//! a response body.

/// Errors raised by the storage engine.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The object does not exist.
    #[error("no such object: {bucket}/{key}")]
    NotFound {
        /// The bucket that was addressed.
        bucket: String,
        /// The key that was not found.
        key: String,
    },

    /// The multipart upload session does not exist.
    #[error("no such multipart upload: {upload_id}")]
    NoSuchUpload {
        /// The upload ID that was not found.
        upload_id: String,
    },

    /// A part referenced by CompleteMultipartUpload is missing or the part
    /// list itself is unusable (empty, or containing a non-positive number).
    #[error("one or more of the specified parts could not be found")]
    InvalidPart,

    /// An underlying filesystem operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
