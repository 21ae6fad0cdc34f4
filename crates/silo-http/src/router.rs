//! S3 operation routing.
//!
//! Operations are identified from the HTTP method, the presence of specific
//! query flags, and whether the path addresses a bucket (empty key) or an
//! object. The mapping is a fixed table; no header sniffing is involved.

use crate::request::RequestContext;
use crate::response::ApiError;

/// The S3 operations silo serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum S3Op {
    /// PUT with `uploadId` and `partNumber`.
    UploadPart,
    /// Any other PUT on an object.
    PutObject,
    /// POST with `delete`.
    BulkDelete,
    /// POST with `uploads`.
    InitiateMultipart,
    /// POST with `uploadId`.
    CompleteMultipart,
    /// GET on a bucket.
    ListObjects,
    /// GET on an object.
    GetObject,
    /// HEAD on an object.
    HeadObject,
    /// DELETE with `uploadId`.
    AbortMultipart,
    /// Any other DELETE.
    DeleteObject,
}

/// Identify the operation for a request.
///
/// # Errors
///
/// Returns `InvalidRequest` for a POST without a recognized flag or a HEAD
/// on a bucket, and `MethodNotAllowed` for unrecognized methods.
pub fn route(ctx: &RequestContext, key_is_empty: bool) -> Result<S3Op, ApiError> {
    match ctx.method.as_str() {
        "PUT" => {
            if ctx.query_has("uploadId") && ctx.query_has("partNumber") {
                Ok(S3Op::UploadPart)
            } else {
                Ok(S3Op::PutObject)
            }
        }
        "POST" => {
            if ctx.query_has("delete") {
                Ok(S3Op::BulkDelete)
            } else if ctx.query_has("uploads") {
                Ok(S3Op::InitiateMultipart)
            } else if ctx.query_has("uploadId") {
                Ok(S3Op::CompleteMultipart)
            } else {
                Err(ApiError::invalid_request("Unrecognized POST request"))
            }
        }
        "GET" => {
            if key_is_empty {
                Ok(S3Op::ListObjects)
            } else {
                Ok(S3Op::GetObject)
            }
        }
        "HEAD" => {
            if key_is_empty {
                Err(ApiError::invalid_request("HEAD requires an object key"))
            } else {
                Ok(S3Op::HeadObject)
            }
        }
        "DELETE" => {
            if ctx.query_has("uploadId") {
                Ok(S3Op::AbortMultipart)
            } else {
                Ok(S3Op::DeleteObject)
            }
        }
        _ => Err(ApiError::method_not_allowed()),
    }
}
