//! Response construction and the API error type.
//!
//! Every failure anywhere in the pipeline ends up as an [`ApiError`], which
//! carries the S3 error code, a client-safe message, the HTTP status, and
//! the addressed resource. A single conversion point turns it into the S3
//! `Error` XML document - handlers never write error responses themselves.

use http::{Response, StatusCode};
use silo_auth::AuthError;
use silo_core::StoreError;
use silo_xml::{ErrorDocument, XmlError};
use tracing::error;

use crate::body::ResponseBody;

/// A failed request, ready to be encoded as an S3 error response.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// The S3 error code, e.g. `NoSuchKey`.
    pub code: String,
    /// Client-safe message. Never contains paths or OS error text.
    pub message: String,
    /// HTTP status.
    pub status: StatusCode,
    /// The addressed resource (`/bucket[/key]`), `/` when unknown.
    pub resource: String,
}

impl ApiError {
    /// Create an error with the default `/` resource.
    pub fn new(code: impl Into<String>, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status,
            resource: "/".to_owned(),
        }
    }

    /// Attach the addressed resource.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    /// `InvalidRequest` (400).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new("InvalidRequest", message, StatusCode::BAD_REQUEST)
    }

    /// `MethodNotAllowed` (405).
    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::new(
            "MethodNotAllowed",
            "The specified method is not allowed against this resource",
            StatusCode::METHOD_NOT_ALLOWED,
        )
    }

    /// `InternalError` (500), with a fixed client-safe message.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            "InternalError",
            "We encountered an internal error. Please try again.",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(err.s3_code(), err.to_string(), status)
    }
}

impl From<XmlError> for ApiError {
    fn from(_: XmlError) -> Self {
        Self::new(
            "MalformedXML",
            "The XML you provided was not well-formed or did not validate against our published schema",
            StatusCode::BAD_REQUEST,
        )
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::new(
                "NoSuchKey",
                "The specified key does not exist.",
                StatusCode::NOT_FOUND,
            ),
            StoreError::NoSuchUpload { .. } => Self::new(
                "NoSuchUpload",
                "The specified multipart upload does not exist.",
                StatusCode::NOT_FOUND,
            ),
            StoreError::InvalidPart => Self::new(
                "InvalidPart",
                "One or more of the specified parts could not be found.",
                StatusCode::BAD_REQUEST,
            ),
            StoreError::Io(e) => {
                // The I/O detail is logged server-side and never leaves.
                error!(error = %e, "storage I/O failure");
                Self::internal()
            }
        }
    }
}

/// Encode an [`ApiError`] as its XML response.
#[must_use]
pub fn error_response(err: &ApiError) -> Response<ResponseBody> {
    let document = ErrorDocument {
        code: err.code.clone(),
        message: err.message.clone(),
        resource: err.resource.clone(),
    };

    match document.to_xml() {
        Ok(xml) => xml_response(err.status, xml),
        Err(e) => {
            error!(error = %e, "failed to serialize error document");
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(ResponseBody::empty())
                .expect("static response is valid")
        }
    }
}

/// Build an `application/xml` response with an explicit `Content-Length`.
#[must_use]
pub fn xml_response(status: StatusCode, xml: Vec<u8>) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/xml")
        .header(http::header::CONTENT_LENGTH, xml.len())
        .body(ResponseBody::from_xml(xml))
        .expect("xml response is valid")
}

/// Build an empty response with the given status.
#[must_use]
pub fn empty_response(status: StatusCode) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .body(ResponseBody::empty())
        .expect("empty response is valid")
}
