//! Error types for SigV4 authentication.
//!
//! All authentication failures are represented by [`AuthError`]. Each variant
//! maps to a well-known S3 error code and HTTP status via [`AuthError::s3_code`]
//! and [`AuthError::http_status`], so the HTTP layer can turn any failure into
//! a wire error without inspecting the variant itself.

/// Errors that can occur during AWS Signature Version 4 authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request carries no recognizable authentication information.
    #[error("Request is not signed")]
    MissingCredentials,

    /// The access key ID was not found in the credential table.
    #[error("The AWS access key ID you provided does not exist in our records: {0}")]
    UnknownAccessKey(String),

    /// The computed signature does not match the provided signature.
    #[error("The request signature we calculated does not match the signature you provided")]
    SignatureMismatch,

    /// The authorization header or query parameters are malformed
    /// (bad credential scope, bad `SignedHeaders`, bad `X-Amz-Expires`, ...).
    #[error("Malformed authorization: {0}")]
    MalformedAuth(String),

    /// A header referenced in `SignedHeaders` is absent from the request.
    #[error("Missing signed header: {0}")]
    MissingHeader(String),

    /// The request timestamp is too far from the server clock.
    #[error("The difference between the request time and the server's time is too large")]
    ClockSkew,

    /// The presigned URL has passed its `X-Amz-Expires` deadline.
    #[error("The provided token has expired")]
    Expired,
}

impl AuthError {
    /// The S3 error code for this failure.
    #[must_use]
    pub fn s3_code(&self) -> &'static str {
        match self {
            Self::MissingCredentials | Self::MissingHeader(_) => "AccessDenied",
            Self::UnknownAccessKey(_) => "InvalidAccessKeyId",
            Self::SignatureMismatch => "SignatureDoesNotMatch",
            Self::MalformedAuth(_) => "AuthorizationQueryParametersError",
            Self::ClockSkew => "RequestTimeTooSkewed",
            Self::Expired => "ExpiredToken",
        }
    }

    /// The HTTP status code for this failure.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MalformedAuth(_) => 400,
            _ => 403,
        }
    }
}
