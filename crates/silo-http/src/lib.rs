//! HTTP surface of the silo object store.
//!
//! This crate turns HTTP requests into storage operations: it normalizes the
//! request head, runs the pre-route checks and SigV4 authentication, routes
//! to an S3 operation, executes it against the storage engine, and encodes
//! the response (streaming object bodies straight from disk).
//!
//! # Modules
//!
//! - [`request`] - normalized request context
//! - [`router`] - operation identification
//! - [`dispatch`] - pre-route checks, authentication, operation handlers
//! - [`range`] - `Range` header resolution
//! - [`response`] - the API error type and response builders
//! - [`body`] - buffered/empty/streaming response bodies
//! - [`service`] - the hyper `Service` wrapper

pub mod body;
pub mod dispatch;
pub mod range;
pub mod request;
pub mod response;
pub mod router;
pub mod service;

pub use body::ResponseBody;
pub use dispatch::S3Dispatcher;
pub use request::RequestContext;
pub use response::ApiError;
pub use router::S3Op;
pub use service::SiloHttpService;
