//! S3 wire XML for silo.
//!
//! The serialization side emits the five response documents the server
//! produces (`Error`, `ListBucketResult`, `InitiateMultipartUploadResult`,
//! `CompleteMultipartUploadResult`, `DeleteResult`). The deserialization side
//! parses the two request bodies the server accepts (`Delete` and
//! `CompleteMultipartUpload`).
//!
//! # Modules
//!
//! - [`serialize`] - response document encoding
//! - [`deserialize`] - request body parsing
//! - [`error`] - shared error type

pub mod deserialize;
pub mod error;
pub mod serialize;

pub use deserialize::{CompleteRequest, DeleteRequest, from_xml};
pub use error::XmlError;
pub use serialize::{
    CompleteMultipartUploadResult, DeleteErrorEntry, DeleteResult, ErrorDocument,
    InitiateMultipartUploadResult, ListBucketResult, ObjectSummary, S3_XMLNS,
};
