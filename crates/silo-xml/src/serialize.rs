//! S3 response document serialization.
//!
//! Emits the five response documents silo produces, following the AWS S3
//! RestXml conventions:
//!
//! - XML declaration `<?xml version="1.0" encoding="UTF-8"?>`
//! - Namespace `http://s3.amazonaws.com/doc/2006-03-01/` on result documents
//!   (the `Error` document carries none, matching AWS)
//! - Booleans as lowercase `true`/`false`
//! - Timestamps as `YYYY-MM-DDTHH:MM:SS.000Z` in UTC
//!
//! Element order within each document is fixed; AWS SDKs are lenient readers
//! but the order below matches what they were generated against.

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::error::XmlError;

/// The S3 XML namespace.
pub const S3_XMLNS: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Trait for serializing response types to XML.
///
/// Implementors write their child elements into the current XML context; the
/// root element and namespace are handled by [`to_xml`].
///
/// Uses `io::Result` because `quick_xml::Writer` inner-content closures
/// require it.
pub trait S3Serialize {
    /// Serialize this value's child elements into the writer.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if writing fails.
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()>;
}

/// Serialize a value as a complete S3 XML document.
///
/// # Errors
///
/// Returns [`XmlError`] if serialization fails.
pub fn to_xml<T: S3Serialize>(
    root_element: &str,
    xmlns: Option<&str>,
    value: &T,
) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    match xmlns {
        Some(ns) => {
            writer
                .create_element(root_element)
                .with_attribute(("xmlns", ns))
                .write_inner_content(|w| value.serialize_xml(w))?;
        }
        None => {
            writer
                .create_element(root_element)
                .write_inner_content(|w| value.serialize_xml(w))?;
        }
    }

    Ok(buf)
}

/// Write a simple `<tag>text</tag>` element.
fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

/// Format a timestamp the way S3 list responses do.
fn format_timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S.000Z").to_string()
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// The S3 `Error` response document.
#[derive(Debug, Clone)]
pub struct ErrorDocument {
    /// The S3 error code, e.g. `NoSuchKey`.
    pub code: String,
    /// Human-readable message. Never contains paths or OS error text.
    pub message: String,
    /// The addressed resource (`/bucket/key`), or `/` when unknown.
    pub resource: String,
}

impl ErrorDocument {
    /// Serialize to a complete XML document.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if serialization fails.
    pub fn to_xml(&self) -> Result<Vec<u8>, XmlError> {
        to_xml("Error", None, self)
    }
}

impl S3Serialize for ErrorDocument {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Code", &self.code)?;
        write_text_element(writer, "Message", &self.message)?;
        write_text_element(writer, "Resource", &self.resource)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ListBucketResult
// ---------------------------------------------------------------------------

/// One `<Contents>` entry in a listing.
#[derive(Debug, Clone)]
pub struct ObjectSummary {
    /// The object key.
    pub key: String,
    /// Last-modified time.
    pub last_modified: chrono::DateTime<chrono::Utc>,
    /// Size in bytes.
    pub size: u64,
}

/// The `ListBucketResult` response document.
///
/// The listing is not paginated: `max_keys` is declared as 1000 and
/// `is_truncated` as false regardless of result count.
#[derive(Debug, Clone)]
pub struct ListBucketResult {
    /// The bucket name.
    pub name: String,
    /// The requested prefix (possibly empty).
    pub prefix: String,
    /// The declared page size.
    pub max_keys: u32,
    /// Whether the listing was cut short.
    pub is_truncated: bool,
    /// The matched objects, sorted by key.
    pub contents: Vec<ObjectSummary>,
}

impl ListBucketResult {
    /// Serialize to a complete XML document.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if serialization fails.
    pub fn to_xml(&self) -> Result<Vec<u8>, XmlError> {
        to_xml("ListBucketResult", Some(S3_XMLNS), self)
    }
}

impl S3Serialize for ListBucketResult {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Name", &self.name)?;
        write_text_element(writer, "Prefix", &self.prefix)?;
        write_text_element(writer, "MaxKeys", &self.max_keys.to_string())?;
        write_text_element(
            writer,
            "IsTruncated",
            if self.is_truncated { "true" } else { "false" },
        )?;
        for object in &self.contents {
            writer.create_element("Contents").write_inner_content(|w| {
                write_text_element(w, "Key", &object.key)?;
                write_text_element(w, "LastModified", &format_timestamp(&object.last_modified))?;
                write_text_element(w, "Size", &object.size.to_string())?;
                write_text_element(w, "StorageClass", "STANDARD")
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// InitiateMultipartUploadResult
// ---------------------------------------------------------------------------

/// The `InitiateMultipartUploadResult` response document.
#[derive(Debug, Clone)]
pub struct InitiateMultipartUploadResult {
    /// The bucket name.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// The new session's upload ID.
    pub upload_id: String,
}

impl InitiateMultipartUploadResult {
    /// Serialize to a complete XML document.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if serialization fails.
    pub fn to_xml(&self) -> Result<Vec<u8>, XmlError> {
        to_xml("InitiateMultipartUploadResult", Some(S3_XMLNS), self)
    }
}

impl S3Serialize for InitiateMultipartUploadResult {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Bucket", &self.bucket)?;
        write_text_element(writer, "Key", &self.key)?;
        write_text_element(writer, "UploadId", &self.upload_id)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CompleteMultipartUploadResult
// ---------------------------------------------------------------------------

/// The `CompleteMultipartUploadResult` response document.
#[derive(Debug, Clone)]
pub struct CompleteMultipartUploadResult {
    /// The URL of the assembled object.
    pub location: String,
    /// The bucket name.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// The completed session's upload ID.
    pub upload_id: String,
}

impl CompleteMultipartUploadResult {
    /// Serialize to a complete XML document.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if serialization fails.
    pub fn to_xml(&self) -> Result<Vec<u8>, XmlError> {
        to_xml("CompleteMultipartUploadResult", Some(S3_XMLNS), self)
    }
}

impl S3Serialize for CompleteMultipartUploadResult {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Location", &self.location)?;
        write_text_element(writer, "Bucket", &self.bucket)?;
        write_text_element(writer, "Key", &self.key)?;
        write_text_element(writer, "UploadId", &self.upload_id)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DeleteResult
// ---------------------------------------------------------------------------

/// One `<Error>` entry in a bulk-delete response.
#[derive(Debug, Clone)]
pub struct DeleteErrorEntry {
    /// The key that could not be deleted.
    pub key: String,
    /// The S3 error code for this key.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// The `DeleteResult` response document.
///
/// In quiet mode the `deleted` list is left empty by the caller; error
/// entries are always emitted.
#[derive(Debug, Clone, Default)]
pub struct DeleteResult {
    /// Successfully deleted keys.
    pub deleted: Vec<String>,
    /// Per-key failures.
    pub errors: Vec<DeleteErrorEntry>,
}

impl DeleteResult {
    /// Serialize to a complete XML document.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if serialization fails.
    pub fn to_xml(&self) -> Result<Vec<u8>, XmlError> {
        to_xml("DeleteResult", Some(S3_XMLNS), self)
    }
}

impl S3Serialize for DeleteResult {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        for key in &self.deleted {
            writer
                .create_element("Deleted")
                .write_inner_content(|w| write_text_element(w, "Key", key))?;
        }
        for error in &self.errors {
            writer.create_element("Error").write_inner_content(|w| {
                write_text_element(w, "Key", &error.key)?;
                write_text_element(w, "Code", &error.code)?;
                write_text_element(w, "Message", &error.message)
            })?;
        }
        Ok(())
    }
}
