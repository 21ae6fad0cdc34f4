//! XML encoding and decoding errors.

/// Errors from XML serialization or deserialization.
///
/// Any deserialization failure on a request body maps to the S3
/// `MalformedXML` error at the dispatch layer.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// The document could not be parsed.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// A required element is absent.
    #[error("missing element: {0}")]
    MissingElement(String),

    /// The document structure does not match the expected schema.
    #[error("unexpected document structure: {0}")]
    UnexpectedStructure(String),

    /// Writing the document failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for XmlError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
