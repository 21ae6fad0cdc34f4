//! S3 request body parsing.
//!
//! Two operations carry XML request bodies: bulk delete (`POST /?delete`)
//! and CompleteMultipartUpload. Both are parsed with a streaming
//! `quick_xml::Reader`; unknown elements are skipped so SDK-added fields
//! (version ids, checksums) don't break parsing. Any reader failure maps to
//! the S3 `MalformedXML` error at the dispatch layer.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::XmlError;

/// Trait for deserializing request types from XML.
///
/// The reader is positioned just after the opening tag of the root element;
/// the implementation reads all child content through the matching end tag.
pub trait S3Deserialize: Sized {
    /// Deserialize an instance from the reader.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if the XML is malformed.
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError>;
}

/// Deserialize an S3 request body into a typed value.
///
/// # Errors
///
/// Returns [`XmlError`] if the body has no root element or the structure is
/// malformed.
pub fn from_xml<T: S3Deserialize>(xml: &[u8]) -> Result<T, XmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    // Skip the XML declaration and find the root element.
    loop {
        match reader.read_event()? {
            Event::Start(_) => return T::deserialize_xml(&mut reader),
            Event::Eof => return Err(XmlError::MissingElement("root element".to_owned())),
            _ => {}
        }
    }
}

/// Read the text content of the current element and consume its end tag.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let unescaped = e.unescape().map_err(|err| XmlError::Parse(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::End(_) => return Ok(text),
            Event::Eof => {
                return Err(XmlError::UnexpectedStructure(
                    "unexpected EOF while reading text content".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedStructure(
                    "unexpected EOF while skipping element".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

/// Resolve a start-tag name as UTF-8.
fn tag_name<'a>(name: &'a quick_xml::name::QName<'a>) -> Result<&'a str, XmlError> {
    std::str::from_utf8(name.as_ref()).map_err(|e| XmlError::Parse(e.to_string()))
}

// ---------------------------------------------------------------------------
// Delete (bulk delete request)
// ---------------------------------------------------------------------------

/// A parsed `<Delete>` request body.
#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    /// Whether `<Deleted>` confirmations should be suppressed.
    pub quiet: bool,
    /// The keys to delete, in request order.
    pub keys: Vec<String>,
}

impl S3Deserialize for DeleteRequest {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut quiet = false;
        let mut keys = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => match tag_name(&e.name())? {
                    "Object" => keys.push(parse_object_entry(reader)?),
                    "Quiet" => {
                        let text = read_text_content(reader)?;
                        quiet = text == "true";
                    }
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(XmlError::UnexpectedStructure(
                        "unexpected EOF in Delete".to_owned(),
                    ));
                }
                _ => {}
            }
        }

        Ok(DeleteRequest { quiet, keys })
    }
}

/// Parse one `<Object>` entry, returning its `<Key>`.
fn parse_object_entry(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut key = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match tag_name(&e.name())? {
                "Key" => key = Some(read_text_content(reader)?),
                _ => skip_element(reader)?,
            },
            Event::End(_) => break,
            Event::Eof => {
                return Err(XmlError::UnexpectedStructure(
                    "unexpected EOF in Object".to_owned(),
                ));
            }
            _ => {}
        }
    }

    key.ok_or_else(|| XmlError::MissingElement("Object/Key".to_owned()))
}

// ---------------------------------------------------------------------------
// CompleteMultipartUpload
// ---------------------------------------------------------------------------

/// A parsed `<CompleteMultipartUpload>` request body.
///
/// Part numbers are kept as `i64` so the dispatcher can distinguish
/// non-positive values (an `InvalidPart` condition) from unparseable XML.
#[derive(Debug, Clone, Default)]
pub struct CompleteRequest {
    /// The part numbers listed in the request, in request order.
    pub part_numbers: Vec<i64>,
}

impl S3Deserialize for CompleteRequest {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut part_numbers = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => match tag_name(&e.name())? {
                    "Part" => part_numbers.push(parse_part_entry(reader)?),
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(XmlError::UnexpectedStructure(
                        "unexpected EOF in CompleteMultipartUpload".to_owned(),
                    ));
                }
                _ => {}
            }
        }

        Ok(CompleteRequest { part_numbers })
    }
}

/// Parse one `<Part>` entry, returning its `<PartNumber>`.
///
/// The `<ETag>` the client echoes back is consumed and ignored - assembly
/// re-reads the part files themselves.
fn parse_part_entry(reader: &mut Reader<&[u8]>) -> Result<i64, XmlError> {
    let mut part_number = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match tag_name(&e.name())? {
                "PartNumber" => {
                    let text = read_text_content(reader)?;
                    let number = text
                        .parse::<i64>()
                        .map_err(|e| XmlError::Parse(format!("invalid PartNumber '{text}': {e}")))?;
                    part_number = Some(number);
                }
                _ => skip_element(reader)?,
            },
            Event::End(_) => break,
            Event::Eof => {
                return Err(XmlError::UnexpectedStructure(
                    "unexpected EOF in Part".to_owned(),
                ));
            }
            _ => {}
        }
    }

    part_number.ok_or_else(|| XmlError::MissingElement("Part/PartNumber".to_owned()))
}
