//! Response body types: buffered, empty, and streaming.
//!
//! [`ResponseBody`] is the body type of every response the server produces:
//!
//! - **Buffered** for XML documents and other small payloads.
//! - **Empty** for 204s, HEAD responses, and errors without a body.
//! - **File** for object downloads: a [`ReaderStream`] over an open file
//!   handle, reading in large chunks. GET responses never buffer a whole
//!   object in memory, and dropping the body (client disconnect) closes the
//!   file handle.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use http_body_util::Full;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, Take};
use tokio_util::io::ReaderStream;

/// Upper bound on a single streamed chunk.
const STREAM_CHUNK_SIZE: usize = 8 * 1024 * 1024;

/// Response body supporting buffered, empty, and file-streaming modes.
#[derive(Debug, Default)]
pub enum ResponseBody {
    /// Buffered body for XML payloads and other small responses.
    Buffered(Full<Bytes>),
    /// Empty body for 204 responses, HEAD responses, and bodiless errors.
    #[default]
    Empty,
    /// Streaming body reading up to a byte limit from an open file.
    File(ReaderStream<Take<File>>),
}

impl ResponseBody {
    /// Create a buffered body from bytes.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Buffered(Full::new(data.into()))
    }

    /// Create a buffered body from an XML byte vector.
    #[must_use]
    pub fn from_xml(xml: Vec<u8>) -> Self {
        Self::Buffered(Full::new(Bytes::from(xml)))
    }

    /// Create an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }

    /// Stream `len` bytes from the file's current position.
    ///
    /// The caller seeks the file first for range responses. The `take` limit
    /// pins the response length even if the underlying file grows while
    /// streaming.
    #[must_use]
    pub fn from_file(file: File, len: u64) -> Self {
        Self::File(ReaderStream::with_capacity(file.take(len), STREAM_CHUNK_SIZE))
    }
}

impl http_body::Body for ResponseBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Buffered(full) => Pin::new(full)
                .poll_frame(cx)
                .map_err(|never| match never {}),
            Self::Empty => Poll::Ready(None),
            Self::File(stream) => Pin::new(stream)
                .poll_next(cx)
                .map(|next| next.map(|chunk| chunk.map(http_body::Frame::data))),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Buffered(full) => full.is_end_stream(),
            Self::Empty => true,
            Self::File(_) => false,
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            Self::Buffered(full) => full.size_hint(),
            Self::Empty => http_body::SizeHint::with_exact(0),
            // Streaming responses set Content-Length explicitly.
            Self::File(_) => http_body::SizeHint::default(),
        }
    }
}
