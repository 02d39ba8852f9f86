//! Body fragments of a chunked request.

/// One fragment of a chunk-encoded request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpChunk {
    /// The chunk payload, without size line or trailing CRLF
    pub data: Vec<u8>,
    /// Set on the zero-size chunk that terminates the stream
    pub is_last: bool,
}

impl HttpChunk {
    /// Create a non-terminating chunk.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            is_last: false,
        }
    }

    /// Create the terminating chunk.
    pub fn last() -> Self {
        Self {
            data: Vec::new(),
            is_last: true,
        }
    }
}
