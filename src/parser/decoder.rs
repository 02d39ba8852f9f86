//! Streaming request decoder.
//!
//! Frames a raw HTTP/1.x byte stream into the units the admin handler reacts
//! to: a request head (carrying its body when the length is known up front),
//! followed by one [`HttpChunk`] per wire chunk when the body is chunked.

use crate::parser::chunk::HttpChunk;
use crate::parser::error::Error;
use crate::parser::request::{parse_request, HttpRequest};

/// One unit delivered by the transport to a connection handler.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// A request head. For non-chunked requests the body is already attached.
    Request(HttpRequest),
    /// A fragment of a chunked request body.
    Chunk(HttpChunk),
}

#[derive(Debug)]
enum DecodePhase {
    Head,
    FixedBody { request: HttpRequest, length: usize },
    ChunkSize { received: usize },
    ChunkData { size: usize, received: usize },
    Trailer,
}

/// Incremental decoder for requests arriving on one connection.
#[derive(Debug)]
pub struct RequestDecoder {
    phase: DecodePhase,
    max_head_size: usize,
    max_body_size: usize,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

impl RequestDecoder {
    /// Create a decoder that rejects heads and chunk lines longer than
    /// `max_head_size` and bodies longer than `max_body_size`.
    ///
    /// The body limit covers both a declared Content-Length and the running
    /// total of a chunked body, so no more than `max_body_size` body bytes
    /// are ever waited for.
    pub fn new(max_head_size: usize, max_body_size: usize) -> Self {
        Self {
            phase: DecodePhase::Head,
            max_head_size,
            max_body_size,
        }
    }

    /// Decode the next message from `buf`, consuming the bytes it spans.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when more input is needed, otherwise the next message.
    /// After an error the decoder state is unspecified and the connection
    /// should be dropped.
    pub fn decode(&mut self, buf: &mut Vec<u8>) -> Result<Option<InboundMessage>, Error> {
        loop {
            match std::mem::replace(&mut self.phase, DecodePhase::Head) {
                DecodePhase::Head => {
                    let Some(end) = find(buf, b"\r\n\r\n") else {
                        if buf.len() > self.max_head_size {
                            return Err(Error::HeadTooLarge(self.max_head_size));
                        }
                        return Ok(None);
                    };
                    let head_len = end + 4;
                    if head_len > self.max_head_size {
                        return Err(Error::HeadTooLarge(self.max_head_size));
                    }

                    let request = parse_request(&buf[..head_len])?;
                    buf.drain(..head_len);

                    if request.is_chunked() {
                        self.phase = DecodePhase::ChunkSize { received: 0 };
                        return Ok(Some(InboundMessage::Request(request)));
                    }
                    match request.content_length()? {
                        Some(length) if length > self.max_body_size => {
                            return Err(Error::BodyTooLarge(self.max_body_size));
                        }
                        Some(length) if length > 0 => {
                            self.phase = DecodePhase::FixedBody { request, length };
                        }
                        _ => return Ok(Some(InboundMessage::Request(request))),
                    }
                }
                DecodePhase::FixedBody { mut request, length } => {
                    if buf.len() < length {
                        self.phase = DecodePhase::FixedBody { request, length };
                        return Ok(None);
                    }
                    request.body = buf.drain(..length).collect();
                    return Ok(Some(InboundMessage::Request(request)));
                }
                DecodePhase::ChunkSize { received } => {
                    let Some(end) = self.find_line(buf, DecodePhase::ChunkSize { received })? else {
                        return Ok(None);
                    };
                    let line = std::str::from_utf8(&buf[..end])
                        .map_err(|_| Error::InvalidChunk("chunk size line is not UTF-8".to_string()))?;
                    // Chunk extensions after ';' are ignored
                    let size_str = line.split_once(';').map_or(line, |(size, _)| size).trim();
                    let size = usize::from_str_radix(size_str, 16)
                        .map_err(|_| Error::InvalidChunk(format!("bad chunk size {size_str:?}")))?;
                    let total = received.checked_add(size);
                    if total.map_or(true, |total| total > self.max_body_size) {
                        return Err(Error::BodyTooLarge(self.max_body_size));
                    }
                    buf.drain(..end + 2);

                    self.phase = if size == 0 {
                        DecodePhase::Trailer
                    } else {
                        DecodePhase::ChunkData { size, received }
                    };
                }
                DecodePhase::ChunkData { size, received } => {
                    if buf.len() < size.saturating_add(2) {
                        self.phase = DecodePhase::ChunkData { size, received };
                        return Ok(None);
                    }
                    if &buf[size..size + 2] != b"\r\n" {
                        return Err(Error::InvalidChunk("missing CRLF after chunk data".to_string()));
                    }
                    let data: Vec<u8> = buf.drain(..size).collect();
                    buf.drain(..2);

                    self.phase = DecodePhase::ChunkSize { received: received + size };
                    return Ok(Some(InboundMessage::Chunk(HttpChunk::new(data))));
                }
                DecodePhase::Trailer => {
                    let Some(end) = self.find_line(buf, DecodePhase::Trailer)? else {
                        return Ok(None);
                    };
                    buf.drain(..end + 2);

                    if end == 0 {
                        // Phase is already back at Head
                        return Ok(Some(InboundMessage::Chunk(HttpChunk::last())));
                    }
                    self.phase = DecodePhase::Trailer;
                }
            }
        }
    }

    /// Locate the CRLF ending the current line, restoring `phase` if it is not there yet.
    fn find_line(&mut self, buf: &[u8], phase: DecodePhase) -> Result<Option<usize>, Error> {
        match find(buf, b"\r\n") {
            Some(end) => Ok(Some(end)),
            None if buf.len() > self.max_head_size => {
                Err(Error::InvalidChunk(format!("line exceeds {} bytes", self.max_head_size)))
            }
            None => {
                self.phase = phase;
                Ok(None)
            }
        }
    }
}
