//! Content-Length framing for LSP byte streams.
//!
//! A frame on the wire is an ASCII header block terminated by a blank line,
//! followed by exactly `Content-Length` bytes of body:
//!
//! ```text
//! Content-Length: <n>\r\n
//! \r\n
//! <n bytes>
//! ```
//!
//! Decoding is incremental: callers keep appending reads to a [`FrameBuffer`]
//! and pull complete frames out of it, regardless of where chunk boundaries fall.

use bytes::{Bytes, BytesMut};

/// Separator between the header block and the body.
pub const HEADER_DELIMITER: &[u8] = b"\r\n\r\n";

const CONTENT_LENGTH: &str = "Content-Length";

/// One decoded frame. `body.len()` always equals the header's `Content-Length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Header block, without the trailing delimiter.
    pub header: Bytes,
    /// Body bytes, exactly as received.
    pub body: Bytes,
}

/// Outcome of decoding the front of a buffer.
#[derive(Debug, PartialEq, Eq)]
pub enum Decoded {
    /// No complete frame yet. Nothing was consumed.
    NeedMore,
    /// A complete frame, and how many bytes of input it used.
    Frame { frame: Frame, consumed: usize },
    /// The header block is complete but carries no usable `Content-Length`.
    Fault,
}

/// Where the first frame of a buffer ends, without copying anything.
enum Located {
    /// `resume` is the earliest offset the next delimiter search must start at.
    NeedMore { resume: usize },
    Complete { header_end: usize, total: usize },
    Fault,
}

/// Locate the first frame, searching for the delimiter from `scan_from` on.
/// No delimiter may start before `scan_from`.
fn locate(buf: &[u8], scan_from: usize) -> Located {
    let Some(header_end) = find_delimiter(buf, scan_from) else {
        return Located::NeedMore {
            resume: buf.len().saturating_sub(HEADER_DELIMITER.len() - 1),
        };
    };
    let Some(length) = content_length(&buf[..header_end]) else {
        return Located::Fault;
    };
    let Some(total) = (header_end + HEADER_DELIMITER.len()).checked_add(length) else {
        return Located::Fault;
    };
    if buf.len() < total {
        return Located::NeedMore { resume: header_end };
    }
    Located::Complete { header_end, total }
}

fn find_delimiter(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .windows(HEADER_DELIMITER.len())
        .position(|window| window == HEADER_DELIMITER)
        .map(|offset| from + offset)
}

/// Extract Content-Length from a header block. The field name must be exactly
/// `Content-Length` (any case, no whitespace before the colon); the value is
/// trimmed and its leading decimal digits are used.
pub(crate) fn content_length(header: &[u8]) -> Option<usize> {
    let header = String::from_utf8_lossy(header);
    header.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if !name.eq_ignore_ascii_case(CONTENT_LENGTH) {
            return None;
        }
        let value = value.trim();
        let digits = value.bytes().take_while(u8::is_ascii_digit).count();
        value[..digits].parse::<usize>().ok()
    })
}

/// Decode the first frame of `buf` without consuming it.
pub fn decode(buf: &[u8]) -> Decoded {
    match locate(buf, 0) {
        Located::NeedMore { .. } => Decoded::NeedMore,
        Located::Fault => Decoded::Fault,
        Located::Complete { header_end, total } => Decoded::Frame {
            frame: Frame {
                header: Bytes::copy_from_slice(&buf[..header_end]),
                body: Bytes::copy_from_slice(&buf[header_end + HEADER_DELIMITER.len()..total]),
            },
            consumed: total,
        },
    }
}

/// Frame a body: `Content-Length: <n>\r\n\r\n` followed by the body verbatim.
/// The length is the byte length, never a character count.
pub fn encode(body: &[u8]) -> Bytes {
    let header = format!("{CONTENT_LENGTH}: {}\r\n\r\n", body.len());
    let mut out = BytesMut::with_capacity(header.len() + body.len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(body);
    out.freeze()
}

/// Result of pulling from a [`FrameBuffer`].
#[derive(Debug, PartialEq, Eq)]
pub enum Next {
    Frame(Frame),
    NeedMore,
    /// Unparsable header: the whole buffer, drained. The buffer is empty afterwards.
    Fault(Bytes),
}

/// Growing byte buffer for one stream direction.
///
/// Invariant: always holds the unconsumed suffix of every byte received so far.
/// Consumed prefixes are split off without reallocating the remainder, and the
/// delimiter search resumes where the previous one stopped, so a header that
/// trickles in byte by byte is scanned once.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: BytesMut,
    scan_from: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(8 * 1024),
            scan_from: 0,
        }
    }

    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Extract the next complete frame, if any.
    pub fn next_frame(&mut self) -> Next {
        match locate(&self.buf, self.scan_from) {
            Located::NeedMore { resume } => {
                self.scan_from = resume;
                Next::NeedMore
            }
            Located::Fault => Next::Fault(self.take_remaining()),
            Located::Complete { header_end, total } => {
                self.scan_from = 0;
                let raw = self.buf.split_to(total).freeze();
                Next::Frame(Frame {
                    header: raw.slice(..header_end),
                    body: raw.slice(header_end + HEADER_DELIMITER.len()..),
                })
            }
        }
    }

    /// Drain whatever is buffered, complete or not.
    pub fn take_remaining(&mut self) -> Bytes {
        self.scan_from = 0;
        self.buf.split().freeze()
    }
}
