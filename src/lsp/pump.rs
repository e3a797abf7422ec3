//! One-direction stream pump: read, reframe, rewrite, write.
//!
//! Each read is appended to the direction's [`FrameBuffer`] and every complete
//! frame is dispatched before the next read. Writes are awaited one frame at a
//! time, so a slow destination stops reads on the source.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::lsp::framed::{encode, FrameBuffer, Next};
use crate::lsp::transport::{Direction, Rewrite};

const READ_CHUNK: usize = 16 * 1024;

/// Counters reported when a pump finishes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PumpStats {
    pub bytes_in: u64,
    pub frames_in: u64,
    pub frames_out: u64,
    pub faults: u64,
}

pub struct Pump<T> {
    direction: Direction,
    rewrite: T,
    buffer: FrameBuffer,
    stats: PumpStats,
}

impl<T: Rewrite> Pump<T> {
    pub fn new(direction: Direction, rewrite: T) -> Self {
        Pump {
            direction,
            rewrite,
            buffer: FrameBuffer::new(),
            stats: PumpStats::default(),
        }
    }

    /// Pump until `reader` hits EOF, then shut `writer` down.
    ///
    /// Bytes still buffered at EOF (an incomplete frame) are forwarded verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the source or writing the destination fails.
    pub async fn run<R, W>(mut self, mut reader: R, mut writer: W) -> Result<PumpStats>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut chunk = vec![0u8; READ_CHUNK];

        loop {
            let n = reader.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            self.stats.bytes_in += n as u64;
            self.buffer.extend(&chunk[..n]);
            self.drain(&mut writer).await?;
            writer.flush().await?;
        }

        if !self.buffer.is_empty() {
            warn!(
                direction = %self.direction,
                pending = self.buffer.len(),
                "Stream ended inside a frame, forwarding remainder raw"
            );
            let rest = self.buffer.take_remaining();
            writer.write_all(&rest).await?;
        }

        writer.flush().await?;
        writer.shutdown().await?;
        debug!(direction = %self.direction, stats = ?self.stats, "Stream closed");
        Ok(self.stats)
    }

    async fn drain<W>(&mut self, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        loop {
            match self.buffer.next_frame() {
                Next::NeedMore => return Ok(()),
                Next::Fault(raw) => {
                    self.stats.faults += 1;
                    warn!(
                        direction = %self.direction,
                        flushed = raw.len(),
                        "No usable Content-Length header, flushing buffer raw"
                    );
                    writer.write_all(&raw).await?;
                    return Ok(());
                }
                Next::Frame(frame) => {
                    self.stats.frames_in += 1;
                    trace!(direction = %self.direction, body_len = frame.body.len(), "Frame received");
                    for body in self.rewrite.rewrite(frame.body) {
                        writer.write_all(&encode(&body)).await?;
                        self.stats.frames_out += 1;
                    }
                }
            }
        }
    }
}
