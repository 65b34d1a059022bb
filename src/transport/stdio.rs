//! Line-delimited JSON over a byte stream (stdin/stdout by default).

use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

use super::Transport;
use crate::codec::{self, DecodeError};
use crate::types::McpError;

/// Longest accepted line, excluding the newline.
pub const DEFAULT_MAX_FRAME: usize = 4 * 1024 * 1024;

/// One message per line in both directions. Blank lines are skipped.
///
/// A line longer than the frame limit is discarded up to its newline and
/// answered with a parse error; the loop keeps reading.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
    buf: Vec<u8>,
    max_frame: usize,
}

impl LineTransport<BufReader<Stdin>, Stdout> {
    /// Transport over the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            buf: Vec::new(),
            max_frame: DEFAULT_MAX_FRAME,
        }
    }

    pub fn with_max_frame(mut self, max_frame: usize) -> Self {
        self.max_frame = max_frame;
        self
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    // Drop input up to and including the next newline (or EOF).
    async fn skip_line(&mut self) -> Result<(), McpError> {
        loop {
            let (used, done) = {
                let available = self.reader.fill_buf().await?;
                if available.is_empty() {
                    return Ok(());
                }
                match available.iter().position(|b| *b == b'\n') {
                    Some(pos) => (pos + 1, true),
                    None => (available.len(), false),
                }
            };
            self.reader.consume(used);
            if done {
                return Ok(());
            }
        }
    }
}

#[async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn receive(&mut self) -> Result<Option<Vec<u8>>, McpError> {
        loop {
            self.buf.clear();
            // One byte of headroom for the newline.
            let limit = self.max_frame as u64 + 1;
            let n = (&mut self.reader)
                .take(limit)
                .read_until(b'\n', &mut self.buf)
                .await?;
            if n == 0 {
                tracing::info!("EOF on input, closing");
                return Ok(None);
            }

            if self.buf.len() > self.max_frame && self.buf.last() != Some(&b'\n') {
                self.skip_line().await?;
                let err = DecodeError::TooLarge {
                    limit: self.max_frame,
                };
                tracing::warn!(error = %err, "oversized line dropped");
                self.send(&codec::encode(&err.to_response())).await?;
                continue;
            }

            let line = self.buf.trim_ascii();
            if !line.is_empty() {
                return Ok(Some(line.to_vec()));
            }
        }
    }

    async fn send(&mut self, frame: &[u8]) -> Result<(), McpError> {
        self.writer.write_all(frame).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}
