//! Newline-delimited JSON-RPC over stdin/stdout.

use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::protocol::ProtocolHandler;
use crate::server::GroupServer;
use crate::types::{JsonRpcMessage, McpError, McpResult, RequestId};

/// Maximum bytes per JSON-RPC message (1 MiB).
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// Outbound notifications buffered per session.
const NOTIFICATION_BUFFER: usize = 32;

/// Serves one MCP session over a line-oriented byte stream.
pub struct StdioTransport {
    server: Arc<GroupServer>,
}

impl StdioTransport {
    pub fn new(server: Arc<GroupServer>) -> Self {
        Self { server }
    }

    /// Serve the process's stdin/stdout until stdin closes.
    pub async fn run(&self) -> McpResult<()> {
        tracing::info!("Serving MCP over stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve one session over arbitrary streams until the reader hits EOF.
    ///
    /// Responses and list_changed notifications are interleaved on `writer`.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::channel(NOTIFICATION_BUFFER);
        let handler = ProtocolHandler::with_notifications(Arc::clone(&self.server), tx);
        let mut lines = LineReader::new(reader, MAX_MESSAGE_BYTES);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        tracing::info!("EOF received, shutting down");
                        break;
                    };
                    if let Some(response) = process_line(&handler, line).await {
                        write_line(&mut writer, &response).await?;
                    }
                }
                Some(notification) = rx.recv() => {
                    write_line(&mut writer, &notification).await?;
                }
            }
        }

        Ok(())
    }
}

/// One line read from the peer.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    /// Line contents without the trailing newline.
    Bytes(Vec<u8>),
    /// Line exceeded the limit; its contents were discarded while reading.
    TooLarge(usize),
}

/// Newline-delimited reader that never buffers more than `limit` bytes of a line.
///
/// Partial state lives in the reader, so `next_line` is cancel safe and can
/// be polled from `select!`.
struct LineReader<R> {
    inner: R,
    limit: usize,
    buf: Vec<u8>,
    seen: usize,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    fn new(inner: R, limit: usize) -> Self {
        Self {
            inner,
            limit,
            buf: Vec::new(),
            seen: 0,
        }
    }

    /// The next line, or `None` at EOF.
    async fn next_line(&mut self) -> std::io::Result<Option<Line>> {
        loop {
            let available = self.inner.fill_buf().await?;
            if available.is_empty() {
                if self.seen == 0 {
                    return Ok(None);
                }
                return Ok(Some(self.finish()));
            }

            let newline = available.iter().position(|b| *b == b'\n');
            let content = newline.unwrap_or(available.len());
            self.seen += content;
            if self.seen <= self.limit {
                self.buf.extend_from_slice(&available[..content]);
            } else if !self.buf.is_empty() {
                self.buf = Vec::new();
            }

            let consumed = newline.map_or(content, |i| i + 1);
            self.inner.consume(consumed);
            if newline.is_some() {
                return Ok(Some(self.finish()));
            }
        }
    }

    fn finish(&mut self) -> Line {
        let seen = std::mem::take(&mut self.seen);
        let bytes = std::mem::take(&mut self.buf);
        if seen > self.limit {
            Line::TooLarge(seen)
        } else {
            Line::Bytes(bytes)
        }
    }
}

async fn process_line(handler: &ProtocolHandler, line: Line) -> Option<serde_json::Value> {
    let bytes = match line {
        Line::Bytes(bytes) => bytes,
        Line::TooLarge(size) => {
            tracing::warn!("Message too large: {size} bytes (limit {MAX_MESSAGE_BYTES})");
            return parse_error("message too large".to_string());
        }
    };

    let text = match std::str::from_utf8(&bytes) {
        Ok(text) => text.trim(),
        Err(e) => {
            tracing::warn!("Message is not valid UTF-8: {e}");
            return parse_error(e.to_string());
        }
    };
    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<JsonRpcMessage>(text) {
        Ok(message) => handler.handle_message(message).await,
        Err(e) => {
            tracing::warn!("Failed to parse message: {e}");
            parse_error(e.to_string())
        }
    }
}

fn parse_error(detail: String) -> Option<serde_json::Value> {
    let error = McpError::ParseError(detail).to_json_rpc_error(RequestId::Null);
    serde_json::to_value(error).ok()
}

async fn write_line<W, T>(writer: &mut W, message: &T) -> McpResult<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let text = serde_json::to_string(message)?;
    tracing::trace!("Sending: {text}");
    writer.write_all(text.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
