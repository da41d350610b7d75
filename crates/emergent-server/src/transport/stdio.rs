//! The stdio transport (§4.H): one JSON-RPC message per line on standard
//! input, one per line back on standard output. Standard error is reserved
//! for structured logs (`emergent_config::init_logging` configures the
//! `tracing` subscriber to write there, never here).
//!
//! Single tenant: the configured token is bound into one
//! [`RequestContext`] for the whole process lifetime, matching "the token
//! is constant for the process lifetime" (§4.H).

use crate::dispatcher::{parse_request, Dispatcher};
use emergent_client::RequestContext;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Initial per-read I/O chunk size. Separate from the per-message buffer,
/// which grows up to [`MAX_MESSAGE_BYTES`] as a line is assembled.
const INITIAL_BUFFER_BYTES: usize = 1024 * 1024;
/// Hard cap on one JSON-RPC message's line length.
const MAX_MESSAGE_BYTES: usize = 10 * 1024 * 1024;

/// Runs the stdio read/dispatch/write loop until EOF or cancellation.
pub async fn run(
    dispatcher: Dispatcher,
    token: String,
    cancellation: CancellationToken,
) -> std::io::Result<()> {
    let mut reader = BufReader::with_capacity(INITIAL_BUFFER_BYTES, tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let ctx = RequestContext::new(token, &cancellation);

    let mut line = Vec::with_capacity(4096);
    loop {
        line.clear();
        let read = tokio::select! {
            result = read_line_capped(&mut reader, &mut line) => result?,
            _ = cancellation.cancelled() => {
                info!("stdio transport cancelled");
                return Ok(());
            }
        };

        if read == 0 {
            info!("stdio transport reached EOF");
            return Ok(());
        }

        let Ok(text) = std::str::from_utf8(&line) else {
            warn!("skipping non-UTF-8 line on stdio");
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let response = match parse_request(text) {
            Ok(request) => dispatcher.dispatch(request, &ctx).await,
            Err(response) => response,
        };

        if response.is_silent() {
            continue;
        }

        let mut out = serde_json::to_vec(&response).unwrap_or_default();
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }
}

/// Reads one `\n`-delimited line into `buf`, growing it up to
/// [`MAX_MESSAGE_BYTES`]. Returns the number of bytes read, `0` at a clean
/// EOF with no partial data buffered.
async fn read_line_capped<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<usize>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut total = 0usize;
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(total);
        }

        if let Some(pos) = available.iter().position(|&b| b == b'\n') {
            buf.extend_from_slice(&available[..=pos]);
            total += pos + 1;
            reader.consume(pos + 1);
            return Ok(total);
        }

        let consumed = available.len();
        buf.extend_from_slice(available);
        total += consumed;
        reader.consume(consumed);

        if buf.len() > MAX_MESSAGE_BYTES {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("JSON-RPC message exceeded {MAX_MESSAGE_BYTES} byte cap"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn reads_one_line_at_a_time() {
        let data = b"{\"a\":1}\n{\"b\":2}\n".to_vec();
        let mut reader = BufReader::new(Cursor::new(data));

        let mut buf = Vec::new();
        let n = read_line_capped(&mut reader, &mut buf).await.unwrap();
        assert_eq!(n, 8);
        assert_eq!(&buf, b"{\"a\":1}\n");

        buf.clear();
        let n = read_line_capped(&mut reader, &mut buf).await.unwrap();
        assert_eq!(n, 8);
        assert_eq!(&buf, b"{\"b\":2}\n");

        buf.clear();
        let n = read_line_capped(&mut reader, &mut buf).await.unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn oversized_line_is_rejected() {
        let mut data = vec![b'a'; MAX_MESSAGE_BYTES + 1];
        data.push(b'\n');
        let mut reader = BufReader::new(Cursor::new(data));

        let mut buf = Vec::new();
        let result = read_line_capped(&mut reader, &mut buf).await;
        assert!(result.is_err());
    }
}
