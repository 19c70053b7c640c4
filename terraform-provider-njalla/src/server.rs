//! Line-delimited JSON transport
//!
//! The provider writes [`HANDSHAKE`] first, then answers each request line
//! with exactly one response line. Requests are handled in order. The loop
//! ends on EOF or after answering a `stop` request.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::protocol::{self, Request, Response};
use crate::provider::NjallaProvider;

/// First line written to stdout: magic, protocol version, transport.
pub const HANDSHAKE: &str = "NJALLA_PROVIDER|1|stdio";

pub async fn serve<R, W>(provider: &NjallaProvider, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(HANDSHAKE.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (id, request) = protocol::parse_request(line);
        let (response, stop) = match request {
            Ok(Request::Stop) => (Response::success(id, serde_json::json!({})), true),
            Ok(request) => (protocol::dispatch(provider, id, request).await, false),
            Err(e) => {
                log::warn!("[njalla] rejected request line: {e}");
                (Response::failure(id, e), false)
            }
        };

        write_response(&mut writer, &response).await?;
        if stop {
            log::info!("[njalla] stop requested, shutting down");
            break;
        }
    }

    Ok(())
}

async fn write_response<W>(writer: &mut W, response: &Response) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(response).map_err(std::io::Error::other)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await
}
