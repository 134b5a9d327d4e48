use std::io::SeekFrom;

use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Status line, headers and the blank separator line.
fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers, sorted so the output is stable
    let mut headers: Vec<_> = resp.headers.iter().collect();
    headers.sort();

    for (k, v) in headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response: the serialized head, then the body. File bodies
/// are streamed and never loaded whole.
pub struct ResponseWriter {
    head: Vec<u8>,
    body: Body,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        Self {
            head: serialize_head(&response),
            body: response.body,
        }
    }

    /// The serialized status line and headers.
    pub fn head(&self) -> &[u8] {
        &self.head
    }

    /// Sends the response and returns the number of body bytes written.
    ///
    /// The file handle of a file body is released when the writer is
    /// dropped, whether or not the transfer completed.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(&self.head).await?;

        let sent = match &mut self.body {
            Body::Bytes(bytes) => {
                stream.write_all(bytes).await?;
                bytes.len() as u64
            }
            Body::File { file, start, len } => {
                file.seek(SeekFrom::Start(*start)).await?;
                let mut window = file.take(*len);
                let copied = tokio::io::copy(&mut window, stream).await?;

                if copied < *len {
                    // Content-Length is already on the wire.
                    anyhow::bail!("file shrank during transfer: sent {} of {} bytes", copied, len);
                }
                copied
            }
        };

        stream.flush().await?;
        Ok(sent)
    }
}
