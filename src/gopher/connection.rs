use std::sync::Arc;
use std::time::Instant;

use bytes::BytesMut;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::ServeError;
use crate::fs::{Entry, list_directory, relative_selector};
use crate::gopher::banner::load_banner;
use crate::gopher::menu::{Endpoint, folder_heading, render_error, render_menu};
use crate::server::ServeContext;

/// Longest selector line accepted from a client.
const MAX_SELECTOR_BYTES: usize = 4096;

/// A rendered Gopher response.
#[derive(Debug)]
pub enum GopherReply {
    Menu(Vec<u8>),
    Error(Vec<u8>),
    /// Raw file content, ended by closing the connection.
    File { file: File, size: u64 },
}

impl GopherReply {
    /// Writes the reply and returns the number of bytes sent.
    pub async fn write_to<W>(self, stream: &mut W) -> anyhow::Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let sent = match self {
            GopherReply::Menu(bytes) | GopherReply::Error(bytes) => {
                stream.write_all(&bytes).await?;
                bytes.len() as u64
            }
            GopherReply::File { mut file, size } => {
                let copied = tokio::io::copy(&mut file, stream).await?;
                if copied != size {
                    debug!(expected = size, copied, "File changed size during transfer");
                }
                copied
            }
        };

        stream.flush().await?;
        Ok(sent)
    }
}

/// Strips the line terminator, surrounding whitespace and any tab-separated
/// search terms from a request line.
pub fn parse_selector(line: &str) -> &str {
    line.split('\t').next().unwrap_or_default().trim()
}

/// Builds the reply for one selector. Failures become error records.
pub async fn respond(ctx: &ServeContext, selector: &str, endpoint: &Endpoint) -> GopherReply {
    match try_respond(ctx, selector, endpoint).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(selector, error = %e, "Request failed");
            GopherReply::Error(render_error(e.gopher_message()))
        }
    }
}

async fn try_respond(
    ctx: &ServeContext,
    selector: &str,
    endpoint: &Endpoint,
) -> Result<GopherReply, ServeError> {
    let path = ctx.locate(selector).await?;
    let meta = fs::metadata(&path).await.map_err(ServeError::NotFound)?;

    if !meta.is_dir() {
        let file = File::open(&path).await.map_err(ServeError::FileRead)?;
        info!(selector, size = meta.len(), "Start transfer");
        return Ok(GopherReply::File {
            file,
            size: meta.len(),
        });
    }

    let entries = list_directory(&path).await?;
    let header = load_banner(ctx.banner_file.as_deref()).await;

    let items: Vec<(Entry, String)> = entries
        .into_iter()
        .map(|entry| {
            let selector = relative_selector(ctx.root(), &path.join(&entry.name));
            (entry, selector)
        })
        .collect();

    let folder = folder_heading(&relative_selector(ctx.root(), &path));
    debug!(folder = %folder, entries = items.len(), "Sending menu");

    Ok(GopherReply::Menu(render_menu(&header, &folder, &items, endpoint)))
}

/// One Gopher client: read a selector, send one reply, close.
pub struct GopherConnection {
    stream: TcpStream,
    ctx: Arc<ServeContext>,
}

impl GopherConnection {
    pub fn new(stream: TcpStream, ctx: Arc<ServeContext>) -> Self {
        Self { stream, ctx }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let Some(line) = self.read_selector().await? else {
            debug!("Client sent no selector");
            return Ok(());
        };

        let selector = parse_selector(&line);
        info!(selector, "Request");

        let endpoint = self.endpoint()?;
        let reply = respond(&self.ctx, selector, &endpoint).await;

        let started = Instant::now();
        let sent = reply.write_to(&mut self.stream).await?;
        self.stream.shutdown().await?;

        info!(bytes = sent, elapsed_ms = started.elapsed().as_millis() as u64, "End");
        Ok(())
    }

    /// Host and port advertised in menu selectors.
    fn endpoint(&self) -> anyhow::Result<Endpoint> {
        let local = self.stream.local_addr()?;
        let host = match &self.ctx.public_host {
            Some(host) => host.clone(),
            None => local.ip().to_string(),
        };

        Ok(Endpoint {
            host,
            port: local.port(),
        })
    }

    /// Reads up to the first newline, or to end of stream. `None` when the
    /// client sent nothing or went idle.
    async fn read_selector(&mut self) -> anyhow::Result<Option<String>> {
        let mut buf = BytesMut::with_capacity(256);

        loop {
            if let Some(end) = buf.iter().position(|b| *b == b'\n') {
                buf.truncate(end);
                break;
            }

            if buf.len() > MAX_SELECTOR_BYTES {
                anyhow::bail!("selector longer than {} bytes", MAX_SELECTOR_BYTES);
            }

            let read = self.stream.read_buf(&mut buf);

            let n = match self.ctx.read_timeout {
                Some(limit) => match timeout(limit, read).await {
                    Ok(n) => n?,
                    Err(_) => {
                        debug!("Idle timeout, closing");
                        return Ok(None);
                    }
                },
                None => read.await?,
            };

            if n == 0 {
                if buf.is_empty() {
                    return Ok(None);
                }
                break;
            }
        }

        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
