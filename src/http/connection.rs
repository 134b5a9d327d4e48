use std::sync::Arc;
use std::time::Instant;

use bytes::{Buf, BytesMut};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::http::handler::handle_request;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::server::ServeContext;

/// Largest request head plus body accepted before answering 400.
const MAX_REQUEST_BYTES: usize = 64 * 1024;

pub struct Connection {
    stream: TcpStream,
    buffer: BytesMut,
    state: ConnectionState,
    ctx: Arc<ServeContext>,
    exit_requested: bool,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

/// What came off the socket while waiting for a request.
enum ReadOutcome {
    Request(Request),
    /// The request was unusable; send this and close.
    Rejected(Response),
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, ctx: Arc<ServeContext>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Reading,
            ctx,
            exit_requested: false,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => match self.read_request().await? {
                    ReadOutcome::Request(req) => ConnectionState::Processing(req),
                    ReadOutcome::Rejected(response) => {
                        ConnectionState::Writing(ResponseWriter::new(response), false)
                    }
                    ReadOutcome::Closed => ConnectionState::Closed,
                },

                ConnectionState::Processing(req) => {
                    let (response, keep_alive) = self.process(&req).await;
                    ConnectionState::Writing(ResponseWriter::new(response), keep_alive)
                }

                ConnectionState::Writing(mut writer, keep_alive) => {
                    let started = Instant::now();
                    let sent = writer.write_to_stream(&mut self.stream).await?;
                    log_transfer(sent, started);

                    if self.exit_requested {
                        info!("Exit path requested, shutting down");
                        self.ctx.request_shutdown();
                        ConnectionState::Closed
                    } else if keep_alive {
                        ConnectionState::Reading // go back for next request
                    } else {
                        ConnectionState::Closed
                    }
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    async fn process(&mut self, req: &Request) -> (Response, bool) {
        if self.ctx.is_exit_path(&req.target_path()) {
            self.exit_requested = true;
            return (Response::gone(), false);
        }

        let response = handle_request(&self.ctx, req).await;
        (response, req.keep_alive())
    }

    async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(ReadOutcome::Request(request));
                }

                Err(ParseError::Incomplete) => {
                    if self.buffer.len() > MAX_REQUEST_BYTES {
                        warn!(bytes = self.buffer.len(), "Request too large");
                        return Ok(ReadOutcome::Rejected(Response::bad_request()));
                    }
                }

                Err(ParseError::InvalidMethod) => {
                    warn!("Unsupported request method");
                    return Ok(ReadOutcome::Rejected(Response::method_not_allowed()));
                }

                Err(e) => {
                    warn!(error = ?e, "Malformed request");
                    return Ok(ReadOutcome::Rejected(Response::bad_request()));
                }
            }

            let read = self.stream.read_buf(&mut self.buffer);

            let n = match self.ctx.read_timeout {
                Some(limit) => match timeout(limit, read).await {
                    Ok(n) => n?,
                    Err(_) => {
                        debug!("Idle timeout, closing");
                        return Ok(ReadOutcome::Closed);
                    }
                },
                None => read.await?,
            };

            if n == 0 {
                // Client closed connection
                return Ok(ReadOutcome::Closed);
            }
        }
    }
}

fn log_transfer(sent: u64, started: Instant) {
    let elapsed = started.elapsed();
    let secs = elapsed.as_secs_f64();

    if secs > 0.0 {
        info!(
            bytes = sent,
            elapsed_ms = elapsed.as_millis() as u64,
            "End: {:.2} KiB/s",
            sent as f64 / 1024.0 / secs
        );
    } else {
        info!(bytes = sent, "End");
    }
}

