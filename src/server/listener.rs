use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{Instrument, error, info, info_span};

use crate::config::Config;
use crate::gopher::connection::GopherConnection;
use crate::http::connection::Connection;
use crate::server::ServeContext;

/// Binds both listeners from `cfg` and serves until shutdown is requested.
pub async fn run(cfg: &Config, ctx: Arc<ServeContext>) -> anyhow::Result<()> {
    let gopher = TcpListener::bind(&cfg.gopher_listen).await?;
    let http = TcpListener::bind(&cfg.http_listen).await?;

    info!(root = %ctx.root().display(), "Serving directory");

    serve(gopher, http, ctx).await
}

/// Serves both protocols on already bound listeners.
pub async fn serve(
    gopher: TcpListener,
    http: TcpListener,
    ctx: Arc<ServeContext>,
) -> anyhow::Result<()> {
    tokio::try_join!(run_gopher(gopher, ctx.clone()), run_http(http, ctx))?;
    info!("All listeners stopped");
    Ok(())
}

pub async fn run_gopher(listener: TcpListener, ctx: Arc<ServeContext>) -> anyhow::Result<()> {
    let local = listener.local_addr()?;
    info!("Gopher listening on {}", local);

    loop {
        let (socket, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "Gopher accept failed");
                    continue;
                }
            },
            _ = ctx.shutdown_requested() => break,
        };

        info!("Accepted gopher connection from {}", peer);

        let ctx = ctx.clone();
        tokio::spawn(
            async move {
                let conn = GopherConnection::new(socket, ctx);
                if let Err(e) = conn.run().await {
                    error!("Connection error: {:#}", e);
                }
            }
            .instrument(info_span!("gopher", %peer)),
        );
    }

    info!("Gopher listener stopped");
    Ok(())
}

pub async fn run_http(listener: TcpListener, ctx: Arc<ServeContext>) -> anyhow::Result<()> {
    let local = listener.local_addr()?;
    info!("HTTP listening on http://{}/", local);

    loop {
        let (socket, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "HTTP accept failed");
                    continue;
                }
            },
            _ = ctx.shutdown_requested() => break,
        };

        info!("Accepted http connection from {}", peer);

        let ctx = ctx.clone();
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, ctx);
                if let Err(e) = conn.run().await {
                    error!("Connection error: {:#}", e);
                }
            }
            .instrument(info_span!("http", %peer)),
        );
    }

    info!("HTTP listener stopped");
    Ok(())
}
