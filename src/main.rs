use std::path::PathBuf;
use std::sync::Arc;

use treeserve::config::Config;
use treeserve::server::{self, ServeContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let mut cfg = Config::load()?;

    // `treeserve [ROOT]`
    if let Some(root) = std::env::args_os().nth(1) {
        cfg.root = PathBuf::from(root);
    }

    tracing::info!("{}", treeserve::VERSION);

    let ctx = Arc::new(ServeContext::from_config(&cfg)?);

    tokio::select! {
        res = server::listener::run(&cfg, ctx.clone()) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            ctx.request_shutdown();
        }
    }

    Ok(())
}
