use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;

use crate::config::Config;
use crate::error::ServeError;
use crate::fs::resolver;

/// Read-only settings shared by every connection of both servers, plus the
/// shutdown signal.
#[derive(Debug)]
pub struct ServeContext {
    root: PathBuf,
    pub strict_symlinks: bool,
    pub banner_file: Option<PathBuf>,
    pub public_host: Option<String>,
    pub exit_path: Option<String>,
    pub read_timeout: Option<Duration>,
    shutdown: watch::Sender<bool>,
}

impl ServeContext {
    /// Context serving `root` with default settings. `root` should be
    /// absolute and canonical.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root.into(), &Config::default())
    }

    /// Builds the context from configuration, canonicalizing the root.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let root = std::fs::canonicalize(&cfg.root)
            .with_context(|| format!("root directory {} is not accessible", cfg.root.display()))?;

        if !root.is_dir() {
            anyhow::bail!("root {} is not a directory", root.display());
        }

        Ok(Self::with_config(root, cfg))
    }

    fn with_config(root: PathBuf, cfg: &Config) -> Self {
        let (shutdown, _) = watch::channel(false);

        Self {
            root,
            strict_symlinks: cfg.strict_symlinks,
            banner_file: cfg.banner_file.clone(),
            public_host: cfg.public_host.clone(),
            exit_path: cfg.exit_path().map(str::to_owned),
            read_timeout: cfg.read_timeout(),
            shutdown,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a request path inside the root, re-validating through
    /// symlinks when `strict_symlinks` is set.
    pub async fn locate(&self, raw: &str) -> Result<PathBuf, ServeError> {
        let path = resolver::resolve(&self.root, raw)?;

        if self.strict_symlinks {
            return resolver::revalidate(&self.root, &path).await;
        }

        Ok(path)
    }

    /// True when `path` is the configured shutdown path.
    pub fn is_exit_path(&self, path: &str) -> bool {
        self.exit_path.as_deref() == Some(path)
    }

    /// Tells every listener to stop accepting connections.
    pub fn request_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Resolves once shutdown has been requested.
    pub async fn shutdown_requested(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close first.
        let _ = rx.wait_for(|stop| *stop).await;
    }
}
