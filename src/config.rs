use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_ENV: &str = "TREESERVE_CONFIG";

/// Runtime configuration for both servers.
///
/// Every field has a default, so an empty YAML document (or no file at all)
/// yields a working configuration serving the current directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory tree to expose.
    pub root: PathBuf,
    /// Address the Gopher server binds to.
    pub gopher_listen: String,
    /// Address the HTTP server binds to.
    pub http_listen: String,
    /// Host name advertised in Gopher menu selectors. Defaults to the local
    /// address of the accepted connection.
    pub public_host: Option<String>,
    /// Text file whose lines are shown at the top of every Gopher menu.
    pub banner_file: Option<PathBuf>,
    /// HTTP path that shuts the process down. Empty disables it.
    pub exit_path: String,
    /// Canonicalize every target and re-check containment before opening it.
    pub strict_symlinks: bool,
    /// Seconds to wait for a client to send its request. `0` waits forever.
    pub read_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            gopher_listen: "0.0.0.0:7070".to_string(),
            http_listen: "0.0.0.0:3333".to_string(),
            public_host: None,
            banner_file: None,
            exit_path: "/exit".to_string(),
            strict_symlinks: false,
            read_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Loads the YAML file named by `TREESERVE_CONFIG` (if set), then applies
    /// the `TREESERVE_ROOT`, `GOPHER_LISTEN`, `HTTP_LISTEN` and `PUBLIC_HOST`
    /// environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path))?;
                Self::from_yaml(&text)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(root) = std::env::var("TREESERVE_ROOT") {
            cfg.root = PathBuf::from(root);
        }
        if let Ok(addr) = std::env::var("GOPHER_LISTEN") {
            cfg.gopher_listen = addr;
        }
        if let Ok(addr) = std::env::var("HTTP_LISTEN") {
            cfg.http_listen = addr;
        }
        if let Ok(host) = std::env::var("PUBLIC_HOST") {
            cfg.public_host = Some(host);
        }

        Ok(cfg)
    }

    /// Parses a configuration from YAML text.
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("invalid YAML configuration")
    }

    /// The shutdown path, or `None` when it is disabled.
    pub fn exit_path(&self) -> Option<&str> {
        Some(self.exit_path.as_str()).filter(|p| !p.is_empty())
    }

    /// The idle read limit, or `None` when `read_timeout_secs` is `0`.
    pub fn read_timeout(&self) -> Option<Duration> {
        Some(self.read_timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
