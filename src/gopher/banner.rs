use std::path::Path;

use tracing::warn;

use crate::VERSION;

const DEFAULT_BANNER: &[&str] = &[
    r" _",
    r"| |_ _ __ ___  ___  ___  ___ _ ____   _____",
    r"| __| '__/ _ \/ _ \/ __|/ _ \ '__\ \ / / _ \",
    r"| |_| | |  __/  __/\__ \  __/ |   \ V /  __/",
    r" \__|_|  \___|\___||___/\___|_|    \_/ \___|",
];

/// Header lines for a menu: the banner file (or the built-in banner) and
/// the version line.
///
/// The file is read on every call so edits show up without a restart. A
/// missing or unreadable file falls back to the built-in banner.
pub async fn load_banner(path: Option<&Path>) -> Vec<String> {
    let mut lines = match path {
        Some(path) => match tokio::fs::read(path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes)
                .lines()
                .map(|line| line.replace('\t', "    "))
                .collect(),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Unable to read banner file");
                default_banner()
            }
        },
        None => default_banner(),
    };

    lines.push(VERSION.to_string());
    lines
}

fn default_banner() -> Vec<String> {
    DEFAULT_BANNER.iter().map(|line| line.to_string()).collect()
}
