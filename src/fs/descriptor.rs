//! Per-directory file descriptions.
//!
//! A directory may carry a plain-text index mapping file names to short
//! descriptions, one per line:
//!
//! ```text
//! readme.txt   Project overview
//! GAME.ROM     Arcade port, needs 128K
//! ```
//!
//! Two conventional names are probed in order, `00index.txt` then
//! `descript.ion`. Only the first one found is used.

use std::collections::HashMap;
use std::path::Path;

use tokio::fs;
use tracing::{debug, warn};

/// Descriptor file names, highest priority first.
pub const DESCRIPTOR_FILES: [&str; 2] = ["00index.txt", "descript.ion"];

/// File name to description mapping for one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorTable {
    entries: HashMap<String, String>,
}

impl DescriptorTable {
    /// Loads the descriptor file of `dir`.
    ///
    /// Missing or unreadable descriptor files yield an empty table; a read
    /// failure is logged but never returned.
    pub async fn load(dir: &Path) -> Self {
        for name in DESCRIPTOR_FILES {
            let path = dir.join(name);

            match fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => {}
                _ => continue,
            }

            return match fs::read(&path).await {
                Ok(bytes) => {
                    let table = Self::parse(&String::from_utf8_lossy(&bytes));
                    debug!(file = %path.display(), entries = table.len(), "Loaded descriptions");
                    table
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Unable to read descriptor file");
                    Self::default()
                }
            };
        }

        Self::default()
    }

    /// Parses descriptor text. Lines without a description are skipped and
    /// a later line for the same name replaces an earlier one.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();

        for line in text.lines() {
            let mut tokens = line.split_whitespace();

            let Some(name) = tokens.next() else {
                continue;
            };

            let description = tokens.collect::<Vec<_>>().join(" ");
            if description.is_empty() {
                continue;
            }

            entries.insert(name.to_string(), description);
        }

        Self { entries }
    }

    /// Looks up `name` as given, then lowercased, then uppercased.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries
            .get(name)
            .or_else(|| self.entries.get(&name.to_lowercase()))
            .or_else(|| self.entries.get(&name.to_uppercase()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
