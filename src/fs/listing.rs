use std::cmp::Reverse;
use std::path::Path;

use tokio::fs;
use tracing::warn;

use crate::error::ServeError;
use crate::fs::descriptor::DescriptorTable;

/// Kind of a directory child. Directories order before files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryKind {
    Directory,
    File,
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    /// Size in bytes. Always 0 for directories.
    pub size: u64,
    pub description: Option<String>,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// `<DIR>` for directories, the abbreviated size for files.
    pub fn marker(&self) -> String {
        match self.kind {
            EntryKind::Directory => "<DIR>".to_string(),
            EntryKind::File => size_label(self.size),
        }
    }

    /// Display label: the bare name, or the name padded to 13 columns
    /// followed by ` : ` and the description.
    pub fn label(&self) -> String {
        match &self.description {
            Some(description) => format!("{:<13} : {}", self.name, description),
            None => self.name.clone(),
        }
    }
}

/// Abbreviates a byte count with decimal units, right-aligned in 4 columns:
/// `999b`, `  1K`, ` 15M`.
pub fn size_label(bytes: u64) -> String {
    let label = if bytes < 1_000 {
        format!("{}b", bytes)
    } else if bytes < 1_000_000 {
        format!("{}K", bytes / 1_000)
    } else {
        format!("{}M", bytes / 1_000_000)
    };

    format!("{:>4}", label)
}

/// Lists the direct children of `dir`, directories first, each group in
/// case-insensitive name order, with descriptions merged in.
///
/// A child that cannot be stat'ed (a dangling symlink, a file removed while
/// listing) is skipped and logged, as is a child whose name cannot be sent
/// in a menu line.
pub async fn list_directory(dir: &Path) -> Result<Vec<Entry>, ServeError> {
    let mut reader = fs::read_dir(dir).await.map_err(ServeError::DirectoryRead)?;
    let mut entries = Vec::new();

    while let Some(child) = reader.next_entry().await.map_err(ServeError::DirectoryRead)? {
        // Names go verbatim into tab-separated menu lines and back in as
        // selectors, so they must be valid UTF-8 without control characters.
        let name = match child.file_name().into_string() {
            Ok(name) if !name.chars().any(char::is_control) => name,
            Ok(name) => {
                warn!(entry = ?name, "Skipping name with control characters");
                continue;
            }
            Err(raw) => {
                warn!(entry = ?raw, "Skipping non-UTF-8 name");
                continue;
            }
        };

        // Follows symlinks, so a link to a directory lists as a directory.
        let meta = match fs::metadata(child.path()).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!(entry = %child.path().display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let (kind, size) = if meta.is_dir() {
            (EntryKind::Directory, 0)
        } else {
            (EntryKind::File, meta.len())
        };

        entries.push(Entry {
            name,
            kind,
            size,
            description: None,
        });
    }

    sort_entries(&mut entries);

    let descriptions = DescriptorTable::load(dir).await;
    if !descriptions.is_empty() {
        for entry in entries.iter_mut() {
            entry.description = descriptions.lookup(&entry.name).map(str::to_owned);
        }
    }

    Ok(entries)
}

/// Sorts by kind, then case-insensitively by name. Names equal ignoring
/// case put the lowercase spelling first (`b` before `B`).
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by_cached_key(|e| (e.kind, e.name.to_lowercase(), Reverse(e.name.clone())));
}
