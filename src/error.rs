use std::io;

use thiserror::Error;

/// Failures that end a single request with a protocol-level error response.
///
/// None of these are fatal to the server; each one is rendered as a Gopher
/// error record or an HTTP status by the protocol that hit it.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The request path resolves outside the served root.
    #[error("path escapes the served root")]
    Forbidden,

    /// The final target could not be stat'ed.
    #[error("file or directory not found: {0}")]
    NotFound(#[source] io::Error),

    /// The target is a directory but enumerating it failed.
    #[error("unable to read directory: {0}")]
    DirectoryRead(#[source] io::Error),

    /// The target is a file but opening or reading it failed.
    #[error("unable to read file: {0}")]
    FileRead(#[source] io::Error),
}

impl ServeError {
    /// Short human-readable message used in Gopher error records.
    pub fn gopher_message(&self) -> &'static str {
        match self {
            ServeError::Forbidden => "Error: Access denied",
            ServeError::NotFound(_) => "Error: File or directory not found",
            ServeError::DirectoryRead(_) => "Error: Unable to read directory",
            ServeError::FileRead(_) => "Error: Unable to read file",
        }
    }
}
