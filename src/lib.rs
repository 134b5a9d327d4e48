//! Treeserve - Gopher and HTTP file server
//!
//! Exposes one directory tree over two protocols: a Gopher menu/file server
//! and an HTTP/1.1 file server with single byte-range support. Both share the
//! same path sandboxing and directory listing code in [`fs`].

pub mod config;
pub mod error;
pub mod fs;
pub mod gopher;
pub mod http;
pub mod server;

pub use error::ServeError;

/// Name and version announced at startup and in Gopher menu headers.
pub const VERSION: &str = concat!("treeserve ", env!("CARGO_PKG_VERSION"));
