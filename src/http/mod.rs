//! HTTP/1.1 file server.
//!
//! Serves regular files under the root with optional single byte-range
//! support. Directories are not listed over HTTP.
//!
//! # Architecture
//!
//! - **`connection`**: per-connection request-response state machine
//! - **`parser`**: parses incoming HTTP requests from byte buffers
//! - **`request`**: HTTP request representation and target decoding
//! - **`handler`**: maps a request onto the served tree
//! - **`range`**: `Range` header negotiation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: serializes responses and streams file bodies
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for incoming request data
//!        └──────┬──────┘
//!               │ Request received (or rejected → Writing, then Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Resolve path, stat, negotiate range
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Head, then body streamed from disk
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close / exit path → Closed
//! ```

pub mod connection;
pub mod handler;
pub mod parser;
pub mod range;
pub mod request;
pub mod response;
pub mod writer;
