//! Gopher menu/file server (RFC 1436 subset).
//!
//! A client sends one selector line. A directory selector gets a menu, a
//! file selector gets the raw bytes followed by connection close, anything
//! else gets a type `3` error record.

pub mod banner;
pub mod connection;
pub mod menu;

pub use connection::{GopherConnection, GopherReply, respond};
pub use menu::Endpoint;
