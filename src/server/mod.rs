//! Listeners and the state they share.

pub mod context;
pub mod listener;

pub use context::ServeContext;
