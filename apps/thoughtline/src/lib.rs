//! # Thoughtline
//!
//! Library half of the Thoughtline binary: the HTTP/WebSocket API and the
//! configuration layer. `main.rs` wires them to the CLI.

pub mod api;
pub mod config;
