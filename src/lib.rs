//! hostlink - plugin-side client for the host readiness handshake.
//!
//! A plugin process uses this crate to open a secure WebSocket to its host,
//! authenticate with a static token, and answer readiness queries. The
//! library exposes modules for use in integration tests.

pub mod cli;
pub mod credentials;
pub mod error;
pub mod websocket;
