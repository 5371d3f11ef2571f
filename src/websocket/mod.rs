//! WebSocket connectivity to the plugin host.
//!
//! [`client`] owns the connection and the handshake event loop;
//! [`messages`] defines the wire format.

mod client;
mod messages;

pub use client::{ClientConfig, ConnectionState, HandshakeClient, DEFAULT_PORT};
pub use messages::{Envelope, MessageType, PluginReadinessStatus, ReadinessBody};
