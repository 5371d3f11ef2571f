//! Error types for the handshake client.

use thiserror::Error;

/// Errors surfaced by the library.
///
/// Credential errors are fatal to startup; everything after the connection is
/// established is reported through logging on the event loop instead.
#[derive(Debug, Error)]
pub enum HostlinkError {
    /// The token file could not be read.
    #[error("failed to read token file {path}: {source}")]
    CredentialRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The token file contained nothing but whitespace.
    #[error("token file {path} is empty")]
    CredentialEmpty { path: String },

    /// A header value contained bytes that are not legal in an HTTP header.
    #[error("value for `{0}` header is not a valid HTTP header value")]
    InvalidHeader(&'static str),

    /// The host/port pair did not form a usable WebSocket URL.
    #[error("invalid WebSocket URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The TLS connector could not be built.
    #[error("failed to build TLS connector: {0}")]
    Tls(String),

    /// The WebSocket connection could not be established.
    #[error("connection to {url} failed: {message}")]
    ConnectionFailed { url: String, message: String },

    /// A message could not be serialized to JSON.
    #[error("failed to serialize message: {0}")]
    Serialize(String),

    /// A frame could not be written to the socket.
    #[error("send failed: {0}")]
    SendFailed(String),
}
