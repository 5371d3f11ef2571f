use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{
    connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, info, warn};

use crate::credentials::Credential;
use crate::error::HostlinkError;

use super::messages::{Envelope, MessageType};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Port the host listens on for plugin connections.
pub const DEFAULT_PORT: u16 = 9001;

/// WebSocket connection state
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// Configuration for the handshake client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identifier the plugin announces itself under.
    pub plugin_id: String,
    /// Host to connect to, without scheme or port.
    pub host: String,
    pub port: u16,
    /// Dial `wss://` instead of `ws://`. Tests turn this off to run against
    /// a plain in-process server.
    pub use_tls: bool,
    /// Skip certificate and hostname verification. Hosts commonly present
    /// self-signed certificates to their plugins, so this defaults to true.
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    pub fn new(plugin_id: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            host: host.into(),
            port: DEFAULT_PORT,
            use_tls: true,
            accept_invalid_certs: true,
        }
    }

    /// The URL this configuration dials.
    pub fn url(&self) -> String {
        let scheme = if self.use_tls { "wss" } else { "ws" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

/// Client side of the plugin readiness handshake.
///
/// `connect` opens the socket, announces readiness, and spawns a background
/// task that answers every `PLUGIN_STATE_REQUEST` for the lifetime of the
/// connection. The handle is only needed to observe the connection or shut
/// it down; dropping it closes the socket.
pub struct HandshakeClient {
    /// Messages the event loop does not handle itself, delivered to the caller
    incoming_rx: mpsc::Receiver<Envelope>,
    /// Watch receiver for connection state changes
    state_rx: watch::Receiver<ConnectionState>,
    /// Signals the event loop to close the socket
    shutdown_tx: watch::Sender<bool>,
}

impl HandshakeClient {
    /// Connect to the host and perform the readiness handshake.
    ///
    /// The `authtoken` and `plugin-id` headers are attached to the upgrade
    /// request. On success the unsolicited `PLUGIN_STATE_RESPONSE` has
    /// already been written to the socket before this returns.
    pub async fn connect(
        config: ClientConfig,
        credential: &Credential,
    ) -> Result<Self, HostlinkError> {
        let url = config.url();
        let mut request =
            url.as_str()
                .into_client_request()
                .map_err(|e| HostlinkError::InvalidUrl {
                    url: url.clone(),
                    message: e.to_string(),
                })?;
        let headers = request.headers_mut();
        headers.insert(
            "authtoken",
            HeaderValue::from_str(credential.token())
                .map_err(|_| HostlinkError::InvalidHeader("authtoken"))?,
        );
        headers.insert(
            "plugin-id",
            HeaderValue::from_str(&config.plugin_id)
                .map_err(|_| HostlinkError::InvalidHeader("plugin-id"))?,
        );

        let connector = if config.use_tls {
            let tls = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(config.accept_invalid_certs)
                .danger_accept_invalid_hostnames(config.accept_invalid_certs)
                .build()
                .map_err(|e| HostlinkError::Tls(e.to_string()))?;
            Some(Connector::NativeTls(tls))
        } else {
            None
        };

        let (ws_stream, _) = connect_async_tls_with_config(request, None, false, connector)
            .await
            .map_err(|e| HostlinkError::ConnectionFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        info!("Connected to host at {}", url);

        let (mut ws_sink, ws_stream) = ws_stream.split();

        // Announce readiness before any other traffic.
        let announcement = Envelope::plugin_ready_unsolicited(config.plugin_id.clone());
        send_envelope(&mut ws_sink, &announcement).await?;

        let (incoming_tx, incoming_rx) = mpsc::channel::<Envelope>(100);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connected);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let plugin_id = config.plugin_id;
        tokio::spawn(async move {
            run_connection_loop(
                plugin_id,
                ws_sink,
                ws_stream,
                incoming_tx,
                state_tx,
                shutdown_rx,
            )
            .await;
        });

        Ok(Self {
            incoming_rx,
            state_rx,
            shutdown_tx,
        })
    }

    /// Check if currently connected
    pub fn is_connected(&self) -> bool {
        matches!(*self.state_rx.borrow(), ConnectionState::Connected)
    }

    /// Subscribe to connection state changes
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Receive the next host message the event loop did not handle itself.
    ///
    /// Returns `None` once the connection is gone and all buffered messages
    /// have been drained.
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.incoming_rx.recv().await
    }

    /// Wait until the connection is gone, for any reason: a close frame from
    /// the host, a socket error, or a [`shutdown`](Self::shutdown) request.
    pub async fn closed(&self) {
        let mut state_rx = self.state_rx.clone();
        while *state_rx.borrow_and_update() != ConnectionState::Disconnected {
            if state_rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Ask the event loop to close the socket and stop.
    pub fn shutdown(&self) {
        info!("Shutting down handshake client");
        let _ = self.shutdown_tx.send(true);
    }
}

/// Run the connection event loop until the socket closes or shutdown is
/// requested. There is no reconnection: a dead socket ends the loop and the
/// caller decides what to do with the process.
async fn run_connection_loop(
    plugin_id: String,
    mut ws_sink: WsSink,
    mut ws_stream: WsStream,
    incoming_tx: mpsc::Sender<Envelope>,
    state_tx: watch::Sender<ConnectionState>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                // An Err means the client handle was dropped; treat it the
                // same as an explicit shutdown.
                if changed.is_err() || *shutdown_rx.borrow() {
                    debug!("Shutdown requested, closing connection");
                    let _ = ws_sink.close().await;
                    break;
                }
            }
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_frame(&plugin_id, &text, &mut ws_sink, &incoming_tx).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        debug!("Received ping, sending pong");
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!("Received close frame from host: {:?}", frame);
                        break;
                    }
                    Some(Ok(_)) => {
                        // Ignore other frame kinds (Pong, Binary, Frame)
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                    None => {
                        info!("WebSocket stream ended");
                        break;
                    }
                }
            }
        }
    }

    info!("Connection loop ended");
    let _ = state_tx.send(ConnectionState::Disconnected);
}

/// Handle one inbound text frame.
///
/// Malformed JSON is logged and dropped; the connection stays open. A
/// `PLUGIN_STATE_REQUEST` is answered with a readiness response echoing its
/// id; anything else is forwarded to the caller without a reply.
async fn handle_text_frame(
    plugin_id: &str,
    text: &str,
    ws_sink: &mut WsSink,
    incoming_tx: &mpsc::Sender<Envelope>,
) {
    let envelope = match serde_json::from_str::<Envelope>(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Failed to parse message: {} - {}", e, text);
            return;
        }
    };

    debug!("Received message: {}", text);

    match envelope.message_type {
        MessageType::PluginStateRequest => {
            let reply = Envelope::plugin_ready(envelope.id, plugin_id.to_string());
            if let Err(e) = send_envelope(ws_sink, &reply).await {
                error!("Failed to send readiness response: {}", e);
            }
        }
        ref other => {
            debug!("No handler for message type {:?}", other);
            if incoming_tx.try_send(envelope).is_err() {
                debug!("Incoming channel full or closed, dropping message");
            }
        }
    }
}

async fn send_envelope(sink: &mut WsSink, envelope: &Envelope) -> Result<(), HostlinkError> {
    let json =
        serde_json::to_string(envelope).map_err(|e| HostlinkError::Serialize(e.to_string()))?;
    info!("Sending message: {}", json);
    sink.send(Message::Text(json))
        .await
        .map_err(|e| HostlinkError::SendFailed(e.to_string()))
}
