//! Wire messages exchanged with the plugin host.
//!
//! Every frame is one UTF-8 JSON object with the shape
//! `{ id, pluginId, type, body }`. The `id` field correlates a response with
//! the request that triggered it; the unsolicited readiness announcement on
//! connect carries a fresh UUID instead.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The `type` field of a wire message.
///
/// The host may send message types this client does not know about; those
/// deserialize into [`MessageType::Other`] and are ignored rather than
/// failing the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "PLUGIN_STATE_REQUEST")]
    PluginStateRequest,
    #[serde(rename = "PLUGIN_STATE_RESPONSE")]
    PluginStateResponse,
    /// Any other message type on the wire.
    #[serde(untagged)]
    Other(String),
}

/// One wire message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Correlation id linking a request to its response.
    pub id: String,
    /// Identifier of the plugin this message belongs to.
    #[serde(rename = "pluginId")]
    pub plugin_id: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Message payload; inbound bodies are arbitrary JSON.
    #[serde(default)]
    pub body: serde_json::Value,
}

/// Readiness states a plugin can report.
///
/// This client only ever reports `READY`; the other states exist in the host
/// protocol for plugins that need configuration or have failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PluginReadinessStatus {
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "CONFIG_REQUIRED")]
    ConfigRequired,
}

/// Body of a `PLUGIN_STATE_RESPONSE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessBody {
    #[serde(rename = "pluginReadinessStatus")]
    pub plugin_readiness_status: PluginReadinessStatus,
}

impl Envelope {
    /// Build a `PLUGIN_STATE_RESPONSE` reporting `READY` under the given
    /// correlation id.
    pub fn plugin_ready(id: String, plugin_id: String) -> Self {
        let body = ReadinessBody {
            plugin_readiness_status: PluginReadinessStatus::Ready,
        };
        Self {
            id,
            plugin_id,
            message_type: MessageType::PluginStateResponse,
            // Serializing a ReadinessBody cannot fail.
            body: serde_json::to_value(body).unwrap_or(serde_json::Value::Null),
        }
    }

    /// Build the unsolicited readiness announcement sent right after the
    /// connection opens, with a freshly generated correlation id.
    pub fn plugin_ready_unsolicited(plugin_id: String) -> Self {
        Self::plugin_ready(Uuid::new_v4().to_string(), plugin_id)
    }
}
