//! Wire-format tests for the handshake messages.

use hostlink::websocket::{Envelope, MessageType, PluginReadinessStatus, ReadinessBody};

#[test]
fn test_deserialize_plugin_state_request() {
    let json = r#"{
        "id": "req-1",
        "pluginId": "p1",
        "type": "PLUGIN_STATE_REQUEST",
        "body": {}
    }"#;

    let envelope: Envelope = serde_json::from_str(json).unwrap();
    assert_eq!(envelope.id, "req-1");
    assert_eq!(envelope.plugin_id, "p1");
    assert_eq!(envelope.message_type, MessageType::PluginStateRequest);
    assert!(envelope.body.as_object().unwrap().is_empty());
}

#[test]
fn test_serialize_ready_response_wire_names() {
    let envelope = Envelope::plugin_ready("req-1".to_string(), "p1".to_string());
    let json = serde_json::to_string(&envelope).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["id"], "req-1");
    assert_eq!(value["pluginId"], "p1");
    assert_eq!(value["type"], "PLUGIN_STATE_RESPONSE");
    assert_eq!(value["body"]["pluginReadinessStatus"], "READY");

    // Exactly the four protocol fields, camelCased.
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 4);
    assert!(object.contains_key("pluginId"));
    assert!(!object.contains_key("plugin_id"));
}

#[test]
fn test_response_round_trips() {
    let envelope = Envelope::plugin_ready("req-1".to_string(), "p1".to_string());
    let json = serde_json::to_string(&envelope).unwrap();
    let back: Envelope = serde_json::from_str(&json).unwrap();
    assert_eq!(back, envelope);

    let body: ReadinessBody = serde_json::from_value(back.body).unwrap();
    assert_eq!(body.plugin_readiness_status, PluginReadinessStatus::Ready);
}

#[test]
fn test_unknown_type_is_preserved_as_other() {
    let json = r#"{"id":"x","pluginId":"p1","type":"CONTROL_REQUEST","body":{"on":true}}"#;
    let envelope: Envelope = serde_json::from_str(json).unwrap();
    assert_eq!(
        envelope.message_type,
        MessageType::Other("CONTROL_REQUEST".to_string())
    );
    assert_eq!(envelope.body["on"], true);
}

#[test]
fn test_malformed_json_fails_to_parse() {
    let result = serde_json::from_str::<Envelope>("{not json");
    assert!(result.is_err());
}
