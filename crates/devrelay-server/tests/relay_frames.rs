//! Integration tests for the relay protocol as seen through text frames.
//!
//! These drive `websocket::handle_text` against a shared relay, the same path
//! a live socket's reader task takes.

use devrelay_core::{ConnectionHandle, Relay, RelayEvent};
use devrelay_server::websocket::handle_text;
use devrelay_types::{ConnectionId, Envelope, ServerFrame};
use serde_json::{json, Value};
use tokio::sync::mpsc;

fn id(s: &str) -> ConnectionId {
    ConnectionId::from(s)
}

fn connect(relay: &Relay, name: &str) -> mpsc::Receiver<ServerFrame> {
    let (handle, rx) = ConnectionHandle::channel(16);
    relay.handle_event(RelayEvent::Connect { id: id(name), handle });
    rx
}

/// Drain a client's queue as the JSON the writer task would put on the wire.
fn wire(rx: &mut mpsc::Receiver<ServerFrame>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::to_value(&frame).unwrap());
    }
    frames
}

#[test]
fn test_broadcast_then_disconnect_scenario() {
    let relay = Relay::new();
    let mut a = connect(&relay, "A");
    let mut b = connect(&relay, "B");
    let mut c = connect(&relay, "C");

    let delivery = handle_text(&relay, &id("A"), r#"{"event":"broadcast","data":{"text":"hi"}}"#);
    assert_eq!(delivery.unwrap().delivered, 3);

    let expected = json!({ "event": "message", "data": { "from": "A", "text": "hi" } });
    assert_eq!(wire(&mut a), vec![expected.clone()]);
    assert_eq!(wire(&mut b), vec![expected.clone()]);
    assert_eq!(wire(&mut c), vec![expected]);

    relay.handle_event(RelayEvent::Disconnect { id: id("B") });

    let gone = json!({ "event": "disconnection", "data": { "from": "B" } });
    assert_eq!(wire(&mut a), vec![gone.clone()]);
    assert_eq!(wire(&mut c), vec![gone]);
    assert!(wire(&mut b).is_empty());

    let delivery = handle_text(&relay, &id("A"), r#"{"event":"message","data":{"to":"B","text":"?"}}"#);
    assert_eq!(delivery.unwrap().delivered, 0);
    assert!(wire(&mut a).is_empty());
    assert!(wire(&mut c).is_empty());
}

#[test]
fn test_unicast_defaults_from_and_keeps_app_fields() {
    let relay = Relay::new();
    let mut a = connect(&relay, "A");
    let mut b = connect(&relay, "B");

    handle_text(
        &relay,
        &id("A"),
        r#"{"event":"message","data":{"to":"B","move":{"x":1},"tick":7}}"#,
    );

    assert!(wire(&mut a).is_empty());
    assert_eq!(
        wire(&mut b),
        vec![json!({
            "event": "message",
            "data": { "from": "A", "to": "B", "move": { "x": 1 }, "tick": 7 }
        })]
    );
}

#[test]
fn test_forged_from_is_relayed_as_is() {
    let relay = Relay::new();
    let mut a = connect(&relay, "A");
    let mut b = connect(&relay, "B");

    handle_text(&relay, &id("A"), r#"{"event":"broadcast","data":{"from":"B"}}"#);

    for rx in [&mut a, &mut b] {
        let frames = wire(rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["data"]["from"], "B");
    }
}

#[test]
fn test_malformed_frames_are_dropped() {
    let relay = Relay::new();
    let mut a = connect(&relay, "A");
    let mut b = connect(&relay, "B");

    for text in [
        "garbage",
        r#"{"event":"shout","data":{}}"#,
        r#"{"event":"broadcast","data":"hi"}"#,
        r#"{"data":{"to":"B"}}"#,
    ] {
        assert!(handle_text(&relay, &id("A"), text).is_none(), "accepted {}", text);
    }

    // Decodes, but a unicast without a recipient routes nowhere
    let delivery = handle_text(&relay, &id("A"), r#"{"event":"message","data":{"text":"x"}}"#);
    assert_eq!(delivery.unwrap().attempted, 0);

    assert!(wire(&mut a).is_empty());
    assert!(wire(&mut b).is_empty());
}

#[test]
fn test_broadcast_without_data_sends_sender_only_envelope() {
    let relay = Relay::new();
    let mut a = connect(&relay, "A");

    handle_text(&relay, &id("A"), r#"{"event":"broadcast","data":null}"#);

    let frames = wire(&mut a);
    assert_eq!(frames, vec![json!({ "event": "message", "data": { "from": "A" } })]);

    let envelope: Envelope = serde_json::from_value(frames[0]["data"].clone()).unwrap();
    assert!(envelope.fields.is_empty());
}

#[test]
fn test_slow_client_does_not_block_others() {
    let relay = Relay::new();
    let (slow, _slow_rx) = ConnectionHandle::channel(1);
    relay.accept_with_id(id("slow"), slow);
    let mut fast = connect(&relay, "fast");

    for n in 0..5 {
        let text = json!({ "event": "broadcast", "data": { "n": n } }).to_string();
        handle_text(&relay, &id("fast"), &text);
    }

    assert_eq!(wire(&mut fast).len(), 5);
}

#[test]
fn test_non_string_from_is_relayed_unchanged() {
    let relay = Relay::new();
    let mut a = connect(&relay, "A");
    let mut b = connect(&relay, "B");

    let delivery = handle_text(&relay, &id("A"), r#"{"event":"broadcast","data":{"from":42,"text":"hi"}}"#);
    assert_eq!(delivery.unwrap().delivered, 2);

    let expected = json!({ "event": "message", "data": { "from": 42, "text": "hi" } });
    assert_eq!(wire(&mut a), vec![expected.clone()]);
    assert_eq!(wire(&mut b), vec![expected]);
}

#[test]
fn test_falsy_from_is_replaced_by_sender() {
    let relay = Relay::new();
    let mut b = connect(&relay, "B");
    let _a = connect(&relay, "A");

    for falsy in ["false", "0", "null", "\"\""] {
        let text = format!(r#"{{"event":"message","data":{{"to":"B","from":{}}}}}"#, falsy);
        assert_eq!(handle_text(&relay, &id("A"), &text).unwrap().delivered, 1);
        assert_eq!(
            wire(&mut b),
            vec![json!({ "event": "message", "data": { "from": "A", "to": "B" } })],
            "from = {}",
            falsy
        );
    }
}
