use serde_json::Value;

use crate::model::{BroadcastEvent, BroadcastEventType};

/// A decoded client->server frame (spec's wire format: `{"type":"PONG"}` or
/// `{"type":"USER_TYPING","username":"...","is_typing":true}`). Anything
/// else parses as `Unknown` so the inbound loop can warn and move on
/// instead of tearing the connection down over one bad frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    Pong,
    UserTyping { username: String, is_typing: bool },
    Unknown(String),
}

impl ClientFrame {
    pub fn parse(text: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(text) else {
            return ClientFrame::Unknown(text.to_string());
        };
        match value.get("type").and_then(Value::as_str) {
            Some("PONG") => ClientFrame::Pong,
            Some("USER_TYPING") => ClientFrame::UserTyping {
                username: value
                    .get("username")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                is_typing: value.get("is_typing").and_then(Value::as_bool).unwrap_or(false),
            },
            Some(other) => ClientFrame::Unknown(other.to_string()),
            None => ClientFrame::Unknown(text.to_string()),
        }
    }
}

/// A server->client frame: either a bare ping probe or a pub/sub event
/// forwarded verbatim.
#[derive(Debug, Clone)]
pub enum ServerFrame {
    Ping,
    Event {
        event_type: &'static str,
        payload: Value,
    },
}

impl ServerFrame {
    pub fn to_text(&self) -> String {
        match self {
            ServerFrame::Ping => serde_json::json!({ "type": "PING" }).to_string(),
            ServerFrame::Event { event_type, payload } => {
                serde_json::json!({ "event_type": event_type, "payload": payload }).to_string()
            }
        }
    }

    pub fn from_broadcast(event: &BroadcastEvent) -> Self {
        ServerFrame::Event {
            event_type: wire_event_type(event.event_type),
            payload: event.data.clone(),
        }
    }
}

fn wire_event_type(event_type: BroadcastEventType) -> &'static str {
    match event_type {
        BroadcastEventType::MessageCreated => "MESSAGE_CREATED",
        BroadcastEventType::MessageEdited => "MESSAGE_EDITED",
        BroadcastEventType::MessageDeleted => "MESSAGE_DELETED",
        BroadcastEventType::UserJoinedRoom => "USER_JOINED_ROOM",
        BroadcastEventType::UserLeftRoom => "USER_LEFT_ROOM",
        BroadcastEventType::TypingIndicator => "USER_TYPING",
        BroadcastEventType::PresenceJoined => "ROOM_USER_ONLINE",
        BroadcastEventType::PresenceLeft => "ROOM_USER_OFFLINE",
        BroadcastEventType::NotificationDelivered => "NOTIFICATION",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pong() {
        assert_eq!(ClientFrame::parse(r#"{"type":"PONG"}"#), ClientFrame::Pong);
    }

    #[test]
    fn parses_user_typing() {
        let frame = ClientFrame::parse(r#"{"type":"USER_TYPING","username":"al","is_typing":true}"#);
        assert_eq!(
            frame,
            ClientFrame::UserTyping {
                username: "al".to_string(),
                is_typing: true
            }
        );
    }

    #[test]
    fn unknown_type_does_not_panic() {
        assert_eq!(
            ClientFrame::parse(r#"{"type":"SOMETHING_ELSE"}"#),
            ClientFrame::Unknown("SOMETHING_ELSE".to_string())
        );
    }

    #[test]
    fn garbage_text_is_unknown() {
        match ClientFrame::parse("not json") {
            ClientFrame::Unknown(_) => {}
            other => panic!("expected Unknown, got {other:?}"),
        }
    }
}
