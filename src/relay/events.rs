//! Wire frames and the typed events parsed from them

use serde::Serialize;
use serde_json::{Map, Value};

/// A single WebSocket data frame, inbound or outbound
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

impl Frame {
    /// Raw payload bytes regardless of frame kind
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Frame::Text(text) => text.as_bytes(),
            Frame::Binary(data) => data,
        }
    }

    /// Lossy text view, for logging
    pub fn to_text_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }
}

/// A chat message, kept as the full parsed object so that any extra fields
/// the client sent are relayed untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage(Map<String, Value>);

impl ChatMessage {
    pub fn user(&self) -> Option<&str> {
        self.0.get("user").and_then(Value::as_str)
    }

    pub fn content(&self) -> Option<&str> {
        self.0.get("content").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Re-serialize the whole object as JSON text
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }
}

/// An inbound payload after parsing
#[derive(Clone, Debug, PartialEq)]
pub enum RelayEvent {
    /// `{"type":"message", ...}`
    Message(ChatMessage),

    /// `{"type":"typing_start","user":...}`; `user` is `None` when absent or not a string
    TypingStart { user: Option<String> },

    /// `{"type":"typing_stop","user":...}`
    TypingStop { user: Option<String> },

    /// Anything else: malformed JSON, non-object JSON, missing or unknown `type`
    Legacy(Frame),
}

impl RelayEvent {
    /// Parse a frame. Never fails: whatever is not a recognized structured
    /// event becomes `Legacy` carrying the original frame.
    pub fn parse(frame: Frame) -> Self {
        let map = match serde_json::from_slice::<Value>(frame.as_bytes()) {
            Ok(Value::Object(map)) => map,
            _ => return RelayEvent::Legacy(frame),
        };

        match map.get("type").and_then(Value::as_str) {
            Some("message") => RelayEvent::Message(ChatMessage(map)),
            Some("typing_start") => RelayEvent::TypingStart {
                user: user_field(&map),
            },
            Some("typing_stop") => RelayEvent::TypingStop {
                user: user_field(&map),
            },
            _ => RelayEvent::Legacy(frame),
        }
    }

    /// Short name for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            RelayEvent::Message(_) => "message",
            RelayEvent::TypingStart { .. } => "typing_start",
            RelayEvent::TypingStop { .. } => "typing_stop",
            RelayEvent::Legacy(_) => "legacy",
        }
    }
}

fn user_field(map: &Map<String, Value>) -> Option<String> {
    map.get("user").and_then(Value::as_str).map(str::to_string)
}

/// Typing notifications sent by the relay
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypingNotice {
    TypingStart { user: String },
    TypingStop { user: String },
}

impl TypingNotice {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
