//! Support chat stub: a greeting on connect and a delayed acknowledgement for
//! every well-formed client message.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::now;

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Virtual Railway Recruitment chat support! How can we help you today?";
pub const ACK_MESSAGE: &str =
    "Thank you for your message. Our recruitment team will respond shortly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMessageKind {
    System,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub kind: ChatMessageKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn welcome() -> Self {
        Self {
            kind: ChatMessageKind::System,
            message: WELCOME_MESSAGE.to_string(),
            timestamp: now(),
        }
    }

    pub fn acknowledgement() -> Self {
        Self {
            kind: ChatMessageKind::Agent,
            message: ACK_MESSAGE.to_string(),
            timestamp: now(),
        }
    }
}

#[derive(Clone)]
pub struct ChatService {
    reply_delay: Duration,
}

impl ChatService {
    pub fn new(reply_delay_ms: u64) -> Self {
        Self {
            reply_delay: Duration::from_millis(reply_delay_ms),
        }
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    /// Returns the reply owed for an inbound text frame, or `None` when the
    /// frame is not JSON.
    pub fn reply_to(&self, frame: &str) -> Option<ChatMessage> {
        match serde_json::from_str::<serde_json::Value>(frame) {
            Ok(payload) => {
                tracing::debug!(?payload, "chat message received");
                Some(ChatMessage::acknowledgement())
            }
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unparsable chat frame");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_serializes_with_type_tag() {
        let value = serde_json::to_value(ChatMessage::welcome()).unwrap();
        assert_eq!(value["type"], "system");
        assert_eq!(value["message"], WELCOME_MESSAGE);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn json_frames_get_an_agent_reply() {
        let chat = ChatService::new(0);
        let reply = chat.reply_to(r#"{"text":"hello"}"#).unwrap();
        assert_eq!(reply.kind, ChatMessageKind::Agent);
        assert_eq!(reply.message, ACK_MESSAGE);
    }

    #[test]
    fn garbage_frames_are_ignored() {
        let chat = ChatService::new(0);
        assert!(chat.reply_to("not json").is_none());
    }
}
