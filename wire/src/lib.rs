//! Shared wire model and JSON codec for the chat relay transport.
//!
//! This crate owns the wire representation the client uses when talking to
//! the relay. Every websocket frame is a JSON text message shaped as an
//! `{ "event": ..., "data": ... }` envelope; payload field names match what
//! the relay expects on the wire (`roomId` in particular), so the serde
//! attributes here are the single source of truth for the contract.

use serde::{Deserialize, Serialize};

/// Error returned by [`decode_event`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The frame text is not a well-formed envelope, or names an unknown
    /// event.
    #[error("failed to decode wire event: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A single chat message as carried on the wire.
///
/// Messages are ephemeral: they live in memory for the duration of an open
/// room session and are never persisted on either end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender's client identifier.
    pub user: String,
    /// Message text; may be empty when only media is attached.
    #[serde(default)]
    pub message: String,
    /// Room the message belongs to. Receivers drop messages whose room does
    /// not match the one they joined.
    #[serde(rename = "roomId", default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    /// Image payload as a base64 data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Audio payload as a base64 data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

impl ChatMessage {
    /// Build a plain text message bound to a room.
    #[must_use]
    pub fn text(user: &str, room_id: &str, message: &str) -> Self {
        Self {
            user: user.to_owned(),
            message: message.to_owned(),
            room_id: Some(room_id.to_owned()),
            image: None,
            audio: None,
        }
    }

    /// Whether the message carries an image or audio payload.
    #[must_use]
    pub fn has_media(&self) -> bool {
        self.image.is_some() || self.audio.is_some()
    }
}

/// A single frame on the relay transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Event {
    /// Client request to join a room by code. Sent once per connection,
    /// immediately after the websocket opens.
    JoinRoom(String),
    /// Client-originated message publish.
    SendMessage(ChatMessage),
    /// Relay-originated message delivery to room members.
    ReceiveMessage(ChatMessage),
}

/// Encode an event into a JSON text frame.
#[must_use]
pub fn encode_event(event: &Event) -> String {
    // Serializing the envelope cannot fail: every field is a string, an
    // option of strings, or a struct of the same.
    serde_json::to_string(event).unwrap_or_default()
}

/// Decode a JSON text frame into an event.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed JSON, a missing `event` or
/// `data` field, or an event name the client does not know.
pub fn decode_event(text: &str) -> Result<Event, CodecError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
