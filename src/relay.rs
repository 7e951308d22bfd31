//! Relay connection: the websocket transport speaking `wire` events.
//!
//! One connection per room session. The client connects, emits `join_room`
//! once, then sends and receives `wire::Event` frames as JSON text messages.
//! There is no reconnect or retry: a dropped connection ends the session
//! with an error, matching the original client's behavior.

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use wire::{ChatMessage, Event};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Error for relay transport operations.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("invalid relay URL: {0}")]
    InvalidUrl(String),
    #[error("websocket connect failed: {0}")]
    Connect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket transport failed: {0}")]
    Transport(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("relay closed the connection")]
    Closed,
}

/// Rewrite a relay endpoint to a websocket URL. `http`/`https` map to
/// `ws`/`wss` (the original client configured the relay with an HTTP URL);
/// `ws`/`wss` pass through unchanged.
pub fn relay_ws_url(base_url: &str) -> Result<String, RelayError> {
    let base_url = base_url.trim_end_matches('/');
    if let Some(rest) = base_url.strip_prefix("http://") {
        return Ok(format!("ws://{rest}"));
    }
    if let Some(rest) = base_url.strip_prefix("https://") {
        return Ok(format!("wss://{rest}"));
    }
    if base_url.starts_with("ws://") || base_url.starts_with("wss://") {
        return Ok(base_url.to_owned());
    }
    Err(RelayError::InvalidUrl(base_url.to_owned()))
}

/// A live connection to the relay, joined to a single room.
pub struct RelayClient {
    stream: WsStream,
}

impl RelayClient {
    /// Connect to the relay and join `room`.
    pub async fn connect(base_url: &str, room: &str) -> Result<Self, RelayError> {
        let url = relay_ws_url(base_url)?;
        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|error| RelayError::Connect(Box::new(error)))?;

        let mut client = Self { stream };
        client.send_event(&Event::JoinRoom(room.to_owned())).await?;
        tracing::info!(%room, %url, "joined room");
        Ok(client)
    }

    /// Publish a message to the joined room.
    pub async fn send(&mut self, message: ChatMessage) -> Result<(), RelayError> {
        self.send_event(&Event::SendMessage(message)).await
    }

    /// Wait for the next delivered message. Non-delivery events and frames
    /// that fail to decode are skipped, not fatal.
    pub async fn recv(&mut self) -> Result<ChatMessage, RelayError> {
        loop {
            let Some(message) = self.stream.next().await else {
                return Err(RelayError::Closed);
            };
            match message.map_err(|error| RelayError::Transport(Box::new(error)))? {
                Message::Text(text) => match wire::decode_event(text.as_str()) {
                    Ok(Event::ReceiveMessage(delivered)) => return Ok(delivered),
                    Ok(_) => {
                        tracing::debug!("ignoring non-delivery event from relay");
                    }
                    Err(error) => {
                        tracing::warn!(%error, "skipping undecodable relay frame");
                    }
                },
                Message::Close(_) => return Err(RelayError::Closed),
                _ => {}
            }
        }
    }

    /// Close the connection. Best effort: a relay that already hung up is
    /// not an error worth surfacing at session end.
    pub async fn close(mut self) {
        if let Err(error) = self.stream.close(None).await {
            tracing::debug!(%error, "websocket close handshake failed");
        }
    }

    async fn send_event(&mut self, event: &Event) -> Result<(), RelayError> {
        let frame = wire::encode_event(event);
        self.stream
            .send(Message::Text(frame.into()))
            .await
            .map_err(|error| RelayError::Transport(Box::new(error)))
    }
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
