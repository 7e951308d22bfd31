//! Interactive room session — the terminal analog of the chat room page.
//!
//! One joined room per session. Incoming deliveries and terminal input are
//! multiplexed with `select!`; messages for other rooms are dropped
//! silently, sent messages are locally echoed (the relay does not echo to
//! the sender), and the in-memory history dies with the process.

use std::io;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::media::{self, MediaError};
use crate::relay::{RelayClient, RelayError};
use wire::ChatMessage;

/// Error for a room session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Relay(#[from] RelayError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error("failed to read terminal input: {0}")]
    Stdin(#[from] io::Error),
    #[error("nothing to send: message text and attachments are all empty")]
    EmptyMessage,
}

/// Attachments staged for the next send.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct PendingMedia {
    image: Option<PathBuf>,
    audio: Option<PathBuf>,
}

impl PendingMedia {
    fn clear(&mut self) {
        self.image = None;
        self.audio = None;
    }
}

/// A parsed line of terminal input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Text(String),
    AttachImage(PathBuf),
    AttachAudio(PathBuf),
    Flush(Option<String>),
    Quit,
    Empty,
    Unknown(String),
}

/// Join `room` and run the interactive loop until `/quit` or stdin EOF.
pub async fn run(
    relay_url: &str,
    room: &str,
    user: &str,
    media_dir: &Path,
) -> Result<(), SessionError> {
    let mut relay = RelayClient::connect(relay_url, room).await?;
    println!("sala {room} — connected as {}", short_id(user));
    println!("type to chat; /image <path> and /audio <path> stage media, /send flushes, /quit leaves");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = PendingMedia::default();

    loop {
        tokio::select! {
            incoming = relay.recv() => {
                let message = incoming?;
                if !is_for_room(&message, room) {
                    continue;
                }
                render_incoming(&message, user, media_dir);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Input::Empty => {}
                    Input::Quit => break,
                    Input::AttachImage(path) => {
                        pending.image = Some(path);
                        println!("[image staged for next send]");
                    }
                    Input::AttachAudio(path) => {
                        pending.audio = Some(path);
                        println!("[audio staged for next send]");
                    }
                    Input::Unknown(command) => {
                        println!("[unknown command: /{command}]");
                    }
                    Input::Text(text) => {
                        send_staged(&mut relay, user, room, &text, &mut pending).await?;
                    }
                    Input::Flush(text) => {
                        let text = text.unwrap_or_default();
                        send_staged(&mut relay, user, room, &text, &mut pending).await?;
                    }
                }
            }
        }
    }

    relay.close().await;
    Ok(())
}

/// Connect, send a single message, and disconnect.
pub async fn send_once(
    relay_url: &str,
    room: &str,
    user: &str,
    text: &str,
    image: Option<&Path>,
    audio: Option<&Path>,
) -> Result<(), SessionError> {
    let pending = PendingMedia {
        image: image.map(Path::to_path_buf),
        audio: audio.map(Path::to_path_buf),
    };
    let message = build_message(user, room, text, &pending)?.ok_or(SessionError::EmptyMessage)?;

    let mut relay = RelayClient::connect(relay_url, room).await?;
    relay.send(message).await?;
    relay.close().await;
    Ok(())
}

async fn send_staged(
    relay: &mut RelayClient,
    user: &str,
    room: &str,
    text: &str,
    pending: &mut PendingMedia,
) -> Result<(), SessionError> {
    let message = match build_message(user, room, text, pending) {
        Ok(Some(message)) => message,
        Ok(None) => {
            println!("[nothing to send]");
            return Ok(());
        }
        Err(error) => {
            // Staged paths stay staged: fix or restage, then send again.
            println!("[attachment failed: {error}]");
            return Ok(());
        }
    };

    relay.send(message.clone()).await?;
    pending.clear();
    echo(&message);
    Ok(())
}

/// Assemble the outgoing message. Every staged attachment loads before the
/// message is constructed, so a failed read never emits a half-built
/// message and never discards staged media.
fn build_message(
    user: &str,
    room: &str,
    text: &str,
    pending: &PendingMedia,
) -> Result<Option<ChatMessage>, MediaError> {
    let text = text.trim();
    let image = pending.image.as_deref().map(media::load_data_url).transpose()?;
    let audio = pending.audio.as_deref().map(media::load_data_url).transpose()?;

    if text.is_empty() && image.is_none() && audio.is_none() {
        return Ok(None);
    }

    Ok(Some(ChatMessage {
        user: user.to_owned(),
        message: text.to_owned(),
        room_id: Some(room.to_owned()),
        image,
        audio,
    }))
}

/// Client-side room filter, as the original page does: deliveries whose
/// room does not match the joined one are dropped silently, including
/// messages with no room at all.
fn is_for_room(message: &ChatMessage, room: &str) -> bool {
    message.room_id.as_deref() == Some(room)
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Text(trimmed.to_owned());
    };

    let (word, rest) = match command.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (command, ""),
    };
    match word {
        "quit" | "q" => Input::Quit,
        "image" if !rest.is_empty() => Input::AttachImage(PathBuf::from(rest)),
        "audio" if !rest.is_empty() => Input::AttachAudio(PathBuf::from(rest)),
        "send" => Input::Flush((!rest.is_empty()).then(|| rest.to_owned())),
        _ => Input::Unknown(word.to_owned()),
    }
}

fn render_incoming(message: &ChatMessage, own_id: &str, media_dir: &Path) {
    let who = if message.user == own_id {
        "you".to_owned()
    } else {
        short_id(&message.user)
    };

    let mut parts = Vec::new();
    if !message.message.is_empty() {
        parts.push(message.message.clone());
    }
    for (label, payload) in [("image", &message.image), ("audio", &message.audio)] {
        let Some(url) = payload else { continue };
        match media::save_incoming(media_dir, label, url) {
            Ok(path) => parts.push(format!("[{label} saved to {}]", path.display())),
            Err(error) => {
                tracing::warn!(%error, label, "failed to save incoming attachment");
                parts.push(format!("[{label} attachment could not be saved]"));
            }
        }
    }
    println!("[{who}] {}", parts.join(" "));
}

fn echo(message: &ChatMessage) {
    let mut parts = Vec::new();
    if !message.message.is_empty() {
        parts.push(message.message.clone());
    }
    if message.image.is_some() {
        parts.push("[image attached]".to_owned());
    }
    if message.audio.is_some() {
        parts.push("[audio attached]".to_owned());
    }
    println!("[you] {}", parts.join(" "));
}

/// Truncate long client identifiers for display, as the original page does.
fn short_id(id: &str) -> String {
    const LIMIT: usize = 15;
    if id.chars().count() > LIMIT {
        let head: String = id.chars().take(LIMIT).collect();
        format!("{head}...")
    } else {
        id.to_owned()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
