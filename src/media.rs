//! Attachment loading and saving.
//!
//! Outgoing media follows the original FileReader flow: read the whole file,
//! base64-encode it, and wrap it as a `data:<mime>;base64,<payload>` URL so
//! the relay can pass it through untouched. Incoming media reverses the
//! transformation and lands on disk, since a terminal cannot render it
//! inline.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DATA_URL_PREFIX: &str = "data:";

/// Error for attachment handling.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("failed to read attachment {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("malformed data URL in attachment")]
    MalformedDataUrl,
    #[error("invalid base64 payload in attachment: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to save attachment {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        source: io::Error,
    },
}

/// Load a file and wrap it as a base64 data URL, inferring the mime type
/// from the file extension.
pub fn load_data_url(path: &Path) -> Result<String, MediaError> {
    let bytes = std::fs::read(path).map_err(|source| MediaError::Read {
        path: path.to_owned(),
        source,
    })?;
    let mime = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or("application/octet-stream", mime_for_extension);
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// An incoming attachment decoded from its data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMedia {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Decode a `data:<mime>;base64,<payload>` URL back into bytes plus a file
/// extension suitable for saving.
pub fn decode_data_url(url: &str) -> Result<DecodedMedia, MediaError> {
    let rest = url
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or(MediaError::MalformedDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(MediaError::MalformedDataUrl)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(MediaError::MalformedDataUrl)?;

    Ok(DecodedMedia {
        bytes: STANDARD.decode(payload)?,
        extension: extension_for_mime(mime),
    })
}

/// Save an incoming attachment under `dir`, returning the written path.
///
/// File names carry a short random component so two attachments arriving in
/// the same session never collide.
pub fn save_incoming(dir: &Path, label: &str, url: &str) -> Result<PathBuf, MediaError> {
    let media = decode_data_url(url)?;
    let save_err = |path: &Path| {
        let path = path.to_owned();
        move |source| MediaError::Save { path, source }
    };

    std::fs::create_dir_all(dir).map_err(save_err(dir))?;
    let stamp = Uuid::new_v4().simple().to_string();
    let file = dir.join(format!("{label}-{}.{}", &stamp[..8], media.extension));
    std::fs::write(&file, &media.bytes).map_err(save_err(&file))?;
    Ok(file)
}

fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "webm" => "audio/webm",
        _ => "application/octet-stream",
    }
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "audio/mpeg" => "mp3",
        "audio/wav" => "wav",
        "audio/ogg" => "ogg",
        "audio/mp4" => "m4a",
        "audio/webm" => "webm",
        _ => "bin",
    }
}

#[cfg(test)]
#[path = "media_test.rs"]
mod tests;
