use super::*;

use tempfile::TempDir;

const PIXELS: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a];

fn temp_file(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("seed file");
    (dir, path)
}

// =============================================================================
// load_data_url
// =============================================================================

#[test]
fn load_data_url_wraps_png_with_its_mime() {
    let (_dir, path) = temp_file("shot.png", PIXELS);
    let url = load_data_url(&path).expect("load");
    assert!(url.starts_with("data:image/png;base64,"));
}

#[test]
fn load_data_url_is_case_insensitive_on_extension() {
    let (_dir, path) = temp_file("VOICE.MP3", b"riff");
    let url = load_data_url(&path).expect("load");
    assert!(url.starts_with("data:audio/mpeg;base64,"));
}

#[test]
fn load_data_url_falls_back_to_octet_stream() {
    let (_dir, path) = temp_file("blob.xyz", b"????");
    let url = load_data_url(&path).expect("load");
    assert!(url.starts_with("data:application/octet-stream;base64,"));
}

#[test]
fn load_data_url_missing_file_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = load_data_url(&dir.path().join("absent.png")).expect_err("missing file");
    assert!(matches!(err, MediaError::Read { .. }));
}

// =============================================================================
// decode_data_url
// =============================================================================

#[test]
fn decode_round_trips_loaded_bytes() {
    let (_dir, path) = temp_file("shot.png", PIXELS);
    let url = load_data_url(&path).expect("load");
    let media = decode_data_url(&url).expect("decode");
    assert_eq!(media.bytes, PIXELS);
    assert_eq!(media.extension, "png");
}

#[test]
fn decode_rejects_non_data_url() {
    let err = decode_data_url("https://example.com/a.png").expect_err("not a data url");
    assert!(matches!(err, MediaError::MalformedDataUrl));
}

#[test]
fn decode_rejects_missing_base64_marker() {
    let err = decode_data_url("data:image/png,AAAA").expect_err("no base64 marker");
    assert!(matches!(err, MediaError::MalformedDataUrl));
}

#[test]
fn decode_rejects_invalid_base64() {
    let err = decode_data_url("data:image/png;base64,@@@").expect_err("bad payload");
    assert!(matches!(err, MediaError::Base64(_)));
}

#[test]
fn decode_unknown_mime_uses_bin_extension() {
    let media = decode_data_url("data:application/x-thing;base64,AAAA").expect("decode");
    assert_eq!(media.extension, "bin");
}

// =============================================================================
// save_incoming
// =============================================================================

#[test]
fn save_incoming_writes_decoded_bytes() {
    let dir = TempDir::new().expect("tempdir");
    let (_src, path) = temp_file("voice.ogg", b"opus-ish");
    let url = load_data_url(&path).expect("load");

    let saved = save_incoming(&dir.path().join("media"), "audio", &url).expect("save");
    assert_eq!(std::fs::read(&saved).expect("read back"), b"opus-ish");
    assert_eq!(saved.extension().and_then(|e| e.to_str()), Some("ogg"));
}

#[test]
fn save_incoming_names_never_collide() {
    let dir = TempDir::new().expect("tempdir");
    let url = "data:image/png;base64,AAAA";
    let first = save_incoming(dir.path(), "image", url).expect("save");
    let second = save_incoming(dir.path(), "image", url).expect("save");
    assert_ne!(first, second);
}

#[test]
fn save_incoming_rejects_malformed_url() {
    let dir = TempDir::new().expect("tempdir");
    let err = save_incoming(dir.path(), "image", "nope").expect_err("malformed");
    assert!(matches!(err, MediaError::MalformedDataUrl));
}
