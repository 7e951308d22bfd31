use super::*;

use tempfile::TempDir;
use crate::store::write_atomic;

fn temp_book() -> (TempDir, StatePaths, RoomBook) {
    let dir = TempDir::new().expect("tempdir");
    let paths = StatePaths::at(dir.path().to_owned());
    let book = RoomBook::load(&paths).expect("load empty book");
    (dir, paths, book)
}

// =============================================================================
// load
// =============================================================================

#[test]
fn missing_file_loads_as_empty_book() {
    let (_dir, _paths, book) = temp_book();
    assert!(book.rooms().is_empty());
}

#[test]
fn empty_file_loads_as_empty_book() {
    let dir = TempDir::new().expect("tempdir");
    let paths = StatePaths::at(dir.path().to_owned());
    write_atomic(&paths.rooms_file(), "").expect("seed");
    let book = RoomBook::load(&paths).expect("empty file is not corrupt");
    assert!(book.rooms().is_empty());
}

#[test]
fn whitespace_only_file_loads_as_empty_book() {
    let dir = TempDir::new().expect("tempdir");
    let paths = StatePaths::at(dir.path().to_owned());
    write_atomic(&paths.rooms_file(), "  \n").expect("seed");
    let book = RoomBook::load(&paths).expect("blank file is not corrupt");
    assert!(book.rooms().is_empty());
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let paths = StatePaths::at(dir.path().to_owned());
    write_atomic(&paths.rooms_file(), "{not json").expect("seed");
    let err = RoomBook::load(&paths).expect_err("corrupt file should fail");
    assert!(matches!(err, RoomBookError::Store(StoreError::Corrupt { .. })));
}

#[test]
fn saved_rooms_reload_in_insertion_order() {
    let (_dir, paths, mut book) = temp_book();
    book.add("zeta", "code-z").expect("add");
    book.add("alpha", "code-a").expect("add");
    book.add("mid", "code-m").expect("add");

    let reloaded = RoomBook::load(&paths).expect("reload");
    let names: Vec<&str> = reloaded.rooms().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["zeta", "alpha", "mid"]);
}

// =============================================================================
// add
// =============================================================================

#[test]
fn add_trims_name_and_code() {
    let (_dir, _paths, mut book) = temp_book();
    let room = book.add("  equipo it  ", "  code-1  ").expect("add");
    assert_eq!(room.name, "equipo it");
    assert_eq!(room.code, "code-1");
}

#[test]
fn add_rejects_empty_name() {
    let (_dir, _paths, mut book) = temp_book();
    let err = book.add("   ", "code-1").expect_err("empty name should fail");
    assert!(matches!(err, RoomBookError::EmptyField));
}

#[test]
fn add_rejects_empty_code() {
    let (_dir, _paths, mut book) = temp_book();
    let err = book.add("equipo", "  ").expect_err("empty code should fail");
    assert!(matches!(err, RoomBookError::EmptyField));
}

#[test]
fn add_rejects_duplicate_code_without_mutating() {
    let (_dir, paths, mut book) = temp_book();
    book.add("first", "code-1").expect("add");
    let err = book.add("second", "code-1").expect_err("duplicate should fail");
    assert!(matches!(err, RoomBookError::DuplicateCode(code) if code == "code-1"));

    let reloaded = RoomBook::load(&paths).expect("reload");
    assert_eq!(reloaded.rooms().len(), 1);
    assert_eq!(reloaded.rooms()[0].name, "first");
}

// =============================================================================
// remove
// =============================================================================

#[test]
fn remove_deletes_and_persists() {
    let (_dir, paths, mut book) = temp_book();
    book.add("keep", "code-k").expect("add");
    book.add("drop", "code-d").expect("add");

    let removed = book.remove("code-d").expect("remove");
    assert_eq!(removed.name, "drop");

    let reloaded = RoomBook::load(&paths).expect("reload");
    assert_eq!(reloaded.rooms().len(), 1);
    assert_eq!(reloaded.rooms()[0].code, "code-k");
}

#[test]
fn remove_unknown_code_is_an_error() {
    let (_dir, _paths, mut book) = temp_book();
    let err = book.remove("nope").expect_err("unknown code should fail");
    assert!(matches!(err, RoomBookError::UnknownCode(code) if code == "nope"));
}

// =============================================================================
// resolve
// =============================================================================

#[test]
fn resolve_prefers_exact_code_match() {
    let (_dir, _paths, mut book) = temp_book();
    // A room named after another room's code must not shadow the code.
    book.add("code-1", "code-2").expect("add");
    book.add("other", "code-1").expect("add");
    assert_eq!(book.resolve("code-1"), "code-1");
}

#[test]
fn resolve_maps_saved_name_to_its_code() {
    let (_dir, _paths, mut book) = temp_book();
    book.add("equipo it", "code-7").expect("add");
    assert_eq!(book.resolve("equipo it"), "code-7");
}

#[test]
fn resolve_passes_unsaved_codes_through() {
    let (_dir, _paths, book) = temp_book();
    assert_eq!(book.resolve("  anything-goes  "), "anything-goes");
}

// =============================================================================
// generate_code
// =============================================================================

#[test]
fn generate_code_is_a_uuid() {
    assert!(Uuid::parse_str(&generate_code()).is_ok());
}

#[test]
fn generate_code_two_calls_differ() {
    assert_ne!(generate_code(), generate_code());
}
