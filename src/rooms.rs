//! The room book: the locally saved list of chat rooms.
//!
//! Each entry pairs a user-chosen label with the unique join code used when
//! connecting to the relay. The list is ordered (insertion order survives
//! save/load), codes are unique, and both fields must be non-empty after
//! trimming. Nothing else is enforced; the relay neither knows nor cares
//! what is saved here.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::store::{self, StatePaths, StoreError};

/// A saved chat room: user-chosen label plus the unique join code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub code: String,
}

/// Error for room book operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomBookError {
    #[error("room name and code must be non-empty")]
    EmptyField,
    #[error("a room with code `{0}` already exists")]
    DuplicateCode(String),
    #[error("no saved room with code `{0}`")]
    UnknownCode(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The persisted, ordered room list.
#[derive(Debug)]
pub struct RoomBook {
    rooms: Vec<Room>,
    path: PathBuf,
}

impl RoomBook {
    /// Load the room book, treating a missing file as an empty list.
    ///
    /// # Errors
    ///
    /// A present-but-unparseable file is an error rather than silent data
    /// loss.
    pub fn load(paths: &StatePaths) -> Result<Self, RoomBookError> {
        let path = paths.rooms_file();
        // A missing or empty file is an empty book, same as an absent
        // identity file; only present-and-unparseable content is corrupt.
        let rooms = match store::read_opt(&path)? {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
            _ => Vec::new(),
        };
        Ok(Self { rooms, path })
    }

    /// Saved rooms in insertion order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Save a new room. Trims both fields, rejects empty values and
    /// duplicate codes, and persists on success.
    pub fn add(&mut self, name: &str, code: &str) -> Result<Room, RoomBookError> {
        let name = name.trim();
        let code = code.trim();
        if name.is_empty() || code.is_empty() {
            return Err(RoomBookError::EmptyField);
        }
        if self.rooms.iter().any(|room| room.code == code) {
            return Err(RoomBookError::DuplicateCode(code.to_owned()));
        }

        let room = Room {
            name: name.to_owned(),
            code: code.to_owned(),
        };
        self.rooms.push(room.clone());
        self.persist()?;
        Ok(room)
    }

    /// Delete the room with the given code, returning it.
    pub fn remove(&mut self, code: &str) -> Result<Room, RoomBookError> {
        let code = code.trim();
        let index = self
            .rooms
            .iter()
            .position(|room| room.code == code)
            .ok_or_else(|| RoomBookError::UnknownCode(code.to_owned()))?;
        let room = self.rooms.remove(index);
        self.persist()?;
        Ok(room)
    }

    /// Resolve a user-supplied room argument to a join code: an exact code
    /// match wins, then the first room with a matching name. Anything else
    /// passes through verbatim — joining never requires a saved room.
    #[must_use]
    pub fn resolve(&self, query: &str) -> String {
        let query = query.trim();
        if self.rooms.iter().any(|room| room.code == query) {
            return query.to_owned();
        }
        if let Some(room) = self.rooms.iter().find(|room| room.name == query) {
            return room.code.clone();
        }
        query.to_owned()
    }

    fn persist(&self) -> Result<(), StoreError> {
        // Same infallibility argument as the wire codec: plain structs of
        // strings always serialize.
        let raw = serde_json::to_string_pretty(&self.rooms).unwrap_or_default();
        store::write_atomic(&self.path, &raw)
    }
}

/// Generate a fresh room code.
#[must_use]
pub fn generate_code() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
#[path = "rooms_test.rs"]
mod tests;
