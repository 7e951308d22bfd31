//! Locally persisted client identity.
//!
//! A random identifier generated once per installation and reused as the
//! `user` field on every outgoing message. There is no authentication and no
//! uniqueness guarantee across machines beyond random collision avoidance.

use uuid::Uuid;

use crate::store::{self, StatePaths, StoreError};

/// Return the persisted client identifier, generating one on first use.
pub fn client_id(paths: &StatePaths) -> Result<String, StoreError> {
    let path = paths.identity_file();
    if let Some(raw) = store::read_opt(&path)? {
        let existing = raw.trim();
        if !existing.is_empty() {
            return Ok(existing.to_owned());
        }
    }

    let id = Uuid::new_v4().to_string();
    store::write_atomic(&path, &id)?;
    Ok(id)
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
