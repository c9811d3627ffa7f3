//! # Key Manager
//!
//! Creates, exports, imports, and persists one [`RoomKey`] per chat room.
//!
//! ## Key Lifecycle
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ROOM KEY LIFECYCLE                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   generate() ──► RoomKey ──► export() ──► JWK JSON                     │
//! │                     ▲                        │                          │
//! │                     │                        ▼                          │
//! │                 import() ◄──────── save(room) → chat_key_<room>        │
//! │                     ▲                                                   │
//! │                     └──────────── load(room) ◄── session store         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stored record is derived from the in-memory key, never a second
//! source of truth: `save` overwrites whatever the room had.

use std::fmt;
use std::sync::Arc;

use super::keys::{ExportedKey, RoomKey};
use crate::config::DEFAULT_KEY_PREFIX;
use crate::error::{Error, Result};
use crate::storage::SessionStore;

/// Room key factory and persistence front-end
pub struct KeyManager {
    store: Arc<dyn SessionStore>,
    key_prefix: String,
    available: bool,
}

impl KeyManager {
    /// Create a key manager over a session store
    ///
    /// `available` is the prober's verdict; when `false` every operation
    /// declines rather than touching key material.
    pub fn new(store: Arc<dyn SessionStore>, available: bool) -> Self {
        Self::with_prefix(store, DEFAULT_KEY_PREFIX, available)
    }

    /// Create a key manager with a custom storage key prefix
    pub fn with_prefix(
        store: Arc<dyn SessionStore>,
        key_prefix: impl Into<String>,
        available: bool,
    ) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
            available,
        }
    }

    /// Whether secure primitives were reported available
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Session-store key for a room
    pub fn storage_key(&self, room_id: &str) -> String {
        format!("{}{}", self.key_prefix, room_id)
    }

    /// Produce a fresh random room key
    ///
    /// Returns `None` when unavailable, or if the CSPRNG fails.
    pub fn generate(&self) -> Option<RoomKey> {
        if !self.available {
            return None;
        }

        match RoomKey::generate() {
            Ok(key) => {
                tracing::debug!("Generated room key {}", key.fingerprint());
                Some(key)
            }
            Err(e) => {
                tracing::error!("Room key generation failed: {}", e);
                None
            }
        }
    }

    /// Serialize a key to its stored JSON form
    pub fn export(&self, key: &RoomKey) -> Result<String> {
        if !self.available {
            return Err(Error::UnavailableCapability);
        }
        key.export().to_json()
    }

    /// Reconstruct a key from its stored JSON form
    ///
    /// Malformed input is a decode error, never a panic.
    pub fn import(&self, data: &str) -> Result<RoomKey> {
        if !self.available {
            return Err(Error::UnavailableCapability);
        }
        let record = ExportedKey::from_json(data)?;
        RoomKey::import(&record)
    }

    /// Persist a room's key, overwriting any prior entry
    pub fn save(&self, room_id: &str, key: &RoomKey) -> Result<()> {
        let exported = self.export(key)?;
        self.store.set(&self.storage_key(room_id), &exported)?;
        tracing::info!("Saved room key {} for room {}", key.fingerprint(), room_id);
        Ok(())
    }

    /// Read and import a room's persisted key
    ///
    /// `Ok(None)` when nothing is stored or when unavailable. A stored entry
    /// that fails to import is an error.
    pub fn load(&self, room_id: &str) -> Result<Option<RoomKey>> {
        if !self.available {
            return Ok(None);
        }

        let Some(data) = self.store.get(&self.storage_key(room_id))? else {
            tracing::debug!("No persisted key for room {}", room_id);
            return Ok(None);
        };

        let key = self.import(&data)?;
        tracing::info!("Loaded room key {} for room {}", key.fingerprint(), room_id);
        Ok(Some(key))
    }

    /// Remove a room's persisted key, returning whether one existed
    pub fn forget(&self, room_id: &str) -> Result<bool> {
        self.store.remove(&self.storage_key(room_id))
    }
}

impl fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyManager")
            .field("key_prefix", &self.key_prefix)
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================
