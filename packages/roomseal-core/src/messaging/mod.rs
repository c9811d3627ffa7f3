//! # Messaging Module
//!
//! The per-room [`MessageCipher`]: encrypts outbound message bodies and
//! decrypts inbound ones, falling back to plaintext whenever confidentiality
//! cannot be provided.
//!
//! ## Cipher States
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MESSAGE CIPHER STATES                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   construction                                                         │
//! │        │                                                                │
//! │        ├── probe() == false ──► ┌──────────┐                            │
//! │        │   or force_plaintext   │ Disabled │  (terminal, pass-through)  │
//! │        │                        └──────────┘                            │
//! │        ▼                                                                │
//! │  ┌───────────────┐  first encrypt / load_key / generate_key            │
//! │  │ Uninitialized │ ─────────────────────────────────────► ┌─────────┐  │
//! │  └───────────────┘                                         │  Keyed  │  │
//! │                                                            └─────────┘  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! | Situation | `encrypt` returns | `decrypt` returns |
//! |-----------|-------------------|-------------------|
//! | Disabled | plaintext | input |
//! | Uninitialized | (acquires key first) | input |
//! | Primitive / RNG failure | plaintext, logged | - |
//! | Session store unreadable | plaintext, logged, retried next call | - |
//! | Malformed envelope | - | input, logged |
//! | Wrong key / tampered | - | input, logged |
//!
//! Deliverability wins over secrecy: nothing here ever blocks a message.
//! Callers that need to tell the cases apart use [`MessageCipher::try_encrypt`]
//! and [`MessageCipher::try_decrypt`].

pub mod envelope;
mod record;
pub mod relay;

pub use record::ChatRecord;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::CipherConfig;
use crate::crypto::{self, AvailabilityProbe, KeyManager, PlatformProbe, RoomKey};
use crate::error::{Error, Result};
use crate::storage::SessionStore;

/// Observable cipher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    /// Secure primitives unavailable; pass-through for the instance's life
    Disabled,
    /// No room key yet
    Uninitialized,
    /// A room key is active
    Keyed,
}

impl CipherMode {
    /// Lowercase name for logs and UI badges
    pub fn as_str(&self) -> &'static str {
        match self {
            CipherMode::Disabled => "disabled",
            CipherMode::Uninitialized => "uninitialized",
            CipherMode::Keyed => "keyed",
        }
    }
}

enum CipherState {
    Disabled,
    Uninitialized,
    Keyed(RoomKey),
}

impl CipherState {
    fn mode(&self) -> CipherMode {
        match self {
            CipherState::Disabled => CipherMode::Disabled,
            CipherState::Uninitialized => CipherMode::Uninitialized,
            CipherState::Keyed(_) => CipherMode::Keyed,
        }
    }
}

/// Encrypts and decrypts message bodies for one chat room
///
/// One instance per active room view. The state lock is held across key
/// acquisition, so an instance shared through `Arc` still ends up with a
/// single key per room.
pub struct MessageCipher {
    room_id: String,
    keys: KeyManager,
    persist_generated_keys: bool,
    state: Mutex<CipherState>,
}

impl MessageCipher {
    /// Create a cipher for a room, probing the platform
    pub fn new(room_id: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        Self::with_config(room_id, store, &CipherConfig::default(), &PlatformProbe)
    }

    /// Create a cipher with explicit configuration and probe
    ///
    /// The probe runs exactly once, here.
    pub fn with_config(
        room_id: impl Into<String>,
        store: Arc<dyn SessionStore>,
        config: &CipherConfig,
        probe: &dyn AvailabilityProbe,
    ) -> Self {
        let room_id = room_id.into();

        let available = if config.force_plaintext {
            tracing::info!("Encryption switched off by configuration for room {}", room_id);
            false
        } else {
            probe.probe()
        };

        let state = if available {
            CipherState::Uninitialized
        } else {
            CipherState::Disabled
        };

        Self {
            keys: KeyManager::with_prefix(store, config.key_prefix.clone(), available),
            persist_generated_keys: config.persist_generated_keys,
            state: Mutex::new(state),
            room_id,
        }
    }

    /// The room this cipher serves
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Current state
    pub fn mode(&self) -> CipherMode {
        self.state.lock().mode()
    }

    /// Whether confidentiality can be provided at all
    pub fn is_available(&self) -> bool {
        self.keys.is_available()
    }

    /// Fingerprint of the active key, if any
    pub fn key_fingerprint(&self) -> Option<String> {
        match &*self.state.lock() {
            CipherState::Keyed(key) => Some(key.fingerprint()),
            _ => None,
        }
    }

    /// The key manager backing this cipher
    pub fn keys(&self) -> &KeyManager {
        &self.keys
    }

    // ========================================================================
    // KEY LIFECYCLE
    // ========================================================================

    /// Replace the active key with a freshly generated one
    ///
    /// Not persisted; call [`save_key`](Self::save_key) to keep it for the
    /// session. Returns `false` when disabled or if generation failed.
    pub fn generate_key(&self) -> bool {
        let mut state = self.state.lock();
        if matches!(*state, CipherState::Disabled) {
            return false;
        }

        match self.keys.generate() {
            Some(key) => {
                tracing::info!("Room {} now using generated key {}", self.room_id, key.fingerprint());
                *state = CipherState::Keyed(key);
                true
            }
            None => false,
        }
    }

    /// Load the room's persisted key and make it active
    ///
    /// `Ok(false)` when disabled or nothing is stored; the state is then
    /// left as it was. A stored record that cannot be imported is an error.
    pub fn load_key(&self) -> Result<bool> {
        let mut state = self.state.lock();
        if matches!(*state, CipherState::Disabled) {
            return Ok(false);
        }

        match self.keys.load(&self.room_id)? {
            Some(key) => {
                *state = CipherState::Keyed(key);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Persist the active key under `chat_key_<roomId>`
    ///
    /// `Ok(false)` when there is no active key.
    pub fn save_key(&self) -> Result<bool> {
        let state = self.state.lock();
        match &*state {
            CipherState::Keyed(key) => {
                self.keys.save(&self.room_id, key)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// First-use acquisition: prefer the persisted key, else generate.
    ///
    /// Only a missing or corrupt record is replaced. A failed read leaves
    /// the state untouched so the next call retries.
    fn acquire_key(&self, state: &mut CipherState) -> Result<()> {
        match self.keys.load(&self.room_id) {
            Ok(Some(key)) => {
                *state = CipherState::Keyed(key);
                return Ok(());
            }
            Ok(None) => {}
            Err(e @ (Error::DeserializationError(_) | Error::InvalidKey(_))) => {
                tracing::warn!(
                    "Replacing unusable persisted key for room {}: {}",
                    self.room_id,
                    e
                );
            }
            Err(e) => return Err(e),
        }

        let key = self.keys.generate().ok_or(Error::RngFailed)?;

        if self.persist_generated_keys {
            if let Err(e) = self.keys.save(&self.room_id, &key) {
                tracing::warn!("Could not persist new key for room {}: {}", self.room_id, e);
            }
        }

        tracing::info!("Room {} now using generated key {}", self.room_id, key.fingerprint());
        *state = CipherState::Keyed(key);
        Ok(())
    }

    // ========================================================================
    // ENCRYPT / DECRYPT
    // ========================================================================

    /// Encrypt a message body into an envelope
    ///
    /// Acquires a key on first use.
    ///
    /// ## Errors
    ///
    /// - `UnavailableCapability` when disabled
    /// - `RngFailed` / `EncryptionFailed` on primitive failure
    pub fn try_encrypt(&self, plaintext: &str) -> Result<String> {
        let mut state = self.state.lock();

        if matches!(*state, CipherState::Disabled) {
            return Err(Error::UnavailableCapability);
        }
        if matches!(*state, CipherState::Uninitialized) {
            self.acquire_key(&mut state)?;
        }

        let CipherState::Keyed(key) = &*state else {
            return Err(Error::NoActiveKey);
        };

        let (nonce, ciphertext) = crypto::encrypt(key, plaintext.as_bytes())?;
        Ok(envelope::seal(&nonce, &ciphertext))
    }

    /// Encrypt a message body, never failing
    ///
    /// When disabled, or if encryption fails, the plaintext comes back
    /// unchanged and **no confidentiality is provided**.
    pub fn encrypt(&self, plaintext: &str) -> String {
        match self.try_encrypt(plaintext) {
            Ok(sealed) => sealed,
            Err(Error::UnavailableCapability) => plaintext.to_string(),
            Err(e) => {
                tracing::error!(
                    "Encryption failed for room {}, sending plaintext: {}",
                    self.room_id,
                    e
                );
                plaintext.to_string()
            }
        }
    }

    /// Decrypt an envelope back into the message body
    ///
    /// ## Errors
    ///
    /// - `UnavailableCapability` when disabled
    /// - `NoActiveKey` before any key is active
    /// - `MalformedEnvelope` for non-base64 or short input
    /// - `AuthenticationFailure` for a wrong key or tampered envelope
    pub fn try_decrypt(&self, envelope: &str) -> Result<String> {
        let state = self.state.lock();

        let key = match &*state {
            CipherState::Disabled => return Err(Error::UnavailableCapability),
            CipherState::Uninitialized => return Err(Error::NoActiveKey),
            CipherState::Keyed(key) => key,
        };

        let (nonce, ciphertext) = envelope::open(envelope)?;
        let plaintext = crypto::decrypt(key, &nonce, &ciphertext)?;

        Ok(String::from_utf8_lossy(&plaintext).into_owned())
    }

    /// Decrypt an envelope, never failing
    ///
    /// Anything that cannot be opened (plaintext from a disabled peer, a
    /// stale key, corruption) comes back unchanged so the view keeps
    /// rendering.
    pub fn decrypt(&self, envelope: &str) -> String {
        match self.try_decrypt(envelope) {
            Ok(plaintext) => plaintext,
            Err(Error::UnavailableCapability) | Err(Error::NoActiveKey) => envelope.to_string(),
            Err(e) => {
                tracing::warn!("Decryption failed for room {}: {}", self.room_id, e);
                envelope.to_string()
            }
        }
    }

    // ========================================================================
    // TRANSPORT RECORDS
    // ========================================================================

    /// Encrypt a record's `message`; every other field passes through
    pub fn seal_record(&self, mut record: ChatRecord) -> ChatRecord {
        record.message = self.encrypt(&record.message);
        record
    }

    /// Decrypt a record's `message`; every other field passes through
    pub fn open_record(&self, mut record: ChatRecord) -> ChatRecord {
        record.message = self.decrypt(&record.message);
        record
    }
}

impl fmt::Debug for MessageCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageCipher")
            .field("room_id", &self.room_id)
            .field("mode", &self.mode())
            .field("key", &self.key_fingerprint())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
