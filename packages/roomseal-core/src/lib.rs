//! # RoomSeal Core
//!
//! Client-side message confidentiality for chat rooms: one symmetric key per
//! room, a compact envelope for each encrypted message, and a well-defined
//! plaintext fallback when secure primitives are unavailable.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ROOMSEAL CORE MODULES                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐   ┌────────────┐  │
//! │  │ Availability│   │ Key Manager │   │  Envelope   │   │  Message   │  │
//! │  │   Prober    │──►│             │──►│   Codec     │──►│  Cipher    │  │
//! │  │             │   │ - generate  │   │             │   │            │  │
//! │  │ - probe()   │   │ - export    │   │ - seal      │   │ - encrypt  │  │
//! │  │             │   │ - import    │   │ - open      │   │ - decrypt  │  │
//! │  │             │   │ - save/load │   │             │   │            │  │
//! │  └─────────────┘   └──────┬──────┘   └─────────────┘   └────────────┘  │
//! │                           │                                             │
//! │                    ┌──────▼──────┐                                      │
//! │                    │ SessionStore│  chat_key_<roomId> → JWK             │
//! │                    └─────────────┘                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`config`] - Cipher configuration
//! - [`crypto`] - AES-256-GCM, room keys, key manager, availability probe
//! - [`storage`] - Session-scoped key storage
//! - [`messaging`] - Message cipher, envelope codec, transport records
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use roomseal_core::{MemorySessionStore, MessageCipher};
//!
//! let store = Arc::new(MemorySessionStore::new());
//! let room = MessageCipher::new("42", store);
//!
//! let envelope = room.encrypt("hello");
//! assert_eq!(room.decrypt(&envelope), "hello");
//! ```
//!
//! ## What This Does Not Cover
//!
//! Transport security, asymmetric key exchange between users, multi-device
//! key sync, key rotation / forward secrecy, and server-side storage.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod config;
pub mod crypto;
pub mod error;
pub mod messaging;
pub mod storage;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use config::CipherConfig;
pub use crypto::{AvailabilityProbe, FixedProbe, KeyManager, PlatformProbe, RoomKey};
pub use error::{Error, Result};
pub use messaging::{ChatRecord, CipherMode, MessageCipher};
pub use storage::{MemorySessionStore, SessionStore};

#[cfg(target_arch = "wasm32")]
pub use storage::BrowserSessionStore;

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of RoomSeal Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
