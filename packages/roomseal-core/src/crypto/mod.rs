//! # Cryptography Module
//!
//! Everything that touches key material or the AEAD primitive.
//!
//! ## Algorithm Choices
//!
//! | Algorithm | Purpose | Notes |
//! |-----------|---------|-------|
//! | AES-256-GCM | Message encryption | 12-byte random nonce, 16-byte tag |
//! | OS CSPRNG | Keys and nonces | `rand::rngs::OsRng` |
//! | SHA-256 | Key fingerprints | Logs only, never key derivation |
//! | JWK | Key export | Interchangeable with WebCrypto |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: Room keys and exported records are zeroized when dropped
//! 2. **No Nonce Reuse**: A fresh random nonce for every encryption
//! 3. **One Key Per Room**: A leaked room key exposes that room only
//! 4. **Session Scope**: Persisted keys live no longer than the client session

mod encryption;
mod key_manager;
mod keys;
mod probe;

pub use encryption::{decrypt, encrypt, Nonce, NONCE_SIZE, TAG_SIZE};
pub use key_manager::KeyManager;
pub use keys::{ExportedKey, RoomKey, KEY_SIZE};
pub use probe::{AvailabilityProbe, FixedProbe, PlatformProbe};
