//! # Storage Module
//!
//! Session-scoped storage for exported room keys.
//!
//! ## Storage Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SESSION STORE                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  SessionStore Trait                                                    │
//! │  ──────────────────                                                     │
//! │  • get(key)          - Read a stored string                            │
//! │  • set(key, value)   - Write, last writer wins                         │
//! │  • remove(key)       - Drop one entry                                  │
//! │  • clear()           - Session end                                     │
//! │                                                                         │
//! │  ┌───────────────────────┐   ┌───────────────────────┐                 │
//! │  │  MemorySessionStore   │   │  BrowserSessionStore  │                 │
//! │  │  (every target)       │   │  (wasm32 only)        │                 │
//! │  │                       │   │                       │                 │
//! │  │  Process-lifetime map │   │  window.sessionStorage│                 │
//! │  └───────────────────────┘   └───────────────────────┘                 │
//! │                                                                         │
//! │  Entries: chat_key_<roomId> → JWK JSON                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is durable: contents live as long as the client session.

mod session_store;

#[cfg(target_arch = "wasm32")]
mod browser;

pub use session_store::MemorySessionStore;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserSessionStore;

use crate::error::Result;

/// String-keyed, string-valued store scoped to the client session
///
/// Shared process-wide; writes are last-writer-wins with no conflict
/// detection.
pub trait SessionStore: Send + Sync {
    /// Read an entry
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write an entry, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove an entry, returning whether it existed
    fn remove(&self, key: &str) -> Result<bool>;

    /// Remove every entry (session end)
    fn clear(&self) -> Result<()>;
}
