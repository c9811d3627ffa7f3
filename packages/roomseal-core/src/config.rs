//! Configuration for a [`MessageCipher`](crate::MessageCipher).

use serde::Deserialize;

use crate::error::Result;

/// Default session-store key prefix; the full key is `chat_key_<roomId>`.
pub const DEFAULT_KEY_PREFIX: &str = "chat_key_";

/// Configuration for a room cipher
///
/// Every field has a default, so a partial JSON document is accepted:
///
/// ```
/// use roomseal_core::CipherConfig;
///
/// let config = CipherConfig::from_json(r#"{ "force_plaintext": true }"#).unwrap();
/// assert!(config.force_plaintext);
/// assert_eq!(config.key_prefix, "chat_key_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    /// Prefix for session-store entries (`<prefix><roomId>`)
    pub key_prefix: String,
    /// Skip probing and start in pass-through mode
    pub force_plaintext: bool,
    /// Save a key generated on first use straight to the session store
    pub persist_generated_keys: bool,
}

impl CipherConfig {
    /// Parse a configuration from JSON, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Session-store key for a room
    pub fn storage_key(&self, room_id: &str) -> String {
        format!("{}{}", self.key_prefix, room_id)
    }
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            force_plaintext: false,
            persist_generated_keys: true,
        }
    }
}
