//! Transport record shape shared with the chat socket.
//!
//! ```text
//! {
//!   "message":   "<text or envelope>",   // the only field the cipher touches
//!   "type":      "text" | "file" | ...,
//!   "reply_to":  123 | null,
//!   "file_data": { ... } | null,
//!   ...                                   // anything else passes through
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// One chat message as it travels over the socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Message body: plaintext before sealing, envelope after
    pub message: String,

    /// Message kind (`"text"`, `"file"`, `"image"`, ...)
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,

    /// Identifier of the message being replied to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Value>,

    /// Attachment metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<Value>,

    /// Fields this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_kind() -> String {
    "text".to_string()
}

impl ChatRecord {
    /// Plain text message with no reply or attachment
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: default_kind(),
            reply_to: None,
            file_data: None,
            extra: Map::new(),
        }
    }

    /// Serialize to the JSON sent on the wire
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::SerializationError(e.to_string()))
    }

    /// Parse a record received from the wire
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::DeserializationError(e.to_string()))
    }
}
