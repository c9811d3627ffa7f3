//! # Room Keys
//!
//! One 256-bit AES-GCM key per chat room, plus its exported record.
//!
//! ## Exported Key Record
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON Web Key (RFC 7517), the shape WebCrypto `exportKey("jwk")` emits  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  {                                                                      │
//! │    "kty": "oct",                    // symmetric key                    │
//! │    "k": "base64url(32 bytes)",      // no padding                       │
//! │    "alg": "A256GCM",                                                    │
//! │    "ext": true,                                                         │
//! │    "key_ops": ["encrypt", "decrypt"]                                    │
//! │  }                                                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records written by a browser client import here and vice versa.

use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::{Zeroizing, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// Size of a room key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// JWK `kty` for symmetric keys
const JWK_KTY_OCT: &str = "oct";

/// JWK `alg` for AES-256-GCM
const JWK_ALG: &str = "A256GCM";

const OP_ENCRYPT: &str = "encrypt";
const OP_DECRYPT: &str = "decrypt";

/// A symmetric AES-256-GCM key bound to one chat room
///
/// Zeroized when dropped. `Debug` prints only the fingerprint.
#[derive(ZeroizeOnDrop)]
pub struct RoomKey([u8; KEY_SIZE]);

impl RoomKey {
    /// Generate a fresh random key from the OS CSPRNG
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; KEY_SIZE];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|_| Error::RngFailed)?;
        Ok(Self(bytes))
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Short, non-reversible identifier for logs
    ///
    /// First 8 bytes of SHA-256 over the key, hex encoded.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0);
        hex::encode(&digest[..8])
    }

    /// Export as a JWK record
    pub fn export(&self) -> ExportedKey {
        ExportedKey {
            kty: JWK_KTY_OCT.to_string(),
            k: URL_SAFE_NO_PAD.encode(self.0),
            alg: Some(JWK_ALG.to_string()),
            ext: Some(true),
            key_ops: vec![OP_ENCRYPT.to_string(), OP_DECRYPT.to_string()],
        }
    }

    /// Reconstruct a key from a JWK record
    pub fn import(record: &ExportedKey) -> Result<Self> {
        if record.kty != JWK_KTY_OCT {
            return Err(Error::InvalidKey(format!(
                "expected kty \"{}\", got \"{}\"",
                JWK_KTY_OCT, record.kty
            )));
        }

        if let Some(alg) = record.alg.as_deref() {
            if alg != JWK_ALG {
                return Err(Error::InvalidKey(format!("unsupported alg \"{}\"", alg)));
            }
        }

        if record.ext == Some(false) {
            return Err(Error::InvalidKey("key record is not extractable".into()));
        }

        if !record.key_ops.is_empty()
            && !(record.key_ops.iter().any(|op| op == OP_ENCRYPT)
                && record.key_ops.iter().any(|op| op == OP_DECRYPT))
        {
            return Err(Error::InvalidKey(
                "key_ops must allow encrypt and decrypt".into(),
            ));
        }

        let decoded = Zeroizing::new(
            URL_SAFE_NO_PAD
                .decode(record.k.as_bytes())
                .map_err(|e| Error::InvalidKey(format!("bad key encoding: {}", e)))?,
        );

        if decoded.len() != KEY_SIZE {
            return Err(Error::InvalidKey(format!(
                "expected {} key bytes, got {}",
                KEY_SIZE,
                decoded.len()
            )));
        }

        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl fmt::Debug for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RoomKey").field(&self.fingerprint()).finish()
    }
}

/// Serialized room key (JWK)
///
/// The `k` member is key material and is wiped on drop.
#[derive(Serialize, Deserialize, ZeroizeOnDrop)]
pub struct ExportedKey {
    /// Key type, always `"oct"`
    #[zeroize(skip)]
    pub kty: String,
    /// Base64url key bytes without padding
    pub k: String,
    /// Algorithm identifier
    #[zeroize(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Extractable flag
    #[zeroize(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<bool>,
    /// Permitted operations
    #[zeroize(skip)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_ops: Vec<String>,
}

impl ExportedKey {
    /// Serialize to the JSON stored in the session store
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::SerializationError(e.to_string()))
    }

    /// Parse a stored JSON record
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::DeserializationError(e.to_string()))
    }
}

impl fmt::Debug for ExportedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedKey")
            .field("kty", &self.kty)
            .field("k", &"<redacted>")
            .field("alg", &self.alg)
            .field("ext", &self.ext)
            .field("key_ops", &self.key_ops)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_unique() {
        let a = RoomKey::generate().unwrap();
        let b = RoomKey::generate().unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_export_shape() {
        let key = RoomKey::from_bytes([0u8; 32]);
        let json: serde_json::Value =
            serde_json::from_str(&key.export().to_json().unwrap()).unwrap();

        assert_eq!(json["kty"], "oct");
        assert_eq!(json["alg"], "A256GCM");
        assert_eq!(json["ext"], true);
        assert_eq!(json["key_ops"], serde_json::json!(["encrypt", "decrypt"]));
        // 32 zero bytes, base64url without padding
        assert_eq!(json["k"], "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
    }

    #[test]
    fn test_import_restores_same_key() {
        let key = RoomKey::generate().unwrap();
        let json = key.export().to_json().unwrap();

        let restored = RoomKey::import(&ExportedKey::from_json(&json).unwrap()).unwrap();
        assert_eq!(restored.as_bytes(), key.as_bytes());
        assert_eq!(restored.fingerprint(), key.fingerprint());
    }

    #[test]
    fn test_import_browser_record() {
        // Member order and extra fields as a browser emits them
        let json = r#"{"alg":"A256GCM","ext":true,"k":"AQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQE","key_ops":["encrypt","decrypt"],"kty":"oct"}"#;
        let key = RoomKey::import(&ExportedKey::from_json(json).unwrap()).unwrap();
        assert_eq!(key.as_bytes(), &[1u8; 32]);
    }

    #[test]
    fn test_import_minimal_record() {
        let json = r#"{"kty":"oct","k":"AQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQE"}"#;
        assert!(RoomKey::import(&ExportedKey::from_json(json).unwrap()).is_ok());
    }

    #[test]
    fn test_import_rejects_wrong_kty() {
        let mut record = RoomKey::from_bytes([1u8; 32]).export();
        record.kty = "RSA".into();
        assert!(matches!(RoomKey::import(&record), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_import_rejects_wrong_alg() {
        let mut record = RoomKey::from_bytes([1u8; 32]).export();
        record.alg = Some("A128GCM".into());
        assert!(matches!(RoomKey::import(&record), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_import_rejects_short_key() {
        let json = r#"{"kty":"oct","k":"AQEBAQ"}"#;
        let result = RoomKey::import(&ExportedKey::from_json(json).unwrap());
        assert!(matches!(result, Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_import_rejects_bad_encoding() {
        let json = r#"{"kty":"oct","k":"!!!not-base64!!!"}"#;
        let result = RoomKey::import(&ExportedKey::from_json(json).unwrap());
        assert!(matches!(result, Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_import_rejects_restricted_ops() {
        let mut record = RoomKey::from_bytes([1u8; 32]).export();
        record.key_ops = vec!["decrypt".into()];
        assert!(RoomKey::import(&record).is_err());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ExportedKey::from_json("not json"),
            Err(Error::DeserializationError(_))
        ));
        assert!(ExportedKey::from_json(r#"{"kty":"oct"}"#).is_err());
    }

    #[test]
    fn test_debug_hides_material() {
        let key = RoomKey::from_bytes([9u8; 32]);
        let shown = format!("{:?} {:?}", key, key.export());
        assert!(!shown.contains(&key.export().k));
        assert!(shown.contains(&key.fingerprint()));
    }
}
