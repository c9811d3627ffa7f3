//! # Envelope Codec
//!
//! Frames one encrypted message for text transport.
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────────────┐
//! │  nonce (12 B)    │  ciphertext || tag (len(msg) + 16 B) │
//! └──────────────────┴──────────────────────────────────────┘
//!                     ↓ base64 (standard alphabet, padded)
//!                "q83vEjRWeJq83vEj..."
//! ```
//!
//! Framing only. No cryptographic operation happens here, and nothing here
//! can pick or reuse a nonce.
//!
//! Decoding is as forgiving as a browser's `atob`: ASCII whitespace anywhere
//! is ignored and the `=` padding is optional.

use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD as BASE64},
        DecodePaddingMode,
    },
    Engine as _,
};

use crate::crypto::{Nonce, NONCE_SIZE};
use crate::error::{Error, Result};

/// Standard alphabet, padding optional, stray trailing bits dropped
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Concatenate nonce and ciphertext, then base64 the result
pub fn seal(nonce: &Nonce, ciphertext: &[u8]) -> String {
    let mut framed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    framed.extend_from_slice(nonce.as_bytes());
    framed.extend_from_slice(ciphertext);
    BASE64.encode(framed)
}

/// Reverse [`seal`]: decode, then split off the leading nonce
///
/// ## Errors
///
/// `MalformedEnvelope` if the input is not base64 or decodes to fewer
/// than 12 bytes.
pub fn open(envelope: &str) -> Result<(Nonce, Vec<u8>)> {
    let compact: String = envelope
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let mut framed = FORGIVING.decode(compact)?;

    if framed.len() < NONCE_SIZE {
        return Err(Error::MalformedEnvelope(format!(
            "decoded {} bytes, need at least {}",
            framed.len(),
            NONCE_SIZE
        )));
    }

    let ciphertext = framed.split_off(NONCE_SIZE);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&framed);

    Ok((Nonce::from_bytes(nonce), ciphertext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_layout() {
        let nonce = Nonce::from_bytes([7u8; NONCE_SIZE]);
        let sealed = seal(&nonce, &[1, 2, 3]);

        let raw = BASE64.decode(&sealed).unwrap();
        assert_eq!(&raw[..NONCE_SIZE], &[7u8; NONCE_SIZE]);
        assert_eq!(&raw[NONCE_SIZE..], &[1, 2, 3]);
    }

    #[test]
    fn test_open_splits_nonce() {
        let nonce = Nonce::from_bytes([9u8; NONCE_SIZE]);
        let (opened_nonce, ciphertext) = open(&seal(&nonce, b"payload")).unwrap();

        assert_eq!(opened_nonce, nonce);
        assert_eq!(ciphertext, b"payload");
    }

    #[test]
    fn test_nonce_only_envelope_is_valid() {
        let nonce = Nonce::from_bytes([0u8; NONCE_SIZE]);
        let (_, ciphertext) = open(&seal(&nonce, &[])).unwrap();
        assert!(ciphertext.is_empty());
    }

    #[test]
    fn test_short_payload_rejected() {
        // 11 bytes once decoded
        let short = BASE64.encode([0u8; NONCE_SIZE - 1]);
        assert!(matches!(open(&short), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn test_non_base64_rejected() {
        assert!(matches!(open("short"), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(open("hello world!"), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(open(""), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn test_open_accepts_unpadded() {
        let nonce = Nonce::from_bytes([3u8; NONCE_SIZE]);
        // 12 + 2 bytes leaves one '=' of padding
        let sealed = seal(&nonce, &[0xaa, 0xbb]);
        assert!(sealed.ends_with('='));

        let (opened_nonce, ciphertext) = open(sealed.trim_end_matches('=')).unwrap();
        assert_eq!(opened_nonce, nonce);
        assert_eq!(ciphertext, vec![0xaa, 0xbb]);
    }

    #[test]
    fn test_open_ignores_interior_whitespace() {
        let nonce = Nonce::from_bytes([5u8; NONCE_SIZE]);
        let sealed = seal(&nonce, b"wrapped");

        let (head, tail) = sealed.split_at(8);
        let wrapped = format!(" {}\r\n{}\t{} \n", head, &tail[..4], &tail[4..]);

        let (opened_nonce, ciphertext) = open(&wrapped).unwrap();
        assert_eq!(opened_nonce, nonce);
        assert_eq!(ciphertext, b"wrapped");
    }

    #[test]
    fn test_whitespace_only_rejected() {
        assert!(matches!(open(" \n\t "), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn test_output_is_printable_ascii() {
        let nonce = Nonce::from_bytes([0xffu8; NONCE_SIZE]);
        let sealed = seal(&nonce, &[0u8, 0xfe, 0x80, 0x0a]);
        assert!(sealed.bytes().all(|b| b.is_ascii_graphic()));
    }
}
