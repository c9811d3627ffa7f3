//! Availability probing for the authenticated-encryption and secure-random
//! primitives.
//!
//! A [`MessageCipher`](crate::MessageCipher) asks once, at construction, and
//! keeps the answer for its whole life.

use rand::RngCore;

use super::encryption::{decrypt, encrypt_with_nonce, Nonce, NONCE_SIZE};
use super::keys::{RoomKey, KEY_SIZE};

/// Reports whether secure primitives are usable in the current context
pub trait AvailabilityProbe {
    /// `true` iff AEAD and secure randomness are reachable
    fn probe(&self) -> bool;
}

/// Any `Fn() -> bool` works as a check, e.g. a host-supplied feature test
impl<F: Fn() -> bool> AvailabilityProbe for F {
    fn probe(&self) -> bool {
        self()
    }
}

/// Probe that always answers the same way
///
/// For hosts that already know the answer, and for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedProbe(pub bool);

impl AvailabilityProbe for FixedProbe {
    fn probe(&self) -> bool {
        self.0
    }
}

/// Probe that inspects the running platform
///
/// - Native: the OS CSPRNG must deliver bytes and an AES-256-GCM self-test
///   must round-trip.
/// - Browser (wasm32): additionally requires a `window` in a secure context
///   exposing `crypto`. Plain-HTTP pages fail here.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformProbe;

impl AvailabilityProbe for PlatformProbe {
    fn probe(&self) -> bool {
        if !secure_context() {
            tracing::warn!("Not a secure context - encryption disabled, messages will be sent as plaintext");
            return false;
        }

        if !self_test() {
            tracing::warn!("Crypto self-test failed - encryption disabled, messages will be sent as plaintext");
            return false;
        }

        true
    }
}

#[cfg(target_arch = "wasm32")]
fn secure_context() -> bool {
    match web_sys::window() {
        Some(window) => window.is_secure_context() && window.crypto().is_ok(),
        None => false,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn secure_context() -> bool {
    true
}

/// Draw randomness and round-trip one block under a throwaway key.
fn self_test() -> bool {
    let mut key_bytes = [0u8; KEY_SIZE];
    if rand::rngs::OsRng.try_fill_bytes(&mut key_bytes).is_err() {
        return false;
    }

    let key = RoomKey::from_bytes(key_bytes);
    let nonce = Nonce::from_bytes([0u8; NONCE_SIZE]);
    let block = [0x5au8; 16];

    encrypt_with_nonce(&key, &nonce, &block)
        .and_then(|ct| decrypt(&key, &nonce, &ct))
        .map(|pt| pt == block)
        .unwrap_or(false)
}
