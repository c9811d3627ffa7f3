//! # Room Cipher Demo
//!
//! Two views of the same room share a session store: one sends, the other
//! restores the room key and reads. A third cipher shows the plaintext
//! fallback.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example room_cipher_demo
//! ```

use std::sync::Arc;

use roomseal_core::{
    ChatRecord, CipherConfig, FixedProbe, MemorySessionStore, MessageCipher, SessionStore,
};

fn main() {
    println!("=== RoomSeal Core: Room Cipher Demo ===\n");

    let store = Arc::new(MemorySessionStore::new());

    // Step 1: First view of room 42 sends a message
    println!("Step 1: Sending in room 42...");
    let sender = MessageCipher::new("42", store.clone());
    let outbound = sender.seal_record(ChatRecord::text("hello"));
    println!("  Mode: {}", sender.mode().as_str());
    println!("  Key fingerprint: {:?}", sender.key_fingerprint());
    println!("  Envelope: {}", outbound.message);
    match outbound.to_json() {
        Ok(wire) => println!("  Wire record: {}", wire),
        Err(e) => println!("  Could not serialize record: {}", e),
    }
    println!();

    // Step 2: The key was persisted for the session
    println!("Step 2: Session store...");
    match store.get("chat_key_42") {
        Ok(Some(_)) => println!("  chat_key_42 is present"),
        Ok(None) => println!("  chat_key_42 is missing"),
        Err(e) => println!("  Store error: {}", e),
    }
    println!();

    // Step 3: A fresh view restores the key and reads
    println!("Step 3: Fresh view opens the envelope...");
    let reader = MessageCipher::new("42", store.clone());
    match reader.load_key() {
        Ok(true) => println!("  Restored key {:?}", reader.key_fingerprint()),
        Ok(false) => println!("  No key to restore"),
        Err(e) => println!("  Restore failed: {}", e),
    }
    let inbound = reader.open_record(outbound);
    println!("  Decrypted: {}", inbound.message);
    println!();

    // Step 4: Plaintext fallback
    println!("Step 4: Cipher without secure primitives...");
    let insecure = MessageCipher::with_config(
        "42",
        store,
        &CipherConfig::default(),
        &FixedProbe(false),
    );
    println!("  Mode: {}", insecure.mode().as_str());
    println!("  encrypt(\"hello\") = {:?}", insecure.encrypt("hello"));
    println!();

    println!("=== Demo Complete ===");
}
