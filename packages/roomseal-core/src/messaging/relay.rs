//! Stream adapters between a room's socket and its [`MessageCipher`].
//!
//! The transport itself lives outside this crate. These adapters only map
//! records as they flow past: outbound bodies get sealed, inbound bodies get
//! opened, and every other field is left alone.

use std::sync::Arc;

use futures::{Stream, StreamExt};

use super::{ChatRecord, MessageCipher};
use crate::error::Result;

/// Seal the `message` of every outbound record
pub fn seal_outbound<S>(cipher: Arc<MessageCipher>, records: S) -> impl Stream<Item = ChatRecord>
where
    S: Stream<Item = ChatRecord>,
{
    records.map(move |record| cipher.seal_record(record))
}

/// Open the `message` of every inbound record
pub fn open_inbound<S>(cipher: Arc<MessageCipher>, records: S) -> impl Stream<Item = ChatRecord>
where
    S: Stream<Item = ChatRecord>,
{
    records.map(move |record| cipher.open_record(record))
}

/// Parse raw inbound text frames and open each record
///
/// A frame that is not a valid record yields an error item; the stream
/// keeps going.
pub fn open_inbound_frames<S>(
    cipher: Arc<MessageCipher>,
    frames: S,
) -> impl Stream<Item = Result<ChatRecord>>
where
    S: Stream<Item = String>,
{
    frames.map(move |frame| -> Result<ChatRecord> {
        let record = ChatRecord::from_json(&frame).map_err(|e| {
            tracing::warn!("Dropping unreadable frame for room {}: {}", cipher.room_id(), e);
            e
        })?;
        Ok(cipher.open_record(record))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CipherConfig;
    use crate::crypto::FixedProbe;
    use crate::storage::MemorySessionStore;
    use futures::stream;

    fn room_pair() -> (Arc<MessageCipher>, Arc<MessageCipher>) {
        let store = Arc::new(MemorySessionStore::new());
        let config = CipherConfig::default();

        let sender = Arc::new(MessageCipher::with_config(
            "relay",
            store.clone(),
            &config,
            &FixedProbe(true),
        ));
        sender.generate_key();
        sender.save_key().unwrap();

        let receiver = Arc::new(MessageCipher::with_config(
            "relay",
            store,
            &config,
            &FixedProbe(true),
        ));
        receiver.load_key().unwrap();

        (sender, receiver)
    }

    #[tokio::test]
    async fn test_outbound_then_inbound() {
        let (sender, receiver) = room_pair();

        let outbound: Vec<ChatRecord> = seal_outbound(
            sender,
            stream::iter(vec![ChatRecord::text("one"), ChatRecord::text("two")]),
        )
        .collect()
        .await;

        assert!(outbound.iter().all(|r| r.message != "one" && r.message != "two"));

        let inbound: Vec<String> = open_inbound(receiver, stream::iter(outbound))
            .map(|r| r.message)
            .collect()
            .await;

        assert_eq!(inbound, vec!["one".to_string(), "two".to_string()]);
    }

    #[tokio::test]
    async fn test_frames_with_garbage() {
        let (sender, receiver) = room_pair();

        let good = sender.seal_record(ChatRecord::text("hi")).to_json().unwrap();
        let frames = stream::iter(vec![good, "not json".to_string()]);

        let results: Vec<Result<ChatRecord>> = open_inbound_frames(receiver, frames).collect().await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().message, "hi");
        assert!(results[1].is_err());
    }

    #[tokio::test]
    async fn test_plaintext_peer_passes_through() {
        let (_, receiver) = room_pair();

        let frames = stream::iter(vec![r#"{"message":"from an http client","type":"text"}"#.to_string()]);
        let results: Vec<Result<ChatRecord>> = open_inbound_frames(receiver, frames).collect().await;

        assert_eq!(results[0].as_ref().unwrap().message, "from an http client");
    }
}
