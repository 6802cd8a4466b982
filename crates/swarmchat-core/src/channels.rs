//! Channel registry
//!
//! Owns every channel the client knows about, keyed by name. All mutation is
//! routed through the sync coordinator, which is the sole owner of this
//! registry; the UI and command resolver only ever refer to channels by name.

use serde::{Deserialize, Serialize};

use crate::message::{merge_into, EnrichedMessage};

/// The distinguished default channel. It is joined at startup and can never
/// be removed.
pub const HOME_CHANNEL: &str = "friends";

// ----------------------------------------------------------------------------
// Channel
// ----------------------------------------------------------------------------

/// A single chat channel and its replayed message history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    /// Stable display ordinal, assigned when the channel is first seen.
    pub id: usize,
    pub active: bool,
    pub peers: usize,
    pub messages: Vec<EnrichedMessage>,
}

impl Channel {
    fn new(name: &str, id: usize) -> Self {
        Self {
            name: name.to_string(),
            id,
            active: false,
            peers: 0,
            messages: Vec::new(),
        }
    }

    /// Fold an incoming message into the channel: if the previous entry has
    /// the same author it is merged, otherwise the message is appended.
    /// Returns whether a merge happened. Adjacency is the only criterion;
    /// catch-up state does not factor in.
    pub fn apply(&mut self, message: EnrichedMessage) -> bool {
        match self.messages.last_mut() {
            Some(last) if last.author == message.author => {
                merge_into(last, message);
                true
            }
            _ => {
                self.messages.push(message);
                false
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Channel Store
// ----------------------------------------------------------------------------

/// In-memory registry of channels, keyed by name
#[derive(Debug, Default)]
pub struct ChannelStore {
    channels: Vec<Channel>,
}

impl ChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.iter_mut().find(|c| c.name == name)
    }

    /// Return the channel, creating it (inactive, empty, zero peers) if it
    /// does not exist yet. New channels take the current channel count as
    /// their display ordinal.
    pub fn ensure(&mut self, name: &str) -> &mut Channel {
        if let Some(index) = self.channels.iter().position(|c| c.name == name) {
            return &mut self.channels[index];
        }
        let id = self.channels.len();
        self.channels.push(Channel::new(name, id));
        &mut self.channels[id]
    }

    /// Register a channel restored from persistence under its stored ordinal
    pub fn restore(&mut self, name: &str, id: usize) -> &mut Channel {
        if let Some(index) = self.channels.iter().position(|c| c.name == name) {
            return &mut self.channels[index];
        }
        self.channels.push(Channel::new(name, id));
        let last = self.channels.len() - 1;
        &mut self.channels[last]
    }

    /// Make `name` the single active channel. Returns false (and deactivates
    /// nothing) if the channel is unknown.
    pub fn select(&mut self, name: &str) -> bool {
        if !self.contains(name) {
            return false;
        }
        for channel in &mut self.channels {
            channel.active = channel.name == name;
        }
        true
    }

    pub fn active(&self) -> Option<&Channel> {
        self.channels.iter().find(|c| c.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut Channel> {
        self.channels.iter_mut().find(|c| c.active)
    }

    /// Remove a channel. The home channel is protected: removing it is a
    /// no-op. Returns whether a channel was actually removed. The store does
    /// not auto-select a replacement; the caller selects the home channel
    /// when it removed the active one.
    pub fn remove(&mut self, name: &str) -> bool {
        if name == HOME_CHANNEL {
            return false;
        }
        let before = self.channels.len();
        self.channels.retain(|c| c.name != name);
        self.channels.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Channel> {
        self.channels.iter_mut()
    }

    pub fn names(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.name.clone()).collect()
    }

    /// Count a peer joining the channel. Unknown channels are ignored: the
    /// peer event may race a channel we have already left.
    pub fn peer_joined(&mut self, name: &str) {
        if let Some(channel) = self.get_mut(name) {
            channel.peers += 1;
        }
    }

    /// Count a peer leaving the channel. Clamped at zero; a decrement only
    /// ever undoes a prior increment, so hitting the clamp means events
    /// raced and the count is best-effort anyway.
    pub fn peer_departed(&mut self, name: &str) {
        if let Some(channel) = self.get_mut(name) {
            channel.peers = channel.peers.saturating_sub(1);
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AcceptAll;
    use crate::message::{MessageEnricher, RawMessage};
    use crate::types::Timestamp;

    fn enriched(author: &str, text: &str, change: u64) -> EnrichedMessage {
        let enricher = MessageEnricher::new(Box::new(AcceptAll));
        let raw = RawMessage {
            username: author.to_string(),
            channel: Some("general".to_string()),
            text: text.to_string(),
            timestamp: Timestamp::new(1_000),
            change,
        };
        enricher.enrich(&raw, HOME_CHANNEL, Timestamp::new(1_000))
    }

    #[test]
    fn test_ensure_is_idempotent_and_ordinal_stable() {
        let mut store = ChannelStore::new();
        store.ensure(HOME_CHANNEL);
        let id = store.ensure("general").id;
        assert_eq!(id, 1);
        assert_eq!(store.ensure("general").id, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_select_is_exclusive() {
        let mut store = ChannelStore::new();
        store.ensure(HOME_CHANNEL);
        store.ensure("general");
        store.ensure("rust");

        assert!(store.select("general"));
        assert_eq!(store.active().unwrap().name, "general");

        assert!(store.select("rust"));
        let active: Vec<_> = store.iter().filter(|c| c.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "rust");
    }

    #[test]
    fn test_select_unknown_channel_changes_nothing() {
        let mut store = ChannelStore::new();
        store.ensure(HOME_CHANNEL);
        store.select(HOME_CHANNEL);
        assert!(!store.select("nowhere"));
        assert_eq!(store.active().unwrap().name, HOME_CHANNEL);
    }

    #[test]
    fn test_home_channel_cannot_be_removed() {
        let mut store = ChannelStore::new();
        store.ensure(HOME_CHANNEL);
        store.get_mut(HOME_CHANNEL).unwrap().messages.push(enriched("alice", "hi", 1));

        assert!(!store.remove(HOME_CHANNEL));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(HOME_CHANNEL).unwrap().messages.len(), 1);
    }

    #[test]
    fn test_remove_deletes_other_channels() {
        let mut store = ChannelStore::new();
        store.ensure(HOME_CHANNEL);
        store.ensure("general");
        assert!(store.remove("general"));
        assert!(!store.contains("general"));
        assert!(!store.remove("general"));
    }

    #[test]
    fn test_merge_adjacency() {
        let mut store = ChannelStore::new();
        let channel = store.ensure("general");

        assert!(!channel.apply(enriched("alice", "hi", 1)));
        assert!(channel.apply(enriched("alice", "there", 2)));
        assert!(!channel.apply(enriched("bob", "hello", 3)));

        assert_eq!(channel.messages.len(), 2);
        assert_eq!(channel.messages[0].text, "hi\nthere");
        assert!(channel.messages[0].merged);
    }

    #[test]
    fn test_message_list_length_accounts_for_merges() {
        // List length == messages applied minus merges performed.
        let mut store = ChannelStore::new();
        let channel = store.ensure("general");
        let authors = ["alice", "alice", "bob", "bob", "bob", "alice"];
        let mut merges = 0;
        for (i, author) in authors.iter().enumerate() {
            if channel.apply(enriched(author, "msg", i as u64 + 1)) {
                merges += 1;
            }
        }
        assert_eq!(channel.messages.len(), authors.len() - merges);
        assert_eq!(channel.messages.len(), 3);
    }

    #[test]
    fn test_peer_count_clamps_at_zero() {
        let mut store = ChannelStore::new();
        store.ensure("general");
        store.peer_departed("general");
        assert_eq!(store.get("general").unwrap().peers, 0);

        store.peer_joined("general");
        store.peer_joined("general");
        store.peer_departed("general");
        assert_eq!(store.get("general").unwrap().peers, 1);

        // Events for channels we already left are dropped silently.
        store.peer_joined("gone");
        store.peer_departed("gone");
    }
}
