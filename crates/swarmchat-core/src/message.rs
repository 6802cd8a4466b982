//! Message types and enrichment
//!
//! Raw messages arrive from the replicated log carrying only attribution,
//! text, and a per-channel change number. Enrichment derives the
//! display-ready fields: attestation (anonymity/validity), the display name
//! (invalid attribution gets a disclaimer prefix), self-mention highlighting,
//! and the relative-time string. Enrichment is a pure function of the message
//! and the enricher's view of the local identity; when identity verification
//! completes later, every stored message is re-enriched in bulk.

use serde::{Deserialize, Serialize};

use crate::identity::Attestor;
use crate::timeago;
use crate::types::Timestamp;

/// Prefix applied to the display name of a message whose attribution could
/// not be verified. Applied exactly once; re-enrichment derives the display
/// name from the untouched author field.
const DISCLAIMER_PREFIX: &str = "Allegedly ";

// ----------------------------------------------------------------------------
// Raw and Outbound Messages
// ----------------------------------------------------------------------------

/// A message as delivered by the replicated log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub username: String,
    /// Target channel; `None` addresses the home channel.
    pub channel: Option<String>,
    pub text: String,
    pub timestamp: Timestamp,
    /// Per-channel log position. Used only for catch-up comparison, never
    /// for ordering: arrival order is list order.
    pub change: u64,
}

impl RawMessage {
    /// Resolve the target channel, falling back to the home channel
    pub fn channel_name<'a>(&'a self, home: &'a str) -> &'a str {
        match self.channel.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => home,
        }
    }
}

/// A message on its way into the replicated log. The log assigns the change
/// number; the message comes back through the normal ingestion path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub username: String,
    pub channel: String,
    pub text: String,
    pub timestamp: Timestamp,
}

// ----------------------------------------------------------------------------
// Enriched Message
// ----------------------------------------------------------------------------

/// A display-ready message stored in a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedMessage {
    /// Attribution as claimed by the log entry. Merge adjacency is decided
    /// on this field, and re-enrichment derives the display name from it.
    pub author: String,
    /// Name shown in the UI; carries the disclaimer prefix when the
    /// attribution is unverified.
    pub username: String,
    pub channel: String,
    pub text: String,
    pub timestamp: Timestamp,
    pub change: u64,
    pub anon: bool,
    pub valid: bool,
    pub avatar: Option<String>,
    pub timeago: String,
    /// The local user's name occurs in the text.
    pub highlight: bool,
    /// At least one later message was folded into this entry.
    pub merged: bool,
}

impl EnrichedMessage {
    /// Refresh the relative-time display string
    pub fn refresh_timeago(&mut self, now: Timestamp) {
        self.timeago = timeago::timeago(self.timestamp, now);
    }
}

/// Fold a newly arrived message into the previous entry from the same author.
/// The text is joined line-wise; timestamp and change number advance to the
/// incoming message so catch-up and timeago track the latest fold.
pub fn merge_into(last: &mut EnrichedMessage, incoming: EnrichedMessage) {
    last.text.push('\n');
    last.text.push_str(&incoming.text);
    last.timestamp = incoming.timestamp;
    last.change = incoming.change;
    last.timeago = incoming.timeago;
    last.highlight = last.highlight || incoming.highlight;
    last.merged = true;
}

// ----------------------------------------------------------------------------
// Message Enricher
// ----------------------------------------------------------------------------

/// Classifies raw messages into display-ready messages
///
/// Holds the attestor collaborator (which decides anonymity and attribution
/// validity) and the local username once identity verification has completed.
/// Until then, self-highlighting is skipped and redone by [`Self::re_enrich`]
/// over all stored messages.
pub struct MessageEnricher {
    attestor: Box<dyn Attestor>,
    self_username: Option<String>,
}

impl MessageEnricher {
    pub fn new(attestor: Box<dyn Attestor>) -> Self {
        Self {
            attestor,
            self_username: None,
        }
    }

    /// Record the verified local username, enabling self-highlighting
    pub fn set_self_username(&mut self, username: &str) {
        self.self_username = Some(username.to_string());
    }

    pub fn self_username(&self) -> Option<&str> {
        self.self_username.as_deref()
    }

    /// Enrich a raw message into its display-ready form
    pub fn enrich(&self, raw: &RawMessage, home_channel: &str, now: Timestamp) -> EnrichedMessage {
        let attestation = self.attestor.attest(raw);
        let username = display_name(&raw.username, attestation.anon, attestation.valid);
        EnrichedMessage {
            author: raw.username.clone(),
            username,
            channel: raw.channel_name(home_channel).to_string(),
            text: raw.text.clone(),
            timestamp: raw.timestamp,
            change: raw.change,
            anon: attestation.anon,
            valid: attestation.valid,
            avatar: attestation.avatar,
            timeago: timeago::timeago(raw.timestamp, now),
            highlight: self.mentions_self(&raw.text),
            merged: false,
        }
    }

    /// Recompute the identity-dependent fields of a stored message.
    /// Idempotent: the display name is derived from the author field, so the
    /// disclaimer prefix is never stacked.
    pub fn re_enrich(&self, message: &mut EnrichedMessage, now: Timestamp) {
        message.username = display_name(&message.author, message.anon, message.valid);
        message.highlight = self.mentions_self(&message.text);
        message.refresh_timeago(now);
    }

    fn mentions_self(&self, text: &str) -> bool {
        match &self.self_username {
            Some(username) => text.contains(username.as_str()),
            None => false,
        }
    }
}

fn display_name(author: &str, anon: bool, valid: bool) -> String {
    if !anon && !valid {
        format!("{DISCLAIMER_PREFIX}{author}")
    } else {
        author.to_string()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{AcceptAll, Attestation};

    struct FixedAttestor(Attestation);

    impl Attestor for FixedAttestor {
        fn attest(&self, _raw: &RawMessage) -> Attestation {
            self.0.clone()
        }
    }

    fn raw(username: &str, text: &str, change: u64) -> RawMessage {
        RawMessage {
            username: username.to_string(),
            channel: Some("general".to_string()),
            text: text.to_string(),
            timestamp: Timestamp::new(1_000),
            change,
        }
    }

    #[test]
    fn test_channel_defaults_to_home() {
        let mut message = raw("alice", "hi", 1);
        message.channel = None;
        assert_eq!(message.channel_name("friends"), "friends");
        message.channel = Some(String::new());
        assert_eq!(message.channel_name("friends"), "friends");
        message.channel = Some("general".to_string());
        assert_eq!(message.channel_name("friends"), "general");
    }

    #[test]
    fn test_invalid_attribution_gets_disclaimer_once() {
        let enricher = MessageEnricher::new(Box::new(FixedAttestor(Attestation {
            anon: false,
            valid: false,
            avatar: None,
        })));
        let now = Timestamp::new(2_000);
        let mut message = enricher.enrich(&raw("mallory", "hello", 1), "friends", now);
        assert_eq!(message.username, "Allegedly mallory");

        // Re-enrichment must not stack the prefix.
        enricher.re_enrich(&mut message, now);
        enricher.re_enrich(&mut message, now);
        assert_eq!(message.username, "Allegedly mallory");
        assert_eq!(message.author, "mallory");
    }

    #[test]
    fn test_anonymous_attribution_is_untouched() {
        let enricher = MessageEnricher::new(Box::new(FixedAttestor(Attestation {
            anon: true,
            valid: false,
            avatar: None,
        })));
        let message = enricher.enrich(
            &raw("Anonymous (Maru)", "hi", 1),
            "friends",
            Timestamp::new(2_000),
        );
        assert_eq!(message.username, "Anonymous (Maru)");
        assert!(message.anon);
    }

    #[test]
    fn test_highlight_requires_known_identity() {
        let mut enricher = MessageEnricher::new(Box::new(AcceptAll));
        let now = Timestamp::new(2_000);
        let mut message = enricher.enrich(&raw("alice", "hey bob!", 1), "friends", now);
        assert!(!message.highlight);

        enricher.set_self_username("bob");
        enricher.re_enrich(&mut message, now);
        assert!(message.highlight);
    }

    #[test]
    fn test_merge_folds_text_and_advances_position() {
        let enricher = MessageEnricher::new(Box::new(AcceptAll));
        let now = Timestamp::new(2_000);
        let mut first = enricher.enrich(&raw("alice", "hi", 1), "friends", now);
        let second = enricher.enrich(&raw("alice", "there", 2), "friends", now);

        merge_into(&mut first, second);
        assert_eq!(first.text, "hi\nthere");
        assert_eq!(first.change, 2);
        assert!(first.merged);
    }
}
