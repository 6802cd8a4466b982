//! Core types for the swarmchat client
//!
//! Newtype wrappers for the identifiers that cross task boundaries, plus the
//! time source seam used by the sync coordinator.

use core::fmt;
use core::ops::Sub;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Peer Identifier
// ----------------------------------------------------------------------------

/// Opaque identifier for a replication peer, as handed out by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeerId([u8; 8]);

impl PeerId {
    /// Create a new PeerId from 8 bytes
    pub fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Create PeerId from the first 8 bytes of a longer identifier
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut id = [0u8; 8];
        let len = core::cmp::min(bytes.len(), 8);
        id[..len].copy_from_slice(&bytes[..len]);
        Self(id)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// ----------------------------------------------------------------------------
// Timestamp
// ----------------------------------------------------------------------------

/// Millisecond timestamp since Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a new timestamp
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Get the current wall-clock timestamp
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(duration.as_millis() as u64)
    }

    /// Get the raw milliseconds
    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl Sub for Timestamp {
    type Output = u64;

    fn sub(self, other: Timestamp) -> u64 {
        self.0.saturating_sub(other.0)
    }
}

// ----------------------------------------------------------------------------
// Time Source Trait
// ----------------------------------------------------------------------------

/// Seam for obtaining timestamps, so the coordinator can be driven with a
/// fixed clock in tests.
pub trait TimeSource: Send {
    /// Get the current timestamp
    fn now(&self) -> Timestamp;
}

/// Wall-clock implementation of [`TimeSource`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

// ----------------------------------------------------------------------------
// Channel Descriptor
// ----------------------------------------------------------------------------

/// Persisted record of a joined channel, restored at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    pub name: String,
    pub id: usize,
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_id_from_bytes() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8];
        let peer_id = PeerId::new(bytes);
        assert_eq!(peer_id.as_bytes(), &bytes);

        let from_long = PeerId::from_bytes(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(from_long.as_bytes(), &bytes);
    }

    #[test]
    fn test_peer_id_display_is_hex() {
        let peer_id = PeerId::new([0xab; 8]);
        assert_eq!(peer_id.to_string(), "abababababababab");
    }

    #[test]
    fn test_timestamp_subtraction_saturates() {
        let earlier = Timestamp::new(1_000);
        let later = Timestamp::new(4_500);
        assert_eq!(later - earlier, 3_500);
        assert_eq!(earlier - later, 0);
    }

    #[test]
    fn test_channel_descriptor_json_roundtrip() {
        let descriptor = ChannelDescriptor {
            name: "general".to_string(),
            id: 3,
        };
        let encoded = serde_json::to_vec(&descriptor).unwrap();
        let decoded: ChannelDescriptor = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded, descriptor);
    }
}
