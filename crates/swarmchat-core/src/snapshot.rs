//! State snapshots for the render seam
//!
//! The UI renders from a [`StateSnapshot`], a plain data view the coordinator
//! assembles whenever it decides state changed meaningfully. Rendering is a
//! pure function of the snapshot; how the resulting tree is diffed or painted
//! is outside this crate.

use serde::{Deserialize, Serialize};

use crate::channels::ChannelStore;
use crate::message::EnrichedMessage;
use crate::users::UserDirectory;

// ----------------------------------------------------------------------------
// Snapshot Types
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub name: String,
    pub id: usize,
    pub active: bool,
    pub peers: usize,
    pub message_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    pub avatar: Option<String>,
    pub blocked: bool,
}

/// The complete display-relevant state at one instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub username: String,
    pub verified: bool,
    /// Global peer count across all channels (best effort)
    pub peers: usize,
    pub channels: Vec<ChannelSummary>,
    pub active_channel: Option<String>,
    /// Messages of the active channel, in arrival order
    pub messages: Vec<EnrichedMessage>,
    pub users: Vec<UserSummary>,
}

impl StateSnapshot {
    /// Assemble a snapshot from the coordinator's state
    pub fn capture(
        username: &str,
        verified: bool,
        peers: usize,
        channels: &ChannelStore,
        users: &UserDirectory,
    ) -> Self {
        let mut summaries: Vec<ChannelSummary> = channels
            .iter()
            .map(|c| ChannelSummary {
                name: c.name.clone(),
                id: c.id,
                active: c.active,
                peers: c.peers,
                message_count: c.messages.len(),
            })
            .collect();
        summaries.sort_by_key(|c| c.id);

        let active = channels.active();
        let mut user_summaries: Vec<UserSummary> = users
            .iter()
            .map(|u| UserSummary {
                username: u.username.clone(),
                avatar: u.avatar.clone(),
                blocked: u.blocked,
            })
            .collect();
        user_summaries.sort_by(|a, b| a.username.cmp(&b.username));

        Self {
            username: username.to_string(),
            verified,
            peers,
            channels: summaries,
            active_channel: active.map(|c| c.name.clone()),
            messages: active.map(|c| c.messages.clone()).unwrap_or_default(),
            users: user_summaries,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
