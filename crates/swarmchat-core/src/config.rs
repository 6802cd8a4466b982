//! Configuration for the swarmchat core
//!
//! Buffer sizes for the inter-task channels plus the tunables of the sync
//! coordinator itself. Applications layer their own settings on top (see the
//! CLI crate) and pass a validated [`SwarmConfig`] into the runtime.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::channels::HOME_CHANNEL;
use crate::errors::SwarmError;

// ----------------------------------------------------------------------------
// Channel Buffers
// ----------------------------------------------------------------------------

/// Buffer sizes for the typed inter-task channels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelBuffersConfig {
    /// UI → coordinator command buffer
    pub command_buffer_size: usize,
    /// Collaborator → coordinator event buffer. Kept small on purpose: the
    /// transport awaits capacity here, which is what bounds in-flight
    /// deliveries during backlog replay.
    pub event_buffer_size: usize,
    /// Coordinator → collaborators broadcast effect buffer
    pub effect_buffer_size: usize,
    /// Coordinator → UI app event buffer
    pub app_event_buffer_size: usize,
}

impl Default for ChannelBuffersConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 32,
            event_buffer_size: 128,
            effect_buffer_size: 64,
            app_event_buffer_size: 64,
        }
    }
}

// ----------------------------------------------------------------------------
// Sync Coordinator Tunables
// ----------------------------------------------------------------------------

/// Behavioral settings of the sync coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// The default channel; it is joined at startup and can never be left.
    pub home_channel: String,
    /// Maximum alias indirection depth before a command is treated as
    /// malformed and sent literally.
    pub alias_max_depth: usize,
    /// Interval, in seconds, of the periodic timeago refresh for the active
    /// channel.
    pub timeago_interval_secs: u64,
    /// How many characters of a message are quoted in a mention notification.
    pub mention_preview_len: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            home_channel: HOME_CHANNEL.to_string(),
            alias_max_depth: 8,
            timeago_interval_secs: 60,
            mention_preview_len: 20,
        }
    }
}

impl SyncConfig {
    /// Timeago refresh interval as a [`Duration`]
    pub fn timeago_interval(&self) -> Duration {
        Duration::from_secs(self.timeago_interval_secs)
    }
}

// ----------------------------------------------------------------------------
// Top-level Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the swarmchat core and runtime
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub channels: ChannelBuffersConfig,
    pub sync: SyncConfig,
}

impl SwarmConfig {
    /// Validate the configuration, returning a human-readable reason on
    /// failure.
    pub fn validate(&self) -> Result<(), SwarmError> {
        let buffers = [
            ("command_buffer_size", self.channels.command_buffer_size),
            ("event_buffer_size", self.channels.event_buffer_size),
            ("effect_buffer_size", self.channels.effect_buffer_size),
            ("app_event_buffer_size", self.channels.app_event_buffer_size),
        ];
        for (name, size) in buffers {
            if size == 0 {
                return Err(SwarmError::Configuration {
                    reason: format!("{name} must be greater than zero"),
                });
            }
        }

        if self.sync.home_channel.trim().is_empty() {
            return Err(SwarmError::Configuration {
                reason: "home_channel must not be empty".to_string(),
            });
        }
        if self.sync.home_channel.starts_with('#') {
            return Err(SwarmError::Configuration {
                reason: "home_channel must be given without the # marker".to_string(),
            });
        }
        if self.sync.alias_max_depth == 0 {
            return Err(SwarmError::Configuration {
                reason: "alias_max_depth must be at least 1".to_string(),
            });
        }
        if self.sync.timeago_interval_secs == 0 {
            return Err(SwarmError::Configuration {
                reason: "timeago_interval_secs must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
