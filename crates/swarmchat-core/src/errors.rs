//! Error types for the swarmchat core
//!
//! Failures in this client degrade rather than terminate: transport and
//! storage trouble falls back to anonymous/offline behavior, unknown commands
//! fall back to a literal chat message, and counter invariant violations are
//! clamped. The error types here exist for the paths where a caller still has
//! a decision to make.

use thiserror::Error;

// ----------------------------------------------------------------------------
// Specific Error Types
// ----------------------------------------------------------------------------

/// Replication transport error types
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to subscribe to channel {channel}: {reason}")]
    SubscribeFailed { channel: String, reason: String },
    #[error("Failed to publish message: {reason}")]
    PublishFailed { reason: String },
    #[error("Transport shutdown: {reason}")]
    Shutdown { reason: String },
    #[error("Identity verification failed: {reason}")]
    VerificationFailed { reason: String },
}

/// Command resolution error types
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Malformed command {input:?}: {reason}")]
    Malformed { input: String, reason: String },
    #[error("Alias {name} exceeded resolution depth {depth}")]
    AliasDepthExceeded { name: String, depth: usize },
}

// ----------------------------------------------------------------------------
// Unified Error Type
// ----------------------------------------------------------------------------

/// Top-level error type for the swarmchat core
#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Channel error: {reason}")]
    Channel { reason: String },

    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },
}

impl SwarmError {
    /// Convenience constructor for inter-task channel failures
    pub fn channel_closed(name: &str) -> Self {
        Self::Channel {
            reason: format!("{name} channel closed"),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
