//! Swarmchat Core
//!
//! This crate provides the channel/message synchronization logic for the
//! swarmchat peer-to-peer chat client: message enrichment and merging, the
//! channel registry, catch-up tracking, command resolution, and the typed
//! message-passing protocol that connects the sync coordinator to its
//! collaborator tasks (replication swarm, profile storage, UI).
//!
//! The replication transport, persistence backend, and rendering layer are
//! collaborators behind trait seams; their concrete implementations live in
//! the `swarmchat-store`, `swarmchat-runtime`, and `swarmchat-cli` crates.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod bus;
pub mod catchup;
pub mod channels;
pub mod commands;
pub mod config;
pub mod desktop;
pub mod errors;
pub mod identity;
pub mod message;
pub mod snapshot;
pub mod swarm;
pub mod timeago;
pub mod types;
pub mod users;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use bus::{
    create_app_event_channel, create_command_channel, create_effect_channel,
    create_effect_receiver, create_event_channel, AppEvent, AppEventReceiver, AppEventSender,
    ChannelError, Command, CommandReceiver, CommandSender, Effect, EffectReceiver, EffectSender,
    Event, EventReceiver, EventSender, NonBlockingSend,
};
pub use catchup::CatchUpTracker;
pub use channels::{Channel, ChannelStore, HOME_CHANNEL};
pub use commands::{Action, CommandResolver, Resolution, CHANNEL_MARKER, COMMAND_PREFIX};
pub use config::{ChannelBuffersConfig, SwarmConfig, SyncConfig};
pub use desktop::{Desktop, HeadlessDesktop};
pub use errors::{CommandError, SwarmError, TransportError};
pub use identity::{anonymous_username, AcceptAll, Attestation, Attestor, IdentityVerdict,
    IdentityVerifier, StaticIdentity};
pub use message::{EnrichedMessage, MessageEnricher, OutboundMessage, RawMessage};
pub use snapshot::{ChannelSummary, StateSnapshot, UserSummary};
pub use swarm::SwarmTask;
pub use types::{ChannelDescriptor, PeerId, SystemTimeSource, TimeSource, Timestamp};
pub use users::{User, UserDirectory};

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, SwarmError>;
