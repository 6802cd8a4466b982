//! Protocol message types
//!
//! All inter-task communication flows through these four channel message
//! types:
//!
//! - [`Command`]: UI → sync coordinator
//! - [`Event`]: collaborator tasks (swarm, storage, identity) → coordinator
//! - [`Effect`]: coordinator → collaborator tasks (broadcast; each task
//!   consumes the subset addressed to its concern)
//! - [`AppEvent`]: coordinator → UI

use serde::{Deserialize, Serialize};

use crate::message::{OutboundMessage, RawMessage};
use crate::snapshot::StateSnapshot;
use crate::types::{ChannelDescriptor, PeerId};

// ----------------------------------------------------------------------------
// Command: UI → Sync Coordinator
// ----------------------------------------------------------------------------

/// Commands sent from the UI to the sync coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    /// Execute a prefixed command line (alias indirection included)
    Execute { input: String },
    /// Send chat text to the active channel
    SendMessage { text: String },
    /// Make a channel the active one
    SelectChannel { name: String },
    /// Join a channel (channel-marker prefix tolerated)
    AddChannel { name: String },
    /// Leave a channel
    LeaveChannel { name: String },
    /// Flip the display filter for a user
    ToggleBlockUser { username: String },
    /// Shut down the coordinator
    Shutdown,
}

// ----------------------------------------------------------------------------
// Event: Collaborators → Sync Coordinator
// ----------------------------------------------------------------------------

/// Events delivered into the single processing context. Completions of
/// asynchronous persistence and transport work re-enter here, in whatever
/// order they finish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A message arrived from the replicated log
    MessageReceived { message: RawMessage },
    /// The pending-change count of a channel, observed when its subscription
    /// started streaming. Seeds the catch-up mark.
    ChannelPending { channel: String, pending: u64 },
    /// A peer joined a channel's swarm
    PeerJoined { peer: PeerId, channel: String },
    /// A peer's stream ended
    PeerDeparted { peer: PeerId, channel: String },
    /// Identity verification completed successfully
    IdentityVerified { username: String },
    /// Identity verification failed; the client stays anonymous
    IdentityFailed { reason: String },
    /// Alias lookup completed. `body` is None on a miss, which is the
    /// expected fallback path, not an error.
    AliasFetched {
        name: String,
        body: Option<String>,
        original: String,
        depth: usize,
    },
    /// A channel's persisted membership record was deleted
    ChannelForgotten { channel: String },
    /// The persisted channel memberships, scanned at startup
    ChannelsRestored { channels: Vec<ChannelDescriptor> },
    /// A storage operation failed
    StorageFailed { operation: String, reason: String },
    /// The swarm reported a failure; degrade, never crash
    SwarmFailed { reason: String },
}

// ----------------------------------------------------------------------------
// Effect: Sync Coordinator → Collaborators
// ----------------------------------------------------------------------------

/// External side effects requested by the coordinator. Broadcast to all
/// collaborator tasks; the swarm handles subscription and publish effects,
/// the storage task handles persistence effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Effect {
    /// Subscribe to a channel's replicated log
    JoinChannel { channel: String },
    /// Unsubscribe from a channel
    LeaveChannel { channel: String },
    /// Publish a message. There is no optimistic local append: the message
    /// comes back through the normal ingestion path.
    Publish { message: OutboundMessage },
    /// Persist channel membership
    PersistChannel { descriptor: ChannelDescriptor },
    /// Delete persisted channel membership; completion arrives as
    /// [`Event::ChannelForgotten`]
    ForgetChannel { channel: String },
    /// Persist an alias body
    PersistAlias { name: String, body: String },
    /// Fetch an alias body; the answer arrives as [`Event::AliasFetched`]
    /// with `original` and `depth` echoed back
    FetchAlias {
        name: String,
        original: String,
        depth: usize,
    },
    /// Scan persisted channel memberships; the answer arrives as
    /// [`Event::ChannelsRestored`]
    LoadChannels,
}

// ----------------------------------------------------------------------------
// AppEvent: Sync Coordinator → UI
// ----------------------------------------------------------------------------

/// State-change notifications for the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// State changed meaningfully; re-render from the snapshot. Refreshes
    /// are gated during backlog replay, so the UI can treat every one of
    /// these as worth painting.
    Render {
        snapshot: StateSnapshot,
        scroll_to_bottom: bool,
    },
    /// The mention badge count changed
    BadgeUpdated { count: u32 },
    /// A new username became available for send-time autocompletion
    AutocompleteAdded { username: String },
    /// Identity verification failed; the UI may offer setup help
    IdentityHelp,
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
