//! Coordinator state
//!
//! Everything the sync coordinator owns, consolidated in one struct. There
//! is no ambient state anywhere: all access goes through the typed
//! registries here, mutated exclusively from the coordinator task.

use std::collections::HashSet;

use swarmchat_core::{
    anonymous_username, AppEvent, Attestor, CatchUpTracker, ChannelStore, CommandResolver,
    Desktop, MessageEnricher, StateSnapshot, SyncConfig, TimeSource, UserDirectory,
};

// ----------------------------------------------------------------------------
// Phase
// ----------------------------------------------------------------------------

/// Identity lifecycle of the client
///
/// `Bootstrapping` until the one-shot identity check resolves; `Verified` is
/// the transient state in which all stored messages are re-enriched with the
/// now-known username; `Running` is steady state (verified or anonymous).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Bootstrapping,
    Verified,
    Running,
}

// ----------------------------------------------------------------------------
// Core State
// ----------------------------------------------------------------------------

/// State owned by the sync coordinator
pub struct CoreState {
    pub phase: Phase,
    /// Display name; a random anonymous handle until verification succeeds
    pub username: String,
    pub verified: bool,
    pub channels: ChannelStore,
    pub users: UserDirectory,
    pub catchup: CatchUpTracker,
    pub enricher: MessageEnricher,
    pub resolver: CommandResolver,
    pub desktop: Box<dyn Desktop>,
    pub clock: Box<dyn TimeSource>,
    /// Channels with a leave in flight: their membership delete has been
    /// issued but not yet confirmed, and stragglers from the log are dropped.
    pub departing: HashSet<String>,
    /// Global peer count across all channels (best effort)
    pub peers: usize,
    /// Unseen-mention badge count
    pub badge: u32,
    pub sync: SyncConfig,
    pub stats: CoreStats,
}

impl CoreState {
    pub fn new(
        sync: SyncConfig,
        attestor: Box<dyn Attestor>,
        desktop: Box<dyn Desktop>,
        clock: Box<dyn TimeSource>,
    ) -> Self {
        let resolver = CommandResolver::new(sync.alias_max_depth);
        Self {
            phase: Phase::Bootstrapping,
            username: anonymous_username(),
            verified: false,
            channels: ChannelStore::new(),
            users: UserDirectory::new(),
            catchup: CatchUpTracker::new(),
            enricher: MessageEnricher::new(attestor),
            resolver,
            desktop,
            clock,
            departing: HashSet::new(),
            peers: 0,
            badge: 0,
            sync,
            stats: CoreStats::default(),
        }
    }

    /// The home channel name from configuration
    pub fn home(&self) -> &str {
        &self.sync.home_channel
    }

    /// Assemble the current display snapshot
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(
            &self.username,
            self.verified,
            self.peers,
            &self.channels,
            &self.users,
        )
    }

    /// Build the app event that asks the UI to repaint
    pub fn render_event(&mut self, scroll_to_bottom: bool) -> AppEvent {
        self.stats.renders_signaled += 1;
        AppEvent::Render {
            snapshot: self.snapshot(),
            scroll_to_bottom,
        }
    }
}

// ----------------------------------------------------------------------------
// Statistics
// ----------------------------------------------------------------------------

/// Counters kept by the coordinator
#[derive(Debug, Clone, Default)]
pub struct CoreStats {
    pub commands_processed: u64,
    pub events_processed: u64,
    pub effects_generated: u64,
    pub messages_ingested: u64,
    pub messages_merged: u64,
    pub messages_published: u64,
    pub mentions_notified: u64,
    pub renders_signaled: u64,
}
