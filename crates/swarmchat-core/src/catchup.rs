//! Catch-up tracking
//!
//! When the client subscribes to a channel, the replicated log may hold a
//! large backlog. Re-rendering per message during that replay is wasted work,
//! so each channel records the pending-change count observed at subscribe
//! time and refresh signals are suppressed until the replay position reaches
//! it. After that the channel is live and every message triggers a refresh.

use std::collections::HashMap;

// ----------------------------------------------------------------------------
// Catch-Up Tracker
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Watch {
    mark: u64,
    live: bool,
}

/// Per-channel replay bookkeeping
#[derive(Debug, Default)]
pub struct CatchUpTracker {
    watches: HashMap<String, Watch>,
}

impl CatchUpTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the catch-up mark for a channel. Only the first call per
    /// channel takes effect; re-invocation is a no-op.
    pub fn start_watching(&mut self, channel: &str, pending: u64) {
        self.watches.entry(channel.to_string()).or_insert(Watch {
            mark: pending,
            live: pending == 0,
        });
    }

    /// Record that a change number has been replayed for a channel. Returns
    /// whether the UI should refresh: false while the backlog snapshot is
    /// still replaying, true from the moment the mark is reached and for
    /// every call after (the latch never resets).
    ///
    /// A channel without a recorded mark reports live: suppression is an
    /// optimization and must never swallow genuinely fresh traffic.
    pub fn record_replay(&mut self, channel: &str, change: u64) -> bool {
        match self.watches.get_mut(channel) {
            Some(watch) => {
                if !watch.live && change >= watch.mark {
                    watch.live = true;
                }
                watch.live
            }
            None => true,
        }
    }

    /// Whether the channel has finished its backlog replay
    pub fn is_live(&self, channel: &str) -> bool {
        self.watches.get(channel).map_or(true, |w| w.live)
    }

    pub fn is_watching(&self, channel: &str) -> bool {
        self.watches.contains_key(channel)
    }

    /// Drop the bookkeeping for a channel that was left, so a later re-join
    /// starts a fresh watch.
    pub fn forget(&mut self, channel: &str) {
        self.watches.remove(channel);
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
