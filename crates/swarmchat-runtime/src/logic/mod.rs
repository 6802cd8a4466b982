//! Sync coordination logic
//!
//! Split into focused components:
//! - `state`: the coordinator-owned application state
//! - `handlers`: one handler per command/event kind, each returning the
//!   effects and app events it produced
//! - `task`: the [`SyncCoordinator`] event loop
//!
//! All state lives behind a single sequential task. Commands from the UI,
//! events from the swarm and storage tasks, and the periodic timeago tick
//! interleave arbitrarily but are processed one at a time, which is the
//! entire concurrency discipline: no locks, no shared mutable state, and
//! per-channel message order is exactly arrival order. Cross-channel
//! invariants (the global peer count, exclusive channel activation) make the
//! state unshardable, so any future parallelism would have to keep a single
//! writer in front of it.

pub mod handlers;
pub mod state;
pub mod task;

pub use handlers::SyncHandlers;
pub use state::{CoreState, CoreStats, Phase};
pub use task::SyncCoordinator;
