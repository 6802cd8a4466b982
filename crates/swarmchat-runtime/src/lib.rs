//! Swarmchat Runtime Engine
//!
//! This crate contains the runtime engine for the swarmchat client:
//!
//! - [`SwarmRuntime`]: the orchestrator that wires swarm tasks, the storage
//!   task and identity verification to the sync coordinator
//! - [`SyncCoordinator`]: the single sequential task owning all channel,
//!   user, and catch-up state
//! - [`LoopbackSwarm`]: an in-process transport for tests and offline use
//!
//! This is the "engine"; `swarmchat-core` provides the stable protocol and
//! domain definitions.

pub mod logic;
mod runtime;
pub mod testing;

pub use logic::{CoreState, CoreStats, Phase, SyncCoordinator, SyncHandlers};
pub use runtime::SwarmRuntime;
pub use testing::LoopbackSwarm;

// Re-export core types for convenience
pub use swarmchat_core::{
    create_app_event_channel, create_command_channel, create_effect_channel,
    create_effect_receiver, create_event_channel, AppEvent, AppEventReceiver, AppEventSender,
    Command, CommandReceiver, CommandSender, Effect, EffectReceiver, EffectSender, Event,
    EventReceiver, EventSender, Result, SwarmConfig, SwarmError, SwarmTask,
};
