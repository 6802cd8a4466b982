//! Typed inter-task communication
//!
//! The sync coordinator talks to the UI and to its collaborator tasks
//! (replication swarm, profile storage) exclusively through the four closed
//! message sets defined here. There is no open-ended event emitter: every
//! interaction is a variant of one of these enums, and each enum flows over
//! exactly one channel.

pub mod messages;
pub mod plumbing;

pub use messages::{AppEvent, Command, Effect, Event};
pub use plumbing::{
    create_app_event_channel, create_command_channel, create_effect_channel,
    create_effect_receiver, create_event_channel, AppEventReceiver, AppEventSender, ChannelError,
    CommandReceiver, CommandSender, EffectReceiver, EffectSender, EventReceiver, EventSender,
    NonBlockingSend,
};
