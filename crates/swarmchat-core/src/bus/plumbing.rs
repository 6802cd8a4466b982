//! Channel plumbing
//!
//! Concrete tokio channels for the four protocol message types. Command,
//! Event, and AppEvent are point-to-point bounded mpsc channels; Effect is a
//! broadcast channel so every collaborator task sees the effect stream and
//! picks out its own concern.
//!
//! The bounded Event channel doubles as the delivery acknowledgment: the
//! transport awaits capacity before handing over the next message, and the
//! coordinator drains strictly sequentially, so per-channel arrival order is
//! preserved and at most a buffer's worth of messages is ever in flight.

use std::fmt;

use crate::bus::messages::{AppEvent, Command, Effect, Event};
use crate::config::ChannelBuffersConfig;

// ----------------------------------------------------------------------------
// Channel Error
// ----------------------------------------------------------------------------

#[derive(Debug)]
pub enum ChannelError {
    ChannelFull,
    ChannelClosed,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::ChannelFull => write!(f, "Channel buffer is full"),
            ChannelError::ChannelClosed => write!(f, "Channel is closed"),
        }
    }
}

impl std::error::Error for ChannelError {}

// ----------------------------------------------------------------------------
// Channel Type Aliases
// ----------------------------------------------------------------------------

pub type CommandSender = tokio::sync::mpsc::Sender<Command>;
pub type CommandReceiver = tokio::sync::mpsc::Receiver<Command>;
pub type EventSender = tokio::sync::mpsc::Sender<Event>;
pub type EventReceiver = tokio::sync::mpsc::Receiver<Event>;
pub type EffectSender = tokio::sync::broadcast::Sender<Effect>;
pub type EffectReceiver = tokio::sync::broadcast::Receiver<Effect>;
pub type AppEventSender = tokio::sync::mpsc::Sender<AppEvent>;
pub type AppEventReceiver = tokio::sync::mpsc::Receiver<AppEvent>;

// ----------------------------------------------------------------------------
// Channel Creation
// ----------------------------------------------------------------------------

/// Create the bounded command channel (UI → coordinator)
pub fn create_command_channel(config: &ChannelBuffersConfig) -> (CommandSender, CommandReceiver) {
    tokio::sync::mpsc::channel(config.command_buffer_size)
}

/// Create the bounded event channel (collaborators → coordinator)
pub fn create_event_channel(config: &ChannelBuffersConfig) -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::channel(config.event_buffer_size)
}

/// Create the broadcast effect channel (coordinator → collaborators).
/// Additional receivers are created per task via [`create_effect_receiver`].
pub fn create_effect_channel(config: &ChannelBuffersConfig) -> (EffectSender, EffectReceiver) {
    tokio::sync::broadcast::channel(config.effect_buffer_size)
}

/// Subscribe a collaborator task to the effect stream
pub fn create_effect_receiver(effect_sender: &EffectSender) -> EffectReceiver {
    effect_sender.subscribe()
}

/// Create the bounded app event channel (coordinator → UI)
pub fn create_app_event_channel(
    config: &ChannelBuffersConfig,
) -> (AppEventSender, AppEventReceiver) {
    tokio::sync::mpsc::channel(config.app_event_buffer_size)
}

// ----------------------------------------------------------------------------
// Non-blocking Send
// ----------------------------------------------------------------------------

/// Non-blocking send for UI-side code that must never stall on a full buffer
pub trait NonBlockingSend<T> {
    fn try_send_non_blocking(&self, message: T) -> Result<(), ChannelError>;
}

impl NonBlockingSend<Command> for CommandSender {
    fn try_send_non_blocking(&self, command: Command) -> Result<(), ChannelError> {
        self.try_send(command).map_err(|e| match e {
            tokio::sync::mpsc::error::TrySendError::Full(_) => ChannelError::ChannelFull,
            tokio::sync::mpsc::error::TrySendError::Closed(_) => ChannelError::ChannelClosed,
        })
    }
}

impl NonBlockingSend<AppEvent> for AppEventSender {
    fn try_send_non_blocking(&self, event: AppEvent) -> Result<(), ChannelError> {
        self.try_send(event).map_err(|e| match e {
            tokio::sync::mpsc::error::TrySendError::Full(_) => ChannelError::ChannelFull,
            tokio::sync::mpsc::error::TrySendError::Closed(_) => ChannelError::ChannelClosed,
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
