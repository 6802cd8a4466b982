//! Storage task
//!
//! Runs a [`ProfileStore`] behind the effect/event channels. Persistence is
//! asynchronous from the coordinator's point of view: it emits a storage
//! effect and keeps processing; the completion (alias body, delete
//! confirmation, restored channel list) re-enters the event stream whenever
//! it is done, possibly out of order relative to other in-flight work.

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use swarmchat_core::{Effect, EffectReceiver, Event, EventSender, SwarmError};

use crate::ProfileStore;

// ----------------------------------------------------------------------------
// Storage Task
// ----------------------------------------------------------------------------

/// Executes storage effects and reports completions as events
pub struct StorageTask<S: ProfileStore> {
    store: S,
    event_sender: EventSender,
    effect_receiver: EffectReceiver,
}

impl<S: ProfileStore> StorageTask<S> {
    pub fn new(store: S, event_sender: EventSender, effect_receiver: EffectReceiver) -> Self {
        Self {
            store,
            event_sender,
            effect_receiver,
        }
    }

    /// Process storage effects until the effect channel closes
    pub async fn run(&mut self) -> Result<(), SwarmError> {
        loop {
            match self.effect_receiver.recv().await {
                Ok(effect) => {
                    if let Some(event) = self.execute(effect) {
                        self.event_sender
                            .send(event)
                            .await
                            .map_err(|_| SwarmError::channel_closed("event"))?;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "storage task lagged behind the effect stream");
                }
                Err(RecvError::Closed) => {
                    debug!("effect channel closed, storage task stopping");
                    return Ok(());
                }
            }
        }
    }

    /// Execute one effect, returning the completion event when the
    /// coordinator is waiting on one. Effects addressed to the swarm are
    /// ignored here.
    fn execute(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::PersistChannel { descriptor } => match self.store.put_channel(&descriptor) {
                Ok(()) => None,
                Err(e) => Some(storage_failed("persist channel", e)),
            },
            Effect::ForgetChannel { channel } => {
                // The membership delete confirms the leave; even if the
                // backend failed the session proceeds with the removal and
                // the record can only resurface next startup.
                if let Err(e) = self.store.delete_channel(&channel) {
                    warn!(%channel, error = %e, "failed to delete channel record");
                }
                Some(Event::ChannelForgotten { channel })
            }
            Effect::PersistAlias { name, body } => match self.store.put_alias(&name, &body) {
                Ok(()) => None,
                Err(e) => Some(storage_failed("persist alias", e)),
            },
            Effect::FetchAlias {
                name,
                original,
                depth,
            } => {
                let body = match self.store.get_alias(&name) {
                    Ok(body) => body,
                    Err(e) => {
                        // A broken lookup degrades to a miss; command
                        // resolution falls back to a literal send.
                        warn!(alias = %name, error = %e, "alias lookup failed");
                        None
                    }
                };
                Some(Event::AliasFetched {
                    name,
                    body,
                    original,
                    depth,
                })
            }
            Effect::LoadChannels => match self.store.load_channels() {
                Ok(channels) => Some(Event::ChannelsRestored { channels }),
                Err(e) => {
                    warn!(error = %e, "failed to restore channels");
                    Some(Event::ChannelsRestored {
                        channels: Vec::new(),
                    })
                }
            },
            Effect::JoinChannel { .. }
            | Effect::LeaveChannel { .. }
            | Effect::Publish { .. } => None,
        }
    }
}

fn storage_failed(operation: &str, error: crate::StorageError) -> Event {
    warn!(operation, error = %error, "storage operation failed");
    Event::StorageFailed {
        operation: operation.to_string(),
        reason: error.to_string(),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
