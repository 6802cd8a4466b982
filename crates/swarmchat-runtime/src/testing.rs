//! In-process swarm for tests and offline sessions
//!
//! [`LoopbackSwarm`] implements the transport contract against local state:
//! subscriptions replay a scripted backlog (announcing its pending count
//! first), publishes are assigned the next change number and echoed straight
//! back through the normal ingestion path, and nothing leaves the process.

use std::collections::{HashMap, HashSet};

use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use swarmchat_core::{
    Effect, EffectReceiver, Event, EventSender, RawMessage, Result, SwarmError, SwarmTask,
    Timestamp,
};

// ----------------------------------------------------------------------------
// Loopback Swarm
// ----------------------------------------------------------------------------

/// A replication swarm that never leaves the process
#[derive(Default)]
pub struct LoopbackSwarm {
    event_sender: Option<EventSender>,
    effect_receiver: Option<EffectReceiver>,
    /// Scripted backlog per channel, delivered on subscription
    backlog: HashMap<String, Vec<RawMessage>>,
    /// Highest change number assigned per channel
    changes: HashMap<String, u64>,
    subscribed: HashSet<String>,
}

impl LoopbackSwarm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a backlog message for a channel. It is replayed (with its
    /// pending count announced first) when the channel is subscribed.
    pub fn preload(&mut self, channel: &str, username: &str, text: &str) {
        let change = self.next_change(channel);
        self.backlog
            .entry(channel.to_string())
            .or_default()
            .push(RawMessage {
                username: username.to_string(),
                channel: Some(channel.to_string()),
                text: text.to_string(),
                timestamp: Timestamp::now(),
                change,
            });
    }

    fn next_change(&mut self, channel: &str) -> u64 {
        let counter = self.changes.entry(channel.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    async fn deliver(&self, event: Event) -> Result<()> {
        match &self.event_sender {
            // Awaiting capacity here is the backpressure contract: the next
            // message is not handed over until the coordinator has drained
            // this one from the bounded queue.
            Some(sender) => sender
                .send(event)
                .await
                .map_err(|_| SwarmError::channel_closed("event")),
            None => Err(SwarmError::Configuration {
                reason: "loopback swarm has no attached channels".to_string(),
            }),
        }
    }

    async fn handle_join(&mut self, channel: String) -> Result<()> {
        if !self.subscribed.insert(channel.clone()) {
            return Ok(());
        }
        let pending = self.changes.get(&channel).copied().unwrap_or(0);
        self.deliver(Event::ChannelPending {
            channel: channel.clone(),
            pending,
        })
        .await?;

        for message in self.backlog.remove(&channel).unwrap_or_default() {
            self.deliver(Event::MessageReceived { message }).await?;
        }
        Ok(())
    }

    async fn handle_publish(
        &mut self,
        message: swarmchat_core::OutboundMessage,
    ) -> Result<()> {
        if !self.subscribed.contains(&message.channel) {
            debug!(channel = %message.channel, "publish to unsubscribed channel dropped");
            return Ok(());
        }
        let change = self.next_change(&message.channel);
        self.deliver(Event::MessageReceived {
            message: RawMessage {
                username: message.username,
                channel: Some(message.channel),
                text: message.text,
                timestamp: message.timestamp,
                change,
            },
        })
        .await
    }
}

#[async_trait::async_trait]
impl SwarmTask for LoopbackSwarm {
    fn attach_channels(
        &mut self,
        event_sender: EventSender,
        effect_receiver: EffectReceiver,
    ) -> Result<()> {
        self.event_sender = Some(event_sender);
        self.effect_receiver = Some(effect_receiver);
        Ok(())
    }

    async fn run(&mut self) -> Result<()> {
        let mut effects = self
            .effect_receiver
            .take()
            .ok_or_else(|| SwarmError::Configuration {
                reason: "loopback swarm started without attached channels".to_string(),
            })?;

        loop {
            match effects.recv().await {
                Ok(Effect::JoinChannel { channel }) => self.handle_join(channel).await?,
                Ok(Effect::LeaveChannel { channel }) => {
                    self.subscribed.remove(&channel);
                }
                Ok(Effect::Publish { message }) => self.handle_publish(message).await?,
                // Storage-facing effects are not ours.
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    debug!(missed, "loopback swarm lagged behind the effect stream");
                }
                Err(RecvError::Closed) => return Ok(()),
            }
        }
    }

    fn name(&self) -> &str {
        "loopback"
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use swarmchat_core::{
        create_effect_channel, create_event_channel, ChannelBuffersConfig, OutboundMessage,
    };

    async fn started_swarm() -> (swarmchat_core::EffectSender, swarmchat_core::EventReceiver) {
        let config = ChannelBuffersConfig::default();
        let (event_sender, event_receiver) = create_event_channel(&config);
        let (effect_sender, effect_receiver) = create_effect_channel(&config);
        let mut swarm = LoopbackSwarm::new();
        swarm.attach_channels(event_sender, effect_receiver).unwrap();
        tokio::spawn(async move { swarm.run().await });
        (effect_sender, event_receiver)
    }

    #[tokio::test]
    async fn test_join_announces_pending_count() {
        let config = ChannelBuffersConfig::default();
        let (event_sender, mut events) = create_event_channel(&config);
        let (effect_sender, effect_receiver) = create_effect_channel(&config);

        let mut swarm = LoopbackSwarm::new();
        swarm.preload("general", "alice", "one");
        swarm.preload("general", "bob", "two");
        swarm.attach_channels(event_sender, effect_receiver).unwrap();
        tokio::spawn(async move { swarm.run().await });

        effect_sender
            .send(Effect::JoinChannel {
                channel: "general".to_string(),
            })
            .unwrap();

        match events.recv().await.unwrap() {
            Event::ChannelPending { channel, pending } => {
                assert_eq!(channel, "general");
                assert_eq!(pending, 2);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        for expected_change in 1..=2 {
            match events.recv().await.unwrap() {
                Event::MessageReceived { message } => assert_eq!(message.change, expected_change),
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_publish_echoes_back_with_next_change() {
        let (effects, mut events) = started_swarm().await;

        effects
            .send(Effect::JoinChannel {
                channel: "friends".to_string(),
            })
            .unwrap();
        match events.recv().await.unwrap() {
            Event::ChannelPending { pending, .. } => assert_eq!(pending, 0),
            other => panic!("unexpected event: {other:?}"),
        }

        effects
            .send(Effect::Publish {
                message: OutboundMessage {
                    username: "alice".to_string(),
                    channel: "friends".to_string(),
                    text: "hi".to_string(),
                    timestamp: Timestamp::now(),
                },
            })
            .unwrap();

        match events.recv().await.unwrap() {
            Event::MessageReceived { message } => {
                assert_eq!(message.username, "alice");
                assert_eq!(message.change, 1);
                assert_eq!(message.channel.as_deref(), Some("friends"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_publish_after_leave_is_dropped() {
        let (effects, mut events) = started_swarm().await;

        effects
            .send(Effect::JoinChannel {
                channel: "friends".to_string(),
            })
            .unwrap();
        let _ = events.recv().await.unwrap();

        effects
            .send(Effect::LeaveChannel {
                channel: "friends".to_string(),
            })
            .unwrap();
        effects
            .send(Effect::Publish {
                message: OutboundMessage {
                    username: "alice".to_string(),
                    channel: "friends".to_string(),
                    text: "void".to_string(),
                    timestamp: Timestamp::now(),
                },
            })
            .unwrap();

        // Re-join: the only event must be the pending announcement, not the
        // dropped publish.
        effects
            .send(Effect::JoinChannel {
                channel: "friends".to_string(),
            })
            .unwrap();
        match events.recv().await.unwrap() {
            Event::ChannelPending { channel, .. } => assert_eq!(channel, "friends"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
