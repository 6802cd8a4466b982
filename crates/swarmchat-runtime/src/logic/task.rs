//! Sync coordinator task
//!
//! The single sequential loop that every command, collaborator event, and
//! timer tick funnels through. No other task mutates the state; completions
//! of asynchronous work arrive here as events, in whatever order the
//! collaborators finish them.

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use swarmchat_core::{
    AppEvent, AppEventSender, Attestor, Command, CommandReceiver, Desktop, Effect, EffectSender,
    Event, EventReceiver, Result, SwarmConfig, SwarmError, TimeSource,
};

use super::handlers::SyncHandlers;
use super::state::{CoreState, CoreStats};

// ----------------------------------------------------------------------------
// Sync Coordinator
// ----------------------------------------------------------------------------

/// The coordinating state machine between the swarm, storage, and the UI
pub struct SyncCoordinator {
    state: CoreState,
    command_receiver: CommandReceiver,
    event_receiver: EventReceiver,
    effect_sender: EffectSender,
    app_event_sender: AppEventSender,
    running: bool,
}

impl SyncCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &SwarmConfig,
        attestor: Box<dyn Attestor>,
        desktop: Box<dyn Desktop>,
        clock: Box<dyn TimeSource>,
        command_receiver: CommandReceiver,
        event_receiver: EventReceiver,
        effect_sender: EffectSender,
        app_event_sender: AppEventSender,
    ) -> Self {
        let state = CoreState::new(config.sync.clone(), attestor, desktop, clock);
        Self {
            state,
            command_receiver,
            event_receiver,
            effect_sender,
            app_event_sender,
            running: true,
        }
    }

    /// Run the coordinator loop until shutdown
    pub async fn run(&mut self) -> Result<()> {
        info!("sync coordinator starting");
        self.bootstrap().await?;

        let period = self.state.sync.timeago_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.running {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => {
                            if let Err(e) = self.process_command(command).await {
                                if self.triage(e) {
                                    break;
                                }
                            }
                        }
                        None => {
                            info!("command channel closed, shutting down");
                            break;
                        }
                    }
                }

                event = self.event_receiver.recv() => {
                    match event {
                        Some(event) => {
                            if let Err(e) = self.process_event(event).await {
                                if self.triage(e) {
                                    break;
                                }
                            }
                        }
                        None => {
                            info!("event channel closed, shutting down");
                            break;
                        }
                    }
                }

                _ = ticker.tick() => {
                    let produced = SyncHandlers::handle_timeago_tick(&mut self.state)?;
                    self.forward(produced).await?;
                }
            }
        }

        info!("sync coordinator stopped");
        Ok(())
    }

    /// Join the home channel and request the persisted membership scan.
    /// The scan result re-enters as an event and triggers the first render.
    async fn bootstrap(&mut self) -> Result<()> {
        let home = self.state.home().to_string();
        self.state.channels.ensure(&home);
        self.state.channels.select(&home);

        self.send_effect(Effect::JoinChannel {
            channel: home.clone(),
        })?;
        self.send_effect(Effect::LoadChannels)?;
        Ok(())
    }

    /// Whether an error is fatal for the coordinator
    fn triage(&mut self, error: SwarmError) -> bool {
        match error {
            SwarmError::Channel { .. } | SwarmError::Configuration { .. } => {
                error!("unrecoverable coordinator error: {error}");
                self.running = false;
                true
            }
            other => {
                error!("error while processing, continuing: {other}");
                false
            }
        }
    }

    async fn process_command(&mut self, command: Command) -> Result<()> {
        self.state.stats.commands_processed += 1;

        let produced = match command {
            Command::Execute { input } => SyncHandlers::handle_execute(&mut self.state, &input)?,
            Command::SendMessage { text } => {
                SyncHandlers::handle_send_message(&mut self.state, &text)?
            }
            Command::SelectChannel { name } => {
                SyncHandlers::handle_select_channel(&mut self.state, &name)?
            }
            Command::AddChannel { name } => {
                SyncHandlers::handle_add_channel(&mut self.state, &name)?
            }
            Command::LeaveChannel { name } => {
                SyncHandlers::handle_leave_channel(&mut self.state, &name)?
            }
            Command::ToggleBlockUser { username } => {
                SyncHandlers::handle_toggle_block(&mut self.state, &username)?
            }
            Command::Shutdown => {
                self.running = false;
                (Vec::new(), Vec::new())
            }
        };

        self.forward(produced).await
    }

    async fn process_event(&mut self, event: Event) -> Result<()> {
        self.state.stats.events_processed += 1;

        let produced = match event {
            Event::MessageReceived { message } => {
                SyncHandlers::handle_message_received(&mut self.state, message)?
            }
            Event::ChannelPending { channel, pending } => {
                SyncHandlers::handle_channel_pending(&mut self.state, channel, pending)?
            }
            Event::PeerJoined { peer, channel } => {
                debug!(%peer, %channel, "peer joined");
                SyncHandlers::handle_peer_joined(&mut self.state, channel)?
            }
            Event::PeerDeparted { peer, channel } => {
                debug!(%peer, %channel, "peer departed");
                SyncHandlers::handle_peer_departed(&mut self.state, channel)?
            }
            Event::IdentityVerified { username } => {
                SyncHandlers::handle_identity_verified(&mut self.state, username)?
            }
            Event::IdentityFailed { reason } => {
                SyncHandlers::handle_identity_failed(&mut self.state, reason)?
            }
            Event::AliasFetched {
                name,
                body,
                original,
                depth,
            } => SyncHandlers::handle_alias_fetched(&mut self.state, name, body, original, depth)?,
            Event::ChannelForgotten { channel } => {
                SyncHandlers::handle_channel_forgotten(&mut self.state, channel)?
            }
            Event::ChannelsRestored { channels } => {
                SyncHandlers::handle_channels_restored(&mut self.state, channels)?
            }
            Event::StorageFailed { operation, reason } => {
                SyncHandlers::handle_storage_failed(&mut self.state, operation, reason)?
            }
            Event::SwarmFailed { reason } => {
                SyncHandlers::handle_swarm_failed(&mut self.state, reason)?
            }
        };

        self.forward(produced).await
    }

    /// Forward what a handler produced to the collaborator tasks and the UI
    async fn forward(&mut self, produced: (Vec<Effect>, Vec<AppEvent>)) -> Result<()> {
        let (effects, app_events) = produced;
        for effect in effects {
            self.send_effect(effect)?;
        }
        for app_event in app_events {
            self.send_app_event(app_event).await?;
        }
        Ok(())
    }

    fn send_effect(&mut self, effect: Effect) -> Result<()> {
        // A broadcast send only fails when no collaborator is subscribed;
        // running without a swarm or store is a degraded but legal mode.
        if self.effect_sender.send(effect).is_err() {
            debug!("no collaborator subscribed, effect dropped");
        } else {
            self.state.stats.effects_generated += 1;
        }
        Ok(())
    }

    async fn send_app_event(&mut self, app_event: AppEvent) -> Result<()> {
        self.app_event_sender
            .send(app_event)
            .await
            .map_err(|_| SwarmError::channel_closed("app event"))
    }

    /// Current statistics
    pub fn stats(&self) -> &CoreStats {
        &self.state.stats
    }

    /// The coordinator-owned state (exposed for inspection in tests)
    pub fn state(&self) -> &CoreState {
        &self.state
    }
}
