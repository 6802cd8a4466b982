//! Swarmchat Runtime
//!
//! Wires the sync coordinator to its collaborator tasks: any number of swarm
//! transports, the profile storage task, and the one-shot identity check.
//! Applications register collaborators, start the runtime, and talk to it
//! through the command sender and the app event receiver.

use tokio::task::JoinHandle;
use tracing::{info, warn};

use swarmchat_core::{
    create_app_event_channel, create_command_channel, create_effect_channel,
    create_event_channel, AppEventReceiver, Attestor, CommandSender, Desktop, Event,
    HeadlessDesktop, IdentityVerifier, Result, SwarmConfig, SwarmError, SwarmTask,
    SystemTimeSource, TimeSource,
};
use swarmchat_store::{ProfileStore, StorageTask};

use crate::logic::SyncCoordinator;

// ----------------------------------------------------------------------------
// Swarm Runtime
// ----------------------------------------------------------------------------

/// Orchestrator for the sync coordinator and its collaborator tasks
pub struct SwarmRuntime {
    config: SwarmConfig,
    attestor: Option<Box<dyn Attestor>>,
    desktop: Option<Box<dyn Desktop>>,
    clock: Option<Box<dyn TimeSource>>,
    verifier: Option<Box<dyn IdentityVerifier>>,
    store: Option<Box<dyn ProfileStore>>,
    pending_swarms: Vec<Box<dyn SwarmTask>>,
    task_handles: Vec<JoinHandle<Result<()>>>,
    command_sender: Option<CommandSender>,
    app_event_receiver: Option<AppEventReceiver>,
    running: bool,
}

impl SwarmRuntime {
    /// Create a new runtime with the given configuration
    pub fn new(config: SwarmConfig) -> Self {
        Self {
            config,
            attestor: None,
            desktop: None,
            clock: None,
            verifier: None,
            store: None,
            pending_swarms: Vec::new(),
            task_handles: Vec::new(),
            command_sender: None,
            app_event_receiver: None,
            running: false,
        }
    }

    /// Register a swarm transport task. Must be called before `start()`.
    pub fn add_swarm<T: SwarmTask + 'static>(&mut self, swarm: T) -> Result<()> {
        if self.running {
            return Err(SwarmError::Configuration {
                reason: "cannot add swarms to a running runtime".to_string(),
            });
        }
        self.pending_swarms.push(Box::new(swarm));
        Ok(())
    }

    /// Use the given profile store for channel membership and aliases
    pub fn with_store<S: ProfileStore + 'static>(mut self, store: S) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Use the given message attestor (defaults to accepting everything)
    pub fn with_attestor<A: Attestor + 'static>(mut self, attestor: A) -> Self {
        self.attestor = Some(Box::new(attestor));
        self
    }

    /// Use the given desktop integration (defaults to headless)
    pub fn with_desktop<D: Desktop + 'static>(mut self, desktop: D) -> Self {
        self.desktop = Some(Box::new(desktop));
        self
    }

    /// Use the given identity verifier. Without one the client stays in
    /// anonymous mode.
    pub fn with_verifier<V: IdentityVerifier + 'static>(mut self, verifier: V) -> Self {
        self.verifier = Some(Box::new(verifier));
        self
    }

    /// Override the clock (tests)
    pub fn with_clock<C: TimeSource + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Start the coordinator and every registered collaborator task
    pub async fn start(&mut self) -> Result<()> {
        if self.running {
            return Err(SwarmError::Configuration {
                reason: "runtime already running".to_string(),
            });
        }
        self.config.validate()?;

        let (command_sender, command_receiver) = create_command_channel(&self.config.channels);
        let (event_sender, event_receiver) = create_event_channel(&self.config.channels);
        let (effect_sender, _coordinator_effects) = create_effect_channel(&self.config.channels);
        let (app_event_sender, app_event_receiver) =
            create_app_event_channel(&self.config.channels);

        self.command_sender = Some(command_sender);
        self.app_event_receiver = Some(app_event_receiver);

        // Subscribe every collaborator before the coordinator can emit its
        // bootstrap effects, so none are missed.
        let swarms = std::mem::take(&mut self.pending_swarms);
        for mut swarm in swarms {
            swarm.attach_channels(event_sender.clone(), effect_sender.subscribe())?;
            let name = swarm.name().to_string();
            info!(swarm = %name, "starting swarm task");
            self.task_handles
                .push(tokio::spawn(async move { swarm.run().await }));
        }

        if let Some(store) = self.store.take() {
            let mut storage_task =
                StorageTask::new(store, event_sender.clone(), effect_sender.subscribe());
            self.task_handles
                .push(tokio::spawn(async move { storage_task.run().await }));
        } else {
            warn!("no profile store configured, memberships and aliases will not persist");
        }

        // One-shot identity verification; the verdict re-enters as an event.
        let verify_events = event_sender.clone();
        let verifier = self.verifier.take();
        self.task_handles.push(tokio::spawn(async move {
            let event = match verifier {
                Some(verifier) => match verifier.verify().await {
                    Ok(verdict) if verdict.verified => Event::IdentityVerified {
                        username: verdict.username,
                    },
                    Ok(_) => Event::IdentityFailed {
                        reason: "identity not verified".to_string(),
                    },
                    Err(e) => Event::IdentityFailed {
                        reason: e.to_string(),
                    },
                },
                None => Event::IdentityFailed {
                    reason: "no identity verifier configured".to_string(),
                },
            };
            verify_events
                .send(event)
                .await
                .map_err(|_| SwarmError::channel_closed("event"))
        }));

        let mut coordinator = SyncCoordinator::new(
            &self.config,
            self.attestor
                .take()
                .unwrap_or_else(|| Box::new(swarmchat_core::AcceptAll)),
            self.desktop.take().unwrap_or_else(|| Box::new(HeadlessDesktop)),
            self.clock
                .take()
                .unwrap_or_else(|| Box::new(SystemTimeSource)),
            command_receiver,
            event_receiver,
            effect_sender,
            app_event_sender,
        );
        self.task_handles
            .push(tokio::spawn(async move { coordinator.run().await }));

        self.running = true;
        info!("swarmchat runtime started");
        Ok(())
    }

    /// Stop every task
    pub async fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        for handle in self.task_handles.drain(..) {
            handle.abort();
        }
        self.command_sender = None;
        self.app_event_receiver = None;
        info!("swarmchat runtime stopped");
    }

    /// Command sender for the UI
    pub fn command_sender(&self) -> Option<&CommandSender> {
        self.command_sender.as_ref()
    }

    /// Take the app event receiver for the UI (once)
    pub fn take_app_event_receiver(&mut self) -> Option<AppEventReceiver> {
        self.app_event_receiver.take()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }
}

impl Drop for SwarmRuntime {
    fn drop(&mut self) {
        for handle in &self.task_handles {
            handle.abort();
        }
    }
}
