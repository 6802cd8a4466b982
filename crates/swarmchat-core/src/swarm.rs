//! Swarm task trait
//!
//! The replication transport runs as an independent async task wired to the
//! sync coordinator over the typed channels. Concrete transports live
//! outside this crate; the runtime ships an in-process loopback
//! implementation for tests and offline use.

use crate::bus::{EffectReceiver, EventSender};
use crate::Result;

// ----------------------------------------------------------------------------
// Swarm Task Trait
// ----------------------------------------------------------------------------

/// Common interface for replication transport tasks
///
/// A swarm task:
/// - runs its own async event loop via [`Self::run`]
/// - receives [`crate::Effect`]s (subscriptions, publishes) from the
///   coordinator and executes the transport-facing ones
/// - delivers [`crate::Event`]s (messages, pending counts, peer presence)
///   to the coordinator, awaiting event-channel capacity between messages so
///   deliveries stay ordered and bounded
/// - holds no shared state with other tasks; its lifecycle is managed by the
///   runtime
#[async_trait::async_trait]
pub trait SwarmTask: Send {
    /// Attach the channels created by the runtime. Implementations store the
    /// handles and use them for all coordinator communication.
    fn attach_channels(
        &mut self,
        event_sender: EventSender,
        effect_receiver: EffectReceiver,
    ) -> Result<()>;

    /// Run the transport's main event loop until shutdown or cancellation
    async fn run(&mut self) -> Result<()>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}
