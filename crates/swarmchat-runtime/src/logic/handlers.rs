//! Command and event handlers
//!
//! One handler per command/event kind. Each takes the coordinator state and
//! returns the effects (for the swarm and storage tasks) and app events (for
//! the UI) it produced; the coordinator task forwards them. Handlers never
//! block and never crash the coordinator: unknown channels, raced
//! completions, and malformed input all degrade to a logged no-op or a
//! literal chat message.

use tracing::{debug, warn};

use swarmchat_core::{
    AppEvent, ChannelDescriptor, CommandResolver, Effect, OutboundMessage, RawMessage, Resolution,
    Result,
};

use super::state::{CoreState, Phase};

type Produced = (Vec<Effect>, Vec<AppEvent>);

const NOTHING: Produced = (Vec::new(), Vec::new());

/// Command and event handlers for the sync coordinator
pub struct SyncHandlers;

impl SyncHandlers {
    // ------------------------------------------------------------------
    // Swarm events
    // ------------------------------------------------------------------

    /// Ingest a message from the replicated log
    pub fn handle_message_received(state: &mut CoreState, raw: RawMessage) -> Result<Produced> {
        state.stats.messages_ingested += 1;
        let now = state.clock.now();
        let home = state.home().to_string();
        let enriched = state.enricher.enrich(&raw, &home, now);
        let channel_name = enriched.channel.clone();

        // A leave is in flight for this channel; the subscription is being
        // torn down and whatever still trickles in is dropped.
        if state.departing.contains(&channel_name) {
            debug!(channel = %channel_name, "dropping message for departing channel");
            return Ok(NOTHING);
        }

        let mut app_events = Vec::new();

        let created = !state.channels.contains(&channel_name);
        state.channels.ensure(&channel_name);
        if created {
            state.channels.select(&channel_name);
        }

        // Mention notification, only once our own identity is known and the
        // window is elsewhere.
        if state.verified && enriched.highlight && !state.desktop.is_focused() {
            let preview: String = enriched
                .text
                .chars()
                .take(state.sync.mention_preview_len)
                .collect();
            state.desktop.notify(
                &format!("Mentioned in #{channel_name}"),
                &format!("{}: {}", enriched.username, preview),
            );
            state.badge += 1;
            state.stats.mentions_notified += 1;
            app_events.push(AppEvent::BadgeUpdated { count: state.badge });
        }

        // First sight of a validly attributed user: remember them and offer
        // the name for composer autocompletion.
        if !enriched.anon
            && enriched.valid
            && state
                .users
                .register(&enriched.author, enriched.avatar.clone())
        {
            app_events.push(AppEvent::AutocompleteAdded {
                username: enriched.author.clone(),
            });
        }

        let change = enriched.change;
        if let Some(channel) = state.channels.get_mut(&channel_name) {
            if channel.apply(enriched) {
                state.stats.messages_merged += 1;
            }
        }

        // Refresh only once the backlog snapshot has replayed; live traffic
        // always repaints and scrolls.
        if state.catchup.record_replay(&channel_name, change) {
            app_events.push(state.render_event(true));
        }

        Ok((Vec::new(), app_events))
    }

    /// Seed the catch-up mark from the transport's pending count
    pub fn handle_channel_pending(
        state: &mut CoreState,
        channel: String,
        pending: u64,
    ) -> Result<Produced> {
        state.catchup.start_watching(&channel, pending);
        Ok(NOTHING)
    }

    pub fn handle_peer_joined(state: &mut CoreState, channel: String) -> Result<Produced> {
        state.channels.peer_joined(&channel);
        state.peers += 1;
        let render = state.render_event(false);
        Ok((Vec::new(), vec![render]))
    }

    pub fn handle_peer_departed(state: &mut CoreState, channel: String) -> Result<Produced> {
        state.channels.peer_departed(&channel);
        state.peers = state.peers.saturating_sub(1);
        let render = state.render_event(false);
        Ok((Vec::new(), vec![render]))
    }

    pub fn handle_swarm_failed(_state: &mut CoreState, reason: String) -> Result<Produced> {
        warn!(%reason, "swarm failure, continuing degraded");
        Ok(NOTHING)
    }

    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    /// Identity verification succeeded: adopt the username, re-enrich every
    /// stored message (highlights could not be computed before), repaint.
    pub fn handle_identity_verified(
        state: &mut CoreState,
        username: String,
    ) -> Result<Produced> {
        state.phase = Phase::Verified;
        state.username = username.clone();
        state.verified = true;
        state.enricher.set_self_username(&username);

        let now = state.clock.now();
        for channel in state.channels.iter_mut() {
            for message in &mut channel.messages {
                state.enricher.re_enrich(message, now);
            }
        }

        state.phase = Phase::Running;
        let render = state.render_event(false);
        Ok((Vec::new(), vec![render]))
    }

    /// Identity verification failed: stay anonymous, surface setup help
    pub fn handle_identity_failed(state: &mut CoreState, reason: String) -> Result<Produced> {
        warn!(%reason, "identity verification failed, staying anonymous");
        state.phase = Phase::Running;
        Ok((Vec::new(), vec![AppEvent::IdentityHelp]))
    }

    // ------------------------------------------------------------------
    // Channel management
    // ------------------------------------------------------------------

    /// Join a channel: subscribe, persist membership, select it
    pub fn handle_add_channel(state: &mut CoreState, name: &str) -> Result<Produced> {
        let Some(name) = CommandResolver::normalize_channel(name) else {
            debug!("ignoring join of empty channel name");
            return Ok(NOTHING);
        };

        state.departing.remove(&name);

        let mut effects = Vec::new();
        if !state.channels.contains(&name) {
            state.channels.ensure(&name);
            effects.push(Effect::JoinChannel {
                channel: name.clone(),
            });
        }

        let (select_effects, app_events) = Self::handle_select_channel(state, &name)?;
        effects.extend(select_effects);
        Ok((effects, app_events))
    }

    /// Make a channel active. Membership of non-home channels is
    /// (re-)persisted on selection.
    pub fn handle_select_channel(state: &mut CoreState, name: &str) -> Result<Produced> {
        if !state.channels.select(name) {
            debug!(channel = name, "cannot select unknown channel");
            return Ok(NOTHING);
        }

        let mut effects = Vec::new();
        if name != state.home() {
            if let Some(channel) = state.channels.get(name) {
                effects.push(Effect::PersistChannel {
                    descriptor: ChannelDescriptor {
                        name: channel.name.clone(),
                        id: channel.id,
                    },
                });
            }
        }

        // Bring the relative times up to date before showing the channel;
        // the periodic tick only covers whichever channel was active.
        let now = state.clock.now();
        if let Some(channel) = state.channels.active_mut() {
            for message in &mut channel.messages {
                message.refresh_timeago(now);
            }
        }

        let render = state.render_event(true);
        Ok((effects, vec![render]))
    }

    /// Leave a channel. The home channel can never be left; for the rest,
    /// the persisted membership is deleted first and the in-memory removal
    /// happens when the completion comes back.
    pub fn handle_leave_channel(state: &mut CoreState, name: &str) -> Result<Produced> {
        if name == state.home() {
            debug!("the home channel cannot be left");
            return Ok(NOTHING);
        }
        if !state.channels.contains(name) {
            return Ok(NOTHING);
        }

        state.departing.insert(name.to_string());
        Ok((
            vec![Effect::ForgetChannel {
                channel: name.to_string(),
            }],
            Vec::new(),
        ))
    }

    /// The membership delete completed: drop the channel, unsubscribe, and
    /// fall back to the home channel.
    pub fn handle_channel_forgotten(state: &mut CoreState, channel: String) -> Result<Produced> {
        if !state.departing.contains(&channel) {
            // The channel was re-added while the delete was in flight; the
            // newer join wins.
            debug!(%channel, "ignoring stale leave completion");
            return Ok(NOTHING);
        }

        state.channels.remove(&channel);
        state.catchup.forget(&channel);

        let mut effects = vec![Effect::LeaveChannel {
            channel: channel.clone(),
        }];
        let home = state.home().to_string();
        let (select_effects, app_events) = Self::handle_select_channel(state, &home)?;
        effects.extend(select_effects);
        Ok((effects, app_events))
    }

    /// Restore persisted memberships at startup, before the first render
    pub fn handle_channels_restored(
        state: &mut CoreState,
        channels: Vec<ChannelDescriptor>,
    ) -> Result<Produced> {
        let mut effects = Vec::new();
        for descriptor in channels {
            if state.channels.contains(&descriptor.name) {
                continue;
            }
            state.channels.restore(&descriptor.name, descriptor.id);
            effects.push(Effect::JoinChannel {
                channel: descriptor.name,
            });
        }
        let render = state.render_event(false);
        Ok((effects, vec![render]))
    }

    // ------------------------------------------------------------------
    // Composer
    // ------------------------------------------------------------------

    /// Publish chat text to the active channel. All-whitespace input is a
    /// silent no-op; there is no optimistic append, the message comes back
    /// through the log.
    pub fn handle_send_message(state: &mut CoreState, text: &str) -> Result<Produced> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(NOTHING);
        }

        let channel = state
            .channels
            .active()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| state.home().to_string());

        state.stats.messages_published += 1;
        Ok((
            vec![Effect::Publish {
                message: OutboundMessage {
                    username: state.username.clone(),
                    channel,
                    text: trimmed.to_string(),
                    timestamp: state.clock.now(),
                },
            }],
            Vec::new(),
        ))
    }

    /// Execute a command line from the composer
    pub fn handle_execute(state: &mut CoreState, input: &str) -> Result<Produced> {
        let resolution = state.resolver.resolve(input);
        Self::dispatch_resolution(state, resolution)
    }

    /// An alias body (or a miss) came back from storage
    pub fn handle_alias_fetched(
        state: &mut CoreState,
        name: String,
        body: Option<String>,
        original: String,
        depth: usize,
    ) -> Result<Produced> {
        match body {
            Some(body) => {
                let resolution = state.resolver.resolve_at(&body, depth + 1);
                Self::dispatch_resolution(state, resolution)
            }
            None => {
                // Expected fallback: not a command after all, send it as is.
                debug!("Unrecognized command: {name} (in {original:?})");
                Self::handle_send_message(state, &original)
            }
        }
    }

    fn dispatch_resolution(state: &mut CoreState, resolution: Resolution) -> Result<Produced> {
        match resolution {
            Resolution::Act(action) => Self::dispatch_action(state, action),
            Resolution::Lookup {
                name,
                original,
                depth,
            } => Ok((
                vec![Effect::FetchAlias {
                    name,
                    original,
                    depth,
                }],
                Vec::new(),
            )),
            Resolution::Fallback { original, reason } => {
                warn!(input = %original, %reason, "malformed command, sending literally");
                Self::handle_send_message(state, &original)
            }
        }
    }

    fn dispatch_action(
        state: &mut CoreState,
        action: swarmchat_core::Action,
    ) -> Result<Produced> {
        use swarmchat_core::Action;
        match action {
            Action::AddChannel(name) => Self::handle_add_channel(state, &name),
            Action::LeaveActive => {
                let active = state.channels.active().map(|c| c.name.clone());
                match active {
                    Some(name) => Self::handle_leave_channel(state, &name),
                    None => Ok(NOTHING),
                }
            }
            Action::LeaveAll => {
                let mut effects = Vec::new();
                let mut app_events = Vec::new();
                for name in state.channels.names() {
                    let (e, a) = Self::handle_leave_channel(state, &name)?;
                    effects.extend(e);
                    app_events.extend(a);
                }
                Ok((effects, app_events))
            }
            Action::StoreAlias { name, body } => {
                Ok((vec![Effect::PersistAlias { name, body }], Vec::new()))
            }
            Action::Send(text) => Self::handle_send_message(state, &text),
        }
    }

    // ------------------------------------------------------------------
    // Housekeeping
    // ------------------------------------------------------------------

    /// Flip the display filter for a user and repaint
    pub fn handle_toggle_block(state: &mut CoreState, username: &str) -> Result<Produced> {
        if state.users.toggle_block(username).is_none() {
            return Ok(NOTHING);
        }
        let render = state.render_event(true);
        Ok((Vec::new(), vec![render]))
    }

    /// Periodic tick: recompute the relative times of the active channel
    /// only, then repaint
    pub fn handle_timeago_tick(state: &mut CoreState) -> Result<Produced> {
        let now = state.clock.now();
        match state.channels.active_mut() {
            Some(channel) => {
                for message in &mut channel.messages {
                    message.refresh_timeago(now);
                }
            }
            None => return Ok(NOTHING),
        }
        let render = state.render_event(false);
        Ok((Vec::new(), vec![render]))
    }

    pub fn handle_storage_failed(
        _state: &mut CoreState,
        operation: String,
        reason: String,
    ) -> Result<Produced> {
        warn!(%operation, %reason, "storage failure, continuing degraded");
        Ok(NOTHING)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use swarmchat_core::{
        AcceptAll, Desktop, HeadlessDesktop, SyncConfig, TimeSource, Timestamp,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct FixedClock(Timestamp);

    impl TimeSource for FixedClock {
        fn now(&self) -> Timestamp {
            self.0
        }
    }

    struct UnfocusedDesktop {
        notifications: Arc<AtomicU32>,
    }

    impl Desktop for UnfocusedDesktop {
        fn is_focused(&self) -> bool {
            false
        }

        fn notify(&self, _title: &str, _body: &str) {
            self.notifications.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn new_state() -> CoreState {
        let mut state = CoreState::new(
            SyncConfig::default(),
            Box::new(AcceptAll),
            Box::new(HeadlessDesktop),
            Box::new(FixedClock(Timestamp::new(1_000))),
        );
        state.channels.ensure("friends");
        state.channels.select("friends");
        state
    }

    fn raw(username: &str, channel: &str, text: &str, change: u64) -> RawMessage {
        RawMessage {
            username: username.to_string(),
            channel: Some(channel.to_string()),
            text: text.to_string(),
            timestamp: Timestamp::new(500),
            change,
        }
    }

    fn renders(app_events: &[AppEvent]) -> usize {
        app_events
            .iter()
            .filter(|e| matches!(e, AppEvent::Render { .. }))
            .count()
    }

    #[test]
    fn test_consecutive_same_author_messages_merge() {
        let mut state = new_state();
        SyncHandlers::handle_message_received(&mut state, raw("alice", "friends", "hi", 1))
            .unwrap();
        SyncHandlers::handle_message_received(&mut state, raw("alice", "friends", "there", 2))
            .unwrap();
        SyncHandlers::handle_message_received(&mut state, raw("bob", "friends", "hello", 3))
            .unwrap();

        let messages = &state.channels.get("friends").unwrap().messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "hi\nthere");
        assert_eq!(state.stats.messages_merged, 1);
    }

    #[test]
    fn test_first_message_creates_and_selects_channel() {
        let mut state = new_state();
        SyncHandlers::handle_message_received(&mut state, raw("alice", "general", "hi", 1))
            .unwrap();
        assert!(state.channels.contains("general"));
        assert_eq!(state.channels.active().unwrap().name, "general");
    }

    #[test]
    fn test_replay_refreshes_only_after_the_mark() {
        let mut state = new_state();
        SyncHandlers::handle_channel_pending(&mut state, "general".to_string(), 5).unwrap();

        let mut total_renders = 0;
        for change in 1..=6 {
            let author = format!("user{change}");
            let (_, app_events) = SyncHandlers::handle_message_received(
                &mut state,
                raw(&author, "general", "backlog", change),
            )
            .unwrap();
            let rendered = renders(&app_events);
            if change < 5 {
                assert_eq!(rendered, 0, "change {change} must be suppressed");
            } else {
                assert_eq!(rendered, 1, "change {change} must refresh");
            }
            total_renders += rendered;
        }
        assert_eq!(total_renders, 2);
        assert_eq!(state.channels.get("general").unwrap().messages.len(), 6);
    }

    #[test]
    fn test_leaving_home_channel_is_a_no_op() {
        let mut state = new_state();
        SyncHandlers::handle_message_received(&mut state, raw("alice", "friends", "hi", 1))
            .unwrap();

        let (effects, app_events) =
            SyncHandlers::handle_leave_channel(&mut state, "friends").unwrap();
        assert!(effects.is_empty());
        assert!(app_events.is_empty());
        assert!(state.channels.contains("friends"));
        assert_eq!(state.channels.get("friends").unwrap().messages.len(), 1);
    }

    #[test]
    fn test_leave_defers_removal_until_completion() {
        let mut state = new_state();
        SyncHandlers::handle_add_channel(&mut state, "#general").unwrap();

        let (effects, _) = SyncHandlers::handle_leave_channel(&mut state, "general").unwrap();
        assert!(matches!(&effects[..], [Effect::ForgetChannel { channel }] if channel == "general"));
        // Still present until the persistence delete confirms.
        assert!(state.channels.contains("general"));

        let (effects, _) =
            SyncHandlers::handle_channel_forgotten(&mut state, "general".to_string()).unwrap();
        assert!(!state.channels.contains("general"));
        assert_eq!(state.channels.active().unwrap().name, "friends");
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::LeaveChannel { channel } if channel == "general")));
    }

    #[test]
    fn test_messages_for_departing_channel_are_dropped() {
        let mut state = new_state();
        SyncHandlers::handle_add_channel(&mut state, "general").unwrap();
        SyncHandlers::handle_leave_channel(&mut state, "general").unwrap();

        let (_, app_events) =
            SyncHandlers::handle_message_received(&mut state, raw("alice", "general", "late", 9))
                .unwrap();
        assert!(app_events.is_empty());
        assert!(state.channels.get("general").unwrap().messages.is_empty());

        // A completion for a channel that was re-added meanwhile is stale.
        SyncHandlers::handle_add_channel(&mut state, "general").unwrap();
        SyncHandlers::handle_channel_forgotten(&mut state, "general".to_string()).unwrap();
        assert!(state.channels.contains("general"));
    }

    #[test]
    fn test_join_strips_marker_and_rejects_empty() {
        let mut state = new_state();
        let (effects, _) = SyncHandlers::handle_add_channel(&mut state, "#general").unwrap();
        assert!(state.channels.contains("general"));
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::JoinChannel { channel } if channel == "general")));
        assert!(effects.iter().any(
            |e| matches!(e, Effect::PersistChannel { descriptor } if descriptor.name == "general")
        ));

        let (effects, app_events) = SyncHandlers::handle_add_channel(&mut state, "#").unwrap();
        assert!(effects.is_empty());
        assert!(app_events.is_empty());
    }

    #[test]
    fn test_whitespace_send_publishes_nothing() {
        let mut state = new_state();
        let (effects, _) = SyncHandlers::handle_send_message(&mut state, "   \t  ").unwrap();
        assert!(effects.is_empty());
        assert_eq!(state.stats.messages_published, 0);
    }

    #[test]
    fn test_send_targets_the_active_channel() {
        let mut state = new_state();
        SyncHandlers::handle_add_channel(&mut state, "general").unwrap();
        let (effects, _) = SyncHandlers::handle_send_message(&mut state, "  hello  ").unwrap();
        match &effects[..] {
            [Effect::Publish { message }] => {
                assert_eq!(message.channel, "general");
                assert_eq!(message.text, "hello");
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_command_falls_back_to_literal_send() {
        let mut state = new_state();
        let (effects, _) = SyncHandlers::handle_execute(&mut state, "/brb").unwrap();
        assert!(matches!(&effects[..], [Effect::FetchAlias { name, .. }] if name == "brb"));

        let (effects, _) = SyncHandlers::handle_alias_fetched(
            &mut state,
            "brb".to_string(),
            None,
            "/brb".to_string(),
            0,
        )
        .unwrap();
        assert!(matches!(&effects[..], [Effect::Publish { message }] if message.text == "/brb"));
    }

    #[test]
    fn test_alias_body_executes_like_the_command() {
        let mut state = new_state();
        SyncHandlers::handle_add_channel(&mut state, "general").unwrap();

        let (effects, _) = SyncHandlers::handle_alias_fetched(
            &mut state,
            "brb".to_string(),
            Some("leave".to_string()),
            "/brb".to_string(),
            0,
        )
        .unwrap();
        assert!(matches!(&effects[..], [Effect::ForgetChannel { channel }] if channel == "general"));
    }

    #[test]
    fn test_alias_chain_is_depth_limited() {
        let mut state = new_state();
        let depth = state.sync.alias_max_depth;
        let (effects, _) = SyncHandlers::handle_alias_fetched(
            &mut state,
            "a".to_string(),
            Some("b".to_string()),
            "/a".to_string(),
            depth,
        )
        .unwrap();
        // Beyond the limit the body is not resolved further; the original
        // input is sent literally.
        assert!(matches!(&effects[..], [Effect::Publish { message }] if message.text == "/a"));
    }

    #[test]
    fn test_identity_verification_re_enriches_stored_messages() {
        let mut state = new_state();
        SyncHandlers::handle_message_received(&mut state, raw("alice", "friends", "hi bob", 1))
            .unwrap();
        assert!(!state.channels.get("friends").unwrap().messages[0].highlight);

        SyncHandlers::handle_identity_verified(&mut state, "bob".to_string()).unwrap();
        assert!(state.verified);
        assert_eq!(state.username, "bob");
        assert_eq!(state.phase, Phase::Running);
        assert!(state.channels.get("friends").unwrap().messages[0].highlight);
    }

    #[test]
    fn test_mention_notifies_and_bumps_badge_when_unfocused() {
        let notifications = Arc::new(AtomicU32::new(0));
        let mut state = CoreState::new(
            SyncConfig::default(),
            Box::new(AcceptAll),
            Box::new(UnfocusedDesktop {
                notifications: notifications.clone(),
            }),
            Box::new(FixedClock(Timestamp::new(1_000))),
        );
        state.channels.ensure("friends");
        state.channels.select("friends");
        SyncHandlers::handle_identity_verified(&mut state, "bob".to_string()).unwrap();

        let (_, app_events) =
            SyncHandlers::handle_message_received(&mut state, raw("alice", "friends", "hi bob", 1))
                .unwrap();
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
        assert!(app_events
            .iter()
            .any(|e| matches!(e, AppEvent::BadgeUpdated { count: 1 })));
        assert_eq!(state.stats.mentions_notified, 1);
    }

    #[test]
    fn test_new_valid_user_becomes_autocomplete_candidate() {
        let mut state = new_state();
        let (_, app_events) =
            SyncHandlers::handle_message_received(&mut state, raw("alice", "friends", "hi", 1))
                .unwrap();
        assert!(app_events
            .iter()
            .any(|e| matches!(e, AppEvent::AutocompleteAdded { username } if username == "alice")));

        // Second message from the same user adds nothing new.
        let (_, app_events) =
            SyncHandlers::handle_message_received(&mut state, raw("alice", "friends", "again", 2))
                .unwrap();
        assert!(!app_events
            .iter()
            .any(|e| matches!(e, AppEvent::AutocompleteAdded { .. })));
    }

    #[test]
    fn test_peer_counts_track_join_and_departure() {
        let mut state = new_state();
        SyncHandlers::handle_peer_joined(&mut state, "friends".to_string()).unwrap();
        SyncHandlers::handle_peer_joined(&mut state, "friends".to_string()).unwrap();
        assert_eq!(state.peers, 2);
        assert_eq!(state.channels.get("friends").unwrap().peers, 2);

        SyncHandlers::handle_peer_departed(&mut state, "friends".to_string()).unwrap();
        assert_eq!(state.peers, 1);

        // Departures beyond what joined clamp at zero.
        SyncHandlers::handle_peer_departed(&mut state, "friends".to_string()).unwrap();
        SyncHandlers::handle_peer_departed(&mut state, "friends".to_string()).unwrap();
        assert_eq!(state.peers, 0);
        assert_eq!(state.channels.get("friends").unwrap().peers, 0);
    }

    #[test]
    fn test_timeago_tick_touches_only_the_active_channel() {
        let mut state = new_state();
        SyncHandlers::handle_message_received(&mut state, raw("alice", "friends", "old", 1))
            .unwrap();
        SyncHandlers::handle_add_channel(&mut state, "general").unwrap();
        SyncHandlers::handle_message_received(&mut state, raw("bob", "general", "newer", 1))
            .unwrap();

        state.clock = Box::new(FixedClock(Timestamp::new(10 * 60 * 1000)));
        let (_, app_events) = SyncHandlers::handle_timeago_tick(&mut state).unwrap();
        assert_eq!(renders(&app_events), 1);

        assert_eq!(
            state.channels.get("general").unwrap().messages[0].timeago,
            "9 minutes ago"
        );
        // Inactive channel untouched until it is selected again.
        assert_eq!(
            state.channels.get("friends").unwrap().messages[0].timeago,
            "just now"
        );
    }

    #[test]
    fn test_restore_joins_persisted_channels() {
        let mut state = new_state();
        let (effects, app_events) = SyncHandlers::handle_channels_restored(
            &mut state,
            vec![
                ChannelDescriptor {
                    name: "general".to_string(),
                    id: 1,
                },
                ChannelDescriptor {
                    name: "rust".to_string(),
                    id: 2,
                },
            ],
        )
        .unwrap();

        assert_eq!(
            effects
                .iter()
                .filter(|e| matches!(e, Effect::JoinChannel { .. }))
                .count(),
            2
        );
        assert_eq!(renders(&app_events), 1);
        assert!(state.channels.contains("general"));
        assert!(state.channels.contains("rust"));
        // Restoration does not steal the active channel.
        assert_eq!(state.channels.active().unwrap().name, "friends");
    }

    #[test]
    fn test_toggle_block_repaints() {
        let mut state = new_state();
        SyncHandlers::handle_message_received(&mut state, raw("alice", "friends", "hi", 1))
            .unwrap();

        let (_, app_events) = SyncHandlers::handle_toggle_block(&mut state, "alice").unwrap();
        assert_eq!(renders(&app_events), 1);
        assert!(state.users.get("alice").unwrap().blocked);

        let (_, app_events) = SyncHandlers::handle_toggle_block(&mut state, "nobody").unwrap();
        assert!(app_events.is_empty());
    }

    #[test]
    fn test_leave_all_spares_only_home() {
        let mut state = new_state();
        SyncHandlers::handle_add_channel(&mut state, "general").unwrap();
        SyncHandlers::handle_add_channel(&mut state, "rust").unwrap();

        let (effects, _) =
            SyncHandlers::dispatch_action(&mut state, swarmchat_core::Action::LeaveAll).unwrap();
        let forgotten: Vec<_> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::ForgetChannel { channel } => Some(channel.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(forgotten, vec!["general", "rust"]);
    }
}
