//! Application shell
//!
//! Builds the runtime from configuration, then bridges two streams: app
//! events from the coordinator are painted to stdout, lines from stdin are
//! turned into commands. The shell owns nothing else; every decision lives
//! behind the command/app-event channels.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use swarmchat_core::{
    AppEvent, Command, CommandSender, StaticIdentity, COMMAND_PREFIX,
};
use swarmchat_runtime::{LoopbackSwarm, SwarmRuntime};
use swarmchat_store::{MemoryStore, RedbStore};

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::render;

/// Build, start, and drive the runtime until the user quits
pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let mut runtime = SwarmRuntime::new(config.core.clone())
        .with_verifier(StaticIdentity::new(config.identity.username.clone()));

    if config.storage.ephemeral {
        info!("ephemeral session, profile kept in memory");
        runtime = runtime.with_store(MemoryStore::new());
    } else {
        let data_dir = config.resolve_data_dir()?;
        let db_path = data_dir.join("profile.redb");
        info!(path = %db_path.display(), "opening profile database");
        runtime = runtime.with_store(RedbStore::open(db_path)?);
    }

    // The replication transport proper is provided by deployment; this
    // build ships the in-process loopback so the client is usable offline.
    runtime.add_swarm(LoopbackSwarm::new())?;

    runtime.start().await?;
    let commands = runtime
        .command_sender()
        .cloned()
        .ok_or_else(|| CliError::Config("runtime exposed no command sender".to_string()))?;
    let mut app_events = runtime
        .take_app_event_receiver()
        .ok_or_else(|| CliError::Config("runtime exposed no app event receiver".to_string()))?;

    for channel in &cli.channels {
        commands
            .send(Command::AddChannel {
                name: channel.clone(),
            })
            .await
            .map_err(|_| CliError::Config("coordinator stopped during startup".to_string()))?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = app_events.recv() => {
                match event {
                    Some(event) => paint(event, &config),
                    None => break,
                }
            }

            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !dispatch_line(&commands, &line).await {
                            break;
                        }
                    }
                    None => break, // stdin closed
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    let _ = commands.send(Command::Shutdown).await;
    runtime.stop().await;
    Ok(())
}

/// Turn one composer line into a command. Returns false when the session
/// should end.
async fn dispatch_line(commands: &CommandSender, line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return true;
    }

    if trimmed == "/quit" || trimmed == "/exit" {
        return false;
    }

    let command = if trimmed.starts_with(COMMAND_PREFIX) {
        Command::Execute {
            input: trimmed.to_string(),
        }
    } else {
        Command::SendMessage {
            text: line.to_string(),
        }
    };

    if commands.send(command).await.is_err() {
        warn!("coordinator stopped, ending session");
        return false;
    }
    true
}

/// Paint one app event
fn paint(event: AppEvent, config: &AppConfig) {
    match event {
        AppEvent::Render { snapshot, .. } => {
            print!("{}", render::render(&snapshot, config.ui.max_messages));
        }
        AppEvent::BadgeUpdated { count } => {
            println!("· {count} unseen mention{}", if count == 1 { "" } else { "s" });
        }
        AppEvent::AutocompleteAdded { username } => {
            info!(%username, "new autocomplete candidate");
        }
        AppEvent::IdentityHelp => {
            println!("· identity not verified; set identity.username in swarmchat.toml or pass --username");
        }
    }
}
