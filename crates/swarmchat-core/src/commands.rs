//! Command resolution
//!
//! User input starting with the command prefix is parsed into an [`Action`].
//! Unrecognized commands are looked up in the persisted alias store; because
//! that lookup is asynchronous, resolution is expressed as a [`Resolution`]
//! that either carries a finished action or asks the coordinator to fetch an
//! alias body and resume. Alias bodies may themselves be commands, so
//! resolution can chain; the chain is bounded by an explicit depth limit and
//! exceeding it degrades to a literal send, like any other malformed command.

use serde::{Deserialize, Serialize};

/// Input starting with this character is treated as a command.
pub const COMMAND_PREFIX: char = '/';

/// Channel names may be written with this leading marker; it is stripped
/// during normalization.
pub const CHANNEL_MARKER: char = '#';

// ----------------------------------------------------------------------------
// Actions
// ----------------------------------------------------------------------------

/// A fully resolved user command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Join (creating if necessary) and select a channel
    AddChannel(String),
    /// Leave whichever channel is currently active
    LeaveActive,
    /// Leave every known channel
    LeaveAll,
    /// Persist an alias body under a name
    StoreAlias { name: String, body: String },
    /// Send text to the active channel
    Send(String),
}

/// Outcome of one resolution step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The input resolved to an action
    Act(Action),
    /// The command is not built in; the alias store must be consulted.
    /// `original` and `depth` travel with the lookup so resolution can
    /// resume when the body (or a miss) comes back.
    Lookup {
        name: String,
        original: String,
        depth: usize,
    },
    /// The input could not be interpreted; it is sent literally and the
    /// reason is logged as a diagnostic.
    Fallback { original: String, reason: String },
}

// ----------------------------------------------------------------------------
// Command Resolver
// ----------------------------------------------------------------------------

/// Parses command strings and drives alias indirection
#[derive(Debug, Clone)]
pub struct CommandResolver {
    max_depth: usize,
}

impl CommandResolver {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Resolve a line of user input
    pub fn resolve(&self, input: &str) -> Resolution {
        self.resolve_at(input, 0)
    }

    /// Resolve at a given alias depth. Depth 0 is direct user input and must
    /// carry the command prefix to be treated as a command; alias bodies
    /// (depth > 0) are command strings whether or not they repeat the prefix.
    pub fn resolve_at(&self, input: &str, depth: usize) -> Resolution {
        if depth > self.max_depth {
            return Resolution::Fallback {
                original: input.to_string(),
                reason: format!("alias chain exceeded depth {}", self.max_depth),
            };
        }

        let trimmed = input.trim();
        let command_str = match trimmed.strip_prefix(COMMAND_PREFIX) {
            Some(rest) => rest,
            None if depth > 0 => trimmed,
            None => return Resolution::Act(Action::Send(input.to_string())),
        };

        let mut words = command_str.split_whitespace();
        let command = match words.next() {
            Some(word) => word.to_lowercase(),
            None => {
                return Resolution::Fallback {
                    original: input.to_string(),
                    reason: "empty command".to_string(),
                }
            }
        };

        match command.as_str() {
            "join" => {
                let name = words.collect::<Vec<_>>().join(" ");
                // An empty name survives to the action; joining it is a
                // silent no-op downstream, not a chat message.
                let name = Self::normalize_channel(&name).unwrap_or_default();
                Resolution::Act(Action::AddChannel(name))
            }
            "wc" | "part" | "leave" => Resolution::Act(Action::LeaveActive),
            "wcall" | "partall" | "leaveall" => Resolution::Act(Action::LeaveAll),
            "alias" => {
                let name = words.next().map(str::to_string);
                let body = words.collect::<Vec<_>>().join(" ");
                match name {
                    Some(name) if !body.is_empty() => {
                        Resolution::Act(Action::StoreAlias { name, body })
                    }
                    _ => Resolution::Fallback {
                        original: input.to_string(),
                        reason: "alias requires a name and a body".to_string(),
                    },
                }
            }
            _ => Resolution::Lookup {
                name: command,
                original: input.to_string(),
                depth,
            },
        }
    }

    /// Normalize a channel name: strip a leading channel marker and reject
    /// empty names.
    pub fn normalize_channel(name: &str) -> Option<String> {
        let name = name.trim();
        let name = name.strip_prefix(CHANNEL_MARKER).unwrap_or(name);
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> CommandResolver {
        CommandResolver::new(8)
    }

    #[test]
    fn test_join_strips_the_channel_marker() {
        assert_eq!(
            resolver().resolve("/join #general"),
            Resolution::Act(Action::AddChannel("general".to_string()))
        );
        assert_eq!(
            resolver().resolve("/join general"),
            Resolution::Act(Action::AddChannel("general".to_string()))
        );
        // Joining nothing resolves to an empty name that downstream ignores.
        assert_eq!(
            resolver().resolve("/join"),
            Resolution::Act(Action::AddChannel(String::new()))
        );
    }

    #[test]
    fn test_normalize_strips_marker_and_rejects_empty() {
        assert_eq!(
            CommandResolver::normalize_channel("#general"),
            Some("general".to_string())
        );
        assert_eq!(
            CommandResolver::normalize_channel("general"),
            Some("general".to_string())
        );
        assert_eq!(CommandResolver::normalize_channel("#"), None);
        assert_eq!(CommandResolver::normalize_channel("  "), None);
    }

    #[test]
    fn test_leave_synonyms() {
        for input in ["/wc", "/part", "/leave", "/LEAVE"] {
            assert_eq!(resolver().resolve(input), Resolution::Act(Action::LeaveActive));
        }
        for input in ["/wcall", "/partall", "/leaveall"] {
            assert_eq!(resolver().resolve(input), Resolution::Act(Action::LeaveAll));
        }
    }

    #[test]
    fn test_alias_definition() {
        assert_eq!(
            resolver().resolve("/alias brb leave"),
            Resolution::Act(Action::StoreAlias {
                name: "brb".to_string(),
                body: "leave".to_string(),
            })
        );
        assert!(matches!(
            resolver().resolve("/alias brb"),
            Resolution::Fallback { .. }
        ));
    }

    #[test]
    fn test_unknown_command_asks_for_alias_lookup() {
        assert_eq!(
            resolver().resolve("/brb see you"),
            Resolution::Lookup {
                name: "brb".to_string(),
                original: "/brb see you".to_string(),
                depth: 0,
            }
        );
    }

    #[test]
    fn test_alias_body_resolves_like_the_command_it_names() {
        // `/alias brb leave` stores the body "leave"; resuming resolution at
        // depth 1 must behave exactly like typing /leave.
        let direct = resolver().resolve("/leave");
        let via_alias = resolver().resolve_at("leave", 1);
        assert_eq!(direct, via_alias);
    }

    #[test]
    fn test_plain_text_is_sent_literally() {
        assert_eq!(
            resolver().resolve("hello world"),
            Resolution::Act(Action::Send("hello world".to_string()))
        );
    }

    #[test]
    fn test_depth_limit_degrades_to_fallback() {
        let resolution = resolver().resolve_at("/loop", 9);
        assert!(matches!(resolution, Resolution::Fallback { .. }));
    }
}
