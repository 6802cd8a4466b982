//! Identity seams
//!
//! Two collaborator traits live here: the [`Attestor`], which classifies the
//! attribution of incoming messages (anonymity, validity, avatar), and the
//! [`IdentityVerifier`], the one-shot check that establishes the local user's
//! own username. Verification failure is not fatal; the client stays in
//! anonymous mode under a randomly assigned display name.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::errors::TransportError;
use crate::message::RawMessage;
use crate::Result;

// ----------------------------------------------------------------------------
// Message Attestation
// ----------------------------------------------------------------------------

/// Verdict on a raw message's attribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// The sender is anonymous; the username is a display handle, not an
    /// attributable identity.
    pub anon: bool,
    /// The claimed identity was verified. Meaningless when `anon` is set.
    pub valid: bool,
    pub avatar: Option<String>,
}

/// Classifies the attribution of incoming messages
pub trait Attestor: Send + Sync {
    fn attest(&self, raw: &RawMessage) -> Attestation;
}

/// Attestor that treats every message as validly attributed, except that
/// senders using an anonymous display name stay anonymous. Used by tests and
/// by deployments without an external verification service.
pub struct AcceptAll;

impl Attestor for AcceptAll {
    fn attest(&self, raw: &RawMessage) -> Attestation {
        Attestation {
            anon: raw.username.starts_with("Anonymous ("),
            valid: true,
            avatar: None,
        }
    }
}

// ----------------------------------------------------------------------------
// Self Identity Verification
// ----------------------------------------------------------------------------

/// Result of the one-shot local identity check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityVerdict {
    pub verified: bool,
    pub username: String,
}

/// One-shot verification of the local user's identity
#[async_trait::async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self) -> Result<IdentityVerdict>;
}

/// Verifier backed by static configuration: a configured username counts as
/// verified, no username means anonymous mode.
pub struct StaticIdentity {
    username: Option<String>,
}

impl StaticIdentity {
    pub fn new(username: Option<String>) -> Self {
        Self { username }
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for StaticIdentity {
    async fn verify(&self) -> Result<IdentityVerdict> {
        match &self.username {
            Some(username) if !username.trim().is_empty() => Ok(IdentityVerdict {
                verified: true,
                username: username.trim().to_string(),
            }),
            _ => Err(TransportError::VerificationFailed {
                reason: "no identity configured".to_string(),
            }
            .into()),
        }
    }
}

// ----------------------------------------------------------------------------
// Anonymous Display Names
// ----------------------------------------------------------------------------

const CAT_NAMES: &[&str] = &[
    "Alfie", "Bella", "Charlie", "Chester", "Clementine", "Daisy", "Felix", "Freya", "Ginger",
    "Hazel", "Jasper", "Luna", "Maru", "Miso", "Mochi", "Nimbus", "Olive", "Oscar", "Pepper",
    "Pickles", "Poppy", "Smokey", "Tigger", "Waffles", "Whiskers", "Ziggy",
];

/// Display name assigned before (or instead of) identity verification
pub fn anonymous_username() -> String {
    let mut rng = rand::thread_rng();
    let name = CAT_NAMES.choose(&mut rng).copied().unwrap_or("Whiskers");
    format!("Anonymous ({name})")
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
