//! In-memory profile store
//!
//! Backs tests and ephemeral sessions. Keeps the same ordered-scan semantics
//! as the durable store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use swarmchat_core::ChannelDescriptor;

use crate::{ProfileStore, Result};

/// Profile store that forgets everything when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    channels: Mutex<BTreeMap<String, ChannelDescriptor>>,
    aliases: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryStore {
    fn put_channel(&self, descriptor: &ChannelDescriptor) -> Result<()> {
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(descriptor.name.clone(), descriptor.clone());
        Ok(())
    }

    fn delete_channel(&self, name: &str) -> Result<()> {
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(name);
        Ok(())
    }

    fn load_channels(&self) -> Result<Vec<ChannelDescriptor>> {
        Ok(self
            .channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect())
    }

    fn put_alias(&self, name: &str, body: &str) -> Result<()> {
        self.aliases
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.to_string(), body.to_string());
        Ok(())
    }

    fn get_alias(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .aliases
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
