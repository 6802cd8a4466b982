//! Swarmchat profile persistence
//!
//! An ordered key→value store with two keyspaces: channel membership
//! (channel name → JSON descriptor) and command aliases (alias name → body).
//! The [`RedbStore`] persists profiles on disk; the [`MemoryStore`] backs
//! tests and ephemeral sessions. The [`StorageTask`] runs either behind the
//! effect/event channels so that every persistence completion re-enters the
//! coordinator's single processing context as an event.

use thiserror::Error;

use swarmchat_core::ChannelDescriptor;

mod memory;
mod redb_store;
mod task;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;
pub use task::StorageTask;

// ----------------------------------------------------------------------------
// Errors
// ----------------------------------------------------------------------------

/// Profile storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

// ----------------------------------------------------------------------------
// Profile Store Trait
// ----------------------------------------------------------------------------

/// Ordered key→value persistence for a user profile
///
/// Lookups that find no entry return `Ok(None)`: a missing alias is the
/// expected fallback branch of command resolution, not an error.
pub trait ProfileStore: Send {
    /// Persist channel membership, overwriting any previous record
    fn put_channel(&self, descriptor: &ChannelDescriptor) -> Result<()>;

    /// Delete persisted channel membership. Deleting an absent record is a
    /// no-op.
    fn delete_channel(&self, name: &str) -> Result<()>;

    /// Scan every persisted channel record, in key order
    fn load_channels(&self) -> Result<Vec<ChannelDescriptor>>;

    /// Persist an alias body, overwriting any previous definition
    fn put_alias(&self, name: &str, body: &str) -> Result<()>;

    /// Look up an alias body
    fn get_alias(&self, name: &str) -> Result<Option<String>>;
}

impl<P: ProfileStore + ?Sized> ProfileStore for Box<P> {
    fn put_channel(&self, descriptor: &ChannelDescriptor) -> Result<()> {
        (**self).put_channel(descriptor)
    }

    fn delete_channel(&self, name: &str) -> Result<()> {
        (**self).delete_channel(name)
    }

    fn load_channels(&self) -> Result<Vec<ChannelDescriptor>> {
        (**self).load_channels()
    }

    fn put_alias(&self, name: &str, body: &str) -> Result<()> {
        (**self).put_alias(name, body)
    }

    fn get_alias(&self, name: &str) -> Result<Option<String>> {
        (**self).get_alias(name)
    }
}
