//! redb-backed profile store

use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;

use swarmchat_core::ChannelDescriptor;

use crate::{ProfileStore, Result};

// Channel membership: channel name → JSON-encoded descriptor
const CHANNELS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("channels");
// Command aliases: alias name → body
const ALIASES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("aliases");

/// Durable profile store on a single redb database file
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (creating if necessary) the profile database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::create(path)?;
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CHANNELS_TABLE)?;
            let _ = write_txn.open_table(ALIASES_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db })
    }
}

impl ProfileStore for RedbStore {
    fn put_channel(&self, descriptor: &ChannelDescriptor) -> Result<()> {
        let payload = serde_json::to_vec(descriptor)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CHANNELS_TABLE)?;
            table.insert(descriptor.name.as_str(), payload.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn delete_channel(&self, name: &str) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CHANNELS_TABLE)?;
            table.remove(name)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn load_channels(&self) -> Result<Vec<ChannelDescriptor>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CHANNELS_TABLE)?;
        let mut channels = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            channels.push(serde_json::from_slice(value.value())?);
        }
        Ok(channels)
    }

    fn put_alias(&self, name: &str, body: &str) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ALIASES_TABLE)?;
            table.insert(name, body)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get_alias(&self, name: &str) -> Result<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ALIASES_TABLE)?;
        let body = table.get(name)?.map(|guard| guard.value().to_string());
        Ok(body)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
