//! redb backend
//!
//! Pure-Rust embedded B-tree engine. Partitions map to tables; every
//! mutating call runs in its own write transaction, so `multi_put` is
//! atomic by construction and commits are durable without an explicit
//! flush.

use super::{Backend, BackendError, BackendResult, Partition};
use redb::{Database, ReadableTable, TableDefinition};
use std::fmt;
use std::path::Path;
use tracing::info;

const NODES_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("nodes");
const EDGES_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("edges");
const ADJACENCY_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("adjacency");

fn table_def(partition: Partition) -> TableDefinition<'static, &'static [u8], &'static [u8]> {
    match partition {
        Partition::Nodes => NODES_TABLE,
        Partition::Edges => EDGES_TABLE,
        Partition::Adjacency => ADJACENCY_TABLE,
    }
}

// redb surfaces a distinct error type per operation; collapse them all
// into the engine error's rendered text.
fn engine_err(e: impl fmt::Display) -> BackendError {
    BackendError::Engine(e.to_string())
}

/// redb-based persistent backend
pub struct RedbBackend {
    db: Option<Database>,
}

impl RedbBackend {
    /// Open or create a database file at `path`
    pub fn open(path: impl AsRef<Path>) -> BackendResult<Self> {
        info!("Opening redb backend at: {}", path.as_ref().display());

        let db = Database::create(path.as_ref()).map_err(engine_err)?;

        // Create the tables up front so read transactions never see a
        // missing table
        {
            let write_txn = db.begin_write().map_err(engine_err)?;
            for partition in Partition::ALL {
                let _ = write_txn.open_table(table_def(partition)).map_err(engine_err)?;
            }
            write_txn.commit().map_err(engine_err)?;
        }

        info!("redb backend opened");

        Ok(Self { db: Some(db) })
    }

    fn db(&self) -> BackendResult<&Database> {
        self.db.as_ref().ok_or(BackendError::Closed)
    }
}

impl Backend for RedbBackend {
    fn get(&self, partition: Partition, key: &[u8]) -> BackendResult<Option<Vec<u8>>> {
        let read_txn = self.db()?.begin_read().map_err(engine_err)?;
        let table = read_txn.open_table(table_def(partition)).map_err(engine_err)?;
        Ok(table
            .get(key)
            .map_err(engine_err)?
            .map(|guard| guard.value().to_vec()))
    }

    fn put(&mut self, partition: Partition, key: &[u8], value: &[u8]) -> BackendResult<()> {
        let write_txn = self.db()?.begin_write().map_err(engine_err)?;
        {
            let mut table = write_txn.open_table(table_def(partition)).map_err(engine_err)?;
            table.insert(key, value).map_err(engine_err)?;
        }
        write_txn.commit().map_err(engine_err)?;
        Ok(())
    }

    fn delete(&mut self, partition: Partition, key: &[u8]) -> BackendResult<()> {
        let write_txn = self.db()?.begin_write().map_err(engine_err)?;
        {
            let mut table = write_txn.open_table(table_def(partition)).map_err(engine_err)?;
            table.remove(key).map_err(engine_err)?;
        }
        write_txn.commit().map_err(engine_err)?;
        Ok(())
    }

    fn multi_get(
        &self,
        partition: Partition,
        keys: &[Vec<u8>],
    ) -> BackendResult<Vec<Option<Vec<u8>>>> {
        let read_txn = self.db()?.begin_read().map_err(engine_err)?;
        let table = read_txn.open_table(table_def(partition)).map_err(engine_err)?;
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            let value = table
                .get(key.as_slice())
                .map_err(engine_err)?
                .map(|guard| guard.value().to_vec());
            values.push(value);
        }
        Ok(values)
    }

    fn multi_put(
        &mut self,
        partition: Partition,
        entries: Vec<(Vec<u8>, Vec<u8>)>,
    ) -> BackendResult<()> {
        let write_txn = self.db()?.begin_write().map_err(engine_err)?;
        {
            let mut table = write_txn.open_table(table_def(partition)).map_err(engine_err)?;
            for (key, value) in &entries {
                table.insert(key.as_slice(), value.as_slice()).map_err(engine_err)?;
            }
        }
        write_txn.commit().map_err(engine_err)?;
        Ok(())
    }

    fn scan(&self, partition: Partition) -> BackendResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let read_txn = self.db()?.begin_read().map_err(engine_err)?;
        let table = read_txn.open_table(table_def(partition)).map_err(engine_err)?;
        let mut entries = Vec::new();
        for entry in table.iter().map_err(engine_err)? {
            let (key, value) = entry.map_err(engine_err)?;
            entries.push((key.value().to_vec(), value.value().to_vec()));
        }
        Ok(entries)
    }

    fn flush(&mut self) -> BackendResult<()> {
        // Commits are durable; nothing is buffered between calls
        self.db()?;
        Ok(())
    }

    fn close(&mut self) -> BackendResult<()> {
        let db = self.db.take().ok_or(BackendError::Closed)?;
        drop(db);
        info!("Closed redb backend");
        Ok(())
    }
}
