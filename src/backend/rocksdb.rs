//! RocksDB backend
//!
//! Partitions map to column families. Bulk writes go through a
//! `WriteBatch` so each `multi_put` is applied atomically; bulk reads
//! use `multi_get_cf` to hit the engine once per batch.

use super::{Backend, BackendError, BackendResult, Partition};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use tracing::{debug, info};

impl From<rocksdb::Error> for BackendError {
    fn from(e: rocksdb::Error) -> Self {
        BackendError::Engine(e.to_string())
    }
}

/// Tuning knobs for the RocksDB engine
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    pub create_if_missing: bool,
    pub write_buffer_size: usize,
    pub max_write_buffer_number: i32,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        RocksDbConfig {
            create_if_missing: true,
            write_buffer_size: 64 * 1024 * 1024, // 64 MB
            max_write_buffer_number: 3,
        }
    }
}

/// RocksDB-based persistent backend
pub struct RocksDbBackend {
    db: Option<DB>,
}

impl RocksDbBackend {
    /// Open or create a database at `path` with default tuning
    pub fn open(path: impl AsRef<Path>) -> BackendResult<Self> {
        Self::open_with_config(path, RocksDbConfig::default())
    }

    /// Open or create a database at `path`
    pub fn open_with_config(path: impl AsRef<Path>, config: RocksDbConfig) -> BackendResult<Self> {
        info!("Opening RocksDB backend at: {}", path.as_ref().display());

        let mut opts = Options::default();
        opts.create_if_missing(config.create_if_missing);
        opts.create_missing_column_families(true);

        // Performance tuning
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);
        opts.set_min_write_buffer_number_to_merge(1);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        // WAL configuration
        opts.set_wal_recovery_mode(rocksdb::DBRecoveryMode::PointInTime);

        let mut cf_descriptors = vec![ColumnFamilyDescriptor::new("default", Options::default())];
        for partition in Partition::ALL {
            cf_descriptors.push(ColumnFamilyDescriptor::new(
                partition.name(),
                Self::partition_cf_options(),
            ));
        }

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        info!("RocksDB backend opened");

        Ok(Self { db: Some(db) })
    }

    /// Column family options shared by the graph partitions
    fn partition_cf_options() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn handles(&self, partition: Partition) -> BackendResult<(&DB, &ColumnFamily)> {
        let db = self.db.as_ref().ok_or(BackendError::Closed)?;
        let cf = db
            .cf_handle(partition.name())
            .ok_or_else(|| BackendError::Engine(format!("missing column family: {}", partition.name())))?;
        Ok((db, cf))
    }
}

impl Backend for RocksDbBackend {
    fn get(&self, partition: Partition, key: &[u8]) -> BackendResult<Option<Vec<u8>>> {
        let (db, cf) = self.handles(partition)?;
        Ok(db.get_cf(cf, key)?)
    }

    fn put(&mut self, partition: Partition, key: &[u8], value: &[u8]) -> BackendResult<()> {
        let (db, cf) = self.handles(partition)?;
        db.put_cf(cf, key, value)?;
        Ok(())
    }

    fn delete(&mut self, partition: Partition, key: &[u8]) -> BackendResult<()> {
        let (db, cf) = self.handles(partition)?;
        db.delete_cf(cf, key)?;
        Ok(())
    }

    fn multi_get(
        &self,
        partition: Partition,
        keys: &[Vec<u8>],
    ) -> BackendResult<Vec<Option<Vec<u8>>>> {
        let (db, cf) = self.handles(partition)?;
        let results = db.multi_get_cf(keys.iter().map(|k| (cf, k.as_slice())));
        results
            .into_iter()
            .map(|r| r.map_err(BackendError::from))
            .collect()
    }

    fn multi_put(
        &mut self,
        partition: Partition,
        entries: Vec<(Vec<u8>, Vec<u8>)>,
    ) -> BackendResult<()> {
        let (db, cf) = self.handles(partition)?;
        let mut batch = WriteBatch::default();
        for (key, value) in entries {
            batch.put_cf(cf, key, value);
        }
        db.write(batch)?;
        Ok(())
    }

    fn scan(&self, partition: Partition) -> BackendResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let (db, cf) = self.handles(partition)?;
        let mut entries = Vec::new();
        for item in db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) = item?;
            entries.push((key.to_vec(), value.to_vec()));
        }
        Ok(entries)
    }

    fn flush(&mut self) -> BackendResult<()> {
        let db = self.db.as_ref().ok_or(BackendError::Closed)?;
        db.flush()?;
        debug!("Flushed RocksDB backend");
        Ok(())
    }

    fn close(&mut self) -> BackendResult<()> {
        let db = self.db.take().ok_or(BackendError::Closed)?;
        db.flush()?;
        drop(db);
        info!("Closed RocksDB backend");
        Ok(())
    }
}
