//! Storage engine seam and the in-memory engine
//!
//! [`StorageEngine`] is the document-database boundary: the store's
//! semantics live above it, a concrete driver lives below it. The
//! default [`MemoryEngine`] keeps every record in one radix trie keyed
//! by the rendered id, which gives exact lookup, prefix subtree lookup,
//! and per-partition scans (ids share their partition tag prefix) from
//! a single structure. Trie iteration order depends only on the key
//! set, so scans are stable across calls.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use radix_trie::{Trie, TrieCommon};

use knn_features::Partition;

use crate::error::StoreError;
use crate::record::StoredRecord;

/// Pluggable record storage beneath the feature store
///
/// Engines deal in whole records keyed by rendered id strings and know
/// nothing about content addressing; ids arrive precomputed.
#[async_trait]
pub trait StorageEngine: Send + Sync + fmt::Debug {
    /// Insert a record, failing on an existing id
    ///
    /// # Errors
    /// [`StoreError::Duplicate`] if a record with the same id exists.
    async fn insert(&self, record: StoredRecord) -> Result<(), StoreError>;

    /// Fetch the record with exactly this id
    async fn fetch(&self, id: &str) -> Result<Option<StoredRecord>, StoreError>;

    /// Fetch every record whose rendered id starts with `prefix`
    async fn fetch_prefix(&self, prefix: &str) -> Result<Vec<StoredRecord>, StoreError>;

    /// Fetch every record in a partition, in stable id order
    async fn all_in(&self, partition: Partition) -> Result<Vec<StoredRecord>, StoreError>;

    /// Remove every record in both partitions
    async fn clear(&self) -> Result<(), StoreError>;

    /// Release the engine; later operations fail with [`StoreError::Closed`]
    async fn close(&self) -> Result<(), StoreError>;
}

/// In-memory storage engine over a radix trie
pub struct MemoryEngine {
    records: RwLock<Trie<String, StoredRecord>>,
    closed: AtomicBool,
}

impl MemoryEngine {
    /// Create an empty engine
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Trie::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of stored records across both partitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether no records are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn guard_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    fn collect_prefix(&self, prefix: &str) -> Vec<StoredRecord> {
        let records = self.records.read();
        records
            .get_raw_descendant(prefix)
            .map(|subtrie| subtrie.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryEngine")
            .field("records", &self.len())
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish()
    }
}

#[async_trait]
impl StorageEngine for MemoryEngine {
    async fn insert(&self, record: StoredRecord) -> Result<(), StoreError> {
        self.guard_open()?;
        let key = record.id.to_string();
        let mut records = self.records.write();
        if records.get(&key).is_some() {
            return Err(StoreError::Duplicate { id: record.id });
        }
        records.insert(key, record);
        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<Option<StoredRecord>, StoreError> {
        self.guard_open()?;
        Ok(self.records.read().get(id).cloned())
    }

    async fn fetch_prefix(&self, prefix: &str) -> Result<Vec<StoredRecord>, StoreError> {
        self.guard_open()?;
        Ok(self.collect_prefix(prefix))
    }

    async fn all_in(&self, partition: Partition) -> Result<Vec<StoredRecord>, StoreError> {
        self.guard_open()?;
        Ok(self.collect_prefix(&format!("{}-", partition.tag())))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.guard_open()?;
        *self.records.write() = Trie::new();
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        // Idempotent; only non-close operations fail once closed
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
