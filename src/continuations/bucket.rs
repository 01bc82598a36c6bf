/*!
 * Coroutine Bucket Table
 * Fixed-size partitioned container of live continuation-backed contexts
 */

use super::coroutine::Coroutine;
use crate::core::data_structures::{Ring, RingPosition};
use crate::core::errors::{DirectoryError, DirectoryResult};
use crate::core::types::{CoroutineId, MonitorOwner, UnitId};
use crate::monitors::MonitorOwners;
use parking_lot::RwLock;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, info};

type Bucket = RwLock<Ring<Arc<Coroutine>>>;

/// Bucket table of coroutines
///
/// Each bucket is a sentinel ring behind its own lock, so creation and
/// teardown on different carriers rarely contend. Placement hashes the
/// coroutine id into `bucket_count` power-of-two buckets.
pub struct BucketTable {
    buckets: Box<[Bucket]>,
    bucket_mask: usize,
    owners: MonitorOwners<Coroutine>,
}

impl BucketTable {
    /// Create a table with `bucket_count` buckets (non-zero power of 2)
    pub fn new(bucket_count: usize) -> DirectoryResult<Self> {
        if bucket_count == 0 || !bucket_count.is_power_of_two() {
            return Err(DirectoryError::InvalidBucketCount(bucket_count));
        }

        let buckets = (0..bucket_count)
            .map(|_| RwLock::new(Ring::new()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        info!(bucket_count, "Coroutine bucket table initialized");

        Ok(Self {
            buckets,
            bucket_mask: bucket_count - 1,
            owners: MonitorOwners::new(),
        })
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket a coroutine id hashes to
    #[inline]
    pub fn bucket_index(&self, id: CoroutineId) -> usize {
        let mut hasher = ahash::AHasher::default();
        id.hash(&mut hasher);
        (hasher.finish() as usize) & self.bucket_mask
    }

    /// Insert into the bucket chosen by hash; returns the bucket index
    pub fn insert(&self, coroutine: Arc<Coroutine>) -> DirectoryResult<usize> {
        let index = self.bucket_index(coroutine.id());
        self.insert_into(index, coroutine)?;
        Ok(index)
    }

    /// Insert into a specific bucket
    pub fn insert_into(&self, index: usize, coroutine: Arc<Coroutine>) -> DirectoryResult<()> {
        let bucket = self.bucket(index)?;
        let id = coroutine.id();

        // Same section as remove, so one coroutine never lands in two buckets
        let _section = self.owners.critical_section();
        if self.locate(id).is_some() {
            return Err(DirectoryError::AlreadyRegistered(UnitId::Coroutine(id)));
        }
        if !bucket.write().push_back(coroutine) {
            return Err(DirectoryError::AlreadyRegistered(UnitId::Coroutine(id)));
        }

        debug!(coroutine = %id, bucket = index, "coroutine added to bucket");
        Ok(())
    }

    /// Remove a coroutine and drop any monitors it still owns
    pub fn remove(&self, id: CoroutineId) -> DirectoryResult<Arc<Coroutine>> {
        let _section = self.owners.critical_section();

        let index = self
            .locate(id)
            .ok_or(DirectoryError::NotRegistered(UnitId::Coroutine(id)))?;
        let removed = self.buckets[index]
            .write()
            .remove(&id)
            .ok_or(DirectoryError::NotRegistered(UnitId::Coroutine(id)))?;

        let released = self.owners.purge_locked(UnitId::Coroutine(id));
        debug!(coroutine = %id, bucket = index, released, "coroutine removed from bucket");
        Ok(removed)
    }

    /// Bucket currently holding `id`
    pub fn locate(&self, id: CoroutineId) -> Option<usize> {
        let hashed = self.bucket_index(id);
        if self.buckets[hashed].read().contains(&id) {
            return Some(hashed);
        }
        // Explicitly placed coroutines may live outside their hash bucket
        self.buckets
            .iter()
            .position(|bucket| bucket.read().contains(&id))
    }

    pub fn get(&self, id: CoroutineId) -> Option<Arc<Coroutine>> {
        let index = self.locate(id)?;
        self.buckets[index].read().get(&id).cloned()
    }

    /// Head element of bucket `index`
    pub fn head(&self, index: usize) -> Option<Arc<Coroutine>> {
        self.buckets.get(index)?.read().head().cloned()
    }

    /// Head of bucket `index` with its ring position
    pub fn head_entry(&self, index: usize) -> Option<(RingPosition, Arc<Coroutine>)> {
        let ring = self.buckets.get(index)?.read();
        ring.head_entry().map(|(position, coro)| (position, coro.clone()))
    }

    /// First coroutine of bucket `index` placed after `position`
    ///
    /// Works for positions whose coroutine has since been removed. `None`
    /// means the lap of this bucket is complete.
    pub fn next_in_bucket(
        &self,
        index: usize,
        position: RingPosition,
    ) -> Option<(RingPosition, Arc<Coroutine>)> {
        let ring = self.buckets.get(index)?.read();
        ring.after(position).map(|(next, coro)| (next, coro.clone()))
    }

    /// Number of coroutines in bucket `index`
    pub fn bucket_len(&self, index: usize) -> usize {
        self.buckets.get(index).map_or(0, |bucket| bucket.read().len())
    }

    /// Total coroutines across all buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.read().is_empty())
    }

    /// Record that `coroutine` entered the monitor named by `token`
    pub fn claim_monitor(&self, token: MonitorOwner, coroutine: Arc<Coroutine>) -> DirectoryResult<()> {
        let _section = self.owners.critical_section();
        if self.locate(coroutine.id()).is_none() {
            return Err(DirectoryError::NotRegistered(UnitId::Coroutine(coroutine.id())));
        }
        self.owners.claim_locked(token, coroutine)
    }

    pub fn release_monitor(&self, token: MonitorOwner) -> Option<Arc<Coroutine>> {
        self.owners.release(token)
    }

    /// Continuation-owner reverse lookup
    pub fn owning_coroutine(&self, token: MonitorOwner, do_lock: bool) -> Option<Arc<Coroutine>> {
        self.owners.lookup(token, do_lock, Arc::clone)
    }

    pub fn owners(&self) -> &MonitorOwners<Coroutine> {
        &self.owners
    }

    fn bucket(&self, index: usize) -> DirectoryResult<&Bucket> {
        self.buckets.get(index).ok_or(DirectoryError::BucketOutOfRange {
            index,
            count: self.buckets.len(),
        })
    }
}

impl std::fmt::Debug for BucketTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketTable")
            .field("bucket_count", &self.bucket_count())
            .field("len", &self.len())
            .finish()
    }
}
