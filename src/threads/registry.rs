/*!
 * Thread Registry
 * Ordered registry of live OS threads with monitor-owner reverse lookup
 */

use super::os_thread::OsThread;
use crate::core::errors::{DirectoryError, DirectoryResult};
use crate::core::types::{MonitorOwner, ThreadId, UnitId};
use crate::monitors::MonitorOwners;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use tracing::{debug, info};

/// Registry of live OS threads
///
/// Traversal follows `ThreadId` order, which is creation order. A cursor
/// only remembers the id it stopped at, so the thread under it may exit
/// without breaking the walk.
pub struct ThreadRegistry {
    threads: RwLock<BTreeMap<ThreadId, Arc<OsThread>>>,
    owners: MonitorOwners<OsThread>,
}

impl ThreadRegistry {
    pub fn new() -> Self {
        info!("Thread registry initialized");
        Self {
            threads: RwLock::new(BTreeMap::new()),
            owners: MonitorOwners::new(),
        }
    }

    /// Register a started thread
    pub fn attach(&self, thread: Arc<OsThread>) -> DirectoryResult<()> {
        let id = thread.id();
        let mut threads = self.threads.write();
        if threads.contains_key(&id) {
            return Err(DirectoryError::AlreadyRegistered(UnitId::Thread(id)));
        }
        threads.insert(id, thread);
        debug!(thread = %id, "thread attached");
        Ok(())
    }

    /// Unregister an exiting thread and drop the monitors it still owns
    pub fn detach(&self, id: ThreadId) -> DirectoryResult<Arc<OsThread>> {
        let _section = self.owners.critical_section();
        let removed = self
            .threads
            .write()
            .remove(&id)
            .ok_or(DirectoryError::NotRegistered(UnitId::Thread(id)))?;

        let released = self.owners.purge_locked(UnitId::Thread(id));
        debug!(thread = %id, released, "thread detached");
        Ok(removed)
    }

    pub fn get(&self, id: ThreadId) -> Option<Arc<OsThread>> {
        self.threads.read().get(&id).cloned()
    }

    pub fn contains(&self, id: ThreadId) -> bool {
        self.threads.read().contains_key(&id)
    }

    /// First thread in registry order
    pub fn first(&self) -> Option<Arc<OsThread>> {
        self.threads.read().values().next().cloned()
    }

    /// Thread following `id` in registry order
    ///
    /// `id` need not be registered any more.
    pub fn next_after(&self, id: ThreadId) -> Option<Arc<OsThread>> {
        self.threads
            .read()
            .range((Bound::Excluded(id), Bound::Unbounded))
            .next()
            .map(|(_, thread)| Arc::clone(thread))
    }

    pub fn len(&self) -> usize {
        self.threads.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.read().is_empty()
    }

    /// Record that `thread` entered the monitor named by `token`
    pub fn claim_monitor(&self, token: MonitorOwner, thread: Arc<OsThread>) -> DirectoryResult<()> {
        let _section = self.owners.critical_section();
        if !self.contains(thread.id()) {
            return Err(DirectoryError::NotRegistered(UnitId::Thread(thread.id())));
        }
        self.owners.claim_locked(token, thread)
    }

    pub fn release_monitor(&self, token: MonitorOwner) -> Option<Arc<OsThread>> {
        self.owners.release(token)
    }

    /// Reverse lookup of `token`, handing the owner to `project`
    ///
    /// With `do_lock`, `project` runs inside the same critical section that
    /// `detach` takes.
    pub fn owning_thread<R>(
        &self,
        token: MonitorOwner,
        do_lock: bool,
        project: impl FnOnce(&Arc<OsThread>) -> R,
    ) -> Option<R> {
        self.owners.lookup(token, do_lock, project)
    }

    pub fn owners(&self) -> &MonitorOwners<OsThread> {
        &self.owners
    }
}

impl Default for ThreadRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ThreadRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadRegistry")
            .field("len", &self.len())
            .field("owned_monitors", &self.owners.len())
            .finish()
    }
}
