/*!
 * Monitor Owner Registry
 * Reverse lookup from opaque owner tokens to the owning execution unit
 */

use crate::core::errors::{DirectoryError, DirectoryResult};
use crate::core::types::{MonitorOwner, UnitId};
use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tracing::debug;

/// Anything that can hold a monitor
pub trait OwnerIdentity {
    fn owner_id(&self) -> UnitId;
}

/// Token -> owner map with a short critical section
///
/// Readers that pass `do_lock = false` only see a consistent entry; readers
/// that pass `do_lock = true` are also serialized against teardown, which
/// takes the same section before purging an owner.
pub struct MonitorOwners<T> {
    owners: DashMap<MonitorOwner, Arc<T>, RandomState>,
    section: Mutex<()>,
}

impl<T: OwnerIdentity> MonitorOwners<T> {
    pub fn new() -> Self {
        Self {
            owners: DashMap::with_hasher(RandomState::new()),
            section: Mutex::new(()),
        }
    }

    /// Enter the critical section shared with locked lookups
    #[inline]
    pub fn critical_section(&self) -> MutexGuard<'_, ()> {
        self.section.lock()
    }

    /// Record `owner` as the holder of `token`
    ///
    /// Re-claiming by the current holder is a no-op (recursive entry).
    pub fn claim(&self, token: MonitorOwner, owner: Arc<T>) -> DirectoryResult<()> {
        let _section = self.section.lock();
        self.claim_locked(token, owner)
    }

    /// Same as [`claim`](Self::claim) for callers already inside the section
    pub fn claim_locked(&self, token: MonitorOwner, owner: Arc<T>) -> DirectoryResult<()> {
        let requested = owner.owner_id();
        match self.owners.entry(token) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                let current = entry.get().owner_id();
                if current == requested {
                    Ok(())
                } else {
                    Err(DirectoryError::MonitorOwned {
                        token,
                        owner: current,
                    })
                }
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(owner);
                Ok(())
            }
        }
    }

    /// Drop the ownership record for `token`
    pub fn release(&self, token: MonitorOwner) -> Option<Arc<T>> {
        let _section = self.section.lock();
        self.owners.remove(&token).map(|(_, owner)| owner)
    }

    /// Drop every token held by `owner`; returns how many were removed
    ///
    /// Must be called with the critical section held.
    pub fn purge_locked(&self, owner: UnitId) -> usize {
        let before = self.owners.len();
        self.owners.retain(|_, held| held.owner_id() != owner);
        before - self.owners.len()
    }

    /// Resolve `token` and hand the owner to `project`
    ///
    /// With `do_lock` the lookup and the projection both run inside the
    /// critical section; `project` must stay short and must not re-enter
    /// this registry.
    pub fn lookup<R>(
        &self,
        token: MonitorOwner,
        do_lock: bool,
        project: impl FnOnce(&Arc<T>) -> R,
    ) -> Option<R> {
        let _section = do_lock.then(|| self.section.lock());
        let owner = self.owners.get(&token).map(|entry| Arc::clone(entry.value()));
        match owner {
            Some(owner) => Some(project(&owner)),
            None => {
                debug!(token = %token, do_lock, "monitor owner not found");
                None
            }
        }
    }

    /// Tokens currently held by `owner`
    pub fn held_by(&self, owner: UnitId) -> Vec<MonitorOwner> {
        let mut tokens: Vec<_> = self
            .owners
            .iter()
            .filter(|entry| entry.value().owner_id() == owner)
            .map(|entry| *entry.key())
            .collect();
        tokens.sort_unstable();
        tokens
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

impl<T: OwnerIdentity> Default for MonitorOwners<T> {
    fn default() -> Self {
        Self::new()
    }
}
