/*!
 * OS Threads
 * OS-thread-backed execution contexts
 */

use crate::continuations::{Coroutine, CoroutineState};
use crate::core::id::next_thread_id;
use crate::core::types::{MonitorOwner, ThreadId, UnitId};
use crate::monitors::OwnerIdentity;
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use smartstring::alias::String as SmartString;
use std::sync::Arc;

/// OS-thread-backed execution context
///
/// When the thread acts as a carrier, `current` holds the coroutine that
/// is mounted on it right now.
#[derive(Debug)]
pub struct OsThread {
    id: ThreadId,
    name: SmartString,
    current: ArcSwapOption<Coroutine>,
    blocked_on: Mutex<Option<MonitorOwner>>,
}

impl OsThread {
    pub fn new(name: impl Into<SmartString>) -> Arc<Self> {
        Arc::new(Self {
            id: next_thread_id(),
            name: name.into(),
            current: ArcSwapOption::empty(),
            blocked_on: Mutex::new(None),
        })
    }

    #[inline]
    pub fn id(&self) -> ThreadId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coroutine currently running on this thread
    #[inline]
    pub fn current_coroutine(&self) -> Option<Arc<Coroutine>> {
        self.current.load_full()
    }

    /// Mount `coroutine` on this carrier, returning the one it replaces
    ///
    /// The replaced coroutine loses its carrier and, if it was running,
    /// becomes suspended.
    pub fn mount(&self, coroutine: Arc<Coroutine>) -> Option<Arc<Coroutine>> {
        coroutine.set_carrier(Some(self.id));
        coroutine.set_state(CoroutineState::Running);

        let previous = self.current.swap(Some(Arc::clone(&coroutine)));
        if let Some(prev) = &previous {
            if !Arc::ptr_eq(prev, &coroutine) {
                Self::park(prev);
            }
        }
        previous
    }

    /// Unmount whatever coroutine is running on this carrier
    pub fn unmount(&self) -> Option<Arc<Coroutine>> {
        let previous = self.current.swap(None);
        if let Some(prev) = &previous {
            Self::park(prev);
        }
        previous
    }

    fn park(coroutine: &Coroutine) {
        coroutine.set_carrier(None);
        if coroutine.state() == CoroutineState::Running {
            coroutine.set_state(CoroutineState::Suspended);
        }
    }

    /// Monitor this thread is waiting to enter
    pub fn blocked_on(&self) -> Option<MonitorOwner> {
        *self.blocked_on.lock()
    }

    pub fn set_blocked_on(&self, token: Option<MonitorOwner>) {
        *self.blocked_on.lock() = token;
    }
}

impl OwnerIdentity for OsThread {
    #[inline]
    fn owner_id(&self) -> UnitId {
        UnitId::Thread(self.id)
    }
}
