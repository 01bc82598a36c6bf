/*!
 * Fiber-Capable Store
 * Thread objects may be backed by coroutines running on carrier threads
 */

use super::mode::ExecutionMode;
use super::traits::ExecutionStore;
use super::unit::ExecutionUnit;
use super::units::ExecutionUnits;
use crate::continuations::BucketTable;
use crate::core::types::MonitorOwner;
use crate::threads::{OsThread, ThreadObject, ThreadRegistry};
use std::sync::Arc;
use tracing::debug;

pub struct FiberStore {
    threads: Arc<ThreadRegistry>,
    buckets: Arc<BucketTable>,
    yield_with_monitor: bool,
}

impl FiberStore {
    pub fn new(
        threads: Arc<ThreadRegistry>,
        buckets: Arc<BucketTable>,
        yield_with_monitor: bool,
    ) -> Self {
        Self {
            threads,
            buckets,
            yield_with_monitor,
        }
    }

    /// Coroutine mounted on `thread`, or the thread itself
    #[inline]
    fn project(thread: &Arc<OsThread>) -> ExecutionUnit {
        match thread.current_coroutine() {
            Some(coroutine) => ExecutionUnit::Coroutine(coroutine),
            None => ExecutionUnit::Thread(Arc::clone(thread)),
        }
    }
}

impl ExecutionStore for FiberStore {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::FiberCapable
    }

    fn resolve(&self, thread_obj: &ThreadObject) -> Option<ExecutionUnit> {
        let unit = match thread_obj {
            ThreadObject::Virtual(vt) => vt
                .continuation()
                .and_then(|cont| cont.data())
                .map(ExecutionUnit::Coroutine),
            ThreadObject::Platform(pt) => pt.backing().map(|thread| Self::project(&thread)),
        };
        if unit.is_none() {
            debug!(
                thread = thread_obj.name(),
                is_virtual = thread_obj.is_virtual(),
                "no execution unit installed"
            );
        }
        unit
    }

    fn resolve_owner(&self, token: MonitorOwner, do_lock: bool) -> Option<ExecutionUnit> {
        if self.yield_with_monitor {
            return self
                .buckets
                .owning_coroutine(token, do_lock)
                .map(ExecutionUnit::Coroutine);
        }

        // Best effort: the carrier may have switched coroutines since the
        // monitor was entered, so the projection can name a coroutine that
        // never held it. `do_lock` narrows the window; nothing closes it.
        self.threads.owning_thread(token, do_lock, Self::project)
    }

    fn units(&self) -> ExecutionUnits<'_> {
        ExecutionUnits::buckets(&self.buckets)
    }
}
