/*!
 * Thread-Only Store
 * Every thread object is backed 1:1 by an OS thread
 */

use super::mode::ExecutionMode;
use super::traits::ExecutionStore;
use super::unit::ExecutionUnit;
use super::units::ExecutionUnits;
use crate::core::types::MonitorOwner;
use crate::threads::{ThreadObject, ThreadRegistry};
use std::sync::Arc;
use tracing::debug;

pub struct ThreadOnlyStore {
    threads: Arc<ThreadRegistry>,
}

impl ThreadOnlyStore {
    pub fn new(threads: Arc<ThreadRegistry>) -> Self {
        Self { threads }
    }
}

impl ExecutionStore for ThreadOnlyStore {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::ThreadOnly
    }

    fn resolve(&self, thread_obj: &ThreadObject) -> Option<ExecutionUnit> {
        // Virtual thread objects have no OS thread of their own here
        let unit = thread_obj.backing_thread().map(ExecutionUnit::Thread);
        if unit.is_none() {
            debug!(thread = thread_obj.name(), "no OS thread installed");
        }
        unit
    }

    fn resolve_owner(&self, token: MonitorOwner, do_lock: bool) -> Option<ExecutionUnit> {
        self.threads
            .owning_thread(token, do_lock, |thread| ExecutionUnit::Thread(Arc::clone(thread)))
    }

    fn units(&self) -> ExecutionUnits<'_> {
        ExecutionUnits::threads(&self.threads)
    }
}
