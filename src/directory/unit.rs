/*!
 * Execution Unit Handle
 * Uniform handle over OS-thread-backed and continuation-backed contexts
 */

use crate::continuations::Coroutine;
use crate::core::types::{MonitorOwner, UnitId};
use crate::threads::OsThread;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Handle to one runnable unit of execution
///
/// Shares ownership with the runtime's thread and continuation subsystems
/// but never controls the unit's lifecycle. Equality is identity: two
/// handles are equal iff they name the same unit.
#[derive(Debug, Clone)]
pub enum ExecutionUnit {
    Thread(Arc<OsThread>),
    Coroutine(Arc<Coroutine>),
}

impl ExecutionUnit {
    #[inline]
    pub fn id(&self) -> UnitId {
        match self {
            ExecutionUnit::Thread(t) => UnitId::Thread(t.id()),
            ExecutionUnit::Coroutine(c) => UnitId::Coroutine(c.id()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ExecutionUnit::Thread(t) => t.name(),
            ExecutionUnit::Coroutine(c) => c.name(),
        }
    }

    /// Monitor this unit is waiting to enter
    pub fn blocked_on(&self) -> Option<MonitorOwner> {
        match self {
            ExecutionUnit::Thread(t) => t.blocked_on(),
            ExecutionUnit::Coroutine(c) => c.blocked_on(),
        }
    }

    pub fn as_thread(&self) -> Option<&Arc<OsThread>> {
        match self {
            ExecutionUnit::Thread(t) => Some(t),
            ExecutionUnit::Coroutine(_) => None,
        }
    }

    pub fn as_coroutine(&self) -> Option<&Arc<Coroutine>> {
        match self {
            ExecutionUnit::Thread(_) => None,
            ExecutionUnit::Coroutine(c) => Some(c),
        }
    }

    #[inline]
    pub fn is_coroutine(&self) -> bool {
        matches!(self, ExecutionUnit::Coroutine(_))
    }
}

impl PartialEq for ExecutionUnit {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ExecutionUnit {}

impl Hash for ExecutionUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for ExecutionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.id(), self.name())
    }
}

impl From<Arc<OsThread>> for ExecutionUnit {
    fn from(thread: Arc<OsThread>) -> Self {
        ExecutionUnit::Thread(thread)
    }
}

impl From<Arc<Coroutine>> for ExecutionUnit {
    fn from(coroutine: Arc<Coroutine>) -> Self {
        ExecutionUnit::Coroutine(coroutine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        let thread = OsThread::new("t");
        let a = ExecutionUnit::from(thread.clone());
        let b = ExecutionUnit::from(thread);
        let c = ExecutionUnit::from(OsThread::new("t"));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_accessors() {
        let coro = Coroutine::virtual_thread("vt-7");
        coro.set_blocked_on(Some(MonitorOwner(0x99)));
        let unit = ExecutionUnit::from(coro.clone());

        assert!(unit.is_coroutine());
        assert!(unit.as_thread().is_none());
        assert_eq!(unit.id(), UnitId::Coroutine(coro.id()));
        assert_eq!(unit.name(), "vt-7");
        assert_eq!(unit.blocked_on(), Some(MonitorOwner(0x99)));
    }
}
