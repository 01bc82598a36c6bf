/*!
 * Core Types
 * Identity types shared by the stores and the directory
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// OS thread ID (monotonic, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub u64);

/// Coroutine ID (monotonic, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoroutineId(pub u64);

/// Identity of an execution unit of either backing kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum UnitId {
    Thread(ThreadId),
    Coroutine(CoroutineId),
}

/// Opaque monitor owner token taken from a lock record
///
/// Address-sized so it can carry whatever the lock word stored, but it is
/// only ever compared and hashed, never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonitorOwner(pub usize);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thread#{}", self.0)
    }
}

impl fmt::Display for CoroutineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coroutine#{}", self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitId::Thread(id) => id.fmt(f),
            UnitId::Coroutine(id) => id.fmt(f),
        }
    }
}

impl fmt::Display for MonitorOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<ThreadId> for UnitId {
    fn from(id: ThreadId) -> Self {
        UnitId::Thread(id)
    }
}

impl From<CoroutineId> for UnitId {
    fn from(id: CoroutineId) -> Self {
        UnitId::Coroutine(id)
    }
}

impl From<usize> for MonitorOwner {
    fn from(raw: usize) -> Self {
        MonitorOwner(raw)
    }
}
