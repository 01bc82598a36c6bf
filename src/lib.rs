/*!
 * Execution Units
 * Directory of the runtime's execution contexts: OS threads and coroutines
 * resolved, owner-looked-up and enumerated through one handle type
 */

pub mod continuations;
pub mod core;
pub mod diagnostics;
pub mod directory;
pub mod monitoring;
pub mod monitors;
pub mod threads;

// Re-exports
pub use crate::core::errors::{DirectoryError, DirectoryResult};
pub use crate::core::types::{CoroutineId, MonitorOwner, ThreadId, UnitId};
pub use continuations::{BucketTable, Continuation, Coroutine, CoroutineKind, CoroutineState};
pub use diagnostics::{find_deadlocks, DeadlockCycle, DirectorySnapshot};
pub use directory::{
    DirectoryConfig, ExecutionDirectory, ExecutionDirectoryBuilder, ExecutionMode, ExecutionUnit,
    ExecutionUnits,
};
pub use monitoring::init_tracing;
pub use threads::{OsThread, ThreadObject, ThreadRegistry};
