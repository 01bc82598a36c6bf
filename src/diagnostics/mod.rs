/*!
 * Diagnostics
 *
 * Global-scan consumers of the execution directory:
 * - Snapshots for thread dumps
 * - Monitor deadlock detection
 */

mod deadlock;
mod snapshot;

pub use deadlock::{find_deadlocks, DeadlockCycle};
pub use snapshot::{DirectorySnapshot, UnitKind, UnitSnapshot};
