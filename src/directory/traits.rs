/*!
 * Execution Store Traits
 * Backing-store abstraction behind the execution directory
 */

use super::mode::ExecutionMode;
use super::unit::ExecutionUnit;
use super::units::ExecutionUnits;
use crate::core::types::MonitorOwner;
use crate::threads::ThreadObject;

/// One way of backing language-level threads with execution units
///
/// Implementations only read the runtime's stores. Lookups that find
/// nothing return `None`: the mapping is not installed yet, or has
/// already been torn down.
pub trait ExecutionStore: Send + Sync {
    /// Mode this store implements
    fn mode(&self) -> ExecutionMode;

    /// Unit currently backing `thread_obj`
    fn resolve(&self, thread_obj: &ThreadObject) -> Option<ExecutionUnit>;

    /// Unit holding the monitor named by `token`
    ///
    /// `do_lock` serializes the lookup against concurrent teardown.
    fn resolve_owner(&self, token: MonitorOwner, do_lock: bool) -> Option<ExecutionUnit>;

    /// Fresh enumerator over every live unit
    fn units(&self) -> ExecutionUnits<'_>;
}
