/*!
 * Deadlock Detection
 * Finds cycles in the waits-for graph built from monitor ownership
 */

use crate::core::types::{MonitorOwner, UnitId};
use crate::directory::{ExecutionDirectory, ExecutionUnit};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Units waiting on each other in a closed loop
///
/// `monitors[i]` is the monitor `units[i]` is blocked on; it is held by
/// `units[(i + 1) % len]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlockCycle {
    pub units: Vec<UnitId>,
    pub monitors: Vec<MonitorOwner>,
}

impl DeadlockCycle {
    /// Rotate so the smallest unit id comes first
    fn normalized(mut units: Vec<UnitId>, mut monitors: Vec<MonitorOwner>) -> Self {
        if let Some(start) = units
            .iter()
            .enumerate()
            .min_by_key(|(_, id)| **id)
            .map(|(i, _)| i)
        {
            units.rotate_left(start);
            monitors.rotate_left(start);
        }
        Self { units, monitors }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains(&id)
    }
}

impl fmt::Display for DeadlockCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (unit, monitor) in self.units.iter().zip(&self.monitors) {
            write!(f, "{} waits on {} -> ", unit, monitor)?;
        }
        match self.units.first() {
            Some(first) => write!(f, "{}", first),
            None => Ok(()),
        }
    }
}

/// Find every monitor deadlock among the live units
///
/// Each unit waits on at most one monitor, so the waits-for graph has
/// out-degree one and every cycle is found by following edges from each
/// enumerated unit. Owners are resolved with the lock held. Results are
/// best effort: units that move on while the walk runs are not reported.
pub fn find_deadlocks(directory: &ExecutionDirectory) -> Vec<DeadlockCycle> {
    let mut visited: AHashSet<UnitId> = AHashSet::new();
    let mut cycles = Vec::new();

    for start in directory.units() {
        if visited.contains(&start.id()) {
            continue;
        }

        let mut path: Vec<UnitId> = Vec::new();
        let mut monitors: Vec<MonitorOwner> = Vec::new();
        let mut position: AHashMap<UnitId, usize> = AHashMap::new();
        let mut current: ExecutionUnit = start;

        loop {
            let id = current.id();
            if let Some(&at) = position.get(&id) {
                let cycle =
                    DeadlockCycle::normalized(path[at..].to_vec(), monitors[at..].to_vec());
                warn!(cycle = %cycle, "Monitor deadlock detected");
                cycles.push(cycle);
                break;
            }
            if visited.contains(&id) {
                break;
            }

            let Some(token) = current.blocked_on() else {
                break;
            };
            let Some(owner) = directory.resolve_owner(token, true) else {
                break;
            };
            if owner.id() == id {
                // Re-entry on a monitor it already holds
                break;
            }

            position.insert(id, path.len());
            path.push(id);
            monitors.push(token);
            current = owner;
        }

        visited.extend(path);
    }

    cycles
}
