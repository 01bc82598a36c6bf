/*!
 * Directory Snapshot
 * Thread-dump style capture of every live execution unit
 */

use crate::continuations::{CoroutineKind, CoroutineState};
use crate::core::errors::DirectoryResult;
use crate::core::types::{CoroutineId, MonitorOwner, ThreadId, UnitId};
use crate::directory::{ExecutionDirectory, ExecutionMode, ExecutionUnit};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// What backs a unit in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    OsThread,
    CarrierCoroutine,
    VirtualCoroutine,
}

/// One unit as seen at capture time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub name: String,
    pub kind: UnitKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<CoroutineState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<ThreadId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mounted: Option<CoroutineId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_on: Option<MonitorOwner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<UnitId>,
}

impl UnitSnapshot {
    fn capture(unit: &ExecutionUnit, directory: &ExecutionDirectory) -> Self {
        let blocked_on = unit.blocked_on();
        let blocked_by = blocked_on
            .and_then(|token| directory.resolve_owner(token, false))
            .map(|owner| owner.id());

        match unit {
            ExecutionUnit::Thread(thread) => Self {
                id: unit.id(),
                name: thread.name().to_string(),
                kind: UnitKind::OsThread,
                state: None,
                carrier: None,
                mounted: thread.current_coroutine().map(|c| c.id()),
                blocked_on,
                blocked_by,
            },
            ExecutionUnit::Coroutine(coroutine) => Self {
                id: unit.id(),
                name: coroutine.name().to_string(),
                kind: match coroutine.kind() {
                    CoroutineKind::Carrier => UnitKind::CarrierCoroutine,
                    CoroutineKind::Virtual => UnitKind::VirtualCoroutine,
                },
                state: Some(coroutine.state()),
                carrier: coroutine.carrier(),
                mounted: None,
                blocked_on,
                blocked_by,
            },
        }
    }
}

/// Best-effort snapshot of the live unit set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    pub snapshot_id: Uuid,
    pub mode: ExecutionMode,
    pub units: Vec<UnitSnapshot>,
}

impl DirectorySnapshot {
    /// Walk the directory once and record every unit it yields
    pub fn capture(directory: &ExecutionDirectory) -> Self {
        let units: Vec<_> = directory
            .units()
            .map(|unit| UnitSnapshot::capture(&unit, directory))
            .collect();

        let snapshot = Self {
            snapshot_id: Uuid::new_v4(),
            mode: directory.mode(),
            units,
        };
        info!(
            snapshot_id = %snapshot.snapshot_id,
            units = snapshot.units.len(),
            "Directory snapshot captured"
        );
        snapshot
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn find(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.units.iter().find(|unit| unit.id == id)
    }

    /// Units waiting on a monitor
    pub fn blocked(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.units.iter().filter(|unit| unit.blocked_on.is_some())
    }

    pub fn to_json(&self) -> DirectoryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
