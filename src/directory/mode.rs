/*!
 * Execution Mode Selector
 * Process-wide choice between thread-only and fiber-capable execution
 */

use crate::core::errors::{DirectoryError, DirectoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{info, warn};

static PROCESS_MODE: OnceLock<ExecutionMode> = OnceLock::new();

/// Which execution contexts back language-level threads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Every thread object maps 1:1 to an OS thread
    #[default]
    ThreadOnly,
    /// Thread objects may map to coroutines multiplexed over carriers
    FiberCapable,
}

impl ExecutionMode {
    /// Environment variable consulted when no mode was installed
    pub const ENV_VAR: &'static str = "EXEC_UNITS_MODE";

    /// Fix the process-wide mode
    ///
    /// Installing the mode that is already in effect is a no-op; any other
    /// mode is rejected once the first one is fixed.
    pub fn install(mode: ExecutionMode) -> DirectoryResult<ExecutionMode> {
        let fixed = *PROCESS_MODE.get_or_init(|| {
            info!(mode = %mode, "Execution mode installed");
            mode
        });

        if fixed == mode {
            Ok(fixed)
        } else {
            Err(DirectoryError::ModeAlreadyFixed {
                current: fixed,
                requested: mode,
            })
        }
    }

    /// Process-wide mode, fixing it from the environment on first use
    pub fn current() -> ExecutionMode {
        *PROCESS_MODE.get_or_init(|| {
            let mode = Self::from_env().unwrap_or_default();
            info!(mode = %mode, "Execution mode fixed on first use");
            mode
        })
    }

    /// Mode named by [`ENV_VAR`](Self::ENV_VAR), if set and valid
    pub fn from_env() -> Option<ExecutionMode> {
        let raw = std::env::var(Self::ENV_VAR).ok()?;
        match raw.parse() {
            Ok(mode) => Some(mode),
            Err(e) => {
                warn!(value = %raw, error = %e, "Ignoring invalid execution mode");
                None
            }
        }
    }

    #[inline]
    pub fn is_fiber_capable(self) -> bool {
        self == ExecutionMode::FiberCapable
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::ThreadOnly => write!(f, "thread-only"),
            ExecutionMode::FiberCapable => write!(f, "fiber-capable"),
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thread" | "threads" | "thread_only" | "thread-only" => Ok(ExecutionMode::ThreadOnly),
            "fiber" | "fibers" | "fiber_capable" | "fiber-capable" => {
                Ok(ExecutionMode::FiberCapable)
            }
            other => Err(DirectoryError::InvalidConfig(format!(
                "unknown execution mode '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("thread".parse::<ExecutionMode>().unwrap(), ExecutionMode::ThreadOnly);
        assert_eq!(
            " Fiber-Capable ".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::FiberCapable
        );
        assert!(matches!(
            "green".parse::<ExecutionMode>(),
            Err(DirectoryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for mode in [ExecutionMode::ThreadOnly, ExecutionMode::FiberCapable] {
            assert_eq!(mode.to_string().parse::<ExecutionMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_default_is_thread_only() {
        assert_eq!(ExecutionMode::default(), ExecutionMode::ThreadOnly);
        assert!(!ExecutionMode::default().is_fiber_capable());
    }
}
