/*!
 * Directory Configuration
 *
 * Start-time configuration for the execution directory
 */

use super::mode::ExecutionMode;
use crate::core::errors::{DirectoryError, DirectoryResult};
use crate::core::ShardManager;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Execution directory configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Thread-only or fiber-capable
    pub mode: ExecutionMode,
    /// Resolve monitor owners against coroutine ownership directly
    pub yield_with_monitor: bool,
    /// Number of coroutine buckets (power of 2)
    pub bucket_count: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::ThreadOnly,
            yield_with_monitor: false,
            bucket_count: ShardManager::buckets(),
        }
    }
}

impl DirectoryConfig {
    pub const YIELD_WITH_MONITOR_VAR: &'static str = "EXEC_UNITS_YIELD_WITH_MONITOR";
    pub const BUCKETS_VAR: &'static str = "EXEC_UNITS_BUCKETS";

    /// Plain OS threads only
    pub fn thread_only() -> Self {
        Self {
            mode: ExecutionMode::ThreadOnly,
            ..Default::default()
        }
    }

    /// Fiber-capable with owner resolution through OS threads
    pub fn fiber_capable() -> Self {
        Self {
            mode: ExecutionMode::FiberCapable,
            ..Default::default()
        }
    }

    pub fn with_yield_with_monitor(mut self, enabled: bool) -> Self {
        self.yield_with_monitor = enabled;
        self
    }

    pub fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    /// Configuration for this process: installed mode plus environment
    ///
    /// Environment variables:
    /// - EXEC_UNITS_MODE: `thread` or `fiber` (only if no mode was installed)
    /// - EXEC_UNITS_YIELD_WITH_MONITOR: `1`/`true` to enable
    /// - EXEC_UNITS_BUCKETS: bucket count (power of 2)
    pub fn from_env() -> DirectoryResult<Self> {
        let mut config = Self {
            mode: ExecutionMode::current(),
            ..Default::default()
        };

        if let Ok(raw) = std::env::var(Self::YIELD_WITH_MONITOR_VAR) {
            config.yield_with_monitor = matches!(raw.trim(), "1" | "true" | "TRUE" | "yes");
        }

        if let Ok(raw) = std::env::var(Self::BUCKETS_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(count) => config.bucket_count = count,
                Err(e) => {
                    warn!(value = %raw, error = %e, "Ignoring invalid bucket count");
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration document
    pub fn from_json(json: &str) -> DirectoryResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DirectoryResult<()> {
        if self.bucket_count == 0 || !self.bucket_count.is_power_of_two() {
            return Err(DirectoryError::InvalidBucketCount(self.bucket_count));
        }
        if self.yield_with_monitor && !self.mode.is_fiber_capable() {
            warn!("yield_with_monitor has no effect in thread-only mode");
        }
        Ok(())
    }
}
