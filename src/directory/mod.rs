/*!
 * Execution Directory
 *
 * Uniform view over the runtime's execution contexts. Answers three
 * questions for synchronization and diagnostic code:
 * - which unit backs a given thread object (`resolve`)
 * - which unit owns a given monitor (`resolve_owner`)
 * - what units are live right now (`units`)
 *
 * # Architecture
 *
 * The mode is looked at once, when the directory is built, to pick an
 * `ExecutionStore` strategy:
 * - `ThreadOnlyStore` reads the OS-thread registry
 * - `FiberStore` reads the coroutine bucket table, falling back to the
 *   registry for carrier projection and owner lookups
 *
 * The directory never creates, destroys or schedules units.
 */

mod config;
mod fiber;
mod mode;
mod thread_only;
mod traits;
mod unit;
mod units;

pub use config::DirectoryConfig;
pub use fiber::FiberStore;
pub use mode::ExecutionMode;
pub use thread_only::ThreadOnlyStore;
pub use traits::ExecutionStore;
pub use unit::ExecutionUnit;
pub use units::ExecutionUnits;

use crate::continuations::BucketTable;
use crate::core::errors::DirectoryResult;
use crate::core::types::MonitorOwner;
use crate::threads::{ThreadObject, ThreadRegistry};
use std::sync::Arc;
use tracing::info;

/// Execution directory
pub struct ExecutionDirectory {
    config: DirectoryConfig,
    threads: Arc<ThreadRegistry>,
    buckets: Arc<BucketTable>,
    store: Box<dyn ExecutionStore>,
}

impl ExecutionDirectory {
    /// Build a directory over existing stores
    pub fn new(
        config: DirectoryConfig,
        threads: Arc<ThreadRegistry>,
        buckets: Arc<BucketTable>,
    ) -> Self {
        let store: Box<dyn ExecutionStore> = match config.mode {
            ExecutionMode::ThreadOnly => Box::new(ThreadOnlyStore::new(Arc::clone(&threads))),
            ExecutionMode::FiberCapable => Box::new(FiberStore::new(
                Arc::clone(&threads),
                Arc::clone(&buckets),
                config.yield_with_monitor,
            )),
        };

        info!(
            mode = %config.mode,
            yield_with_monitor = config.yield_with_monitor,
            buckets = buckets.bucket_count(),
            "Execution directory initialized"
        );

        Self {
            config,
            threads,
            buckets,
            store,
        }
    }

    pub fn builder() -> ExecutionDirectoryBuilder {
        ExecutionDirectoryBuilder::new()
    }

    #[inline]
    pub fn mode(&self) -> ExecutionMode {
        self.store.mode()
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    pub fn threads(&self) -> &Arc<ThreadRegistry> {
        &self.threads
    }

    pub fn buckets(&self) -> &Arc<BucketTable> {
        &self.buckets
    }

    /// Unit backing `thread_obj`, or `None` if none is installed
    #[inline]
    pub fn resolve(&self, thread_obj: &ThreadObject) -> Option<ExecutionUnit> {
        self.store.resolve(thread_obj)
    }

    /// Unit holding the monitor named by `token`, or `None` if no live
    /// unit holds it
    #[inline]
    pub fn resolve_owner(&self, token: MonitorOwner, do_lock: bool) -> Option<ExecutionUnit> {
        self.store.resolve_owner(token, do_lock)
    }

    /// One-shot enumerator over every live unit
    #[inline]
    pub fn units(&self) -> ExecutionUnits<'_> {
        self.store.units()
    }
}

impl std::fmt::Debug for ExecutionDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionDirectory")
            .field("config", &self.config)
            .field("threads", &self.threads)
            .field("buckets", &self.buckets)
            .finish()
    }
}

/// Builder for ExecutionDirectory
#[derive(Default)]
pub struct ExecutionDirectoryBuilder {
    config: Option<DirectoryConfig>,
    threads: Option<Arc<ThreadRegistry>>,
    buckets: Option<Arc<BucketTable>>,
}

impl ExecutionDirectoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit configuration instead of the process one
    pub fn with_config(mut self, config: DirectoryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Share an existing thread registry
    pub fn with_threads(mut self, threads: Arc<ThreadRegistry>) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Share an existing bucket table
    pub fn with_buckets(mut self, buckets: Arc<BucketTable>) -> Self {
        self.buckets = Some(buckets);
        self
    }

    /// Build the directory, creating any store that was not supplied
    ///
    /// Without an explicit configuration the process mode and environment
    /// are used.
    pub fn build(self) -> DirectoryResult<ExecutionDirectory> {
        let config = match self.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => DirectoryConfig::from_env()?,
        };

        let threads = self
            .threads
            .unwrap_or_else(|| Arc::new(ThreadRegistry::new()));
        let buckets = match self.buckets {
            Some(buckets) => buckets,
            None => Arc::new(BucketTable::new(config.bucket_count)?),
        };

        Ok(ExecutionDirectory::new(config, threads, buckets))
    }
}
