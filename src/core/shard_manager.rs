/*!
 * Bucket Sizing
 *
 * CPU-topology-aware bucket count for the coroutine bucket table.
 * Pure functions instead of a singleton so the calculation inlines at the
 * call site.
 *
 * - **Power-of-2 buckets**: placement is a bitwise AND with `n - 1`
 * - **CPU-proportional scaling**: more carriers create coroutines concurrently
 */

/// Hardware-aware shard configuration (pure functions)
pub struct ShardManager;

impl ShardManager {
    pub const MIN_SHARDS: usize = 8;
    pub const MAX_SHARDS: usize = 512;

    // Coroutine churn on every carrier: spawn/exit hits a bucket lock
    const BUCKETS_PER_CPU: usize = 4;

    /// Get CPU count
    #[inline]
    pub fn cpu_count() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or_else(|_| {
                tracing::warn!("Failed to detect CPU count, defaulting to 8");
                8
            })
    }

    /// Default bucket count: 4x CPU cores, power of 2, clamped
    #[inline]
    pub fn buckets() -> usize {
        Self::scaled(Self::cpu_count())
    }

    #[inline]
    fn scaled(cpus: usize) -> usize {
        (cpus.max(1) * Self::BUCKETS_PER_CPU)
            .next_power_of_two()
            .clamp(Self::MIN_SHARDS, Self::MAX_SHARDS)
    }
}
