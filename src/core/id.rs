/*!
 * ID Generation System
 * Process-wide monotonic identities for execution units
 */

use super::types::{CoroutineId, ThreadId};
use std::sync::atomic::{AtomicU64, Ordering};

/// Generic ID generator interface
pub trait IdGenerator<T> {
    /// Generate next ID
    fn next(&self) -> T;
}

/// Lock-free monotonic counter
///
/// Identities are never recycled: a stale token or cursor must not be able
/// to alias a unit created later.
#[repr(C, align(64))]
pub struct AtomicGenerator {
    counter: AtomicU64,
}

impl AtomicGenerator {
    /// Create new generator starting at given value
    #[inline]
    pub const fn new(start: u64) -> Self {
        Self {
            counter: AtomicU64::new(start),
        }
    }

    #[inline]
    fn bump(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl IdGenerator<ThreadId> for AtomicGenerator {
    #[inline]
    fn next(&self) -> ThreadId {
        ThreadId(self.bump())
    }
}

impl IdGenerator<CoroutineId> for AtomicGenerator {
    #[inline]
    fn next(&self) -> CoroutineId {
        CoroutineId(self.bump())
    }
}

static THREAD_IDS: AtomicGenerator = AtomicGenerator::new(1);
static COROUTINE_IDS: AtomicGenerator = AtomicGenerator::new(1);

/// Allocate the next OS thread identity
#[inline]
pub fn next_thread_id() -> ThreadId {
    THREAD_IDS.next()
}

/// Allocate the next coroutine identity
#[inline]
pub fn next_coroutine_id() -> CoroutineId {
    COROUTINE_IDS.next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_ids_are_monotonic() {
        let a = next_thread_id();
        let b = next_thread_id();
        assert!(b > a);

        let c = next_coroutine_id();
        let d = next_coroutine_id();
        assert!(d > c);
    }

    #[test]
    fn test_concurrent_generation_is_unique() {
        let gen = Arc::new(AtomicGenerator::new(1));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gen = Arc::clone(&gen);
                thread::spawn(move || {
                    (0..500)
                        .map(|_| IdGenerator::<ThreadId>::next(&*gen))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 4000);
    }
}
