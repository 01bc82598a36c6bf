/*!
 * Global Enumerator
 * Single-pass walk over every live execution unit
 */

use super::unit::ExecutionUnit;
use crate::continuations::{BucketTable, Coroutine};
use crate::core::data_structures::RingPosition;
use crate::threads::{OsThread, ThreadRegistry};
use std::iter::FusedIterator;
use std::sync::Arc;

/// Forward-only, non-restartable sequence of live execution units
///
/// Safe to drive while units are created and torn down elsewhere. Units
/// created after the cursor has passed their bucket may be missed; a unit
/// that stays live for the whole walk is reported exactly once. The cursor
/// remembers a ring position rather than a link, so removing the unit it
/// stands on does not cut the walk short.
///
/// The cursor belongs to this value alone. It is not `Clone`; drive it
/// from one caller.
pub struct ExecutionUnits<'a> {
    cursor: Cursor<'a>,
}

enum Cursor<'a> {
    Threads(ThreadCursor<'a>),
    Buckets(BucketCursor<'a>),
}

impl<'a> ExecutionUnits<'a> {
    /// Walk the OS-thread registry in order
    pub fn threads(registry: &'a ThreadRegistry) -> Self {
        Self {
            cursor: Cursor::Threads(ThreadCursor {
                registry,
                current: registry.first(),
            }),
        }
    }

    /// Walk the coroutine bucket table, bucket by bucket
    pub fn buckets(table: &'a BucketTable) -> Self {
        let mut cursor = BucketCursor {
            table,
            index: 0,
            position: 0,
            current: None,
        };
        cursor.seek();
        Self {
            cursor: Cursor::Buckets(cursor),
        }
    }

    /// True once nothing is left to yield
    pub fn is_exhausted(&self) -> bool {
        match &self.cursor {
            Cursor::Threads(c) => c.current.is_none(),
            Cursor::Buckets(c) => c.current.is_none(),
        }
    }
}

impl Iterator for ExecutionUnits<'_> {
    type Item = ExecutionUnit;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.cursor {
            Cursor::Threads(c) => c.advance(),
            Cursor::Buckets(c) => c.advance(),
        }
    }
}

impl FusedIterator for ExecutionUnits<'_> {}

struct ThreadCursor<'a> {
    registry: &'a ThreadRegistry,
    current: Option<Arc<OsThread>>,
}

impl ThreadCursor<'_> {
    fn advance(&mut self) -> Option<ExecutionUnit> {
        let thread = self.current.take()?;
        self.current = self.registry.next_after(thread.id());
        Some(ExecutionUnit::Thread(thread))
    }
}

struct BucketCursor<'a> {
    table: &'a BucketTable,
    index: usize,
    /// Ring position of `current` inside bucket `index`
    position: RingPosition,
    current: Option<Arc<Coroutine>>,
}

impl BucketCursor<'_> {
    /// Position at the head of the first non-empty bucket from `index` on
    fn seek(&mut self) {
        while self.index < self.table.bucket_count() {
            if let Some((position, head)) = self.table.head_entry(self.index) {
                self.position = position;
                self.current = Some(head);
                return;
            }
            self.index += 1;
        }
    }

    fn advance(&mut self) -> Option<ExecutionUnit> {
        let coroutine = self.current.take()?;

        // Positions outlive removal, so this also works when `coroutine`
        // left the bucket after the cursor reached it
        match self.table.next_in_bucket(self.index, self.position) {
            Some((position, next)) => {
                self.position = position;
                self.current = Some(next);
            }
            None => {
                self.index += 1;
                self.seek();
            }
        }

        Some(ExecutionUnit::Coroutine(coroutine))
    }
}
