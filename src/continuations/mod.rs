/*!
 * Continuations
 *
 * Continuation-backed execution contexts ("fibers") and the bucket table
 * that partitions the live ones. The table is owned and mutated by the
 * runtime's continuation subsystem; the directory only reads it.
 */

mod bucket;
mod coroutine;

pub use bucket::BucketTable;
pub use coroutine::{Continuation, Coroutine, CoroutineKind, CoroutineState};
