/*!
 * Data Structures
 *
 * Containers shared by the execution stores:
 * - Sentinel ring for the per-bucket coroutine lists
 */

mod ring;

pub use ring::{Ring, RingIter, RingMember, RingPosition};
