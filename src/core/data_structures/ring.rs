/*!
 * Sentinel Ring
 * Circular ring keyed by element identity with a designated head
 *
 * Every element gets a ring position when it is appended. Positions only
 * grow, so a cursor that remembers the position it stood on can always find
 * the next live element, even after its own element was removed.
 */

use ahash::RandomState;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::ops::Bound;
use std::sync::Arc;

/// Element that can live in a [`Ring`]
pub trait RingMember {
    /// Stable identity used for lookups and termination checks
    type Key: Copy + Eq + Hash + fmt::Debug;

    fn ring_key(&self) -> Self::Key;
}

impl<T: RingMember> RingMember for Arc<T> {
    type Key = T::Key;

    #[inline]
    fn ring_key(&self) -> Self::Key {
        (**self).ring_key()
    }
}

/// Position of an element inside one [`Ring`], assigned on append
pub type RingPosition = u64;

struct Slot<T> {
    position: RingPosition,
    value: T,
}

/// Circular ring with a head sentinel
///
/// Traversal from the head wraps back to the head; a lap is complete
/// exactly when the successor of the current element is the head again.
/// `push_back` inserts just before the head, so the head only changes when
/// the head itself is removed (it then moves to its successor).
pub struct Ring<T: RingMember> {
    order: BTreeMap<RingPosition, T::Key>,
    slots: HashMap<T::Key, Slot<T>, RandomState>,
    next_position: RingPosition,
}

impl<T: RingMember> Ring<T> {
    /// Create an empty ring
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
            slots: HashMap::with_hasher(RandomState::new()),
            next_position: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: &T::Key) -> bool {
        self.slots.contains_key(key)
    }

    /// Key of the head sentinel
    #[inline]
    pub fn head_key(&self) -> Option<T::Key> {
        self.order.values().next().copied()
    }

    /// Element at the head
    pub fn head(&self) -> Option<&T> {
        self.head_key().and_then(|key| self.get(&key))
    }

    /// Head element with its position
    pub fn head_entry(&self) -> Option<(RingPosition, &T)> {
        let (&position, key) = self.order.iter().next()?;
        self.slots.get(key).map(|slot| (position, &slot.value))
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    /// Current position of `key`
    pub fn position_of(&self, key: &T::Key) -> Option<RingPosition> {
        self.slots.get(key).map(|slot| slot.position)
    }

    /// Successor of `key`, wrapping around to the head
    ///
    /// Returns `None` once `key` has left the ring.
    pub fn next_of(&self, key: &T::Key) -> Option<&T> {
        let position = self.position_of(key)?;
        match self.after(position) {
            Some((_, value)) => Some(value),
            None => self.head(),
        }
    }

    /// First live element after `position` without wrapping
    ///
    /// `position` need not belong to a live element, so a cursor whose
    /// element was removed resumes at that element's former successor.
    pub fn after(&self, position: RingPosition) -> Option<(RingPosition, &T)> {
        let (&next, key) = self
            .order
            .range((Bound::Excluded(position), Bound::Unbounded))
            .next()?;
        self.slots.get(key).map(|slot| (next, &slot.value))
    }

    /// Append before the head; returns false if the key is already present
    pub fn push_back(&mut self, value: T) -> bool {
        let key = value.ring_key();
        if self.slots.contains_key(&key) {
            return false;
        }

        let position = self.next_position;
        self.next_position += 1;
        self.order.insert(position, key);
        self.slots.insert(key, Slot { position, value });
        true
    }

    /// Unlink and return the element with `key`
    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        let slot = self.slots.remove(key)?;
        self.order.remove(&slot.position);
        Some(slot.value)
    }

    /// One lap starting at the head
    pub fn iter(&self) -> RingIter<'_, T> {
        RingIter {
            ring: self,
            inner: self.order.values(),
        }
    }
}

impl<T: RingMember> Default for Ring<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RingMember> fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("head", &self.head_key())
            .field("len", &self.slots.len())
            .finish()
    }
}

/// Single-lap iterator over a [`Ring`]
pub struct RingIter<'a, T: RingMember> {
    ring: &'a Ring<T>,
    inner: std::collections::btree_map::Values<'a, RingPosition, T::Key>,
}

impl<'a, T: RingMember> Iterator for RingIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.inner.next()?;
        self.ring.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Node(u32);

    impl RingMember for Node {
        type Key = u32;

        fn ring_key(&self) -> u32 {
            self.0
        }
    }

    fn keys(ring: &Ring<Node>) -> Vec<u32> {
        ring.iter().map(|n| n.0).collect()
    }

    #[test]
    fn test_empty_ring() {
        let ring: Ring<Node> = Ring::new();
        assert!(ring.is_empty());
        assert!(ring.head().is_none());
        assert!(ring.next_of(&1).is_none());
        assert_eq!(ring.iter().count(), 0);
    }

    #[test]
    fn test_single_element_wraps_to_itself() {
        let mut ring = Ring::new();
        assert!(ring.push_back(Node(1)));

        assert_eq!(ring.head_key(), Some(1));
        assert_eq!(ring.next_of(&1), Some(&Node(1)));
        assert_eq!(keys(&ring), vec![1]);
    }

    #[test]
    fn test_push_back_keeps_head_stable() {
        let mut ring = Ring::new();
        ring.push_back(Node(2));
        ring.push_back(Node(3));
        ring.push_back(Node(4));

        assert_eq!(ring.head_key(), Some(2));
        assert_eq!(keys(&ring), vec![2, 3, 4]);
        assert_eq!(ring.next_of(&4), Some(&Node(2)));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut ring = Ring::new();
        assert!(ring.push_back(Node(1)));
        assert!(!ring.push_back(Node(1)));
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_remove_middle_and_head() {
        let mut ring = Ring::new();
        for i in 1..=4 {
            ring.push_back(Node(i));
        }

        assert_eq!(ring.remove(&3), Some(Node(3)));
        assert_eq!(keys(&ring), vec![1, 2, 4]);
        assert!(ring.next_of(&3).is_none());

        assert_eq!(ring.remove(&1), Some(Node(1)));
        assert_eq!(ring.head_key(), Some(2));
        assert_eq!(keys(&ring), vec![2, 4]);
        assert_eq!(ring.next_of(&4), Some(&Node(2)));
    }

    #[test]
    fn test_remove_sole_element_empties_ring() {
        let mut ring = Ring::new();
        ring.push_back(Node(9));
        assert_eq!(ring.remove(&9), Some(Node(9)));
        assert!(ring.is_empty());
        assert_eq!(ring.remove(&9), None);
    }

    #[test]
    fn test_after_resumes_past_removed_position() {
        let mut ring = Ring::new();
        for i in 1..=4 {
            ring.push_back(Node(i));
        }

        let position = ring.position_of(&2).unwrap();
        ring.remove(&2);
        assert_eq!(ring.after(position).map(|(_, n)| n.0), Some(3));

        // Removing the successor as well still lands on the next live element
        ring.remove(&3);
        assert_eq!(ring.after(position).map(|(_, n)| n.0), Some(4));

        let last = ring.position_of(&4).unwrap();
        assert!(ring.after(last).is_none());
    }
}
