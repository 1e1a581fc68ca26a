//! # Windowed Keyed Multi-Map
//!
//! Maps a key to a set of values, where every key carries a sequence number
//! and the map only holds keys whose sequence number is at or above the
//! current floor.
//!
//! ## Layout
//!
//! - `entries`: key → value set (O(1) lookup and insert)
//! - `buckets`: sequence number → keys created at that sequence number
//!
//! Advancing the floor splits the bucket tree at the new floor and removes
//! only the keys of the detached buckets, so eviction cost follows the number
//! of evicted keys rather than the size of the map.

use std::collections::{hash_map::Entry, BTreeMap, HashMap, HashSet};
use std::hash::Hash;
use thiserror::Error;

/// A key that knows its position on the sequence axis.
pub trait SequenceKey: Eq + Hash + Clone {
    /// Sequence number used to decide whether the key is inside the window.
    fn sequence_number(&self) -> u64;
}

/// Errors from window operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// Attempt to move the floor backwards.
    #[error("window floor cannot move backwards: current {current}, requested {requested}")]
    FloorRegression { current: u64, requested: u64 },

    /// Attempt to create an entry for a key that is already outside the window.
    #[error("sequence number {sequence} is below the window floor {floor}")]
    BelowFloor { sequence: u64, floor: u64 },
}

/// Keyed multi-map bounded by a sequence-number window.
///
/// Single-threaded: all mutating operations take `&mut self`.
///
/// # Example
///
/// ```rust
/// use shared_sequence::{SequenceKey, WindowedKeyedMultiMap};
///
/// #[derive(Clone, PartialEq, Eq, Hash)]
/// struct Key(u64);
///
/// impl SequenceKey for Key {
///     fn sequence_number(&self) -> u64 {
///         self.0
///     }
/// }
///
/// let mut map: WindowedKeyedMultiMap<Key, u8> = WindowedKeyedMultiMap::with_capacity(16);
/// map.get_or_create_set(Key(3)).unwrap().insert(1);
/// map.get_or_create_set(Key(7)).unwrap().insert(2);
///
/// assert_eq!(map.shift_window(5).unwrap(), 1);
/// assert!(!map.contains_key(&Key(3)));
/// assert!(map.contains_key(&Key(7)));
/// ```
#[derive(Debug)]
pub struct WindowedKeyedMultiMap<K, V> {
    /// Lowest sequence number allowed to be resident.
    floor: u64,
    /// Value sets by key.
    entries: HashMap<K, HashSet<V>>,
    /// Keys grouped by sequence number, for bulk eviction.
    buckets: BTreeMap<u64, Vec<K>>,
}

impl<K, V> WindowedKeyedMultiMap<K, V>
where
    K: SequenceKey,
    V: Eq + Hash,
{
    /// Create a map with an explicit starting floor.
    ///
    /// `initial_capacity` pre-sizes the key table; it has no effect on behavior.
    pub fn new(initial_floor: u64, initial_capacity: usize) -> Self {
        Self {
            floor: initial_floor,
            entries: HashMap::with_capacity(initial_capacity),
            buckets: BTreeMap::new(),
        }
    }

    /// Create a map with floor 0.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self::new(0, initial_capacity)
    }

    /// Return the value set for `key`, creating an empty one if absent.
    ///
    /// # Errors
    ///
    /// - `WindowError::BelowFloor` - the key's sequence number is below the
    ///   floor; nothing is inserted.
    pub fn get_or_create_set(&mut self, key: K) -> Result<&mut HashSet<V>, WindowError> {
        let sequence = key.sequence_number();
        if sequence < self.floor {
            return Err(WindowError::BelowFloor {
                sequence,
                floor: self.floor,
            });
        }

        match self.entries.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                self.buckets
                    .entry(sequence)
                    .or_default()
                    .push(entry.key().clone());
                Ok(entry.insert(HashSet::new()))
            }
        }
    }

    /// Add `value` to the set of `key`. Returns `true` if the value was new.
    pub fn insert(&mut self, key: K, value: V) -> Result<bool, WindowError> {
        Ok(self.get_or_create_set(key)?.insert(value))
    }

    /// Move the floor to `new_floor` and evict every key below it.
    ///
    /// Returns the number of evicted keys. Moving to the current floor is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// - `WindowError::FloorRegression` - `new_floor` is below the current
    ///   floor; the map is left untouched.
    pub fn shift_window(&mut self, new_floor: u64) -> Result<usize, WindowError> {
        if new_floor < self.floor {
            return Err(WindowError::FloorRegression {
                current: self.floor,
                requested: new_floor,
            });
        }

        // split_off keeps everything below the split point in place
        let retained = self.buckets.split_off(&new_floor);
        let expired = std::mem::replace(&mut self.buckets, retained);

        let mut evicted = 0;
        for key in expired.into_values().flatten() {
            if self.entries.remove(&key).is_some() {
                evicted += 1;
            }
        }

        self.floor = new_floor;

        tracing::trace!(floor = new_floor, evicted, resident = self.entries.len(), "window shifted");

        Ok(evicted)
    }

    /// Evict every entry. The floor is left unchanged.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.buckets.clear();
    }

    /// Value set for `key`, if resident.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&HashSet<V>> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of resident keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of values across all resident keys.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.entries.values().map(HashSet::len).sum()
    }

    /// Current floor.
    #[must_use]
    pub fn floor(&self) -> u64 {
        self.floor
    }

    /// Lowest sequence number with a resident key.
    #[must_use]
    pub fn lowest_sequence_number(&self) -> Option<u64> {
        self.buckets.keys().next().copied()
    }

    /// Highest sequence number with a resident key.
    #[must_use]
    pub fn highest_sequence_number(&self) -> Option<u64> {
        self.buckets.keys().next_back().copied()
    }

    /// Iterate over resident keys and their value sets.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &HashSet<V>)> {
        self.entries.iter()
    }

    /// Iterate over resident keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}
