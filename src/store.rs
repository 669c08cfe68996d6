//! Case-insensitive key stores backing the set adapter.
//!
//! This module provides the [`CaselessStore`] capability trait and its
//! three single-threaded implementations. A store is a mapping from a
//! folded key ([`CaseFold::Folded`]) to the originally-cased element, so
//! lookups compare case-insensitively while iteration hands back the
//! element exactly as it was first inserted.
//!
//! # Variants
//!
//! | Store | Backing | Iteration order |
//! |-------------------|------------|----------------------------------|
//! | [`UnorderedStore`] | `HashMap` | none, capacity-hinted |
//! | [`OrderedStore`] | `IndexMap` | insertion order |
//! | [`SortedStore`] | `BTreeMap` | folded (case-insensitive) order |
//!
//! The set adapter owns exactly one store, selected at construction and
//! never replaced. Keys are folded by the adapter before they reach the
//! store; the store itself never inspects element case.
//!
//! The concurrent sorted variant lives in [`crate::concurrent`] because
//! its `&self` mutation surface is a different API shape.

use std::collections::{BTreeMap, HashMap, btree_map, hash_map};
use std::fmt;

use indexmap::{IndexMap, map as index_map};

use crate::fold::CaseFold;

// =============================================================================
// Hasher Selection
// =============================================================================

/// Hash builder used by the hash-based stores.
///
/// Defaults to the standard library's `RandomState`. The `fxhash` and
/// `ahash` feature flags swap in the corresponding high-speed hashers.
#[cfg(feature = "fxhash")]
pub type DefaultHashBuilder = rustc_hash::FxBuildHasher;

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub type DefaultHashBuilder = ahash::RandomState;

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub type DefaultHashBuilder = std::collections::hash_map::RandomState;

// =============================================================================
// CaselessStore Capability
// =============================================================================

/// Contract the set adapter requires from a backing key store.
///
/// A store maps pre-folded keys to originally-cased elements. The adapter
/// computes the folded key once per operation and delegates everything
/// else; a store never folds, compares case, or re-derives keys itself.
///
/// Insertion is first-writer-wins: [`insert_if_absent`] must leave an
/// existing mapping untouched, so the first-inserted casing survives.
///
/// [`insert_if_absent`]: CaselessStore::insert_if_absent
pub trait CaselessStore<T: CaseFold> {
    /// Borrowed iterator over stored elements, in this store's order.
    type Values<'a>: Iterator<Item = &'a T>
    where
        Self: 'a,
        T: 'a;

    /// Owning iterator over stored elements, in this store's order.
    type IntoValues: Iterator<Item = T>;

    /// Returns the number of stored mappings.
    fn len(&self) -> usize;

    /// Returns `true` when the store holds no mappings.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` when a mapping for `key` exists.
    fn contains_key(&self, key: &T::Folded) -> bool;

    /// Returns the originally-cased element stored under `key`.
    fn get(&self, key: &T::Folded) -> Option<&T>;

    /// Inserts `element` under `key` unless a mapping already exists.
    ///
    /// Returns whether the store changed. An existing mapping is kept
    /// untouched, so the first-inserted casing wins.
    fn insert_if_absent(&mut self, key: T::Folded, element: T) -> bool;

    /// Removes and returns the element stored under `key`.
    fn remove(&mut self, key: &T::Folded) -> Option<T>;

    /// Removes every mapping.
    fn clear(&mut self);

    /// Keeps only the mappings for which `keep` returns `true`.
    fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T::Folded, &T) -> bool;

    /// Iterates the stored elements in this store's order.
    fn values(&self) -> Self::Values<'_>;

    /// Consumes the store, yielding elements in this store's order.
    fn into_values(self) -> Self::IntoValues;
}

// =============================================================================
// UnorderedStore
// =============================================================================

/// Hash-based store with no iteration order guarantee.
#[derive(Clone)]
pub struct UnorderedStore<T: CaseFold> {
    entries: HashMap<T::Folded, T, DefaultHashBuilder>,
}

impl<T: CaseFold> UnorderedStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_hasher(DefaultHashBuilder::default()),
        }
    }

    /// Creates an empty store sized for at least `capacity` mappings.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity_and_hasher(
                capacity,
                DefaultHashBuilder::default(),
            ),
        }
    }
}

impl<T: CaseFold> Default for UnorderedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CaseFold> CaselessStore<T> for UnorderedStore<T> {
    type Values<'a>
        = hash_map::Values<'a, T::Folded, T>
    where
        Self: 'a,
        T: 'a;
    type IntoValues = hash_map::IntoValues<T::Folded, T>;

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains_key(&self, key: &T::Folded) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &T::Folded) -> Option<&T> {
        self.entries.get(key)
    }

    fn insert_if_absent(&mut self, key: T::Folded, element: T) -> bool {
        match self.entries.entry(key) {
            hash_map::Entry::Occupied(_) => false,
            hash_map::Entry::Vacant(slot) => {
                slot.insert(element);
                true
            }
        }
    }

    fn remove(&mut self, key: &T::Folded) -> Option<T> {
        self.entries.remove(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T::Folded, &T) -> bool,
    {
        self.entries.retain(|key, element| keep(key, &*element));
    }

    fn values(&self) -> Self::Values<'_> {
        self.entries.values()
    }

    fn into_values(self) -> Self::IntoValues {
        self.entries.into_values()
    }
}

// =============================================================================
// OrderedStore
// =============================================================================

/// Store that iterates in insertion order.
///
/// Removals shift later entries instead of swapping, so the relative
/// order of the surviving elements is always preserved.
#[derive(Clone)]
pub struct OrderedStore<T: CaseFold> {
    entries: IndexMap<T::Folded, T, DefaultHashBuilder>,
}

impl<T: CaseFold> OrderedStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::with_hasher(DefaultHashBuilder::default()),
        }
    }

    /// Creates an empty store sized for at least `capacity` mappings.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity_and_hasher(
                capacity,
                DefaultHashBuilder::default(),
            ),
        }
    }
}

impl<T: CaseFold> Default for OrderedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CaseFold> CaselessStore<T> for OrderedStore<T> {
    type Values<'a>
        = index_map::Values<'a, T::Folded, T>
    where
        Self: 'a,
        T: 'a;
    type IntoValues = index_map::IntoValues<T::Folded, T>;

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains_key(&self, key: &T::Folded) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &T::Folded) -> Option<&T> {
        self.entries.get(key)
    }

    fn insert_if_absent(&mut self, key: T::Folded, element: T) -> bool {
        match self.entries.entry(key) {
            index_map::Entry::Occupied(_) => false,
            index_map::Entry::Vacant(slot) => {
                slot.insert(element);
                true
            }
        }
    }

    fn remove(&mut self, key: &T::Folded) -> Option<T> {
        // shift_remove keeps the insertion order of the remaining entries.
        self.entries.shift_remove(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T::Folded, &T) -> bool,
    {
        self.entries.retain(|key, element| keep(key, &*element));
    }

    fn values(&self) -> Self::Values<'_> {
        self.entries.values()
    }

    fn into_values(self) -> Self::IntoValues {
        self.entries.into_values()
    }
}

// =============================================================================
// SortedStore
// =============================================================================

/// Store that iterates in folded-key order.
///
/// Because keys are folded, the order is the case-insensitive order of
/// the elements: `"bar"` sorts before `"Foo"` regardless of casing.
#[derive(Clone)]
pub struct SortedStore<T: CaseFold> {
    entries: BTreeMap<T::Folded, T>,
}

impl<T: CaseFold> SortedStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Consumes the store, returning the underlying sorted entries.
    pub(crate) fn into_entries(self) -> BTreeMap<T::Folded, T> {
        self.entries
    }

    /// Builds a store directly from already-folded entries.
    pub(crate) fn from_entries(entries: BTreeMap<T::Folded, T>) -> Self {
        Self { entries }
    }
}

impl<T: CaseFold> Default for SortedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CaseFold> CaselessStore<T> for SortedStore<T> {
    type Values<'a>
        = btree_map::Values<'a, T::Folded, T>
    where
        Self: 'a,
        T: 'a;
    type IntoValues = btree_map::IntoValues<T::Folded, T>;

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains_key(&self, key: &T::Folded) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &T::Folded) -> Option<&T> {
        self.entries.get(key)
    }

    fn insert_if_absent(&mut self, key: T::Folded, element: T) -> bool {
        match self.entries.entry(key) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(element);
                true
            }
        }
    }

    fn remove(&mut self, key: &T::Folded) -> Option<T> {
        self.entries.remove(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T::Folded, &T) -> bool,
    {
        self.entries.retain(|key, element| keep(key, &*element));
    }

    fn values(&self) -> Self::Values<'_> {
        self.entries.values()
    }

    fn into_values(self) -> Self::IntoValues {
        self.entries.into_values()
    }
}

// =============================================================================
// Runtime Variant Dispatch
// =============================================================================

/// The store variant a set adapter was constructed with.
///
/// Fixed at construction; every later operation goes through the same
/// variant, so an empty set built from a sorted source still iterates
/// sorted after elements are inserted.
#[derive(Clone)]
pub(crate) enum AnyStore<T: CaseFold> {
    Unordered(UnorderedStore<T>),
    Ordered(OrderedStore<T>),
    Sorted(SortedStore<T>),
}

impl<T: CaseFold> CaselessStore<T> for AnyStore<T> {
    type Values<'a>
        = AnyValues<'a, T>
    where
        Self: 'a,
        T: 'a;
    type IntoValues = AnyIntoValues<T>;

    fn len(&self) -> usize {
        match self {
            Self::Unordered(store) => store.len(),
            Self::Ordered(store) => store.len(),
            Self::Sorted(store) => store.len(),
        }
    }

    fn contains_key(&self, key: &T::Folded) -> bool {
        match self {
            Self::Unordered(store) => store.contains_key(key),
            Self::Ordered(store) => store.contains_key(key),
            Self::Sorted(store) => store.contains_key(key),
        }
    }

    fn get(&self, key: &T::Folded) -> Option<&T> {
        match self {
            Self::Unordered(store) => store.get(key),
            Self::Ordered(store) => store.get(key),
            Self::Sorted(store) => store.get(key),
        }
    }

    fn insert_if_absent(&mut self, key: T::Folded, element: T) -> bool {
        match self {
            Self::Unordered(store) => store.insert_if_absent(key, element),
            Self::Ordered(store) => store.insert_if_absent(key, element),
            Self::Sorted(store) => store.insert_if_absent(key, element),
        }
    }

    fn remove(&mut self, key: &T::Folded) -> Option<T> {
        match self {
            Self::Unordered(store) => store.remove(key),
            Self::Ordered(store) => store.remove(key),
            Self::Sorted(store) => store.remove(key),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Unordered(store) => store.clear(),
            Self::Ordered(store) => store.clear(),
            Self::Sorted(store) => store.clear(),
        }
    }

    fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T::Folded, &T) -> bool,
    {
        match self {
            Self::Unordered(store) => store.retain(keep),
            Self::Ordered(store) => store.retain(keep),
            Self::Sorted(store) => store.retain(keep),
        }
    }

    fn values(&self) -> Self::Values<'_> {
        match self {
            Self::Unordered(store) => AnyValues::Unordered(store.values()),
            Self::Ordered(store) => AnyValues::Ordered(store.values()),
            Self::Sorted(store) => AnyValues::Sorted(store.values()),
        }
    }

    fn into_values(self) -> Self::IntoValues {
        match self {
            Self::Unordered(store) => AnyIntoValues::Unordered(store.into_values()),
            Self::Ordered(store) => AnyIntoValues::Ordered(store.into_values()),
            Self::Sorted(store) => AnyIntoValues::Sorted(store.into_values()),
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowed iterator over the elements of an [`AnyStore`].
pub(crate) enum AnyValues<'a, T: CaseFold> {
    Unordered(hash_map::Values<'a, T::Folded, T>),
    Ordered(index_map::Values<'a, T::Folded, T>),
    Sorted(btree_map::Values<'a, T::Folded, T>),
}

impl<'a, T: CaseFold> Iterator for AnyValues<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        match self {
            Self::Unordered(values) => values.next(),
            Self::Ordered(values) => values.next(),
            Self::Sorted(values) => values.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Unordered(values) => values.size_hint(),
            Self::Ordered(values) => values.size_hint(),
            Self::Sorted(values) => values.size_hint(),
        }
    }
}

impl<T: CaseFold> ExactSizeIterator for AnyValues<'_, T> {
    fn len(&self) -> usize {
        match self {
            Self::Unordered(values) => values.len(),
            Self::Ordered(values) => values.len(),
            Self::Sorted(values) => values.len(),
        }
    }
}

impl<T: CaseFold> std::iter::FusedIterator for AnyValues<'_, T> {}

impl<T: CaseFold> Clone for AnyValues<'_, T> {
    fn clone(&self) -> Self {
        match self {
            Self::Unordered(values) => Self::Unordered(values.clone()),
            Self::Ordered(values) => Self::Ordered(values.clone()),
            Self::Sorted(values) => Self::Sorted(values.clone()),
        }
    }
}

impl<T: CaseFold + fmt::Debug> fmt::Debug for AnyValues<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.clone()).finish()
    }
}

/// Owning iterator over the elements of an [`AnyStore`].
pub(crate) enum AnyIntoValues<T: CaseFold> {
    Unordered(hash_map::IntoValues<T::Folded, T>),
    Ordered(index_map::IntoValues<T::Folded, T>),
    Sorted(btree_map::IntoValues<T::Folded, T>),
}

impl<T: CaseFold> Iterator for AnyIntoValues<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            Self::Unordered(values) => values.next(),
            Self::Ordered(values) => values.next(),
            Self::Sorted(values) => values.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Unordered(values) => values.size_hint(),
            Self::Ordered(values) => values.size_hint(),
            Self::Sorted(values) => values.size_hint(),
        }
    }
}

impl<T: CaseFold> ExactSizeIterator for AnyIntoValues<T> {
    fn len(&self) -> usize {
        match self {
            Self::Unordered(values) => values.len(),
            Self::Ordered(values) => values.len(),
            Self::Sorted(values) => values.len(),
        }
    }
}

impl<T: CaseFold> std::iter::FusedIterator for AnyIntoValues<T> {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn populate<S: CaselessStore<String>>(store: &mut S, elements: &[&str]) {
        for element in elements {
            store.insert_if_absent(element.to_lowercase(), (*element).to_string());
        }
    }

    #[rstest]
    fn test_first_writer_wins_in_every_store() {
        let mut unordered = UnorderedStore::<String>::new();
        let mut ordered = OrderedStore::<String>::new();
        let mut sorted = SortedStore::<String>::new();

        populate(&mut unordered, &["Apple", "APPLE"]);
        populate(&mut ordered, &["Apple", "APPLE"]);
        populate(&mut sorted, &["Apple", "APPLE"]);

        assert_eq!(unordered.len(), 1);
        assert_eq!(ordered.len(), 1);
        assert_eq!(sorted.len(), 1);

        let key = "apple".to_string();
        assert_eq!(unordered.get(&key).map(String::as_str), Some("Apple"));
        assert_eq!(ordered.get(&key).map(String::as_str), Some("Apple"));
        assert_eq!(sorted.get(&key).map(String::as_str), Some("Apple"));
    }

    #[rstest]
    fn test_ordered_store_preserves_insertion_order_across_removal() {
        let mut store = OrderedStore::<String>::new();
        populate(&mut store, &["Charlie", "Alpha", "Bravo"]);

        store.remove(&"alpha".to_string());
        let remaining: Vec<&str> = store.values().map(String::as_str).collect();
        assert_eq!(remaining, ["Charlie", "Bravo"]);
    }

    #[rstest]
    fn test_sorted_store_iterates_in_folded_order() {
        let mut store = SortedStore::<String>::new();
        populate(&mut store, &["Foo", "bar", "BAZ"]);

        let elements: Vec<&str> = store.values().map(String::as_str).collect();
        assert_eq!(elements, ["bar", "BAZ", "Foo"]);
    }

    #[rstest]
    fn test_retain_drops_unmatched_entries() {
        let mut store = UnorderedStore::<String>::new();
        populate(&mut store, &["a", "b", "c"]);

        store.retain(|key, _| key == "a");
        assert_eq!(store.len(), 1);
        assert!(store.contains_key(&"a".to_string()));
    }

    #[rstest]
    fn test_remove_returns_original_casing() {
        let mut store = SortedStore::<String>::new();
        populate(&mut store, &["MiXeD"]);

        let removed = store.remove(&"mixed".to_string());
        assert_eq!(removed.as_deref(), Some("MiXeD"));
        assert!(store.is_empty());
    }
}
