//! Thread-safe sorted case-insensitive set.
//!
//! This module provides [`ConcurrentCaselessSet`], the concurrent-sorted
//! backing-store variant. It is a sibling type rather than another
//! [`CaselessSet`](crate::set::CaselessSet) constructor because
//! thread-safe mutation happens through `&self`, a different API shape
//! than the single-threaded adapter's `&mut self` mutators.
//!
//! # Overview
//!
//! The backing store is a `BTreeMap` keyed by folded keys behind a
//! [`parking_lot::RwLock`], so individual operations are thread-safe and
//! iteration order is the case-insensitive order of the elements.
//!
//! Iteration and `to_vec` work on a snapshot taken under the read lock:
//! the result is internally consistent, and concurrent mutation during
//! an iteration affects neither the snapshot nor the mutator.
//!
//! # Examples
//!
//! ```rust
//! use foldset::ConcurrentCaselessSet;
//!
//! let set = ConcurrentCaselessSet::new();
//! assert!(set.insert("Banana".to_string()));
//! assert!(set.insert("apple".to_string()));
//! assert!(!set.insert("APPLE".to_string())); // first case wins
//!
//! assert!(set.contains("BANANA"));
//! assert_eq!(set.to_vec(), ["apple".to_string(), "Banana".to_string()]);
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;

use parking_lot::RwLock;

use crate::fold::CaseFold;
use crate::set::CaselessSet;
use crate::store::{AnyStore, CaselessStore, SortedStore};

// =============================================================================
// ConcurrentCaselessSet Definition
// =============================================================================

/// A sorted, case-insensitive, case-preserving set with thread-safe
/// individual operations.
///
/// All operations take `&self`; mutation synchronizes through an
/// internal reader-writer lock. Elements iterate in folded-key
/// (case-insensitive) order.
///
/// # Invariant
///
/// As for the single-threaded adapter: every element `e` is stored under
/// `e.case_fold()`, and re-inserting an equivalent element never
/// replaces the first-inserted casing.
pub struct ConcurrentCaselessSet<T: CaseFold> {
    entries: RwLock<BTreeMap<T::Folded, T>>,
}

impl<T: CaseFold> ConcurrentCaselessSet<T> {
    /// Creates an empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foldset::ConcurrentCaselessSet;
    ///
    /// let set: ConcurrentCaselessSet<String> = ConcurrentCaselessSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Creates a set from `source`.
    ///
    /// Duplicate elements under case folding collapse to the first
    /// occurrence.
    pub fn from_elements<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut entries = BTreeMap::new();
        for element in source {
            let key = element.case_fold();
            entries.entry(key).or_insert(element);
        }
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Returns the number of elements in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns `true` if the set contains an element equal to `element`
    /// under case folding.
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized,
    {
        self.entries.read().contains_key(&element.case_fold())
    }

    /// Returns `true` if every element of `elements` is contained in the
    /// set, checked under a single read lock.
    pub fn contains_all<'a, Q, I>(&self, elements: I) -> bool
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        let guard = self.entries.read();
        elements
            .into_iter()
            .all(|element| guard.contains_key(&element.case_fold()))
    }

    /// Returns a clone of the stored element matching `element`, with
    /// its original casing.
    pub fn get<Q>(&self, element: &Q) -> Option<T>
    where
        T: Clone,
        Q: CaseFold<Folded = T::Folded> + ?Sized,
    {
        self.entries.read().get(&element.case_fold()).cloned()
    }

    /// Adds `element` to the set.
    ///
    /// Returns whether the element was newly inserted; an equivalent
    /// existing element keeps its original casing (first-case-wins).
    pub fn insert(&self, element: T) -> bool {
        let key = element.case_fold();
        match self.entries.write().entry(key) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(element);
                true
            }
        }
    }

    /// Adds every element of `source` under a single write lock.
    ///
    /// Returns whether the set's size changed.
    pub fn insert_all<I>(&self, source: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut guard = self.entries.write();
        let size_before = guard.len();
        for element in source {
            let key = element.case_fold();
            guard.entry(key).or_insert(element);
        }
        guard.len() != size_before
    }

    /// Removes the element matching `element` under case folding.
    ///
    /// Returns whether a removal occurred.
    pub fn remove<Q>(&self, element: &Q) -> bool
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized,
    {
        self.entries.write().remove(&element.case_fold()).is_some()
    }

    /// Removes and returns the stored element matching `element`, with
    /// its original casing.
    pub fn take<Q>(&self, element: &Q) -> Option<T>
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized,
    {
        self.entries.write().remove(&element.case_fold())
    }

    /// Removes every element of `elements` under a single write lock.
    ///
    /// Returns whether the set's size changed.
    pub fn remove_all<'a, Q, I>(&self, elements: I) -> bool
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        let mut guard = self.entries.write();
        let size_before = guard.len();
        for element in elements {
            guard.remove(&element.case_fold());
        }
        guard.len() != size_before
    }

    /// Keeps only the elements matching some member of `elements` under
    /// case folding.
    ///
    /// Returns whether the set's size changed.
    pub fn retain_all<'a, Q, I>(&self, elements: I) -> bool
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        let probe: std::collections::BTreeSet<T::Folded> = elements
            .into_iter()
            .map(CaseFold::case_fold)
            .collect();

        let mut guard = self.entries.write();
        let size_before = guard.len();
        guard.retain(|key, _| probe.contains(key));
        guard.len() != size_before
    }

    /// Removes all elements.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns a clone of the first element in case-insensitive order.
    pub fn first(&self) -> Option<T>
    where
        T: Clone,
    {
        self.entries
            .read()
            .first_key_value()
            .map(|(_, element)| element.clone())
    }

    /// Returns a clone of the last element in case-insensitive order.
    pub fn last(&self) -> Option<T>
    where
        T: Clone,
    {
        self.entries
            .read()
            .last_key_value()
            .map(|(_, element)| element.clone())
    }

    /// Materializes a consistent snapshot of the elements, in
    /// case-insensitive order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.entries.read().values().cloned().collect()
    }

    /// Iterates a consistent snapshot of the elements, in
    /// case-insensitive order.
    ///
    /// The snapshot is taken under the read lock when the iterator is
    /// created; concurrent mutation after that point is not observed.
    pub fn iter(&self) -> Iter<T>
    where
        T: Clone,
    {
        Iter {
            inner: self.to_vec().into_iter(),
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T: CaseFold> Default for ConcurrentCaselessSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CaseFold + Clone> Clone for ConcurrentCaselessSet<T> {
    fn clone(&self) -> Self {
        Self {
            entries: RwLock::new(self.entries.read().clone()),
        }
    }
}

impl<T: CaseFold> FromIterator<T> for ConcurrentCaselessSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
        Self::from_elements(iterator)
    }
}

impl<T: CaseFold> PartialEq for ConcurrentCaselessSet<T> {
    /// Same contract as the single-threaded adapter: equal sizes and
    /// case-insensitive mutual containment.
    ///
    /// The other set's keys are snapshotted first so the two locks are
    /// never held at the same time.
    fn eq(&self, other: &Self) -> bool {
        let other_keys: Vec<T::Folded> =
            other.entries.read().keys().cloned().collect();
        let guard = self.entries.read();
        guard.len() == other_keys.len()
            && other_keys.iter().all(|key| guard.contains_key(key))
    }
}

impl<T: CaseFold> Eq for ConcurrentCaselessSet<T> {}

impl<T: CaseFold> Hash for ConcurrentCaselessSet<T> {
    /// Order-independent sum of fixed per-key hashes; consistent with the
    /// single-threaded adapter's hashing rule.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sum: u64 = 0;
        for key in self.entries.read().keys() {
            let mut key_hasher = DefaultHasher::new();
            key.hash(&mut key_hasher);
            sum = sum.wrapping_add(key_hasher.finish());
        }
        state.write_u64(sum);
    }
}

impl<T: CaseFold + fmt::Debug> fmt::Debug for ConcurrentCaselessSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_set()
            .entries(self.entries.read().values())
            .finish()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl<T: CaseFold> From<ConcurrentCaselessSet<T>> for CaselessSet<T> {
    /// Unwraps into the single-threaded sorted variant, reusing the
    /// already-folded keys.
    fn from(set: ConcurrentCaselessSet<T>) -> Self {
        let entries = set.entries.into_inner();
        Self::from_sorted_store(SortedStore::from_entries(entries))
    }
}

impl<T: CaseFold> From<CaselessSet<T>> for ConcurrentCaselessSet<T> {
    /// Wraps a single-threaded set. A sorted source hands its entries
    /// over directly; other variants re-fold while draining.
    fn from(set: CaselessSet<T>) -> Self {
        let entries = match set.into_store() {
            AnyStore::Sorted(store) => store.into_entries(),
            other => other
                .into_values()
                .map(|element| (element.case_fold(), element))
                .collect(),
        };
        Self {
            entries: RwLock::new(entries),
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Snapshot iterator over a [`ConcurrentCaselessSet`], created by
/// [`ConcurrentCaselessSet::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub struct Iter<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> Iterator for Iter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<T> {}

impl<T: fmt::Debug> fmt::Debug for Iter<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_list()
            .entries(self.inner.as_slice())
            .finish()
    }
}

// =============================================================================
// Compile-time Properties
// =============================================================================

static_assertions::assert_impl_all!(ConcurrentCaselessSet<String>: Send, Sync);
static_assertions::assert_impl_all!(ConcurrentCaselessSet<u64>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
