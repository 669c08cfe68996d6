//! Case-insensitive, case-preserving set adapter.
//!
//! This module provides [`CaselessSet`], a set whose membership test and
//! equality ignore letter case for string elements while iteration and
//! read-back return the originally inserted casing.
//!
//! # Overview
//!
//! A `CaselessSet` owns exactly one backing key store, selected by the
//! constructor and fixed for the set's lifetime. Every operation folds
//! the element once ([`CaseFold`]) and delegates to the store, which maps
//! the folded key to the original element.
//!
//! | Constructor | Backing store | Iteration order |
//! |---|---|---|
//! | [`new`] / [`with_capacity`] / [`from_unordered`] | hash table | none |
//! | [`from_ordered`] | index map | insertion order |
//! | [`from_sorted`] | B-tree | case-insensitive element order |
//! | [`from_read_only`] | index map, frozen | insertion order |
//!
//! [`new`]: CaselessSet::new
//! [`with_capacity`]: CaselessSet::with_capacity
//! [`from_unordered`]: CaselessSet::from_unordered
//! [`from_ordered`]: CaselessSet::from_ordered
//! [`from_sorted`]: CaselessSet::from_sorted
//! [`from_read_only`]: CaselessSet::from_read_only
//!
//! # Examples
//!
//! ```rust
//! use foldset::CaselessSet;
//!
//! let mut set = CaselessSet::new();
//! set.insert("Apple".to_string())?;
//!
//! assert!(set.contains("APPLE"));
//! assert!(set.contains("apple"));
//!
//! // The first-inserted casing wins and is what iteration returns.
//! assert_eq!(set.insert("APPLE".to_string())?, false);
//! assert_eq!(set.iter().collect::<Vec<_>>(), ["Apple"]);
//! # Ok::<(), foldset::Error>(())
//! ```
//!
//! # Read-only sets
//!
//! [`from_read_only`] copies the source and permanently freezes the
//! result; every mutator then fails with [`Error::Unsupported`]:
//!
//! ```rust
//! use foldset::{CaselessSet, Error};
//!
//! let frozen = CaselessSet::from_read_only(["x".to_string(), "y".to_string()]);
//! let rejected = frozen.clone().insert("z".to_string());
//! assert!(matches!(rejected, Err(Error::Unsupported { .. })));
//! ```

use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;

use crate::error::{Error, Result};
use crate::fold::CaseFold;
use crate::store::{
    AnyIntoValues, AnyStore, AnyValues, CaselessStore, DefaultHashBuilder,
    OrderedStore, SortedStore, UnorderedStore,
};

// =============================================================================
// CaselessSet Definition
// =============================================================================

/// A set that compares string elements case-insensitively while keeping
/// the originally inserted casing.
///
/// All membership state lives in the backing store; the set itself only
/// carries the store and the read-only flag.
///
/// # Invariant
///
/// For every element `e` in the set, the store maps `e.case_fold()` to
/// `e`, so a lookup by any casing finds the exact original element.
///
/// # Thread safety
///
/// `CaselessSet` is a single-threaded-view container: it is `Send` and
/// `Sync` when `T` is, but offers no interior mutability. The
/// thread-safe sorted variant is
/// [`ConcurrentCaselessSet`](crate::concurrent::ConcurrentCaselessSet).
#[derive(Clone)]
pub struct CaselessSet<T: CaseFold> {
    store: AnyStore<T>,
    frozen: bool,
}

// =============================================================================
// Construction
// =============================================================================

impl<T: CaseFold> CaselessSet<T> {
    /// Creates an empty set with the default (unordered) backing store.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foldset::CaselessSet;
    ///
    /// let set: CaselessSet<String> = CaselessSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: AnyStore::Unordered(UnorderedStore::new()),
            frozen: false,
        }
    }

    /// Creates an empty unordered set sized for at least `capacity`
    /// elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: AnyStore::Unordered(UnorderedStore::with_capacity(capacity)),
            frozen: false,
        }
    }

    /// Creates an empty unordered set sized so that `capacity` elements
    /// fit at the given load factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when the load factor is not a
    /// positive finite number, or when the scaled capacity overflows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foldset::CaselessSet;
    ///
    /// let set = CaselessSet::<String>::with_capacity_and_load_factor(12, 0.75)?;
    /// assert!(set.is_empty());
    ///
    /// assert!(CaselessSet::<String>::with_capacity_and_load_factor(12, -1.0).is_err());
    /// assert!(CaselessSet::<String>::with_capacity_and_load_factor(12, f32::NAN).is_err());
    /// # Ok::<(), foldset::Error>(())
    /// ```
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn with_capacity_and_load_factor(
        capacity: usize,
        load_factor: f32,
    ) -> Result<Self> {
        if !load_factor.is_finite() || load_factor <= 0.0 {
            return Err(Error::invalid_argument(format!(
                "load factor must be a positive finite number, got {load_factor}"
            )));
        }

        let scaled = (capacity as f64 / f64::from(load_factor)).ceil();
        if scaled > isize::MAX as f64 {
            return Err(Error::invalid_argument(format!(
                "capacity {capacity} with load factor {load_factor} overflows"
            )));
        }

        Ok(Self::with_capacity(scaled as usize))
    }

    /// Creates an unordered set from `source`, capacity-hinted from the
    /// source's `size_hint`.
    ///
    /// Duplicate elements under case folding collapse to the first
    /// occurrence.
    pub fn from_unordered<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let iterator = source.into_iter();
        let mut store = UnorderedStore::with_capacity(iterator.size_hint().0);
        for element in iterator {
            let key = element.case_fold();
            store.insert_if_absent(key, element);
        }
        Self {
            store: AnyStore::Unordered(store),
            frozen: false,
        }
    }

    /// Creates an insertion-ordered set from `source`.
    ///
    /// Iteration yields elements in the order they were first inserted,
    /// and later insertions into the set keep extending that order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foldset::CaselessSet;
    ///
    /// let set = CaselessSet::from_ordered(["Bravo", "alpha", "Charlie"].map(String::from));
    /// let elements: Vec<&String> = set.iter().collect();
    /// assert_eq!(elements, ["Bravo", "alpha", "Charlie"]);
    /// ```
    pub fn from_ordered<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let iterator = source.into_iter();
        let mut store = OrderedStore::with_capacity(iterator.size_hint().0);
        for element in iterator {
            let key = element.case_fold();
            store.insert_if_absent(key, element);
        }
        Self {
            store: AnyStore::Ordered(store),
            frozen: false,
        }
    }

    /// Creates a sorted set from `source`.
    ///
    /// Iteration yields elements in case-insensitive (folded-key) order.
    /// The variant survives an empty source: a set built from an empty
    /// sorted source still iterates sorted once elements arrive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foldset::CaselessSet;
    ///
    /// let set = CaselessSet::from_sorted(["Foo", "bar", "BAZ"].map(String::from));
    /// let elements: Vec<&String> = set.iter().collect();
    /// assert_eq!(elements, ["bar", "BAZ", "Foo"]);
    /// ```
    pub fn from_sorted<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut store = SortedStore::new();
        for element in source {
            let key = element.case_fold();
            store.insert_if_absent(key, element);
        }
        Self {
            store: AnyStore::Sorted(store),
            frozen: false,
        }
    }

    /// Creates a permanently read-only set by copying `source`.
    ///
    /// The copy preserves the source's encounter order. Because this is
    /// a copy and not a view, later mutation of the source cannot affect
    /// the set; the set's own mutators fail with [`Error::Unsupported`].
    pub fn from_read_only<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::from_ordered(source);
        set.frozen = true;
        set
    }

    pub(crate) fn from_sorted_store(store: SortedStore<T>) -> Self {
        Self {
            store: AnyStore::Sorted(store),
            frozen: false,
        }
    }

    pub(crate) fn into_store(self) -> AnyStore<T> {
        self.store
    }
}

// =============================================================================
// Queries
// =============================================================================

impl<T: CaseFold> CaselessSet<T> {
    /// Returns the number of elements in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns `true` if the set was constructed from a read-only source
    /// and is therefore permanently immutable.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns `true` if the set contains an element equal to `element`
    /// under case folding.
    ///
    /// The query may be any type folding to the same key, so a set of
    /// `String` accepts `&str` queries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foldset::CaselessSet;
    ///
    /// let set = CaselessSet::from_unordered(["Apple".to_string()]);
    /// assert!(set.contains("APPLE"));
    /// assert!(set.contains("apple"));
    /// assert!(!set.contains("pear"));
    /// ```
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized,
    {
        self.store.contains_key(&element.case_fold())
    }

    /// Returns the stored element matching `element` under case folding,
    /// with its original casing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foldset::CaselessSet;
    ///
    /// let set = CaselessSet::from_unordered(["Apple".to_string()]);
    /// assert_eq!(set.get("APPLE").map(String::as_str), Some("Apple"));
    /// ```
    pub fn get<Q>(&self, element: &Q) -> Option<&T>
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized,
    {
        self.store.get(&element.case_fold())
    }

    /// Returns `true` if every element of `elements` is individually
    /// contained in the set.
    pub fn contains_all<'a, Q, I>(&self, elements: I) -> bool
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        elements.into_iter().all(|element| self.contains(element))
    }

    /// Returns a lazy, restartable iterator over the original-case
    /// elements, in the backing store's order.
    ///
    /// Repeated calls start a fresh iteration. The set cannot be mutated
    /// while an iterator borrows it.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.store.values(),
        }
    }

    /// Materializes the iteration sequence into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

// =============================================================================
// Mutation
// =============================================================================

impl<T: CaseFold> CaselessSet<T> {
    fn ensure_mutable(&self, operation: &'static str) -> Result<()> {
        if self.frozen {
            Err(Error::unsupported(operation))
        } else {
            Ok(())
        }
    }

    /// Adds `element` to the set.
    ///
    /// Returns `Ok(true)` when the element was absent. When an element
    /// equal under case folding is already present, the stored element is
    /// left untouched (first-case-wins) and `Ok(false)` is returned.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] when the set is read-only.
    pub fn insert(&mut self, element: T) -> Result<bool> {
        self.ensure_mutable("insert")?;
        let key = element.case_fold();
        Ok(self.store.insert_if_absent(key, element))
    }

    /// Removes the element matching `element` under case folding.
    ///
    /// Returns whether a removal occurred.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] when the set is read-only.
    pub fn remove<Q>(&mut self, element: &Q) -> Result<bool>
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized,
    {
        self.ensure_mutable("remove")?;
        Ok(self.store.remove(&element.case_fold()).is_some())
    }

    /// Removes and returns the stored element matching `element`, with
    /// its original casing.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] when the set is read-only.
    pub fn take<Q>(&mut self, element: &Q) -> Result<Option<T>>
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized,
    {
        self.ensure_mutable("take")?;
        Ok(self.store.remove(&element.case_fold()))
    }

    /// Adds every element of `elements`, element by element.
    ///
    /// First-writer-wins applies uniformly: a duplicate inside a single
    /// call loses to the earlier occurrence the same way it would lose
    /// to a pre-existing entry. Returns whether the set's size changed,
    /// computed from an actual before/after comparison.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] when the set is read-only.
    pub fn insert_all<I>(&mut self, elements: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        self.ensure_mutable("insert_all")?;
        let size_before = self.store.len();
        for element in elements {
            let key = element.case_fold();
            self.store.insert_if_absent(key, element);
        }
        Ok(self.store.len() != size_before)
    }

    /// Removes every element of `elements` that is present.
    ///
    /// Returns whether the set's size changed.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] when the set is read-only.
    pub fn remove_all<'a, Q, I>(&mut self, elements: I) -> Result<bool>
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        self.ensure_mutable("remove_all")?;
        let size_before = self.store.len();
        for element in elements {
            self.store.remove(&element.case_fold());
        }
        Ok(self.store.len() != size_before)
    }

    /// Keeps only the elements matching some member of `elements` under
    /// case folding.
    ///
    /// Builds a transient folded-key probe from `elements`, then drops
    /// every stored element whose key is not in the probe. Returns
    /// whether the set's size changed.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] when the set is read-only.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foldset::CaselessSet;
    ///
    /// let mut set = CaselessSet::from_ordered(["a", "b", "c"].map(String::from));
    /// assert_eq!(set.retain_all(["A"])?, true);
    /// assert_eq!(set.iter().collect::<Vec<_>>(), ["a"]);
    /// # Ok::<(), foldset::Error>(())
    /// ```
    pub fn retain_all<'a, Q, I>(&mut self, elements: I) -> Result<bool>
    where
        Q: CaseFold<Folded = T::Folded> + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        self.ensure_mutable("retain_all")?;
        let probe: HashSet<T::Folded, DefaultHashBuilder> = elements
            .into_iter()
            .map(CaseFold::case_fold)
            .collect();

        let size_before = self.store.len();
        self.store.retain(|key, _| probe.contains(key));
        Ok(self.store.len() != size_before)
    }

    /// Removes all elements.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] when the set is read-only.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_mutable("clear")?;
        self.store.clear();
        Ok(())
    }
}

// =============================================================================
// Equality, Hashing, Formatting
// =============================================================================

impl<T: CaseFold> PartialEq for CaselessSet<T> {
    /// Two sets are equal iff they have the same size and every element
    /// of the other set is contained in this one under case folding.
    ///
    /// Equality ignores the backing store variant: a sorted and an
    /// unordered set holding the same members compare equal.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && other
                .iter()
                .all(|element| self.store.contains_key(&element.case_fold()))
    }
}

impl<T: CaseFold> Eq for CaselessSet<T> {}

impl<T: CaseFold> Hash for CaselessSet<T> {
    /// Order-independent hash: the wrapping sum over all elements of a
    /// fixed hash of the folded element. Sets that compare equal under
    /// the case-insensitive rule always hash equal, regardless of
    /// iteration order or original casing.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sum: u64 = 0;
        for element in self.iter() {
            let mut element_hasher = DefaultHasher::new();
            element.case_fold().hash(&mut element_hasher);
            sum = sum.wrapping_add(element_hasher.finish());
        }
        state.write_u64(sum);
    }
}

impl<T: CaseFold + fmt::Debug> fmt::Debug for CaselessSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl<T: CaseFold> Default for CaselessSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CaseFold> FromIterator<T> for CaselessSet<T> {
    /// Collects into the default (unordered) variant.
    fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
        Self::from_unordered(iterator)
    }
}

impl<T: CaseFold, const N: usize> From<[T; N]> for CaselessSet<T> {
    fn from(elements: [T; N]) -> Self {
        Self::from_unordered(elements)
    }
}

impl<T: CaseFold> IntoIterator for CaselessSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Consumes the set, yielding original-case elements in the backing
    /// store's order.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.store.into_values(),
        }
    }
}

impl<'a, T: CaseFold> IntoIterator for &'a CaselessSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowed iterator over a [`CaselessSet`], created by
/// [`CaselessSet::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: CaseFold> {
    inner: AnyValues<'a, T>,
}

impl<'a, T: CaseFold> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: CaseFold> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T: CaseFold> FusedIterator for Iter<'_, T> {}

impl<T: CaseFold> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: CaseFold + fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.clone()).finish()
    }
}

/// Owning iterator over a [`CaselessSet`], created by
/// [`CaselessSet::into_iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoIter<T: CaseFold> {
    inner: AnyIntoValues<T>,
}

impl<T: CaseFold> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: CaseFold> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T: CaseFold> FusedIterator for IntoIter<T> {}

// =============================================================================
// Compile-time Properties
// =============================================================================

static_assertions::assert_impl_all!(CaselessSet<String>: Send, Sync);
static_assertions::assert_impl_all!(CaselessSet<u64>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
