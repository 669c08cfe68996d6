//! Case folding for set elements.
//!
//! This module provides [`CaseFold`], the trait that turns an element into
//! the key the backing stores compare, order, and hash by. String-like
//! types fold to their Unicode-lowercased form, so two strings that differ
//! only in letter case produce the same key. Every other type folds to
//! itself and keeps its ordinary equality.
//!
//! # Overview
//!
//! `CaseFold` is what makes a [`CaselessSet`](crate::set::CaselessSet)
//! case-insensitive *only where elements are strings*: the folding rule is
//! chosen per element type, not per container. Folding is simple case
//! normalization (`str::to_lowercase`), not locale-tailored collation.
//!
//! # Heterogeneous elements
//!
//! Sets with mixed string and non-string members are expressed as an enum
//! that implements `CaseFold` itself, folding only its string variants:
//!
//! ```rust
//! use foldset::CaseFold;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Tag {
//!     Name(String),
//!     Id(u64),
//! }
//!
//! #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! enum TagKey {
//!     Name(String),
//!     Id(u64),
//! }
//!
//! impl CaseFold for Tag {
//!     type Folded = TagKey;
//!
//!     fn case_fold(&self) -> TagKey {
//!         match self {
//!             Tag::Name(name) => TagKey::Name(name.to_lowercase()),
//!             Tag::Id(id) => TagKey::Id(*id),
//!         }
//!     }
//! }
//!
//! assert_eq!(
//!     Tag::Name("Alpha".to_string()).case_fold(),
//!     Tag::Name("ALPHA".to_string()).case_fold(),
//! );
//! assert_ne!(Tag::Id(1).case_fold(), Tag::Id(2).case_fold());
//! ```

use std::borrow::Cow;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

// =============================================================================
// CaseFold Trait
// =============================================================================

/// Conversion of an element into its case-folded lookup key.
///
/// The folded key is what the backing stores use for equality, hashing,
/// and (for sorted stores) ordering. Implementations must be pure: the
/// same element always folds to the same key, and two elements that are
/// meant to collide case-insensitively must fold to equal keys.
///
/// # Examples
///
/// ```rust
/// use foldset::CaseFold;
///
/// assert_eq!("Apple".case_fold(), "APPLE".case_fold());
/// assert_eq!(42_u32.case_fold(), 42_u32);
/// ```
pub trait CaseFold {
    /// The folded key type. `Clone + Eq + Ord + Hash` covers every backing
    /// store variant: hashed, insertion-ordered, and sorted.
    type Folded: Clone + Eq + Ord + Hash;

    /// Computes the folded key for this element.
    ///
    /// # Complexity
    ///
    /// O(n) in the element's length for string-like types (allocates the
    /// lowercased form), O(1) for identity-folding types.
    fn case_fold(&self) -> Self::Folded;
}

// =============================================================================
// String-like Implementations
// =============================================================================

impl CaseFold for String {
    type Folded = String;

    fn case_fold(&self) -> String {
        self.to_lowercase()
    }
}

impl CaseFold for str {
    type Folded = String;

    fn case_fold(&self) -> String {
        self.to_lowercase()
    }
}

impl CaseFold for Box<str> {
    type Folded = String;

    fn case_fold(&self) -> String {
        self.to_lowercase()
    }
}

impl CaseFold for Rc<str> {
    type Folded = String;

    fn case_fold(&self) -> String {
        self.to_lowercase()
    }
}

impl CaseFold for Arc<str> {
    type Folded = String;

    fn case_fold(&self) -> String {
        self.to_lowercase()
    }
}

impl CaseFold for Cow<'_, str> {
    type Folded = String;

    fn case_fold(&self) -> String {
        self.to_lowercase()
    }
}

impl CaseFold for char {
    type Folded = String;

    fn case_fold(&self) -> String {
        self.to_lowercase().collect()
    }
}

// =============================================================================
// Identity Implementations
// =============================================================================

/// Implements identity folding for types with no notion of letter case.
macro_rules! impl_identity_case_fold {
    ($($element_type:ty),* $(,)?) => {
        $(
            impl CaseFold for $element_type {
                type Folded = $element_type;

                fn case_fold(&self) -> $element_type {
                    *self
                }
            }
        )*
    };
}

impl_identity_case_fold!(
    bool, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize,
);

// =============================================================================
// Reference Implementation
// =============================================================================

/// References fold exactly like the referent, so borrowed queries (for
/// example `&str` against a set of `String`) produce the same key type.
impl<T: CaseFold + ?Sized> CaseFold for &T {
    type Folded = T::Folded;

    fn case_fold(&self) -> T::Folded {
        (**self).case_fold()
    }
}

// =============================================================================
// Tests
// =============================================================================
