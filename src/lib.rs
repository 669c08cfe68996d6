//! # foldset
//!
//! Case-insensitive, case-preserving sets for Rust.
//!
//! ## Overview
//!
//! This library provides set containers whose membership test and
//! equality ignore letter case for string elements, while iteration and
//! read-back return each element exactly as it was first inserted:
//!
//! - [`CaselessSet`]: the single-threaded adapter, with unordered,
//!   insertion-ordered, sorted, and read-only backing-store variants
//!   selected at construction.
//! - [`ConcurrentCaselessSet`]: the thread-safe sorted variant, mutated
//!   through `&self`.
//! - [`CaseFold`]: the folding trait deciding which element types
//!   compare case-insensitively. String-like types fold to lowercase;
//!   everything else keeps ordinary equality, so heterogeneous element
//!   enums get case-insensitive behavior only where elements are
//!   strings.
//!
//! ## Example
//!
//! ```rust
//! use foldset::CaselessSet;
//!
//! let mut set = CaselessSet::new();
//! set.insert("Apple".to_string())?;
//! set.insert("APPLE".to_string())?; // already present, "Apple" wins
//!
//! assert!(set.contains("aPpLe"));
//! assert_eq!(set.len(), 1);
//! assert_eq!(set.iter().collect::<Vec<_>>(), ["Apple"]);
//! # Ok::<(), foldset::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `fxhash`: use `rustc-hash` for the hash-based backing stores
//! - `ahash`: use `ahash` for the hash-based backing stores

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use foldset::prelude::*;
/// ```
pub mod prelude {
    pub use crate::concurrent::ConcurrentCaselessSet;
    pub use crate::error::{Error, Result};
    pub use crate::fold::CaseFold;
    pub use crate::set::CaselessSet;
}

pub mod concurrent;
pub mod error;
pub mod fold;
pub mod set;
pub mod store;

pub use concurrent::ConcurrentCaselessSet;
pub use error::{Error, Result};
pub use fold::CaseFold;
pub use set::CaselessSet;
pub use store::{
    CaselessStore, DefaultHashBuilder, OrderedStore, SortedStore, UnorderedStore,
};
