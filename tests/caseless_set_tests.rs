//! Unit tests for CaselessSet.
//!
//! These tests exercise the public API end to end: construction variants,
//! case-insensitive membership, case preservation, read-only behavior,
//! and the equality/hashing contract.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use foldset::{CaseFold, CaselessSet, Error};
use rstest::rstest;

fn strings<const N: usize>(elements: [&str; N]) -> [String; N] {
    elements.map(String::from)
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// Construction Variants
// =============================================================================

#[rstest]
fn test_new_and_default_create_empty_sets() {
    let from_new: CaselessSet<String> = CaselessSet::new();
    let from_default: CaselessSet<String> = CaselessSet::default();

    assert!(from_new.is_empty());
    assert!(from_default.is_empty());
    assert_eq!(from_new, from_default);
}

#[rstest]
fn test_with_capacity_creates_empty_set() {
    let set: CaselessSet<String> = CaselessSet::with_capacity(64);
    assert!(set.is_empty());
}

#[rstest]
#[case(0.75)]
#[case(1.0)]
#[case(4.0)]
fn test_valid_load_factors_are_accepted(#[case] load_factor: f32) {
    let set = CaselessSet::<String>::with_capacity_and_load_factor(16, load_factor);
    assert!(set.is_ok());
}

#[rstest]
#[case(0.0)]
#[case(-0.75)]
#[case(f32::NAN)]
#[case(f32::INFINITY)]
fn test_invalid_load_factors_are_rejected(#[case] load_factor: f32) {
    let set = CaselessSet::<String>::with_capacity_and_load_factor(16, load_factor);
    assert!(matches!(set, Err(Error::InvalidArgument { .. })));
}

#[rstest]
fn test_from_ordered_preserves_insertion_order() {
    let set = CaselessSet::from_ordered(strings(["Delta", "alpha", "Charlie"]));
    let elements: Vec<&str> = set.iter().map(String::as_str).collect();
    assert_eq!(elements, ["Delta", "alpha", "Charlie"]);
}

#[rstest]
fn test_from_sorted_iterates_in_case_insensitive_order() {
    let set = CaselessSet::from_sorted(strings(["Foo", "bar", "BAZ"]));
    let elements: Vec<&str> = set.iter().map(String::as_str).collect();
    assert_eq!(elements, ["bar", "BAZ", "Foo"]);
}

#[rstest]
fn test_from_unordered_keeps_membership_without_order_guarantee() {
    let set = CaselessSet::from_unordered(strings(["one", "Two", "THREE"]));
    assert_eq!(set.len(), 3);
    assert!(set.contains_all(["ONE", "two", "three"]));
}

#[rstest]
fn test_collect_uses_default_variant() {
    let set: CaselessSet<String> = strings(["a", "A", "b"]).into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[rstest]
fn test_empty_source_still_fixes_the_variant() {
    let mut sorted = CaselessSet::from_sorted(Vec::<String>::new());
    let mut ordered = CaselessSet::from_ordered(Vec::<String>::new());

    sorted
        .insert_all(strings(["Zulu", "alpha"]))
        .expect("mutable set");
    ordered
        .insert_all(strings(["Zulu", "alpha"]))
        .expect("mutable set");

    let sorted_elements: Vec<&str> = sorted.iter().map(String::as_str).collect();
    let ordered_elements: Vec<&str> = ordered.iter().map(String::as_str).collect();
    assert_eq!(sorted_elements, ["alpha", "Zulu"]);
    assert_eq!(ordered_elements, ["Zulu", "alpha"]);
}

// =============================================================================
// Membership and Case Preservation
// =============================================================================

#[rstest]
fn test_contains_ignores_query_casing() {
    let mut set = CaselessSet::new();
    set.insert("Apple".to_string()).expect("mutable set");

    assert!(set.contains("APPLE"));
    assert!(set.contains("apple"));
    assert!(set.contains("aPpLe"));
}

#[rstest]
fn test_first_inserted_casing_survives_reinsertion() {
    let mut set = CaselessSet::new();
    assert_eq!(set.insert("Apple".to_string()), Ok(true));
    assert_eq!(set.insert("APPLE".to_string()), Ok(false));

    let elements: Vec<&str> = set.iter().map(String::as_str).collect();
    assert_eq!(elements, ["Apple"]);
}

#[rstest]
fn test_get_returns_the_stored_casing() {
    let set = CaselessSet::from_unordered(strings(["CamelCase"]));
    assert_eq!(set.get("camelcase").map(String::as_str), Some("CamelCase"));
    assert_eq!(set.get("missing"), None);
}

#[rstest]
fn test_to_vec_materializes_iteration_order() {
    let set = CaselessSet::from_sorted(strings(["b", "A", "c"]));
    assert_eq!(set.to_vec(), strings(["A", "b", "c"]));
}

// =============================================================================
// Bulk Mutators
// =============================================================================

#[rstest]
fn test_retain_all_keeps_case_insensitive_matches() {
    let mut set = CaselessSet::from_ordered(strings(["a", "b", "c"]));

    assert_eq!(set.retain_all(["A"]), Ok(true));
    assert_eq!(set.to_vec(), strings(["a"]));
}

#[rstest]
fn test_remove_all_only_counts_actual_removals() {
    let mut set = CaselessSet::from_unordered(strings(["a", "b"]));

    assert_eq!(set.remove_all(["missing", "also-missing"]), Ok(false));
    assert_eq!(set.remove_all(["A", "B"]), Ok(true));
    assert!(set.is_empty());
}

#[rstest]
fn test_insert_all_merges_case_insensitively() {
    let mut set = CaselessSet::from_unordered(strings(["shared"]));

    assert_eq!(set.insert_all(strings(["SHARED", "fresh"])), Ok(true));
    assert_eq!(set.len(), 2);
    assert_eq!(set.get("shared").map(String::as_str), Some("shared"));
}

// =============================================================================
// Read-only Sets
// =============================================================================

#[rstest]
fn test_frozen_set_rejects_mutation_and_keeps_elements() {
    let mut set = CaselessSet::from_read_only(strings(["x", "y"]));

    let rejected = set.insert("z".to_string());
    assert!(matches!(rejected, Err(Error::Unsupported { .. })));

    assert_eq!(set.len(), 2);
    assert!(set.contains_all(["X", "Y"]));
    assert!(!set.contains("z"));
}

#[rstest]
fn test_frozen_set_is_independent_of_its_source() {
    let mut source = vec!["x".to_string(), "y".to_string()];
    let set = CaselessSet::from_read_only(source.iter().cloned());

    source.clear();
    assert_eq!(set.len(), 2);
    assert!(set.contains("x"));
}

#[rstest]
fn test_frozen_flag_is_observable() {
    assert!(CaselessSet::from_read_only(strings(["a"])).is_frozen());
    assert!(!CaselessSet::from_ordered(strings(["a"])).is_frozen());
}

// =============================================================================
// Equality and Hashing
// =============================================================================

#[rstest]
fn test_sets_with_same_members_in_any_casing_are_equal() {
    let first = CaselessSet::from_unordered(strings(["Foo", "bar"]));
    let second = CaselessSet::from_unordered(strings(["FOO", "BAR"]));
    assert_eq!(first, second);
}

#[rstest]
fn test_sets_with_different_sizes_are_not_equal() {
    let first = CaselessSet::from_unordered(strings(["Foo", "bar"]));
    let second = CaselessSet::from_unordered(strings(["Foo"]));
    assert_ne!(first, second);
}

#[rstest]
fn test_hash_codes_match_for_equal_sets_in_either_insertion_order() {
    let forward = CaselessSet::from_unordered(strings(["Foo", "bar"]));
    let reversed = CaselessSet::from_unordered(strings(["BAR", "FOO"]));

    assert_eq!(forward, reversed);
    assert_eq!(hash_of(&forward), hash_of(&reversed));
}

#[rstest]
fn test_equal_sets_can_key_a_hash_map() {
    let mut outer = std::collections::HashMap::new();
    outer.insert(CaselessSet::from_unordered(strings(["Foo", "bar"])), 1);

    let lookup = CaselessSet::from_sorted(strings(["BAR", "FOO"]));
    assert_eq!(outer.get(&lookup), Some(&1));
}

// =============================================================================
// Heterogeneous Elements
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
enum Tag {
    Name(String),
    Id(u64),
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum TagKey {
    Name(String),
    Id(u64),
}

impl CaseFold for Tag {
    type Folded = TagKey;

    fn case_fold(&self) -> TagKey {
        match self {
            Tag::Name(name) => TagKey::Name(name.to_lowercase()),
            Tag::Id(id) => TagKey::Id(*id),
        }
    }
}

#[rstest]
fn test_heterogeneous_set_folds_only_string_variants() {
    let mut set = CaselessSet::new();
    assert_eq!(set.insert(Tag::Name("Alpha".to_string())), Ok(true));
    assert_eq!(set.insert(Tag::Id(7)), Ok(true));

    // String variant collides case-insensitively; first case wins.
    assert_eq!(set.insert(Tag::Name("ALPHA".to_string())), Ok(false));
    assert!(set.contains(&Tag::Name("alpha".to_string())));
    assert_eq!(
        set.get(&Tag::Name("ALPHA".to_string())),
        Some(&Tag::Name("Alpha".to_string()))
    );

    // Numeric variant keeps ordinary equality.
    assert!(set.contains(&Tag::Id(7)));
    assert!(!set.contains(&Tag::Id(8)));
    assert_eq!(set.len(), 2);
}
