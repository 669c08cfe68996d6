//! Unit and multithread tests for ConcurrentCaselessSet.

use std::sync::Arc;
use std::thread;

use foldset::{CaselessSet, ConcurrentCaselessSet};
use rstest::rstest;

fn strings<const N: usize>(elements: [&str; N]) -> [String; N] {
    elements.map(String::from)
}

// =============================================================================
// Single-threaded Contract
// =============================================================================

#[rstest]
fn test_case_insensitive_membership_with_case_preservation() {
    let set = ConcurrentCaselessSet::new();
    assert!(set.insert("Apple".to_string()));
    assert!(!set.insert("APPLE".to_string()));

    assert!(set.contains("apple"));
    assert_eq!(set.get("APPLE"), Some("Apple".to_string()));
    assert_eq!(set.to_vec(), strings(["Apple"]));
}

#[rstest]
fn test_sorted_iteration_order() {
    let set = ConcurrentCaselessSet::from_elements(strings(["Zulu", "alpha", "Mike"]));
    assert_eq!(set.to_vec(), strings(["alpha", "Mike", "Zulu"]));
    assert_eq!(set.first(), Some("alpha".to_string()));
    assert_eq!(set.last(), Some("Zulu".to_string()));
}

#[rstest]
fn test_conversion_to_and_from_the_single_threaded_adapter() {
    let concurrent = ConcurrentCaselessSet::from_elements(strings(["B", "a"]));

    let single: CaselessSet<String> = concurrent.into();
    assert_eq!(single.to_vec(), strings(["a", "B"]));

    let back: ConcurrentCaselessSet<String> = single.into();
    assert_eq!(back.to_vec(), strings(["a", "B"]));
}

// =============================================================================
// Multithread Tests
// =============================================================================

#[rstest]
fn test_shared_reads_across_threads() {
    let set = Arc::new(ConcurrentCaselessSet::from_elements(strings([
        "alpha", "Bravo", "CHARLIE",
    ])));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let set_clone = Arc::clone(&set);
            thread::spawn(move || {
                assert!(set_clone.contains("ALPHA"));
                assert!(set_clone.contains("bravo"));
                assert!(set_clone.contains("Charlie"));
                assert_eq!(set_clone.len(), 3);
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }
}

#[rstest]
fn test_parallel_inserts_all_land() {
    let set = Arc::new(ConcurrentCaselessSet::new());

    let handles: Vec<_> = (0..4)
        .map(|thread_index| {
            let set_clone = Arc::clone(&set);
            thread::spawn(move || {
                for element_index in 0..50 {
                    set_clone.insert(format!("Element-{thread_index}-{element_index}"));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert_eq!(set.len(), 200);
    assert!(set.contains("element-0-0"));
    assert!(set.contains("ELEMENT-3-49"));
}

#[rstest]
fn test_parallel_duplicate_inserts_keep_one_element() {
    let set = Arc::new(ConcurrentCaselessSet::new());

    let handles: Vec<_> = ["Shared", "SHARED", "shared", "sHaReD"]
        .map(String::from)
        .into_iter()
        .map(|casing| {
            let set_clone = Arc::clone(&set);
            thread::spawn(move || set_clone.insert(casing))
        })
        .collect::<Vec<_>>();

    let inserted_count = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread panicked"))
        .filter(|inserted| *inserted)
        .count();

    assert_eq!(inserted_count, 1);
    assert_eq!(set.len(), 1);
    assert!(set.contains("shared"));
}

#[rstest]
fn test_snapshot_iteration_is_internally_consistent() {
    let set = Arc::new(ConcurrentCaselessSet::from_elements(strings([
        "one", "two", "three",
    ])));

    let reader = {
        let set_clone = Arc::clone(&set);
        thread::spawn(move || set_clone.iter().count())
    };
    let writer = {
        let set_clone = Arc::clone(&set);
        thread::spawn(move || {
            set_clone.insert("four".to_string());
        })
    };

    let observed = reader.join().expect("reader panicked");
    writer.join().expect("writer panicked");

    // The snapshot saw either the set before or after the insert, never
    // a torn intermediate state.
    assert!(observed == 3 || observed == 4);
    assert_eq!(set.len(), 4);
}
