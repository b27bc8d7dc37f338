//! Integration tests: observable behaviour of typed vectors against the
//! mock host, for both array representations.
//!
//! Covers checked/unchecked read agreement, growth from an empty vector,
//! block-fetch counts, tri-state logicals, and the protection lifecycle
//! across growth, failure and panic unwind.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use hostvec_core::{ElementKind, Logical, Registry, Representation};
use hostvec_test_utils::{CountingRegistry, MockHost, MockHostConfig, RegistryEvent};
use hostvec_vector::writable;
use hostvec_vector::{Doubles, Logicals, NamedArg, Runtime, VectorError, WritableVector};
use proptest::prelude::*;

const BOTH: [Representation; 2] = [Representation::Materialized, Representation::Opaque];

fn runtime(repr: Representation) -> (Rc<MockHost>, Rc<CountingRegistry>, Runtime) {
    let host = Rc::new(MockHost::with_config(MockHostConfig::uniform(repr)));
    let registry = Rc::new(CountingRegistry::new());
    let rt = Runtime::new(host.clone(), registry.clone());
    (host, registry, rt)
}

fn representation() -> impl Strategy<Value = Representation> {
    prop_oneof![
        Just(Representation::Materialized),
        Just(Representation::Opaque)
    ]
}

// ── Reads ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn checked_read_matches_unchecked(
        values in prop::collection::vec(-1e6f64..1e6, 0..300),
        repr in representation(),
    ) {
        let (host, _registry, rt) = runtime(repr);
        let v = Doubles::from_handle(&rt, host.real_array(&values, repr)).unwrap();
        prop_assert_eq!(v.representation(), repr);
        for pos in 0..v.len() {
            let unchecked = unsafe { v.get_unchecked(pos) };
            prop_assert_eq!(v.at(pos).unwrap(), unchecked);
            prop_assert_eq!(unchecked, values[pos]);
        }
        let out_of_range = v.at(v.len());
        let is_out_of_range = matches!(out_of_range, Err(VectorError::OutOfRange { .. }));
        prop_assert!(is_out_of_range);
    }

    #[test]
    fn iteration_matches_indexing(
        values in prop::collection::vec(any::<i32>(), 0..400),
        repr in representation(),
    ) {
        let (host, _registry, rt) = runtime(repr);
        let v = hostvec_vector::Integers::from_handle(&rt, host.integer_array(&values, repr))
            .unwrap();
        let iterated: Vec<i32> = v.iter().map(Result::unwrap).collect();
        let indexed: Vec<i32> = (0..v.len()).map(|i| v.at(i).unwrap()).collect();
        prop_assert_eq!(&iterated, &indexed);
        prop_assert_eq!(iterated, values);
    }
}

#[test]
fn empty_vectors_reject_every_position() {
    for repr in BOTH {
        let (host, _registry, rt) = runtime(repr);
        let v = Doubles::from_handle(&rt, host.real_array(&[], repr)).unwrap();
        for pos in [0, 1, usize::MAX] {
            assert_eq!(
                v.at(pos),
                Err(VectorError::OutOfRange {
                    label: "doubles",
                    index: pos,
                    len: 0
                })
            );
        }
        let w = writable::Doubles::new(&rt);
        assert!(w.at(0).is_err());
    }
}

#[test]
fn opaque_block_iteration_fetch_count() {
    let (host, _registry, rt) = runtime(Representation::Opaque);
    let values: Vec<f64> = (0..200).map(f64::from).collect();
    let v = Doubles::from_handle(&rt, host.real_array(&values, Representation::Opaque)).unwrap();

    let indexed: Vec<f64> = (0..200).map(|i| unsafe { v.get_unchecked(i) }).collect();
    host.reset_stats();
    let iterated: Vec<f64> = v.iter().collect::<Result<_, _>>().unwrap();

    assert_eq!(iterated, indexed);
    assert!(host.stats().region_reads <= 4, "{:?}", host.stats());
}

// ── Construction ────────────────────────────────────────────────────

#[test]
fn literal_list() {
    for repr in BOTH {
        let (_host, _registry, rt) = runtime(repr);
        let v = writable::Doubles::from_slice(&rt, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v.at(0).unwrap(), 1.0);
        assert_eq!(v.at(1).unwrap(), 2.0);
        assert_eq!(v.at(2).unwrap(), 3.0);
    }
}

#[test]
fn named_literal_list() {
    for repr in BOTH {
        let (host, _registry, rt) = runtime(repr);
        let v = writable::Doubles::from_named(
            &rt,
            &[NamedArg::new("a", 1.0), NamedArg::new("b", 2.0)],
        )
        .unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v.to_vec().unwrap(), [1.0, 2.0]);
        assert_eq!(v.names().unwrap(), ["a", "b"]);
        let array = v.into_array().unwrap();
        assert_eq!(host.names_of(array).unwrap(), ["a", "b"]);
        let ro = Doubles::from_handle(&rt, array).unwrap();
        assert_eq!(ro.get_named("a"), Some(1.0));
    }
}

// ── Growth ──────────────────────────────────────────────────────────

#[test]
fn thousand_pushes_from_empty() {
    for repr in BOTH {
        let (_host, _registry, rt) = runtime(repr);
        let mut v = writable::Integers::new(&rt);
        for i in 0..1000 {
            v.push(i).unwrap();
            assert_eq!(v.at(v.len() - 1).unwrap(), i);
        }
        assert_eq!(v.len(), 1000);
        assert_eq!(v.capacity(), 1024);
        let all: Vec<i32> = v.iter().map(Result::unwrap).collect();
        assert_eq!(all, (0..1000).collect::<Vec<_>>());
    }
}

proptest! {
    #[test]
    fn reserve_never_changes_existing_elements(
        values in prop::collection::vec(any::<i32>(), 0..100),
        extra in 0usize..200,
        repr in representation(),
    ) {
        let (_host, _registry, rt) = runtime(repr);
        let mut v = writable::Integers::from_slice(&rt, &values).unwrap();
        let target = v.capacity() + extra;
        v.reserve(target).unwrap();
        prop_assert_eq!(v.capacity(), target);
        prop_assert_eq!(v.to_vec().unwrap(), values);
    }
}

#[test]
fn growth_across_representations_keeps_values() {
    let host = Rc::new(MockHost::with_config(MockHostConfig {
        representation: Representation::Opaque,
        resized: Representation::Materialized,
        ..MockHostConfig::default()
    }));
    let rt = Runtime::with_preserve_list(host.clone());
    let mut v = writable::Doubles::with_capacity(&rt, 2).unwrap();
    v.push(1.0).unwrap();
    v.push(2.0).unwrap();
    assert_eq!(v.representation(), Some(Representation::Opaque));
    v.push(3.0).unwrap();
    assert_eq!(v.representation(), Some(Representation::Materialized));
    assert_eq!(v.to_vec().unwrap(), [1.0, 2.0, 3.0]);
}

// ── Logicals ────────────────────────────────────────────────────────

#[test]
fn logicals_round_trip_three_states() {
    let states = [Logical::TRUE, Logical::FALSE, Logical::NA];
    for repr in BOTH {
        let (host, _registry, rt) = runtime(repr);

        let mut w = writable::Logicals::new(&rt);
        for s in states {
            w.push(s).unwrap();
        }
        assert_eq!(w.to_vec().unwrap(), states);
        let array = w.into_array().unwrap();
        assert_eq!(host.logicals(array), states);

        let r = Logicals::from_handle(&rt, array).unwrap();
        let read: Vec<Logical> = r.iter().map(Result::unwrap).collect();
        assert_eq!(read, states);
        assert!(read[2].is_na());
        assert!(!read[2].is_true() && !read[2].is_false());
        assert_eq!(read[2].to_option(), None);
    }
}

// ── Protection lifecycle ────────────────────────────────────────────

#[test]
fn growth_never_leaves_a_gap() {
    for repr in BOTH {
        let (_host, registry, rt) = runtime(repr);
        let mut v = writable::Doubles::new(&rt);
        for i in 0..100 {
            v.push(f64::from(i)).unwrap();
            assert_eq!(registry.live(), 1, "after push {i}");
        }
        let history = registry.live_history();
        assert!(history.iter().all(|&n| n == 1 || n == 2), "{history:?}");
        assert_eq!(registry.protects(), registry.releases() + 1);

        // Every release is of the array that was replaced, right after its
        // successor was protected.
        let events = registry.events();
        for pair in events[1..].chunks(2) {
            assert!(matches!(
                pair,
                [RegistryEvent::Protect(new), RegistryEvent::Release(old)] if new != old
            ));
        }

        drop(v);
        assert_eq!(registry.live(), 0);
    }
}

#[test]
fn dropped_vector_is_collectable() {
    let (host, registry, rt) = runtime(Representation::Materialized);
    let v = writable::Integers::from_slice(&rt, &[1, 2, 3]).unwrap();
    let array = v.array().unwrap();

    assert_eq!(host.collect(&*registry), 0);
    assert!(host.is_live(array));

    drop(v);
    assert!(host.collect(&*registry) >= 1);
    assert!(!host.is_live(array));
}

#[test]
fn replaced_arrays_are_collectable() {
    let (host, registry, rt) = runtime(Representation::Opaque);
    let mut v = writable::Integers::new(&rt);
    for i in 0..10 {
        v.push(i).unwrap();
    }
    host.collect(&*registry);
    assert_eq!(host.array_count(), 1);
    assert_eq!(v.to_vec().unwrap(), (0..10).collect::<Vec<_>>());
}

#[test]
fn read_only_view_outlives_a_relocating_writer() {
    for repr in BOTH {
        let (host, registry, rt) = runtime(repr);
        let mut w = writable::Doubles::from_slice(&rt, &[1.0; 4096]).unwrap();
        let array = w.array().unwrap();
        let ro = Doubles::from_handle(&rt, array).unwrap();

        // Growth moves the writer to a new array and drops its registration
        // on the old one; the read-only view still holds its own.
        w.push(2.0).unwrap();
        assert_ne!(w.array(), Some(array));
        assert_eq!(host.collect(&*registry), 0);
        assert!(host.is_live(array));

        // Reuse any freed memory before reading through the view.
        let filler: Vec<_> = (0..8).map(|_| host.real_array(&[99.0; 4096], repr)).collect();
        assert_eq!(ro.at(0), Ok(1.0));
        assert_eq!(ro.get(4095), Some(1.0));
        assert!(ro.iter().all(|x| x == Ok(1.0)));

        drop(ro);
        assert_eq!(host.collect(&*registry), 1 + filler.len());
        assert!(!host.is_live(array));
        assert_eq!(w.len(), 4097);
    }
}

#[test]
fn failed_growth_keeps_old_state() {
    for repr in BOTH {
        let (host, registry, rt) = runtime(repr);
        let mut v = writable::Doubles::from_slice(&rt, &[1.0, 2.0, 3.0]).unwrap();
        let array = v.array();
        host.configure(|c| c.allocations_before_failure = Some(0));

        let err = v.push(4.0).unwrap_err();
        assert_eq!(
            err,
            VectorError::AllocationFailure {
                kind: ElementKind::Real,
                requested: 6
            }
        );
        assert_eq!(v.array(), array);
        assert_eq!((v.len(), v.capacity()), (3, 3));
        assert_eq!(v.to_vec().unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(registry.live(), 1);
        assert!(registry.is_protected(array.unwrap()));
    }
}

#[test]
fn allocation_failure_on_construction_protects_nothing() {
    let (host, registry, rt) = runtime(Representation::Materialized);
    host.configure(|c| c.max_len = Some(4));
    let err = writable::Integers::with_capacity(&rt, 5).unwrap_err();
    assert!(matches!(err, VectorError::AllocationFailure { requested: 5, .. }));
    assert_eq!(registry.live(), 0);
    assert_eq!(registry.protects(), 0);
}

#[test]
fn panic_during_population_releases_protection() {
    let host = Rc::new(MockHost::with_config(MockHostConfig {
        panic_on_write: Some(2),
        ..MockHostConfig::uniform(Representation::Opaque)
    }));
    let registry = Rc::new(CountingRegistry::new());
    let rt = Runtime::new(host.clone(), registry.clone());

    let result = catch_unwind(AssertUnwindSafe(|| {
        WritableVector::<f64>::from_slice(&rt, &[1.0, 2.0, 3.0, 4.0])
    }));
    assert!(result.is_err());
    assert_eq!(registry.protects(), 1);
    assert_eq!(registry.live(), 0);
    assert_eq!(host.collect(&*registry), 1);
}

#[test]
fn region_failure_surfaces_as_unwind() {
    let (host, registry, rt) = runtime(Representation::Opaque);
    let v = writable::Integers::from_slice(&rt, &[1, 2]).unwrap();
    host.configure(|c| c.fail_regions = true);
    assert!(matches!(
        v.to_vec(),
        Err(VectorError::RuntimeUnwind { .. })
    ));
    assert_eq!(v.at(1).unwrap(), 2);
    assert_eq!(registry.live(), 1);
}
