//! Property-Based Tests for stackyard
//!
//! Uses proptest for testing engine invariants under arbitrary operation
//! sequences:
//! - Disjointness: every container is in exactly one of {inbound queue, one
//!   slot stack}
//! - Capacity: no stack ever exceeds the configured capacity
//! - Auto-place bound: placements = min(requested, queued, free capacity)
//! - Move atomicity and acknowledge idempotence

use proptest::prelude::*;

use stackyard::container::{ContainerId, IngestRecord};
use stackyard::engine::YardEngine;
use stackyard::grid::{GridConfig, SlotId};
use stackyard::signature;
use stackyard::types::ContainerStatus;

/// Tiny grid so random operation sequences actually hit saturation.
fn tiny_grid() -> GridConfig {
    GridConfig {
        zones: 2,
        rows_per_zone: 1,
        cols_per_zone: 2,
        slot_capacity: 2,
    }
}

/// One random engine operation.
#[derive(Debug, Clone)]
enum Op {
    Ingest(usize),
    AutoPlace(usize),
    /// Move the n-th known container to the n-th topology slot.
    Move(usize, usize),
    Reorder(usize, usize, usize),
    Evict(usize, usize),
    Acknowledge,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1usize..3).prop_map(Op::Ingest),
        (0usize..6).prop_map(Op::AutoPlace),
        (0usize..8, 0usize..4).prop_map(|(c, s)| Op::Move(c, s)),
        (0usize..4, 0usize..3, 0usize..3).prop_map(|(s, f, t)| Op::Reorder(s, f, t)),
        (0usize..4, 0usize..8).prop_map(|(s, c)| Op::Evict(s, c)),
        Just(Op::Acknowledge),
    ]
}

/// Apply an op, ignoring recoverable errors — the invariants must hold
/// whether or not individual operations succeed.
fn apply(engine: &mut YardEngine, op: &Op, known: &mut Vec<ContainerId>, slots: &[SlotId]) {
    match op {
        Op::Ingest(n) => {
            let ids = engine.ingest(vec![IngestRecord::default(); *n]);
            known.extend(ids);
        }
        Op::AutoPlace(n) => {
            engine.auto_place(*n);
        }
        Op::Move(c, s) => {
            if let (Some(id), Some(slot)) = (known.get(*c), slots.get(*s)) {
                let _ = engine.move_container(id, slot);
            }
        }
        Op::Reorder(s, f, t) => {
            if let Some(slot) = slots.get(*s) {
                let _ = engine.reorder(slot, *f, *t);
            }
        }
        Op::Evict(s, c) => {
            if let (Some(slot), Some(id)) = (slots.get(*s), known.get(*c)) {
                let _ = engine.evict(slot, id);
            }
        }
        Op::Acknowledge => engine.acknowledge(),
    }
}

/// Check the core structural invariants of the engine state.
fn assert_invariants(engine: &YardEngine) {
    let capacity = engine.grid().slot_capacity;

    // Capacity: no stack exceeds the limit.
    for (slot_id, slot) in engine.layout().iter() {
        assert!(
            slot.len() <= capacity,
            "slot {slot_id} over capacity: {}",
            slot.len()
        );
    }

    // Disjointness: each container is in exactly one location, and its
    // status/slot reference agree with where it actually is.
    for container in engine.containers() {
        let in_queue = engine.inbound().filter(|id| **id == container.id).count();
        let in_stacks = engine
            .layout()
            .iter()
            .map(|(_, slot)| slot.iter().filter(|id| **id == container.id).count())
            .sum::<usize>();
        assert_eq!(
            in_queue + in_stacks,
            1,
            "container {} in {} locations",
            container.id,
            in_queue + in_stacks
        );

        match container.status {
            ContainerStatus::Inbound => {
                assert_eq!(in_queue, 1);
                assert!(container.slot.is_none());
            }
            ContainerStatus::InYard => {
                assert_eq!(in_stacks, 1);
                let slot_ref = container.slot.as_ref().expect("InYard without slot ref");
                assert!(
                    engine
                        .layout()
                        .get(slot_ref)
                        .is_some_and(|s| s.contains(&container.id)),
                    "slot reference does not contain container"
                );
            }
        }
    }
}

proptest! {
    /// Disjointness and capacity hold after every arbitrary operation.
    #[test]
    fn engine_invariants_hold_under_arbitrary_ops(
        ops in prop::collection::vec(op_strategy(), 1..40),
        seed in any::<u64>(),
    ) {
        let grid = tiny_grid();
        let mut engine = YardEngine::new(grid).with_rng_seed(seed);
        let slots = grid.enumerate_slots();
        let mut known = Vec::new();

        for op in &ops {
            apply(&mut engine, op, &mut known, &slots);
            assert_invariants(&engine);
        }
    }

    /// auto_place(n) places exactly min(n, queued, free capacity).
    #[test]
    fn auto_place_bound(
        queued in 0usize..12,
        requested in 0usize..12,
        seed in any::<u64>(),
    ) {
        let grid = tiny_grid();
        let mut engine = YardEngine::new(grid).with_rng_seed(seed);
        engine.ingest(vec![IngestRecord::default(); queued]);

        let free = grid.total_capacity();
        let placed = engine.auto_place(requested);

        prop_assert_eq!(placed, requested.min(queued).min(free));
        prop_assert_eq!(engine.inbound_count(), queued - placed);
        prop_assert_eq!(engine.in_yard_count(), placed);
    }

    /// A move into a full slot leaves every collection untouched.
    #[test]
    fn failed_move_is_a_noop(seed in any::<u64>()) {
        let grid = tiny_grid();
        let mut engine = YardEngine::new(grid).with_rng_seed(seed);
        let ids = engine.ingest(vec![IngestRecord::default(); 3]);
        engine.auto_place(2);

        let layout_before = engine.layout().clone();
        let inbound_before: Vec<ContainerId> = engine.inbound().cloned().collect();

        let full = SlotId::new('A', 1, 1);
        prop_assert!(engine.move_container(&ids[2], &full).is_err());
        prop_assert_eq!(engine.layout(), &layout_before);
        let inbound_after: Vec<ContainerId> = engine.inbound().cloned().collect();
        prop_assert_eq!(inbound_after, inbound_before);
    }

    /// Reordering a 2+ stack changes the signature but not the id multiset.
    #[test]
    fn reorder_changes_signature_not_contents(seed in any::<u64>()) {
        let grid = tiny_grid();
        let mut engine = YardEngine::new(grid).with_rng_seed(seed);
        engine.ingest(vec![IngestRecord::default(); 2]);
        engine.auto_place(2);
        engine.acknowledge();

        let a1 = SlotId::new('A', 1, 1);
        let before = signature(engine.layout().get(&a1).unwrap());
        let mut ids_before: Vec<ContainerId> =
            engine.layout().get(&a1).unwrap().iter().cloned().collect();
        ids_before.sort();

        engine.reorder(&a1, 0, 1).unwrap();

        let after = signature(engine.layout().get(&a1).unwrap());
        let mut ids_after: Vec<ContainerId> =
            engine.layout().get(&a1).unwrap().iter().cloned().collect();
        ids_after.sort();

        prop_assert_ne!(before, after);
        prop_assert_eq!(ids_before, ids_after);
        prop_assert!(engine.changed_slots().contains(&a1));
    }

    /// Back-to-back acknowledges both leave no changed slots.
    #[test]
    fn acknowledge_is_idempotent(
        queued in 0usize..6,
        placed in 0usize..6,
        seed in any::<u64>(),
    ) {
        let grid = tiny_grid();
        let mut engine = YardEngine::new(grid).with_rng_seed(seed);
        engine.ingest(vec![IngestRecord::default(); queued]);
        engine.auto_place(placed);

        engine.acknowledge();
        prop_assert!(engine.changed_slots().is_empty());
        engine.acknowledge();
        prop_assert!(engine.changed_slots().is_empty());
    }
}
