//! Placement engine: the single mutation surface over the yard state.
//!
//! The engine exclusively owns four collections — container store, inbound
//! queue, slot layout, and acknowledged baseline — and mutates the first three
//! only through the operations here. Every mutator follows the same
//! discipline: build the next state on a private working copy, validate, then
//! swap it in as one assignment. A failed operation is observably
//! indistinguishable from a no-op.
//!
//! # Operation surface
//!
//! | Operation        | Effect |
//! |------------------|--------|
//! | `ingest`         | New containers -> front of inbound queue |
//! | `auto_place`     | Oldest inbound -> first-fit slots, bounded |
//! | `move_container` | Relocate one container, check-then-commit |
//! | `reorder`        | Shift a container within one stack |
//! | `evict`          | Slot -> front of inbound queue |
//! | `acknowledge`    | Reset the change-detection baseline |
//!
//! After each commit the four collections are written best-effort to the
//! attached `StateStore`; a persistence failure never rolls back memory.

pub mod layout;
pub mod signature;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, VecDeque};
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::container::{Container, ContainerId, ContainerStore, IngestRecord};
use crate::error::{Result, YardError};
use crate::grid::{GridConfig, SlotId};
use crate::persist::{
    load_entry, StateStore, KEY_BASELINE, KEY_CONTAINERS, KEY_INBOUND, KEY_LAYOUT,
};

use layout::Layout;
use signature::Baseline;

const ID_PREFIX: &str = "CNT-";
const ID_SUFFIX_LEN: usize = 6;
const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// The three collections that mutate together under one commit.
///
/// Cloning is cheap at yard scale (a few hundred records), which is what makes
/// the working-copy commit discipline practical.
#[derive(Debug, Clone, Default, PartialEq)]
struct YardState {
    containers: ContainerStore,
    inbound: VecDeque<ContainerId>,
    layout: Layout,
}

/// The yard engine: single-writer, synchronous, in-memory.
pub struct YardEngine {
    grid: GridConfig,
    /// Canonical first-fit scan order, fixed at construction.
    scan_order: Vec<SlotId>,
    state: YardState,
    baseline: Baseline,
    store: Option<Box<dyn StateStore>>,
    rng: StdRng,
}

impl YardEngine {
    /// Fresh engine: empty collections, baseline acknowledging the empty yard.
    pub fn new(grid: GridConfig) -> Self {
        let layout = Layout::new(&grid);
        let baseline = signature::snapshot(&layout);
        Self {
            scan_order: grid.enumerate_slots(),
            state: YardState {
                containers: ContainerStore::new(),
                inbound: VecDeque::new(),
                layout,
            },
            baseline,
            grid,
            store: None,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Engine restored from a persistence store.
    ///
    /// Each entry defaults to empty when absent or malformed, and the layout
    /// is repaired so every topology slot is present.
    pub fn load(grid: GridConfig, store: Box<dyn StateStore>) -> Self {
        let containers: ContainerStore = load_entry(store.as_ref(), KEY_CONTAINERS);
        let inbound: VecDeque<ContainerId> = load_entry(store.as_ref(), KEY_INBOUND);
        let mut layout: Layout = load_entry(store.as_ref(), KEY_LAYOUT);
        let baseline: Baseline = load_entry(store.as_ref(), KEY_BASELINE);

        let repaired = layout.repair(&grid);
        if repaired > 0 {
            debug!(repaired, "layout repaired to match grid topology");
        }

        Self {
            scan_order: grid.enumerate_slots(),
            state: YardState {
                containers,
                inbound,
                layout,
            },
            baseline,
            grid,
            store: Some(store),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Attach a persistence store to an existing engine.
    pub fn with_store(mut self, store: Box<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Deterministic id generation for tests.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ========================================================================
    // Intake
    // ========================================================================

    /// Register new containers from the inbound feed.
    ///
    /// Each record gets a collision-checked unique id, `Inbound` status, and a
    /// position at the *front* of the inbound queue (most recently arrived =
    /// queue head). The layout is never touched. Returns the assigned ids in
    /// input order.
    pub fn ingest(&mut self, records: Vec<IngestRecord>) -> Vec<ContainerId> {
        if records.is_empty() {
            return Vec::new();
        }
        let now = SystemTime::now();
        let mut next = self.state.clone();
        let mut assigned = Vec::with_capacity(records.len());

        for record in records {
            let id = Self::generate_id(&mut self.rng, &next.containers);
            next.containers
                .insert(Container::new(id.clone(), record, now));
            next.inbound.push_front(id.clone());
            assigned.push(id);
        }

        info!(count = assigned.len(), "ingested containers");
        self.commit(next);
        assigned
    }

    /// Generate an id not present in the store, retrying on collision. The id
    /// space (36^6) dwarfs any real yard, so the loop terminates immediately
    /// in practice.
    fn generate_id(rng: &mut StdRng, containers: &ContainerStore) -> ContainerId {
        loop {
            let mut id = String::with_capacity(ID_PREFIX.len() + ID_SUFFIX_LEN);
            id.push_str(ID_PREFIX);
            for _ in 0..ID_SUFFIX_LEN {
                let idx = rng.random_range(0..ID_CHARSET.len());
                id.push(ID_CHARSET[idx] as char);
            }
            let candidate = ContainerId::from_raw(id);
            if !containers.contains(&candidate) {
                return candidate;
            }
        }
    }

    // ========================================================================
    // Placement
    // ========================================================================

    /// First slot in canonical scan order with spare capacity, or `None` when
    /// the grid is saturated.
    pub fn first_available_slot(&self) -> Option<&SlotId> {
        Self::first_fit(&self.scan_order, &self.state.layout, self.grid.slot_capacity)
    }

    fn first_fit<'a>(
        scan_order: &'a [SlotId],
        layout: &Layout,
        capacity: usize,
    ) -> Option<&'a SlotId> {
        scan_order
            .iter()
            .find(|slot_id| layout.get(slot_id).is_some_and(|s| s.len() < capacity))
    }

    /// Place up to `max_count` queued containers into first-fit slots,
    /// oldest arrival first. Stops when the bound is reached, the queue
    /// empties, or the grid saturates — whichever comes first. Partial
    /// completion is a normal outcome; returns the number actually placed.
    pub fn auto_place(&mut self, max_count: usize) -> usize {
        let now = SystemTime::now();
        let mut next = self.state.clone();
        let mut placed = 0;

        while placed < max_count {
            let Some(slot_id) =
                Self::first_fit(&self.scan_order, &next.layout, self.grid.slot_capacity).cloned()
            else {
                break;
            };
            // Oldest-arrived container sits at the queue tail.
            let Some(container_id) = next.inbound.pop_back() else {
                break;
            };

            if let Some(slot) = next.layout.get_mut(&slot_id) {
                slot.push_top(container_id.clone());
            }
            if let Some(container) = next.containers.get_mut(&container_id) {
                container.place_into(slot_id.clone(), now);
            }
            debug!(container = %container_id, slot = %slot_id, "auto-placed");
            placed += 1;
        }

        if placed > 0 {
            info!(placed, "auto-placement committed");
            self.commit(next);
        }
        placed
    }

    /// Move one container to a named slot, from the inbound queue or from
    /// whichever stack currently holds it.
    ///
    /// The would-be result is computed on a working copy first: the container
    /// is removed from its current location, then the target's capacity is
    /// checked. On `SlotFull` the copy is discarded and the live collections
    /// are byte-for-byte unchanged.
    pub fn move_container(&mut self, container_id: &ContainerId, target: &SlotId) -> Result<()> {
        if !self.state.containers.contains(container_id) {
            return Err(YardError::unknown_container(container_id.as_str()));
        }
        if !self.state.layout.contains(target) {
            return Err(YardError::unknown_slot(target.as_str()));
        }

        let now = SystemTime::now();
        let mut next = self.state.clone();

        // Remove from current location: queue, or the one stack holding it.
        let in_queue = next.inbound.iter().any(|id| id == container_id);
        if in_queue {
            next.inbound.retain(|id| id != container_id);
        } else {
            next.layout.remove_container(container_id);
        }

        // Capacity check happens on the post-removal state, so moving a
        // container to the slot it already occupies re-stacks it on top.
        let occupied = next.layout.get(target).map_or(0, |s| s.len());
        if occupied >= self.grid.slot_capacity {
            return Err(YardError::slot_full(
                target.as_str(),
                self.grid.slot_capacity,
            ));
        }

        if let Some(slot) = next.layout.get_mut(target) {
            slot.push_top(container_id.clone());
        }
        if let Some(container) = next.containers.get_mut(container_id) {
            container.place_into(target.clone(), now);
        }

        info!(container = %container_id, slot = %target, "moved container");
        self.commit(next);
        Ok(())
    }

    /// Shift a container within one slot's stack from `from` to `to`.
    ///
    /// Both indices must lie in `[0, stack len)`; out-of-range indices are an
    /// `InvalidIndex` error rather than a silent no-op, so caller bugs
    /// surface. The slot's signature changes even though its contents do not.
    pub fn reorder(&mut self, slot_id: &SlotId, from: usize, to: usize) -> Result<()> {
        let Some(slot) = self.state.layout.get(slot_id) else {
            return Err(YardError::unknown_slot(slot_id.as_str()));
        };
        let len = slot.len();
        if from >= len || to >= len {
            return Err(YardError::InvalidIndex {
                slot: slot_id.as_str().to_string(),
                from,
                to,
                len,
            });
        }
        if from == to {
            return Ok(());
        }

        let mut next = self.state.clone();
        if let Some(slot) = next.layout.get_mut(slot_id) {
            slot.shift(from, to);
        }

        debug!(slot = %slot_id, from, to, "reordered stack");
        self.commit(next);
        Ok(())
    }

    /// Pull a container out of a slot and back to the front of the inbound
    /// queue, as if newly arrived. Models a gate-out / rework event.
    pub fn evict(&mut self, slot_id: &SlotId, container_id: &ContainerId) -> Result<()> {
        let Some(slot) = self.state.layout.get(slot_id) else {
            return Err(YardError::unknown_slot(slot_id.as_str()));
        };
        if !slot.contains(container_id) {
            return Err(YardError::unknown_container(container_id.as_str()));
        }

        let now = SystemTime::now();
        let mut next = self.state.clone();

        if let Some(slot) = next.layout.get_mut(slot_id) {
            slot.remove(container_id);
        }
        next.inbound.push_front(container_id.clone());
        if let Some(container) = next.containers.get_mut(container_id) {
            container.return_to_inbound(now);
        }

        info!(container = %container_id, slot = %slot_id, "evicted to inbound");
        self.commit(next);
        Ok(())
    }

    // ========================================================================
    // Change detection
    // ========================================================================

    /// Slots whose arrangement diverges from the acknowledged baseline.
    /// Derived fresh from current state on every call; never persisted itself.
    pub fn changed_slots(&self) -> BTreeSet<SlotId> {
        signature::changed_slots(&self.state.layout, &self.baseline)
    }

    /// Replace the baseline with the signature of every slot in the current
    /// layout. Afterwards `changed_slots()` is empty until the next mutation.
    pub fn acknowledge(&mut self) {
        self.baseline = signature::snapshot(&self.state.layout);
        info!("baseline acknowledged");
        self.persist();
    }

    // ========================================================================
    // Read projections
    // ========================================================================

    /// Grid dimensions this engine was built with.
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Read-only view of the layout.
    pub fn layout(&self) -> &Layout {
        &self.state.layout
    }

    /// Enumerable read access to container records.
    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.state.containers.iter()
    }

    /// One container record by id.
    pub fn container(&self, id: &ContainerId) -> Option<&Container> {
        self.state.containers.get(id)
    }

    /// Inbound queue contents, head (most recent arrival) first.
    pub fn inbound(&self) -> impl Iterator<Item = &ContainerId> {
        self.state.inbound.iter()
    }

    pub fn inbound_count(&self) -> usize {
        self.state.inbound.len()
    }

    pub fn in_yard_count(&self) -> usize {
        self.state.layout.occupancy()
    }

    /// Utilization percent = round(in_yard / (slots * capacity) * 100).
    pub fn utilization_percent(&self) -> u32 {
        let total = self.grid.total_capacity();
        if total == 0 {
            return 0;
        }
        ((self.in_yard_count() as f64 / total as f64) * 100.0).round() as u32
    }

    /// Remaining capacity per zone, in zone-label order.
    pub fn zone_remaining(&self) -> Vec<(String, usize)> {
        self.state.layout.zone_remaining(&self.grid)
    }

    // ========================================================================
    // Commit & persistence
    // ========================================================================

    /// Swap the validated working copy in as the live state, then persist.
    fn commit(&mut self, next: YardState) {
        self.state = next;
        self.persist();
    }

    /// Write the four collections to the attached store, best-effort. A
    /// failure is logged and the in-memory commit stands; callers needing
    /// durability add their own retry layer outside the engine.
    fn persist(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let result = Self::write_entries(
            store.as_mut(),
            &self.state.containers,
            &self.state.inbound,
            &self.state.layout,
            &self.baseline,
        );
        if let Err(err) = result {
            warn!(%err, "failed to persist yard state");
        }
    }

    fn write_entries(
        store: &mut dyn StateStore,
        containers: &ContainerStore,
        inbound: &VecDeque<ContainerId>,
        layout: &Layout,
        baseline: &Baseline,
    ) -> Result<()> {
        store.put(KEY_CONTAINERS, &serde_json::to_string_pretty(containers)?)?;
        store.put(KEY_INBOUND, &serde_json::to_string_pretty(inbound)?)?;
        store.put(KEY_LAYOUT, &serde_json::to_string_pretty(layout)?)?;
        store.put(KEY_BASELINE, &serde_json::to_string_pretty(baseline)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> YardEngine {
        YardEngine::new(GridConfig {
            zones: 1,
            rows_per_zone: 1,
            cols_per_zone: 2,
            slot_capacity: 2,
        })
        .with_rng_seed(42)
    }

    fn records(n: usize) -> Vec<IngestRecord> {
        (0..n).map(|_| IngestRecord::default()).collect()
    }

    #[test]
    fn test_ingest_assigns_unique_ids_and_queues_front() {
        let mut engine = engine();
        let ids = engine.ingest(records(3));
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.as_str().starts_with("CNT-")));

        // Queue head is the most recent arrival.
        let queued: Vec<&ContainerId> = engine.inbound().collect();
        assert_eq!(queued[0], &ids[2]);
        assert_eq!(queued[2], &ids[0]);
    }

    #[test]
    fn test_first_available_slot_scans_canonical_order() {
        let mut engine = engine();
        let a1 = SlotId::new('A', 1, 1);
        let a2 = SlotId::new('A', 1, 2);
        assert_eq!(engine.first_available_slot(), Some(&a1));

        engine.ingest(records(2));
        engine.auto_place(2);
        // A-R01-C01 now holds two containers (capacity 2) -> next fit is C02.
        assert_eq!(engine.first_available_slot(), Some(&a2));
    }

    #[test]
    fn test_auto_place_stops_at_saturation() {
        let mut engine = engine();
        engine.ingest(records(6));
        // Grid capacity is 4; the surplus two stay queued.
        assert_eq!(engine.auto_place(10), 4);
        assert_eq!(engine.inbound_count(), 2);
        assert_eq!(engine.first_available_slot(), None);
        assert_eq!(engine.auto_place(1), 0);
    }

    #[test]
    fn test_auto_place_takes_oldest_first() {
        let mut engine = engine();
        let ids = engine.ingest(records(2));
        engine.auto_place(1);

        // The first-ingested (oldest) container is placed; the newer waits.
        assert!(engine.container(&ids[0]).unwrap().status.is_placed());
        assert!(!engine.container(&ids[1]).unwrap().status.is_placed());
    }

    #[test]
    fn test_move_within_same_slot_restacks_on_top() {
        let mut engine = engine();
        let ids = engine.ingest(records(2));
        engine.auto_place(2);
        let a1 = SlotId::new('A', 1, 1);

        // Slot is at capacity, but moving its own bottom container succeeds
        // because the capacity check runs after self-removal.
        engine.move_container(&ids[0], &a1).unwrap();
        let order: Vec<&ContainerId> = engine.layout().get(&a1).unwrap().iter().collect();
        assert_eq!(order, [&ids[1], &ids[0]]);
    }

    #[test]
    fn test_move_unknown_container_and_slot() {
        let mut engine = engine();
        let err = engine
            .move_container(&ContainerId::from_raw("CNT-NOPENO"), &SlotId::new('A', 1, 1))
            .unwrap_err();
        assert!(matches!(err, YardError::UnknownContainer(_)));

        let ids = engine.ingest(records(1));
        let err = engine
            .move_container(&ids[0], &SlotId::new('Z', 9, 9))
            .unwrap_err();
        assert!(matches!(err, YardError::UnknownSlot(_)));
    }

    #[test]
    fn test_reorder_rejects_out_of_range_indices() {
        let mut engine = engine();
        engine.ingest(records(2));
        engine.auto_place(2);
        let a1 = SlotId::new('A', 1, 1);

        let err = engine.reorder(&a1, 0, 2).unwrap_err();
        assert!(matches!(err, YardError::InvalidIndex { .. }));
        let err = engine.reorder(&a1, 5, 0).unwrap_err();
        assert!(matches!(err, YardError::InvalidIndex { .. }));
    }

    #[test]
    fn test_evict_requires_membership() {
        let mut engine = engine();
        let ids = engine.ingest(records(2));
        engine.auto_place(1);
        let a1 = SlotId::new('A', 1, 1);

        // ids[1] is still inbound, not in the slot.
        let err = engine.evict(&a1, &ids[1]).unwrap_err();
        assert!(matches!(err, YardError::UnknownContainer(_)));

        engine.evict(&a1, &ids[0]).unwrap();
        assert_eq!(engine.inbound_count(), 2);
        assert_eq!(engine.in_yard_count(), 0);
        // Evicted container rejoins at the queue head.
        assert_eq!(engine.inbound().next(), Some(&ids[0]));
    }

    #[test]
    fn test_utilization_percent_rounds() {
        let mut engine = engine();
        engine.ingest(records(1));
        engine.auto_place(1);
        // 1 of 4 total capacity -> 25%.
        assert_eq!(engine.utilization_percent(), 25);
    }

    #[test]
    fn test_changed_slots_empty_on_fresh_engine() {
        let engine = engine();
        assert!(engine.changed_slots().is_empty());
    }
}
