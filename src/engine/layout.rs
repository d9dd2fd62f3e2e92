//! Slot stacks and the yard layout.
//!
//! A `Layout` is a *total* mapping: every slot id enumerated by the grid
//! topology is present, empty slots included. Stacks are ordered sequences,
//! front = bottom/oldest-placed, back = top/most-recent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::container::ContainerId;
use crate::grid::{GridConfig, SlotId};

/// One slot's ordered stack of container ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot {
    stack: Vec<ContainerId>,
}

impl Slot {
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn contains(&self, id: &ContainerId) -> bool {
        self.stack.contains(id)
    }

    /// Position of a container in the stack, bottom = 0.
    pub fn position_of(&self, id: &ContainerId) -> Option<usize> {
        self.stack.iter().position(|c| c == id)
    }

    /// Append at the top (most-recent end).
    pub fn push_top(&mut self, id: ContainerId) {
        self.stack.push(id);
    }

    /// Remove a container wherever it sits in the stack.
    pub fn remove(&mut self, id: &ContainerId) -> bool {
        match self.position_of(id) {
            Some(pos) => {
                self.stack.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Move the element at `from` to `to`, shifting the elements between.
    /// Callers validate the indices first.
    pub fn shift(&mut self, from: usize, to: usize) {
        let id = self.stack.remove(from);
        self.stack.insert(to, id);
    }

    /// Bottom-to-top iteration.
    pub fn iter(&self) -> impl Iterator<Item = &ContainerId> {
        self.stack.iter()
    }
}

/// Total mapping from slot id to slot stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    slots: BTreeMap<SlotId, Slot>,
}

impl Layout {
    /// A fresh layout with every topology slot present and empty.
    pub fn new(grid: &GridConfig) -> Self {
        let mut layout = Self::default();
        layout.repair(grid);
        layout
    }

    /// Guarantee totality: insert an empty stack for every topology slot that
    /// is missing. Returns the number of slots added. Used after loading
    /// persisted state, which may predate a grid expansion.
    pub fn repair(&mut self, grid: &GridConfig) -> usize {
        let mut added = 0;
        for slot_id in grid.enumerate_slots() {
            if !self.slots.contains_key(&slot_id) {
                self.slots.insert(slot_id, Slot::default());
                added += 1;
            }
        }
        added
    }

    pub fn contains(&self, slot_id: &SlotId) -> bool {
        self.slots.contains_key(slot_id)
    }

    pub fn get(&self, slot_id: &SlotId) -> Option<&Slot> {
        self.slots.get(slot_id)
    }

    pub fn get_mut(&mut self, slot_id: &SlotId) -> Option<&mut Slot> {
        self.slots.get_mut(slot_id)
    }

    /// All (slot id, slot) pairs, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&SlotId, &Slot)> {
        self.slots.iter()
    }

    /// The slot currently holding `id`, if any. The disjointness invariant
    /// guarantees at most one.
    pub fn find_container(&self, id: &ContainerId) -> Option<&SlotId> {
        self.slots
            .iter()
            .find(|(_, slot)| slot.contains(id))
            .map(|(slot_id, _)| slot_id)
    }

    /// Remove `id` from whichever stack holds it. Returns the slot it was in.
    pub fn remove_container(&mut self, id: &ContainerId) -> Option<SlotId> {
        let slot_id = self.find_container(id)?.clone();
        if let Some(slot) = self.slots.get_mut(&slot_id) {
            slot.remove(id);
        }
        Some(slot_id)
    }

    /// Total number of containers across all stacks.
    pub fn occupancy(&self) -> usize {
        self.slots.values().map(Slot::len).sum()
    }

    /// Remaining capacity per zone, in zone-label order.
    pub fn zone_remaining(&self, grid: &GridConfig) -> Vec<(String, usize)> {
        let mut remaining: BTreeMap<String, usize> = BTreeMap::new();
        for (slot_id, slot) in &self.slots {
            let free = grid.slot_capacity.saturating_sub(slot.len());
            *remaining.entry(slot_id.zone().to_string()).or_insert(0) += free;
        }
        remaining.into_iter().collect()
    }
}
