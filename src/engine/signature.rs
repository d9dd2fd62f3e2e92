//! Order-sensitive stack signatures and baseline comparison.
//!
//! A signature fingerprints a stack's exact arrangement: container ids joined
//! in stack order with a separator that cannot appear inside an id. Two stacks
//! have equal signatures iff they hold the same ids in the same order. The
//! baseline is the per-slot signature map captured by the last acknowledge.

use std::collections::{BTreeMap, BTreeSet};

use crate::engine::layout::{Layout, Slot};
use crate::grid::SlotId;

/// Separator between ids inside a signature. Ids are `CNT-` plus
/// alphanumerics, so `|` never collides.
const SEPARATOR: char = '|';

/// Per-slot signatures of the last acknowledged layout.
pub type Baseline = BTreeMap<SlotId, String>;

/// Compute the signature of one stack. Empty stack -> empty string.
pub fn signature(slot: &Slot) -> String {
    let mut out = String::new();
    for (i, id) in slot.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(id.as_str());
    }
    out
}

/// Signatures of every slot in the layout, empty slots included.
pub fn snapshot(layout: &Layout) -> Baseline {
    layout
        .iter()
        .map(|(slot_id, slot)| (slot_id.clone(), signature(slot)))
        .collect()
}

/// Slots whose current arrangement diverges from the baseline.
///
/// A missing baseline entry counts as the empty signature. Baseline entries
/// for slots no longer in the layout (the grid shrank) are also reported.
pub fn changed_slots(layout: &Layout, baseline: &Baseline) -> BTreeSet<SlotId> {
    let mut changed = BTreeSet::new();

    for (slot_id, slot) in layout.iter() {
        let current = signature(slot);
        let acknowledged = baseline.get(slot_id).map(String::as_str).unwrap_or("");
        if current != acknowledged {
            changed.insert(slot_id.clone());
        }
    }

    for slot_id in baseline.keys() {
        if !layout.contains(slot_id) {
            changed.insert(slot_id.clone());
        }
    }

    changed
}
