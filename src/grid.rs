//! Grid topology: the fixed universe of slot identifiers.
//!
//! All functions in this module are pure and side-effect free. The enumeration
//! order defined here (zones outer, rows middle, columns inner, 1-indexed) is
//! the canonical scan order used by first-fit placement; it must stay stable
//! and deterministic for a given configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single storage slot, derived deterministically from
/// (zone, row, column) as `{zone}-R{row:02}-C{col:02}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    /// Build a slot id from 1-indexed coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackyard::grid::SlotId;
    ///
    /// let id = SlotId::new('A', 1, 1);
    /// assert_eq!(id.as_str(), "A-R01-C01");
    /// ```
    pub fn new(zone: char, row: u32, col: u32) -> Self {
        Self(format!("{zone}-R{row:02}-C{col:02}"))
    }

    /// Wrap an already-formatted slot id string.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The slot id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The zone label, i.e. everything before the first `-`.
    pub fn zone(&self) -> &str {
        self.0.split('-').next().unwrap_or("")
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Grid dimensions shared by every slot in the yard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of zones, labeled 'A', 'B', ... in order
    pub zones: u32,
    /// Rows per zone, 1-indexed
    pub rows_per_zone: u32,
    /// Columns per row, 1-indexed
    pub cols_per_zone: u32,
    /// Uniform per-slot stack capacity
    pub slot_capacity: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        // Reference yard: zones A-C, 4 rows, 6 columns, 2-high stacks.
        Self {
            zones: 3,
            rows_per_zone: 4,
            cols_per_zone: 6,
            slot_capacity: 2,
        }
    }
}

impl GridConfig {
    /// Zone labels in enumeration order.
    pub fn zone_labels(&self) -> impl Iterator<Item = char> + '_ {
        (0..self.zones).map(|i| char::from(b'A' + (i % 26) as u8))
    }

    /// Total number of slots in the grid.
    pub fn slot_count(&self) -> usize {
        (self.zones * self.rows_per_zone * self.cols_per_zone) as usize
    }

    /// Total container capacity of the grid.
    pub fn total_capacity(&self) -> usize {
        self.slot_count() * self.slot_capacity
    }

    /// Enumerate every slot id in canonical order.
    pub fn enumerate_slots(&self) -> Vec<SlotId> {
        enumerate_slots(self.zones, self.rows_per_zone, self.cols_per_zone)
    }
}

/// Enumerate slot ids: zones outer, rows middle, columns inner, all 1-indexed.
///
/// # Examples
///
/// ```
/// use stackyard::grid::enumerate_slots;
///
/// let slots = enumerate_slots(2, 1, 2);
/// let ids: Vec<&str> = slots.iter().map(|s| s.as_str()).collect();
/// assert_eq!(ids, ["A-R01-C01", "A-R01-C02", "B-R01-C01", "B-R01-C02"]);
/// ```
pub fn enumerate_slots(zones: u32, rows_per_zone: u32, cols_per_zone: u32) -> Vec<SlotId> {
    let mut out = Vec::with_capacity((zones * rows_per_zone * cols_per_zone) as usize);
    for z in 0..zones {
        let zone = char::from(b'A' + (z % 26) as u8);
        for row in 1..=rows_per_zone {
            for col in 1..=cols_per_zone {
                out.push(SlotId::new(zone, row, col));
            }
        }
    }
    out
}
