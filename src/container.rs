//! Container records and the container store.
//!
//! The store is owned exclusively by the engine; external consumers get
//! enumerable read access only. All mutation happens through engine
//! operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::SystemTime;

use crate::grid::SlotId;
use crate::types::{CargoKind, ContainerSize, ContainerStatus, Priority};

/// Unique container identifier (`CNT-` + 6 uppercase alphanumerics).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Wrap an already-formatted container id.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attributes supplied by the inbound feed for one new container.
///
/// The engine assigns the id, status, and timestamps itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestRecord {
    #[serde(default)]
    pub size: ContainerSize,
    #[serde(default)]
    pub kind: CargoKind,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub owner_company: String,
    #[serde(default)]
    pub owner_name: String,
}

/// A tracked container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    pub size: ContainerSize,
    pub kind: CargoKind,
    pub priority: Priority,
    pub status: ContainerStatus,
    /// Some iff status is InYard; then it names the one slot whose stack
    /// contains this id.
    pub slot: Option<SlotId>,
    pub owner_company: String,
    pub owner_name: String,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl Container {
    /// Build a freshly ingested (inbound) container from feed attributes.
    pub fn new(id: ContainerId, record: IngestRecord, now: SystemTime) -> Self {
        Self {
            id,
            size: record.size,
            kind: record.kind,
            priority: record.priority,
            status: ContainerStatus::Inbound,
            slot: None,
            owner_company: record.owner_company,
            owner_name: record.owner_name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition into a slot. Stamps the update time.
    pub fn place_into(&mut self, slot: SlotId, now: SystemTime) {
        self.status = ContainerStatus::InYard;
        self.slot = Some(slot);
        self.updated_at = now;
    }

    /// Transition back to the inbound queue. Stamps the update time.
    pub fn return_to_inbound(&mut self, now: SystemTime) {
        self.status = ContainerStatus::Inbound;
        self.slot = None;
        self.updated_at = now;
    }
}

/// Mapping from container id to container record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerStore {
    records: BTreeMap<ContainerId, Container>,
}

impl ContainerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &ContainerId) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &ContainerId) -> Option<&Container> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &ContainerId) -> Option<&mut Container> {
        self.records.get_mut(id)
    }

    pub fn insert(&mut self, container: Container) {
        self.records.insert(container.id.clone(), container);
    }

    /// Enumerable read access for lookup/presentation consumers.
    pub fn iter(&self) -> impl Iterator<Item = &Container> {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> Container {
        Container::new(
            ContainerId::from_raw(id),
            IngestRecord::default(),
            SystemTime::UNIX_EPOCH,
        )
    }

    #[test]
    fn test_new_container_is_inbound_without_slot() {
        let c = sample("CNT-AAAAAA");
        assert_eq!(c.status, ContainerStatus::Inbound);
        assert!(c.slot.is_none());
        assert_eq!(c.created_at, c.updated_at);
    }

    #[test]
    fn test_place_and_return_transitions() {
        let mut c = sample("CNT-AAAAAA");
        let slot = SlotId::new('A', 1, 1);
        let later = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(60);

        c.place_into(slot.clone(), later);
        assert_eq!(c.status, ContainerStatus::InYard);
        assert_eq!(c.slot.as_ref(), Some(&slot));
        assert_eq!(c.updated_at, later);

        c.return_to_inbound(later);
        assert_eq!(c.status, ContainerStatus::Inbound);
        assert!(c.slot.is_none());
    }

    #[test]
    fn test_store_enumerates_in_id_order() {
        let mut store = ContainerStore::new();
        store.insert(sample("CNT-BBBBBB"));
        store.insert(sample("CNT-AAAAAA"));
        let ids: Vec<&str> = store.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["CNT-AAAAAA", "CNT-BBBBBB"]);
    }
}
