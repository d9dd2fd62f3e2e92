//! Stackyard Library
//!
//! Core functionality for the stackyard yard inventory tracker: grid
//! topology, container records, the placement engine, rearrangement
//! detection, and JSON persistence.

pub mod cli;
pub mod config_file;
pub mod container;
pub mod engine;
pub mod error;
pub mod grid;
pub mod persist;
pub mod types;

// Re-export main types for convenience
pub use config_file::YardConfig;
pub use container::{Container, ContainerId, ContainerStore, IngestRecord};
pub use engine::layout::{Layout, Slot};
pub use engine::signature::{changed_slots, signature, snapshot, Baseline};
pub use engine::YardEngine;
pub use error::{Result, YardError};
pub use grid::{enumerate_slots, GridConfig, SlotId};
pub use persist::{JsonFileStore, MemoryStore, StateStore};
pub use types::{CargoKind, ContainerSize, ContainerStatus, Priority};
