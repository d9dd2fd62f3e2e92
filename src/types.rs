//! Type-safe domain types for stackyard
//!
//! This module replaces stringly-typed container attributes with proper Rust
//! enums that provide compile-time validation and exhaustive matching.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Physical container size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ContainerSize {
    #[strum(serialize = "small")]
    Small,
    #[default]
    #[strum(serialize = "standard")]
    Standard,
    #[strum(serialize = "large")]
    Large,
}

/// Cargo category carried by a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CargoKind {
    #[default]
    #[strum(serialize = "general")]
    General,
    #[strum(serialize = "refrigerated")]
    Refrigerated,
    #[strum(serialize = "liquid")]
    Liquid,
    #[strum(serialize = "hazardous")]
    Hazardous,
}

/// Handling priority assigned at intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    #[strum(serialize = "low")]
    Low,
    #[default]
    #[strum(serialize = "normal")]
    Normal,
    #[strum(serialize = "high")]
    High,
}

/// Where a container currently lives.
///
/// `Inbound` containers sit in the holding queue; `InYard` containers occupy
/// exactly one slot stack. The engine enforces that a container is never in
/// both places (and never in neither, once created).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ContainerStatus {
    #[default]
    #[strum(serialize = "INBOUND")]
    Inbound,
    #[strum(serialize = "IN_YARD")]
    InYard,
}

impl ContainerStatus {
    /// Returns true if the container has been placed into a slot
    #[inline]
    pub const fn is_placed(self) -> bool {
        matches!(self, Self::InYard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        let s = ContainerStatus::InYard.to_string();
        assert_eq!(s, "IN_YARD");
        let parsed: ContainerStatus = s.parse().expect("Should parse");
        assert_eq!(parsed, ContainerStatus::InYard);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ContainerSize::default(), ContainerSize::Standard);
        assert_eq!(CargoKind::default(), CargoKind::General);
        assert_eq!(Priority::default(), Priority::Normal);
        assert_eq!(ContainerStatus::default(), ContainerStatus::Inbound);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Normal);
        assert!(Priority::Normal < Priority::High);
    }
}
