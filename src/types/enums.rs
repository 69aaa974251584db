//! Enumeration types for the residency allocator
//!
//! This module contains the small closed vocabularies used across the engine:
//! room status, persistence and house-removal policies, and listing order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Occupancy status of a room, derived from its occupant count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomStatus {
    /// At least one bed is free
    Vacant,
    /// Occupant count equals capacity
    Full,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomStatus::Vacant => write!(f, "Vacant"),
            RoomStatus::Full => write!(f, "Full"),
        }
    }
}

/// When the allocation service writes a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutosavePolicy {
    /// Save synchronously after every successful mutating call
    #[default]
    AfterEachMutation,
    /// Only save when the caller asks for it
    Manual,
}

impl fmt::Display for AutosavePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutosavePolicy::AfterEachMutation => write!(f, "after-each-mutation"),
            AutosavePolicy::Manual => write!(f, "manual"),
        }
    }
}

impl FromStr for AutosavePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "after-each-mutation" | "aftereachmutation" | "always" | "auto" => {
                Ok(AutosavePolicy::AfterEachMutation)
            }
            "manual" | "never" => Ok(AutosavePolicy::Manual),
            _ => Err(format!("Unknown autosave policy: {}", s)),
        }
    }
}

/// What happens to the occupants of a house that is being removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HouseRemovalPolicy {
    /// Refuse to remove a house that still has residents or a waitlist
    #[default]
    Forbid,
    /// Remove the house and route its residents and waitlist through the
    /// assignment policy again
    Reassign,
}

impl fmt::Display for HouseRemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HouseRemovalPolicy::Forbid => write!(f, "forbid"),
            HouseRemovalPolicy::Reassign => write!(f, "reassign"),
        }
    }
}

impl FromStr for HouseRemovalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forbid" => Ok(HouseRemovalPolicy::Forbid),
            "reassign" => Ok(HouseRemovalPolicy::Reassign),
            _ => Err(format!("Unknown house removal policy: {}", s)),
        }
    }
}

/// Ordering for name-sorted student listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// A to Z by surname, then given name
    #[default]
    Ascending,
    /// Z to A
    Descending,
}
