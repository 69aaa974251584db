//! Post-conditions of allocation operations
//!
//! Every mutator of the engine reports what actually happened to the student
//! instead of leaving the caller to inspect back-references.

use crate::types::{HouseId, RoomId, StudentId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of routing or inscribing a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// Seated in a room
    Resident {
        /// House the student now lives in
        house: HouseId,
        /// Room the student occupies
        room: RoomId,
    },
    /// Queued on a house waitlist
    Waitlisted {
        /// House whose waitlist holds the student
        house: HouseId,
        /// Zero-based position in the queue
        position: usize,
    },
    /// Student was already attached to a house; nothing changed
    AlreadyAssigned {
        /// House the student is attached to
        house: HouseId,
    },
    /// No residential house exists to receive the student
    Unplaced,
}

impl Placement {
    /// House the student ended up attached to
    pub fn house(&self) -> Option<HouseId> {
        match self {
            Placement::Resident { house, .. }
            | Placement::Waitlisted { house, .. }
            | Placement::AlreadyAssigned { house } => Some(*house),
            Placement::Unplaced => None,
        }
    }

    /// Check if the student was seated by this operation
    pub fn is_resident(&self) -> bool {
        matches!(self, Placement::Resident { .. })
    }

    /// Check if the student was queued by this operation
    pub fn is_waitlisted(&self) -> bool {
        matches!(self, Placement::Waitlisted { .. })
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Resident { house, room } => write!(f, "resident of {} in {}", house, room),
            Placement::Waitlisted { house, position } => {
                write!(f, "waitlisted at {} (position {})", house, position + 1)
            }
            Placement::AlreadyAssigned { house } => write!(f, "already assigned to {}", house),
            Placement::Unplaced => write!(f, "unplaced"),
        }
    }
}

/// Outcome of withdrawing a student from a house
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Withdrawal {
    /// Student left a room
    Vacated {
        /// House the student left
        house: HouseId,
        /// Room that was freed
        room: RoomId,
        /// Waitlisted student seated in the freed slot
        promoted: Option<StudentId>,
    },
    /// Student left a waitlist
    LeftWaitlist {
        /// House whose waitlist the student left
        house: HouseId,
    },
    /// Student was neither resident nor waitlisted
    NotPresent,
}

impl Withdrawal {
    /// Student promoted from the waitlist, if any
    pub fn promoted(&self) -> Option<StudentId> {
        match self {
            Withdrawal::Vacated { promoted, .. } => *promoted,
            _ => None,
        }
    }
}

/// Outcome of removing a house from the complex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseRemoval {
    /// Removed house
    pub house: HouseId,
    /// Name of the removed house
    pub name: String,
    /// Where each former resident or waitlisted student went, in routing order
    pub rerouted: Vec<(StudentId, Placement)>,
}
