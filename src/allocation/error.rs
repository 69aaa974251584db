//! Error types and handling
//!
//! This module contains the error taxonomy of the allocation engine. Capacity,
//! duplicate, vacancy and waitlist errors are guards for direct callers of the
//! room and house primitives; the public placement paths check their own
//! preconditions and never surface them.

use crate::types::{EventId, HouseId, RoomId, StudentId};
use thiserror::Error;

/// Errors that can occur in the allocation engine
#[derive(Debug, Error)]
pub enum AllocationError {
    /// Room is already at capacity
    #[error("Room {room} is full ({capacity} occupant(s))")]
    CapacityExceeded {
        /// Room that refused the occupant
        room: RoomId,
        /// Capacity of that room
        capacity: u32,
    },

    /// Student already occupies the room
    #[error("Student {student} already occupies room {room}")]
    DuplicateOccupant {
        /// Room that already holds the student
        room: RoomId,
        /// Student being added twice
        student: StudentId,
    },

    /// House has no room with a free bed
    #[error("House {0} has no vacant room")]
    NoVacantRoom(HouseId),

    /// Student is already queued on this waitlist
    #[error("Student {student} is already on the waitlist of house {house}")]
    AlreadyWaitlisted {
        /// House whose waitlist holds the student
        house: HouseId,
        /// Student being queued twice
        student: StudentId,
    },

    /// Snapshot could not be found, decoded or trusted
    #[error("Snapshot unavailable: {0}")]
    SnapshotUnavailable(String),

    /// Student is not in the roster
    #[error("Unknown student: {0}")]
    UnknownStudent(StudentId),

    /// Student id is already in the roster
    #[error("Student {0} is already enrolled")]
    DuplicateStudent(StudentId),

    /// Listed resident holds no bed in any room of the house
    #[error("Resident {student} of house {house} occupies no room")]
    ResidentWithoutRoom {
        /// House listing the student as resident
        house: HouseId,
        /// Student missing from every room
        student: StudentId,
    },

    /// House is not in the complex
    #[error("Unknown house: {0}")]
    UnknownHouse(String),

    /// Event is not on the agenda
    #[error("Unknown event: {0}")]
    UnknownEvent(EventId),

    /// Room capacities must be positive
    #[error("Invalid room capacity: {0}")]
    InvalidCapacity(String),

    /// Nationality counter index outside the table
    #[error("Nationality index {index} out of range (table holds {len})")]
    NationalityIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Length of the counter table
        len: usize,
    },

    /// House still has residents or a waitlist
    #[error("House {name} still has {residents} resident(s) and {waitlisted} waitlisted student(s)")]
    HouseNotEmpty {
        /// Name of the house
        name: String,
        /// Current resident count
        residents: usize,
        /// Current waitlist length
        waitlisted: usize,
    },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

}

impl AllocationError {
    /// Create a snapshot unavailable error
    pub fn snapshot_unavailable(msg: impl Into<String>) -> Self {
        Self::SnapshotUnavailable(msg.into())
    }

    /// Create an unknown house error
    pub fn unknown_house(house: impl ToString) -> Self {
        Self::UnknownHouse(house.to_string())
    }

    /// Create an invalid capacity error
    pub fn invalid_capacity(msg: impl Into<String>) -> Self {
        Self::InvalidCapacity(msg.into())
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors leave the in-memory complex untouched and usable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AllocationError::CapacityExceeded { .. } => true,
            AllocationError::DuplicateOccupant { .. } => true,
            AllocationError::NoVacantRoom(_) => true,
            AllocationError::AlreadyWaitlisted { .. } => true,
            AllocationError::SnapshotUnavailable(_) => true,
            AllocationError::UnknownStudent(_) => true,
            AllocationError::DuplicateStudent(_) => true,
            AllocationError::ResidentWithoutRoom { .. } => false,
            AllocationError::UnknownHouse(_) => true,
            AllocationError::UnknownEvent(_) => true,
            AllocationError::InvalidCapacity(_) => true,
            AllocationError::NationalityIndexOutOfRange { .. } => false,
            AllocationError::HouseNotEmpty { .. } => true,
            AllocationError::Io(_) => true,
            AllocationError::Serialization(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            AllocationError::CapacityExceeded { .. }
            | AllocationError::DuplicateOccupant { .. }
            | AllocationError::NoVacantRoom(_)
            | AllocationError::AlreadyWaitlisted { .. }
            | AllocationError::NationalityIndexOutOfRange { .. }
            | AllocationError::ResidentWithoutRoom { .. } => "Allocation",
            AllocationError::SnapshotUnavailable(_) => "Snapshot",
            AllocationError::UnknownStudent(_)
            | AllocationError::DuplicateStudent(_)
            | AllocationError::UnknownHouse(_)
            | AllocationError::UnknownEvent(_) => "Lookup",
            AllocationError::InvalidCapacity(_) | AllocationError::HouseNotEmpty { .. } => {
                "House Management"
            }
            AllocationError::Io(_) => "IO",
            AllocationError::Serialization(_) => "Serialization",
        }
    }
}

/// Result type for allocation operations
pub type AllocationResult<T> = Result<T, AllocationError>;
