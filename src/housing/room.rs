//! Room occupancy management
//!
//! This module contains the Room struct: a fixed-capacity unit of a house that
//! tracks its occupants and derives its vacant/full status from them.

use crate::allocation::error::{AllocationError, AllocationResult};
use crate::student::{Student, Tenancy};
use crate::types::{HouseId, RoomId, RoomStatus, StudentId};
use serde::{Deserialize, Serialize};

/// Represents a room within a house
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique identifier for the room
    pub id: RoomId,
    /// ID of the house this room belongs to
    pub house_id: HouseId,
    /// Position of the room in its house, assigned in creation order
    pub number: usize,
    /// Maximum number of occupants
    capacity: u32,
    /// Current occupants in arrival order
    occupants: Vec<StudentId>,
}

impl Room {
    /// Create a new empty room
    pub fn new(house_id: HouseId, number: usize, capacity: u32) -> AllocationResult<Self> {
        if capacity == 0 {
            return Err(AllocationError::invalid_capacity(format!(
                "room {} must hold at least one student",
                number
            )));
        }

        Ok(Self { id: RoomId::new(), house_id, number, capacity, occupants: Vec::new() })
    }

    /// Get the room capacity
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Get the current occupants
    pub fn occupants(&self) -> &[StudentId] {
        &self.occupants
    }

    /// Get the number of occupants
    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    /// Number of free beds left
    pub fn free_beds(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.occupants.len())
    }

    /// Derived occupancy status
    pub fn status(&self) -> RoomStatus {
        if self.occupants.len() >= self.capacity as usize {
            RoomStatus::Full
        } else {
            RoomStatus::Vacant
        }
    }

    /// Check if at least one bed is free
    pub fn is_vacant(&self) -> bool {
        self.status() == RoomStatus::Vacant
    }

    /// Check if a student occupies this room
    pub fn contains(&self, student_id: StudentId) -> bool {
        self.occupants.contains(&student_id)
    }

    /// Seat a student in this room and point their back-references here
    ///
    /// Fails without touching the room or the student when the student is
    /// already an occupant or the room is full.
    pub fn add_occupant(&mut self, student: &mut Student) -> AllocationResult<()> {
        if self.contains(student.id) {
            return Err(AllocationError::DuplicateOccupant { room: self.id, student: student.id });
        }
        if self.status() == RoomStatus::Full {
            return Err(AllocationError::CapacityExceeded { room: self.id, capacity: self.capacity });
        }

        self.occupants.push(student.id);
        student.tenancy = Tenancy::Resident { house: self.house_id, room: self.id };
        Ok(())
    }

    /// Remove a student from this room
    ///
    /// Returns false if the student was not an occupant. The student's own
    /// back-references are left to the caller.
    pub fn remove_occupant(&mut self, student_id: StudentId) -> bool {
        match self.occupants.iter().position(|&id| id == student_id) {
            Some(pos) => {
                self.occupants.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Validate room occupancy
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err(format!("Room {} has zero capacity", self.number));
        }
        if self.occupants.len() > self.capacity as usize {
            return Err(format!(
                "Room {} holds {} occupants for a capacity of {}",
                self.number,
                self.occupants.len(),
                self.capacity
            ));
        }
        for (i, id) in self.occupants.iter().enumerate() {
            if self.occupants[i + 1..].contains(id) {
                return Err(format!("Room {} lists occupant {} twice", self.number, id));
            }
        }
        Ok(())
    }
}
