//! Core student struct and methods
//!
//! This module contains the Student entity and its tenancy back-references.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{HouseId, RoomId, StudentId};

/// Where a student currently stands relative to the houses of the complex
///
/// A student is in at most one house at a time: either seated in one of its
/// rooms or queued on its waitlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Tenancy {
    /// Not attached to any house
    #[default]
    Unassigned,
    /// Queued on the waitlist of a house, no room yet
    Waitlisted {
        /// House whose waitlist holds the student
        house: HouseId,
    },
    /// Seated in a room of a house
    Resident {
        /// House the student lives in
        house: HouseId,
        /// Room the student occupies
        room: RoomId,
    },
}

impl Tenancy {
    /// House the student is attached to, if any
    pub fn house(&self) -> Option<HouseId> {
        match self {
            Tenancy::Unassigned => None,
            Tenancy::Waitlisted { house } | Tenancy::Resident { house, .. } => Some(*house),
        }
    }

    /// Room the student occupies, if seated
    pub fn room(&self) -> Option<RoomId> {
        match self {
            Tenancy::Resident { room, .. } => Some(*room),
            _ => None,
        }
    }
}

/// A student of the complex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier for the student
    pub id: StudentId,
    /// Family name
    pub surname: String,
    /// Given name
    pub given_name: String,
    /// Nationality label, matched verbatim against house nationalities
    pub nationality: String,
    /// House requested at admission time; never re-evaluated afterwards
    pub preferred_house: Option<HouseId>,
    /// Current house and room back-references
    pub tenancy: Tenancy,
}

impl Student {
    /// Create a new unassigned student
    pub fn new(
        surname: impl Into<String>,
        given_name: impl Into<String>,
        nationality: impl Into<String>,
    ) -> Self {
        Self {
            id: StudentId::new(),
            surname: surname.into(),
            given_name: given_name.into(),
            nationality: nationality.into(),
            preferred_house: None,
            tenancy: Tenancy::Unassigned,
        }
    }

    /// Create a new unassigned student that asked for a specific house
    pub fn with_preference(
        surname: impl Into<String>,
        given_name: impl Into<String>,
        nationality: impl Into<String>,
        preferred_house: HouseId,
    ) -> Self {
        let mut student = Self::new(surname, given_name, nationality);
        student.preferred_house = Some(preferred_house);
        student
    }

    /// House the student is attached to (resident or waitlisted)
    pub fn house(&self) -> Option<HouseId> {
        self.tenancy.house()
    }

    /// Room the student occupies
    pub fn room(&self) -> Option<RoomId> {
        self.tenancy.room()
    }

    /// Check if the student is seated in a room
    pub fn is_resident(&self) -> bool {
        matches!(self.tenancy, Tenancy::Resident { .. })
    }

    /// Check if the student is queued on a waitlist
    pub fn is_waitlisted(&self) -> bool {
        matches!(self.tenancy, Tenancy::Waitlisted { .. })
    }

    /// Check if the student is attached to no house
    pub fn is_unassigned(&self) -> bool {
        self.tenancy == Tenancy::Unassigned
    }

    /// Clear house and room back-references
    pub fn detach(&mut self) {
        self.tenancy = Tenancy::Unassigned;
    }

    /// Check if another student carries the same surname and given name
    ///
    /// Identity is the [`StudentId`]; this is only used to warn about
    /// homonyms at admission and for display.
    pub fn same_name(&self, other: &Student) -> bool {
        self.surname == other.surname && self.given_name == other.given_name
    }

    /// Full name as "Surname Given"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.surname, self.given_name)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.surname, self.given_name, self.nationality)
    }
}
