//! Complex registry and assignment policy
//!
//! This module contains the Complex struct: the registry of residential houses
//! and the student roster, together with the nationality and equity rules that
//! decide which house receives a new student.

use crate::allocation::error::{AllocationError, AllocationResult};
use crate::housing::agenda::Event;
use crate::housing::house::House;
use crate::housing::placement::{HouseRemoval, Placement, Withdrawal};
use crate::housing::profile::{HouseDetailsPatch, HouseProfile};
use crate::student::{Roster, Student, Tenancy};
use crate::types::{EventId, HouseId, HouseRemovalPolicy, StudentId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Highest share of a nationality, in percent, that still counts as equitable
pub const EQUITY_THRESHOLD_PERCENT: f64 = 50.0;

/// The whole housing graph: international house, residential houses and students
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ComplexParts")]
pub struct Complex {
    /// Administrative house; its figures are aggregates of the residential houses
    international: HouseProfile,
    /// Residential houses in insertion order
    houses: Vec<House>,
    /// Every student of the complex
    roster: Roster,
    /// Quick lookup map from house ID to index
    #[serde(skip)]
    house_index: HashMap<HouseId, usize>,
}

#[derive(Deserialize)]
struct ComplexParts {
    international: HouseProfile,
    houses: Vec<House>,
    roster: Roster,
}

impl From<ComplexParts> for Complex {
    fn from(parts: ComplexParts) -> Self {
        let mut complex = Self {
            international: parts.international,
            houses: parts.houses,
            roster: parts.roster,
            house_index: HashMap::new(),
        };
        complex.rebuild_indices();
        complex
    }
}

/// Occupancy figures of the whole complex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexSummary {
    /// Name of the international house
    pub name: String,
    /// Number of residential houses
    pub houses: usize,
    /// Rooms across all houses
    pub rooms: usize,
    /// Beds across all houses
    pub capacity: usize,
    /// Seated students
    pub residents: usize,
    /// Students on any waitlist
    pub waitlisted: usize,
    /// Students attached to no house
    pub unassigned: usize,
}

impl ComplexSummary {
    /// Share of beds taken, in percent
    pub fn occupancy_rate(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            100.0 * self.residents as f64 / self.capacity as f64
        }
    }
}

impl fmt::Display for ComplexSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "  Houses:     {}", self.houses)?;
        writeln!(f, "  Rooms:      {}", self.rooms)?;
        writeln!(f, "  Capacity:   {}", self.capacity)?;
        writeln!(f, "  Residents:  {} ({:.1}%)", self.residents, self.occupancy_rate())?;
        writeln!(f, "  Waitlisted: {}", self.waitlisted)?;
        write!(f, "  Unassigned: {}", self.unassigned)
    }
}

impl Complex {
    /// Create an empty complex around an international house
    pub fn new(international: HouseProfile) -> Self {
        Self {
            international,
            houses: Vec::new(),
            roster: Roster::new(),
            house_index: HashMap::new(),
        }
    }

    /// Rebuild the internal indices (call after modifying houses directly)
    pub fn rebuild_indices(&mut self) {
        self.house_index.clear();
        for (idx, house) in self.houses.iter().enumerate() {
            self.house_index.insert(house.id, idx);
        }
        self.roster.rebuild_indices();
    }

    /// International house details
    pub fn international(&self) -> &HouseProfile {
        &self.international
    }

    /// Every student of the complex
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Get a student by ID
    pub fn student(&self, student_id: StudentId) -> Option<&Student> {
        self.roster.get(student_id)
    }

    /// Residential houses in insertion order
    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    /// Get the number of residential houses
    pub fn house_count(&self) -> usize {
        self.houses.len()
    }

    /// Get a house by ID
    pub fn get_house(&self, house_id: HouseId) -> Option<&House> {
        self.house_index.get(&house_id).and_then(|&idx| self.houses.get(idx))
    }

    /// Find a residential house by name, ignoring case
    pub fn house_by_name(&self, name: &str) -> Option<&House> {
        let wanted = name.trim().to_lowercase();
        self.houses.iter().find(|h| h.name().to_lowercase() == wanted)
    }

    fn house_position(&self, house_id: HouseId) -> AllocationResult<usize> {
        self.house_index
            .get(&house_id)
            .copied()
            .ok_or_else(|| AllocationError::unknown_house(house_id))
    }

    /// Add a residential house; a house already registered is left as is
    pub fn add_house(&mut self, house: House) -> HouseId {
        let id = house.id;
        if !self.house_index.contains_key(&id) {
            self.house_index.insert(id, self.houses.len());
            self.houses.push(house);
        }
        id
    }

    /// Remove a residential house
    ///
    /// With [`HouseRemovalPolicy::Forbid`] a house holding residents or a
    /// waitlist is kept and `HouseNotEmpty` is returned. With
    /// [`HouseRemovalPolicy::Reassign`] its residents, then its waitlist, are
    /// routed again among the remaining houses.
    pub fn remove_house(
        &mut self,
        house_id: HouseId,
        policy: HouseRemovalPolicy,
    ) -> AllocationResult<HouseRemoval> {
        let idx = self.house_position(house_id)?;
        let house = &self.houses[idx];
        if policy == HouseRemovalPolicy::Forbid && !house.is_empty() {
            return Err(AllocationError::HouseNotEmpty {
                name: house.name().to_string(),
                residents: house.resident_count(),
                waitlisted: house.waitlist_len(),
            });
        }

        let mut house = self.houses.remove(idx);
        self.rebuild_indices();
        let evicted = house.evacuate(&mut self.roster);

        let mut rerouted = Vec::with_capacity(evicted.len());
        for student_id in evicted {
            let placement = self.assign_by_nationality(student_id)?;
            rerouted.push((student_id, placement));
        }

        Ok(HouseRemoval { house: house.id, name: house.profile.name, rerouted })
    }

    /// Patch the descriptive details of a house
    pub fn update_house_details(
        &mut self,
        house_id: HouseId,
        patch: HouseDetailsPatch,
    ) -> AllocationResult<&House> {
        let idx = self.house_position(house_id)?;
        let house = &mut self.houses[idx];
        house.profile.apply(patch);
        Ok(&*house)
    }

    /// Enroll a new student and route them
    ///
    /// A student with a preferred house is inscribed there directly; anyone
    /// else goes through [`Complex::assign_by_nationality`]. An id already in
    /// the roster or an unknown preferred house fails before anything is
    /// enrolled. Whatever tenancy the record carries is discarded.
    pub fn admit(&mut self, mut student: Student) -> AllocationResult<(StudentId, Placement)> {
        if self.roster.contains(student.id) {
            return Err(AllocationError::DuplicateStudent(student.id));
        }
        if let Some(preferred) = student.preferred_house {
            self.house_position(preferred)?;
        }
        student.tenancy = Tenancy::Unassigned;

        let preferred = student.preferred_house;
        let student_id = self.roster.enroll(student);
        let placement = match preferred {
            Some(house_id) => self.inscribe_into(house_id, student_id)?,
            None => self.assign_by_nationality(student_id)?,
        };
        Ok((student_id, placement))
    }

    /// Inscribe an enrolled student into a specific house
    pub fn inscribe_into(
        &mut self,
        house_id: HouseId,
        student_id: StudentId,
    ) -> AllocationResult<Placement> {
        let idx = self.house_position(house_id)?;
        let student = self.roster.require_mut(student_id)?;
        self.houses[idx].inscribe_student(student)
    }

    /// Route a student to the first house declaring their nationality
    ///
    /// Falls back to [`Complex::assign_equitably`] when no house matches.
    pub fn assign_by_nationality(&mut self, student_id: StudentId) -> AllocationResult<Placement> {
        let student = self.roster.require_mut(student_id)?;
        match self.houses.iter().position(|h| h.profile.declares(&student.nationality)) {
            Some(idx) => self.houses[idx].inscribe_student(student),
            None => self.assign_equitably(student_id),
        }
    }

    /// Route a student to the first house where their nationality holds at
    /// most half of the residents
    ///
    /// When no house qualifies the first house receives the student anyway.
    pub fn assign_equitably(&mut self, student_id: StudentId) -> AllocationResult<Placement> {
        let student = self.roster.require_mut(student_id)?;
        if self.houses.is_empty() {
            return Ok(Placement::Unplaced);
        }

        let idx = self
            .houses
            .iter()
            .position(|h| h.nationality_share(&student.nationality) <= EQUITY_THRESHOLD_PERCENT)
            .unwrap_or(0);
        self.houses[idx].inscribe_student(student)
    }

    /// Take a student out of their house, promoting from its waitlist
    pub fn withdraw(&mut self, student_id: StudentId) -> AllocationResult<Withdrawal> {
        let student = self.roster.get(student_id).ok_or(AllocationError::UnknownStudent(student_id))?;
        let Some(house_id) = student.house() else {
            return Ok(Withdrawal::NotPresent);
        };
        let idx = self.house_position(house_id)?;
        self.houses[idx].withdraw_student(student_id, &mut self.roster)
    }

    /// Withdraw a student, then remove them from the roster and every agenda
    pub fn discharge(&mut self, student_id: StudentId) -> AllocationResult<(Withdrawal, Student)> {
        let withdrawal = self.withdraw(student_id)?;
        for house in &mut self.houses {
            house.agenda.discharge_attendee(student_id);
        }
        let student =
            self.roster.discharge(student_id).ok_or(AllocationError::UnknownStudent(student_id))?;
        Ok((withdrawal, student))
    }

    /// Add an event to a house agenda; false on an exact date collision
    pub fn schedule_event(&mut self, house_id: HouseId, event: Event) -> AllocationResult<bool> {
        let idx = self.house_position(house_id)?;
        Ok(self.houses[idx].agenda.schedule(event))
    }

    /// Remove an event from a house agenda
    pub fn unschedule_event(
        &mut self,
        house_id: HouseId,
        event_id: EventId,
    ) -> AllocationResult<Event> {
        let idx = self.house_position(house_id)?;
        self.houses[idx].agenda.unschedule(event_id).ok_or(AllocationError::UnknownEvent(event_id))
    }

    /// Register an enrolled student to an event of a house
    pub fn register_attendee(
        &mut self,
        house_id: HouseId,
        event_id: EventId,
        student_id: StudentId,
    ) -> AllocationResult<bool> {
        if !self.roster.contains(student_id) {
            return Err(AllocationError::UnknownStudent(student_id));
        }
        let idx = self.house_position(house_id)?;
        self.houses[idx].agenda.register_attendee(event_id, student_id)
    }

    /// Seated students across all houses
    pub fn total_residents(&self) -> usize {
        self.houses.iter().map(|h| h.resident_count()).sum()
    }

    /// Rooms across all houses
    pub fn total_rooms(&self) -> usize {
        self.houses.iter().map(|h| h.room_count()).sum()
    }

    /// Beds across all houses
    pub fn total_capacity(&self) -> usize {
        self.houses.iter().map(|h| h.total_capacity()).sum()
    }

    /// Waitlisted students across all houses
    pub fn total_waitlisted(&self) -> usize {
        self.houses.iter().map(|h| h.waitlist_len()).sum()
    }

    /// Aggregate figures shown for the international house
    pub fn summary(&self) -> ComplexSummary {
        ComplexSummary {
            name: self.international.name.clone(),
            houses: self.houses.len(),
            rooms: self.total_rooms(),
            capacity: self.total_capacity(),
            residents: self.total_residents(),
            waitlisted: self.total_waitlisted(),
            unassigned: self.roster.unassigned().len(),
        }
    }

    /// Validate every house and the student back-references
    pub fn validate(&self) -> Result<(), String> {
        for (i, house) in self.houses.iter().enumerate() {
            if self.houses[..i].iter().any(|h| h.id == house.id) {
                return Err(format!("House {} is registered twice", house.id));
            }
            if let Err(e) = house.validate(&self.roster) {
                return Err(format!("House {} validation failed: {}", house.name(), e));
            }
        }

        // Students pointing at a house must be listed by it
        for student in self.roster.iter() {
            if let Some(house_id) = student.house() {
                let house = self
                    .get_house(house_id)
                    .ok_or_else(|| format!("Student {} points at unknown house {}", student.id, house_id))?;
                if !house.is_resident(student.id) && !house.is_waitlisted(student.id) {
                    return Err(format!(
                        "Student {} points at {} which does not list them",
                        student.id,
                        house.name()
                    ));
                }
            }
        }

        Ok(())
    }
}
