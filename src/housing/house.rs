//! Residential house management
//!
//! This module contains the House struct: its rooms, residents, FIFO waitlist
//! and per-nationality counters, together with the inscription and withdrawal
//! algorithms that keep them consistent.

use crate::allocation::error::{AllocationError, AllocationResult};
use crate::housing::agenda::Agenda;
use crate::housing::placement::{Placement, Withdrawal};
use crate::housing::profile::HouseProfile;
use crate::housing::room::Room;
use crate::student::{Roster, Student, Tenancy};
use crate::types::{HouseId, RoomId, SortOrder, StudentId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::warn;

/// Represents a residential house of the complex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    /// Unique identifier for the house
    pub id: HouseId,
    /// Descriptive details
    pub profile: HouseProfile,
    /// Rooms in creation order
    rooms: Vec<Room>,
    /// Seated students in arrival order
    residents: Vec<StudentId>,
    /// Students waiting for a room, head first
    waitlist: VecDeque<StudentId>,
    /// Distinct nationalities seen among residents, in first-seen order
    nationalities: Vec<String>,
    /// Resident count per nationality, index-aligned with `nationalities`
    nationality_counts: Vec<usize>,
    /// Scheduled events
    pub agenda: Agenda,
}

impl House {
    /// Create a new house with one room per capacity entry
    pub fn new(profile: HouseProfile, capacities: &[u32]) -> AllocationResult<Self> {
        let id = HouseId::new();
        let rooms = capacities
            .iter()
            .enumerate()
            .map(|(number, &capacity)| Room::new(id, number, capacity))
            .collect::<AllocationResult<Vec<_>>>()?;

        Ok(Self {
            id,
            profile,
            rooms,
            residents: Vec::new(),
            waitlist: VecDeque::new(),
            nationalities: Vec::new(),
            nationality_counts: Vec::new(),
            agenda: Agenda::new(),
        })
    }

    /// Display name of the house
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Get all rooms in creation order
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Get a room by ID
    pub fn get_room(&self, room_id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    /// Get the number of rooms in the house
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Sum of room capacities
    pub fn total_capacity(&self) -> usize {
        self.rooms.iter().map(|r| r.capacity() as usize).sum()
    }

    /// Seated students in arrival order
    pub fn residents(&self) -> &[StudentId] {
        &self.residents
    }

    /// Get the number of residents
    pub fn resident_count(&self) -> usize {
        self.residents.len()
    }

    /// Waitlisted students, head first
    pub fn waitlist(&self) -> impl Iterator<Item = StudentId> + '_ {
        self.waitlist.iter().copied()
    }

    /// Get the waitlist length
    pub fn waitlist_len(&self) -> usize {
        self.waitlist.len()
    }

    /// Check if a student is seated here
    pub fn is_resident(&self, student_id: StudentId) -> bool {
        self.residents.contains(&student_id)
    }

    /// Check if a student is queued here
    pub fn is_waitlisted(&self, student_id: StudentId) -> bool {
        self.waitlist.contains(&student_id)
    }

    /// Check if every bed is taken
    pub fn is_saturated(&self) -> bool {
        self.residents.len() >= self.total_capacity()
    }

    /// Check if the house has neither residents nor a waitlist
    pub fn is_empty(&self) -> bool {
        self.residents.is_empty() && self.waitlist.is_empty()
    }

    /// First room with a free bed, in creation order
    pub fn find_vacant_room(&self) -> AllocationResult<&Room> {
        self.rooms
            .iter()
            .find(|r| r.is_vacant())
            .ok_or(AllocationError::NoVacantRoom(self.id))
    }

    /// Check if any room has a free bed
    pub fn has_vacant_room(&self) -> bool {
        self.rooms.iter().any(|r| r.is_vacant())
    }

    /// Nationalities seen among residents, in first-seen order
    pub fn nationalities(&self) -> &[String] {
        &self.nationalities
    }

    /// Resident counts, index-aligned with [`House::nationalities`]
    pub fn nationality_counts(&self) -> &[usize] {
        &self.nationality_counts
    }

    /// Index of a nationality in the counter table
    pub fn nationality_index(&self, nationality: &str) -> Option<usize> {
        self.nationalities.iter().position(|n| n == nationality)
    }

    /// Add a nationality to the table if new; returns its index either way
    pub fn register_nationality(&mut self, nationality: &str) -> usize {
        match self.nationality_index(nationality) {
            Some(index) => index,
            None => {
                self.nationalities.push(nationality.to_string());
                self.nationality_counts.push(0);
                self.nationalities.len() - 1
            }
        }
    }

    /// Increment the resident count at a nationality index
    pub fn increment_nationality_count(&mut self, index: usize) -> AllocationResult<()> {
        let len = self.nationality_counts.len();
        let count = self
            .nationality_counts
            .get_mut(index)
            .ok_or(AllocationError::NationalityIndexOutOfRange { index, len })?;
        *count += 1;
        Ok(())
    }

    fn decrement_nationality_count(&mut self, nationality: &str) {
        if let Some(index) = self.nationality_index(nationality) {
            let count = &mut self.nationality_counts[index];
            *count = count.saturating_sub(1);
        }
    }

    /// Share of residents with the nationality at `index`, in percent
    ///
    /// Zero when the index is unknown or the house has no residents.
    pub fn occupancy_percentage(&self, index: Option<usize>) -> f64 {
        let residents = self.residents.len();
        match index.and_then(|i| self.nationality_counts.get(i)) {
            Some(&count) if residents > 0 => 100.0 * count as f64 / residents as f64,
            _ => 0.0,
        }
    }

    /// Share of residents with a given nationality, in percent
    pub fn nationality_share(&self, nationality: &str) -> f64 {
        self.occupancy_percentage(self.nationality_index(nationality))
    }

    /// Occupied beds over total beds, in percent
    pub fn occupancy_rate(&self) -> f64 {
        match self.total_capacity() {
            0 => 0.0,
            capacity => 100.0 * self.residents.len() as f64 / capacity as f64,
        }
    }

    /// Place a student in this house
    ///
    /// A student already attached to any house is left alone. Otherwise the
    /// student is seated in the first vacant room when the house is below
    /// capacity, or appended to the waitlist.
    pub fn inscribe_student(&mut self, student: &mut Student) -> AllocationResult<Placement> {
        if let Some(house) = student.house() {
            return Ok(Placement::AlreadyAssigned { house });
        }
        if self.is_waitlisted(student.id) {
            return Ok(Placement::AlreadyAssigned { house: self.id });
        }

        if self.residents.len() < self.total_capacity() {
            if let Some(room_idx) = self.rooms.iter().position(|r| r.is_vacant()) {
                let room = &mut self.rooms[room_idx];
                room.add_occupant(student)?;
                let room_id = room.id;

                self.residents.push(student.id);
                let index = self.register_nationality(&student.nationality);
                self.increment_nationality_count(index)?;

                return Ok(Placement::Resident { house: self.id, room: room_id });
            }
        }

        let position = self.add_to_waitlist(student)?;
        Ok(Placement::Waitlisted { house: self.id, position })
    }

    /// Append a student to the waitlist; returns the zero-based position
    pub fn add_to_waitlist(&mut self, student: &mut Student) -> AllocationResult<usize> {
        if self.is_waitlisted(student.id) {
            return Err(AllocationError::AlreadyWaitlisted { house: self.id, student: student.id });
        }

        self.waitlist.push_back(student.id);
        student.tenancy = Tenancy::Waitlisted { house: self.id };
        Ok(self.waitlist.len() - 1)
    }

    /// Take a student out of this house
    ///
    /// A resident frees their bed and the head of the waitlist, if any, is
    /// inscribed in their place. A waitlisted student simply leaves the queue.
    pub fn withdraw_student(
        &mut self,
        student_id: StudentId,
        roster: &mut Roster,
    ) -> AllocationResult<Withdrawal> {
        if self.is_resident(student_id) {
            let house_id = self.id;
            let student = roster.require_mut(student_id)?;
            let nationality = student.nationality.clone();

            let room = self
                .rooms
                .iter_mut()
                .find(|r| r.contains(student_id))
                .ok_or(AllocationError::ResidentWithoutRoom { house: house_id, student: student_id })?;
            room.remove_occupant(student_id);
            let room_id = room.id;
            student.detach();
            self.residents.retain(|&id| id != student_id);
            self.decrement_nationality_count(&nationality);

            let promoted = self.promote_head(roster)?;
            return Ok(Withdrawal::Vacated { house: self.id, room: room_id, promoted });
        }

        if self.remove_from_waitlist(student_id) {
            if let Some(student) = roster.get_mut(student_id) {
                student.detach();
            }
            return Ok(Withdrawal::LeftWaitlist { house: self.id });
        }

        Ok(Withdrawal::NotPresent)
    }

    /// Inscribe the head of the waitlist, skipping ids missing from the roster
    fn promote_head(&mut self, roster: &mut Roster) -> AllocationResult<Option<StudentId>> {
        while let Some(next) = self.waitlist.pop_front() {
            let Some(student) = roster.get_mut(next) else {
                warn!(student = %next, house = %self.id, "Dropping unknown student from waitlist");
                continue;
            };
            student.detach();
            return match self.inscribe_student(student)? {
                Placement::Resident { .. } => Ok(Some(next)),
                _ => Ok(None),
            };
        }
        Ok(None)
    }

    fn remove_from_waitlist(&mut self, student_id: StudentId) -> bool {
        match self.waitlist.iter().position(|&id| id == student_id) {
            Some(pos) => {
                self.waitlist.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Empty every room and the waitlist
    ///
    /// Returns former residents in arrival order followed by the waitlist in
    /// queue order, all detached.
    pub fn evacuate(&mut self, roster: &mut Roster) -> Vec<StudentId> {
        let mut evicted: Vec<StudentId> = self.residents.drain(..).collect();
        evicted.extend(self.waitlist.drain(..));

        for room in &mut self.rooms {
            for id in room.occupants().to_vec() {
                room.remove_occupant(id);
            }
        }
        for count in &mut self.nationality_counts {
            *count = 0;
        }
        for &id in &evicted {
            if let Some(student) = roster.get_mut(id) {
                student.detach();
            }
        }

        evicted
    }

    /// Residents then waitlisted students, each group ordered by name
    ///
    /// The waitlist itself keeps its arrival order.
    pub fn sorted_students<'r>(&self, roster: &'r Roster, order: SortOrder) -> Vec<&'r Student> {
        let by_name = |a: &&Student, b: &&Student| {
            let ordering =
                a.surname.cmp(&b.surname).then_with(|| a.given_name.cmp(&b.given_name));
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        };

        let mut residents: Vec<&Student> =
            self.residents.iter().filter_map(|&id| roster.get(id)).collect();
        let mut waiting: Vec<&Student> =
            self.waitlist.iter().filter_map(|&id| roster.get(id)).collect();
        residents.sort_by(by_name);
        waiting.sort_by(by_name);

        residents.extend(waiting);
        residents
    }

    /// Check rooms, residents, waitlist and counters against each other
    pub fn validate(&self, roster: &Roster) -> Result<(), String> {
        for room in &self.rooms {
            room.validate()?;
            if room.house_id != self.id {
                return Err(format!("Room {} does not belong to house {}", room.id, self.id));
            }
        }

        let seated: usize = self.rooms.iter().map(|r| r.occupant_count()).sum();
        if seated != self.residents.len() {
            return Err(format!(
                "House {} seats {} occupants but lists {} residents",
                self.name(),
                seated,
                self.residents.len()
            ));
        }

        let mut tally: HashMap<&str, usize> = HashMap::new();
        for &id in &self.residents {
            let rooms: Vec<&Room> = self.rooms.iter().filter(|r| r.contains(id)).collect();
            let [room] = rooms.as_slice() else {
                return Err(format!("Resident {} is in {} rooms of {}", id, rooms.len(), self.name()));
            };
            let student = roster
                .get(id)
                .ok_or_else(|| format!("Resident {} of {} is not in the roster", id, self.name()))?;
            if student.tenancy != (Tenancy::Resident { house: self.id, room: room.id }) {
                return Err(format!("Resident {} has stale back-references", id));
            }
            *tally.entry(student.nationality.as_str()).or_insert(0) += 1;
        }

        for (i, &id) in self.waitlist.iter().enumerate() {
            if self.residents.contains(&id) {
                return Err(format!("Student {} is both resident and waitlisted", id));
            }
            if self.waitlist.iter().skip(i + 1).any(|&other| other == id) {
                return Err(format!("Student {} is waitlisted twice", id));
            }
            match roster.get(id) {
                Some(s) if s.tenancy == (Tenancy::Waitlisted { house: self.id }) => {}
                Some(_) => return Err(format!("Waitlisted student {} has stale back-references", id)),
                None => return Err(format!("Waitlisted student {} is not in the roster", id)),
            }
        }

        if self.nationalities.len() != self.nationality_counts.len() {
            return Err("Nationality table and counters differ in length".to_string());
        }
        for (nationality, &count) in self.nationalities.iter().zip(&self.nationality_counts) {
            let actual = tally.remove(nationality.as_str()).unwrap_or(0);
            if actual != count {
                return Err(format!(
                    "Counter for {} is {} but {} resident(s) hold that nationality",
                    nationality, count, actual
                ));
            }
        }
        if let Some((nationality, _)) = tally.into_iter().next() {
            return Err(format!("Nationality {} is missing from the counter table", nationality));
        }

        self.agenda.validate()
    }
}
