//! Student arena with id lookup
//!
//! The roster owns every student of the complex. Houses, rooms and events only
//! hold [`StudentId`]s and resolve them here.

use crate::allocation::error::{AllocationError, AllocationResult};
use crate::student::Student;
use crate::types::StudentId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All students known to the complex, in admission order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Student>", into = "Vec<Student>")]
pub struct Roster {
    students: Vec<Student>,
    /// Quick lookup map from student ID to index
    index: HashMap<StudentId, usize>,
}

impl From<Vec<Student>> for Roster {
    fn from(students: Vec<Student>) -> Self {
        let mut roster = Self { students, index: HashMap::new() };
        roster.rebuild_indices();
        roster
    }
}

impl From<Roster> for Vec<Student> {
    fn from(roster: Roster) -> Self {
        roster.students
    }
}

impl Roster {
    /// Create a new empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a student to the roster
    ///
    /// A student whose id is already enrolled replaces nothing and is ignored.
    pub fn enroll(&mut self, student: Student) -> StudentId {
        let id = student.id;
        if !self.index.contains_key(&id) {
            self.index.insert(id, self.students.len());
            self.students.push(student);
        }
        id
    }

    /// Remove a student from the roster and hand back the record
    pub fn discharge(&mut self, student_id: StudentId) -> Option<Student> {
        let idx = self.index.remove(&student_id)?;
        let student = self.students.remove(idx);
        self.rebuild_indices();
        Some(student)
    }

    /// Rebuild the internal index (call after modifying students directly)
    pub fn rebuild_indices(&mut self) {
        self.index.clear();
        for (idx, student) in self.students.iter().enumerate() {
            self.index.insert(student.id, idx);
        }
    }

    /// Get a student by ID
    pub fn get(&self, student_id: StudentId) -> Option<&Student> {
        self.index.get(&student_id).and_then(|&idx| self.students.get(idx))
    }

    /// Get a mutable student by ID
    pub fn get_mut(&mut self, student_id: StudentId) -> Option<&mut Student> {
        match self.index.get(&student_id) {
            Some(&idx) => self.students.get_mut(idx),
            None => None,
        }
    }

    /// Get a mutable student by ID, failing with `UnknownStudent`
    pub fn require_mut(&mut self, student_id: StudentId) -> AllocationResult<&mut Student> {
        self.get_mut(student_id).ok_or(AllocationError::UnknownStudent(student_id))
    }

    /// Check if a student is enrolled
    pub fn contains(&self, student_id: StudentId) -> bool {
        self.index.contains_key(&student_id)
    }

    /// Students sharing a surname and given name, in admission order
    pub fn find_by_name(&self, surname: &str, given_name: &str) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|s| s.surname == surname && s.given_name == given_name)
            .collect()
    }

    /// Iterate over all students in admission order
    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    /// Students not attached to any house
    pub fn unassigned(&self) -> Vec<&Student> {
        self.students.iter().filter(|s| s.is_unassigned()).collect()
    }

    /// Get the number of students
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Check if the roster is empty
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enroll_and_lookup() {
        let mut roster = Roster::new();
        let id = roster.enroll(Student::new("Douglas", "Alfred", "Français"));

        assert_eq!(roster.len(), 1);
        assert!(roster.contains(id));
        assert_eq!(roster.get(id).map(|s| s.surname.as_str()), Some("Douglas"));
    }

    #[test]
    fn test_enroll_same_id_twice_is_ignored() {
        let mut roster = Roster::new();
        let student = Student::new("Crude", "Donatien", "Français");

        roster.enroll(student.clone());
        roster.enroll(student);

        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_discharge_keeps_lookup_consistent() {
        let mut roster = Roster::new();
        let first = roster.enroll(Student::new("Douglas", "Alfred", "Français"));
        let second = roster.enroll(Student::new("Crude", "Donatien", "Français"));
        let third = roster.enroll(Student::new("Nolan", "Louis", "Italien"));

        let removed = roster.discharge(first).unwrap();
        assert_eq!(removed.surname, "Douglas");
        assert!(!roster.contains(first));

        // Later entries are still reachable after the shift
        assert_eq!(roster.get(second).unwrap().surname, "Crude");
        assert_eq!(roster.get(third).unwrap().surname, "Nolan");
        assert!(roster.discharge(first).is_none());
    }

    #[test]
    fn test_require_mut_unknown_student() {
        let mut roster = Roster::new();
        let missing = StudentId::new();

        assert!(matches!(
            roster.require_mut(missing),
            Err(AllocationError::UnknownStudent(id)) if id == missing
        ));
    }

    #[test]
    fn test_find_by_name_returns_homonyms() {
        let mut roster = Roster::new();
        roster.enroll(Student::new("Martin", "Julie", "Français"));
        roster.enroll(Student::new("Martin", "Julie", "Belge"));
        roster.enroll(Student::new("Martin", "Paul", "Français"));

        assert_eq!(roster.find_by_name("Martin", "Julie").len(), 2);
    }

    #[test]
    fn test_roster_serialization_rebuilds_index() {
        let mut roster = Roster::new();
        let id = roster.enroll(Student::new("Bayashi", "Kentaro", "Japonais"));

        let json = serde_json::to_string(&roster).unwrap();
        // Serialized as a plain list of students
        assert!(json.starts_with('['));

        let back: Roster = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(id).unwrap().given_name, "Kentaro");
    }
}
