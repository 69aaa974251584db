//! House event agenda
//!
//! Each house keeps a date-ordered list of events. Two events may not share
//! the exact same date and time.

use crate::allocation::error::{AllocationError, AllocationResult};
use crate::types::{EventId, StudentId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// An event organised by a house
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier for the event
    pub id: EventId,
    /// Event title
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Date and time of the event
    pub date: NaiveDateTime,
    /// Registered students in registration order
    pub attendees: Vec<StudentId>,
}

impl Event {
    /// Create a new event with no attendees
    pub fn new(name: impl Into<String>, description: impl Into<String>, date: NaiveDateTime) -> Self {
        Self {
            id: EventId::new(),
            name: name.into(),
            description: description.into(),
            date,
            attendees: Vec::new(),
        }
    }

    /// Register a student; returns false if already registered
    pub fn register(&mut self, student_id: StudentId) -> bool {
        if self.attendees.contains(&student_id) {
            return false;
        }
        self.attendees.push(student_id);
        true
    }

    /// Number of registered students
    pub fn attendee_count(&self) -> usize {
        self.attendees.len()
    }

    /// Day of the event as `YYYY-MM-DD`
    pub fn day_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Time of the event as `HH:MM:SS`
    pub fn time_label(&self) -> String {
        self.date.format("%H:%M:%S").to_string()
    }
}

/// Date-ordered list of events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Agenda {
    events: Vec<Event>,
}

impl Agenda {
    /// Create an empty agenda
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event keeping date order
    ///
    /// An event whose date collides exactly with a scheduled one is not
    /// inserted and `false` is returned.
    pub fn schedule(&mut self, event: Event) -> bool {
        if self.events.iter().any(|e| e.date == event.date) {
            warn!(
                event = %event.name,
                date = %event.date,
                "Event rejected: another event is already scheduled at that date"
            );
            return false;
        }

        let pos = self.events.partition_point(|e| e.date < event.date);
        self.events.insert(pos, event);
        true
    }

    /// Remove an event by ID
    pub fn unschedule(&mut self, event_id: EventId) -> Option<Event> {
        let pos = self.events.iter().position(|e| e.id == event_id)?;
        Some(self.events.remove(pos))
    }

    /// Get an event by ID
    pub fn get(&self, event_id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == event_id)
    }

    /// Register a student to an event
    ///
    /// Returns whether the student was newly registered.
    pub fn register_attendee(
        &mut self,
        event_id: EventId,
        student_id: StudentId,
    ) -> AllocationResult<bool> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or(AllocationError::UnknownEvent(event_id))?;
        Ok(event.register(student_id))
    }

    /// Remove a student from every event; returns how many lists changed
    pub fn discharge_attendee(&mut self, student_id: StudentId) -> usize {
        let mut changed = 0;
        for event in &mut self.events {
            let before = event.attendees.len();
            event.attendees.retain(|&id| id != student_id);
            if event.attendees.len() != before {
                changed += 1;
            }
        }
        changed
    }

    /// Iterate over events in date order
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Events strictly after the given date
    pub fn upcoming(&self, after: NaiveDateTime) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.date > after)
    }

    /// Number of scheduled events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if nothing is scheduled
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Check that events are in strictly increasing date order
    pub fn validate(&self) -> Result<(), String> {
        for pair in self.events.windows(2) {
            if pair[0].date >= pair[1].date {
                return Err(format!(
                    "Events '{}' and '{}' are out of order or share a date",
                    pair[0].name, pair[1].name
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn base_date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap().and_hms_opt(20, 0, 0).unwrap()
    }

    #[test]
    fn test_schedule_keeps_date_order() {
        let mut agenda = Agenda::new();
        let start = base_date();

        assert!(agenda.schedule(Event::new("Soirée Pyjama", "", start + Duration::days(5))));
        assert!(agenda.schedule(Event::new("Soirée Salsa", "", start + Duration::days(1))));
        assert!(agenda.schedule(Event::new("Soirée Karaoké", "", start + Duration::days(4))));

        let names: Vec<_> = agenda.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Soirée Salsa", "Soirée Karaoké", "Soirée Pyjama"]);
        assert!(agenda.validate().is_ok());
    }

    #[test]
    fn test_schedule_rejects_exact_date_collision() {
        let mut agenda = Agenda::new();
        let date = base_date();

        assert!(agenda.schedule(Event::new("Soirée Cinéma", "", date)));
        assert!(!agenda.schedule(Event::new("Soirée Déguisée", "", date)));
        assert_eq!(agenda.len(), 1);

        // One second later is fine
        assert!(agenda.schedule(Event::new("Soirée Déguisée", "", date + Duration::seconds(1))));
    }

    #[test]
    fn test_unschedule() {
        let mut agenda = Agenda::new();
        let event = Event::new("Soirée Salsa", "Ambiance latino festive", base_date());
        let id = event.id;
        agenda.schedule(event);

        let removed = agenda.unschedule(id).unwrap();
        assert_eq!(removed.name, "Soirée Salsa");
        assert!(agenda.is_empty());
        assert!(agenda.unschedule(id).is_none());
    }

    #[test]
    fn test_register_attendee_is_idempotent() {
        let mut agenda = Agenda::new();
        let event = Event::new("Soirée Salsa", "", base_date());
        let event_id = event.id;
        agenda.schedule(event);

        let student = StudentId::new();
        assert!(agenda.register_attendee(event_id, student).unwrap());
        assert!(!agenda.register_attendee(event_id, student).unwrap());
        assert_eq!(agenda.get(event_id).unwrap().attendee_count(), 1);
    }

    #[test]
    fn test_register_attendee_unknown_event() {
        let mut agenda = Agenda::new();
        let result = agenda.register_attendee(EventId::new(), StudentId::new());
        assert!(matches!(result, Err(AllocationError::UnknownEvent(_))));
    }

    #[test]
    fn test_discharge_attendee() {
        let mut agenda = Agenda::new();
        let student = StudentId::new();
        let mut first = Event::new("A", "", base_date());
        let mut second = Event::new("B", "", base_date() + Duration::hours(1));
        first.register(student);
        second.register(StudentId::new());
        agenda.schedule(first);
        agenda.schedule(second);

        assert_eq!(agenda.discharge_attendee(student), 1);
        assert!(agenda.iter().all(|e| !e.attendees.contains(&student)));
    }

    #[test]
    fn test_event_labels() {
        let event = Event::new("Soirée Cinéma", "", base_date());
        assert_eq!(event.day_label(), "2025-03-14");
        assert_eq!(event.time_label(), "20:00:00");
    }

    #[test]
    fn test_upcoming() {
        let mut agenda = Agenda::new();
        let start = base_date();
        agenda.schedule(Event::new("past", "", start - Duration::days(1)));
        agenda.schedule(Event::new("future", "", start + Duration::days(1)));

        let upcoming: Vec<_> = agenda.upcoming(start).map(|e| e.name.as_str()).collect();
        assert_eq!(upcoming, vec!["future"]);
    }
}
