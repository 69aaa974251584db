//! Allocation service
//!
//! This module contains the AllocationService: the owner of the complex, its
//! snapshot store and the engine configuration. Every mutation of the
//! housing graph goes through it so that the autosave policy applies.

use crate::allocation::error::AllocationResult;
use crate::allocation::snapshot::{JsonFileStore, SnapshotStore};
use crate::engine_event;
use crate::housing::{
    default_complex, Complex, ComplexSummary, Event, House, HouseDetailsPatch, HouseDraft,
    HouseProfile, HouseRemoval, Placement, Withdrawal,
};
use crate::student::Student;
use crate::types::{AutosavePolicy, EngineConfig, EventId, HouseId, StudentId};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

/// Details of a student to admit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    /// Family name
    pub surname: String,
    /// First name
    pub given_name: String,
    /// Nationality label matched against house nationalities
    pub nationality: String,
    /// House to inscribe the student into, bypassing the assignment policy
    pub preferred_house: Option<HouseId>,
}

impl NewStudent {
    /// Describe a student routed by the assignment policy
    pub fn new(
        surname: impl Into<String>,
        given_name: impl Into<String>,
        nationality: impl Into<String>,
    ) -> Self {
        Self {
            surname: surname.into(),
            given_name: given_name.into(),
            nationality: nationality.into(),
            preferred_house: None,
        }
    }

    /// Ask for a specific house
    pub fn preferring(mut self, house: HouseId) -> Self {
        self.preferred_house = Some(house);
        self
    }

    fn into_student(self) -> Student {
        match self.preferred_house {
            Some(house) => {
                Student::with_preference(self.surname, self.given_name, self.nationality, house)
            }
            None => Student::new(self.surname, self.given_name, self.nationality),
        }
    }
}

/// Owner of the housing graph and its persistence
#[derive(Debug)]
pub struct AllocationService<S: SnapshotStore = JsonFileStore> {
    /// Engine configuration
    config: EngineConfig,
    /// Snapshot slot
    store: S,
    /// Current housing graph
    complex: Complex,
    /// Slot holds an unusable snapshot that must be set aside before writing
    slot_untrusted: bool,
}

impl AllocationService<JsonFileStore> {
    /// Open the snapshot file named by the configuration
    pub fn open(config: EngineConfig) -> AllocationResult<Self> {
        let store = JsonFileStore::new(config.snapshot_path.clone());
        Self::with_store(config, store)
    }
}

impl<S: SnapshotStore> AllocationService<S> {
    /// Load the complex from a store
    ///
    /// An empty slot or an undecodable, inconsistent or unreadable snapshot
    /// gives way to the default dataset. Only an empty slot is written right
    /// away; an unusable snapshot stays where it is until the next save moves
    /// it aside.
    #[instrument(skip(config, store), fields(autosave = %config.autosave))]
    pub fn with_store(config: EngineConfig, store: S) -> AllocationResult<Self> {
        let (complex, slot_empty, slot_untrusted) = match store.load() {
            Ok(Some(complex)) => {
                info!(
                    houses = complex.house_count(),
                    students = complex.roster().len(),
                    "Snapshot loaded"
                );
                (complex, false, false)
            }
            Ok(None) => {
                info!("No snapshot found, bootstrapping default dataset");
                (default_complex()?, true, false)
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unusable snapshot, bootstrapping default dataset");
                (default_complex()?, false, true)
            }
        };

        let mut service = Self { config, store, complex, slot_untrusted };
        if slot_empty {
            service.autosave();
        }
        Ok(service)
    }

    /// Current housing graph
    pub fn complex(&self) -> &Complex {
        &self.complex
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot slot
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Aggregate figures of the complex
    pub fn summary(&self) -> ComplexSummary {
        self.complex.summary()
    }

    /// Find a residential house by name, ignoring case
    pub fn find_house(&self, name: &str) -> Option<&House> {
        self.complex.house_by_name(name)
    }

    /// Create a student and route them to a house
    #[instrument(skip(self, new_student), fields(surname = %new_student.surname, nationality = %new_student.nationality))]
    pub fn admit_student(&mut self, new_student: NewStudent) -> AllocationResult<(StudentId, Placement)> {
        let homonyms = self
            .complex
            .roster()
            .find_by_name(&new_student.surname, &new_student.given_name)
            .len();
        if homonyms > 0 {
            warn!(
                given_name = %new_student.given_name,
                homonyms,
                "Admitting a student who shares a name with an enrolled student"
            );
        }

        let (student_id, placement) = self.complex.admit(new_student.into_student())?;
        match placement {
            Placement::Unplaced => {
                warn!(student = %student_id, "No residential house to receive the student")
            }
            _ => engine_event!(
                info,
                "Student admitted",
                student = display(student_id),
                placement = display(placement)
            ),
        }

        self.autosave();
        Ok((student_id, placement))
    }

    /// Withdraw a student from their house and remove them from the complex
    ///
    /// Returns what happened in the house and the detached record.
    #[instrument(skip(self), fields(student = %student_id))]
    pub fn withdraw_student(&mut self, student_id: StudentId) -> AllocationResult<(Withdrawal, Student)> {
        let (withdrawal, student) = self.complex.discharge(student_id)?;

        match withdrawal {
            Withdrawal::Vacated { house, room, promoted } => {
                engine_event!(info, "Room vacated", house = display(house), room = display(room));
                if let Some(promoted) = promoted {
                    engine_event!(
                        info,
                        "Waitlisted student promoted",
                        house = display(house),
                        student = display(promoted)
                    );
                }
            }
            Withdrawal::LeftWaitlist { house } => {
                engine_event!(info, "Student left waitlist", house = display(house));
            }
            Withdrawal::NotPresent => debug!("Student was attached to no house"),
        }

        self.autosave();
        Ok((withdrawal, student))
    }

    /// Add a residential house
    ///
    /// A draft without capacities gets the configured default room layout.
    #[instrument(skip(self, draft), fields(name = %draft.profile.name))]
    pub fn add_house(&mut self, draft: HouseDraft) -> AllocationResult<HouseId> {
        if self.complex.house_by_name(&draft.profile.name).is_some() {
            warn!("A house with this name already exists");
        }

        let capacities = if draft.capacities.is_empty() {
            self.config.default_room_layout()
        } else {
            draft.capacities
        };
        let house = House::new(draft.profile, &capacities)?;
        let house_id = self.complex.add_house(house);

        engine_event!(info, "House added", house = display(house_id), rooms = capacities.len());
        self.autosave();
        Ok(house_id)
    }

    /// Remove a residential house following the configured removal policy
    #[instrument(skip(self), fields(house = %house_id))]
    pub fn remove_house(&mut self, house_id: HouseId) -> AllocationResult<HouseRemoval> {
        let policy = self.config.removal_policy;
        debug!(%policy, "Removing house");
        let removal = self.complex.remove_house(house_id, policy)?;

        for (student, placement) in &removal.rerouted {
            debug!(student = %student, placement = %placement, "Student rerouted");
        }
        engine_event!(
            info,
            "House removed",
            name = removal.name.as_str(),
            rerouted = removal.rerouted.len()
        );

        self.autosave();
        Ok(removal)
    }

    /// Patch the descriptive details of a house; returns the updated profile
    #[instrument(skip(self, patch), fields(house = %house_id))]
    pub fn update_house_details(
        &mut self,
        house_id: HouseId,
        patch: HouseDetailsPatch,
    ) -> AllocationResult<HouseProfile> {
        let profile = self.complex.update_house_details(house_id, patch)?.profile.clone();
        info!(name = %profile.name, "House details updated");
        self.autosave();
        Ok(profile)
    }

    /// Add an event to a house agenda; false when the date is already taken
    #[instrument(skip(self, event), fields(house = %house_id, event = %event.name))]
    pub fn schedule_event(&mut self, house_id: HouseId, event: Event) -> AllocationResult<bool> {
        let scheduled = self.complex.schedule_event(house_id, event)?;
        if scheduled {
            info!("Event scheduled");
            self.autosave();
        }
        Ok(scheduled)
    }

    /// Remove an event from a house agenda
    #[instrument(skip(self), fields(house = %house_id, event = %event_id))]
    pub fn unschedule_event(&mut self, house_id: HouseId, event_id: EventId) -> AllocationResult<Event> {
        let event = self.complex.unschedule_event(house_id, event_id)?;
        info!(name = %event.name, "Event removed");
        self.autosave();
        Ok(event)
    }

    /// Register a student to an event; false when already registered
    #[instrument(skip(self), fields(house = %house_id, event = %event_id, student = %student_id))]
    pub fn register_attendee(
        &mut self,
        house_id: HouseId,
        event_id: EventId,
        student_id: StudentId,
    ) -> AllocationResult<bool> {
        let registered = self.complex.register_attendee(house_id, event_id, student_id)?;
        if registered {
            self.autosave();
        } else {
            debug!("Student already registered");
        }
        Ok(registered)
    }

    /// Replace the whole graph with the default dataset
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> AllocationResult<()> {
        self.complex = default_complex()?;
        engine_event!(info, "Complex reset to default dataset");
        self.autosave();
        Ok(())
    }

    /// Write the snapshot; failures are logged and otherwise ignored
    ///
    /// An unusable snapshot found at load time is set aside first and the
    /// slot is left alone when that fails.
    pub fn save(&mut self) {
        if self.slot_untrusted {
            if let Err(e) = self.store.set_aside() {
                error!(error = %e, category = e.category(), "Failed to set aside unusable snapshot");
                return;
            }
            warn!("Unusable snapshot set aside");
            self.slot_untrusted = false;
        }

        match self.store.save(&self.complex) {
            Ok(()) => debug!("Snapshot saved"),
            Err(e) => error!(error = %e, category = e.category(), "Failed to save snapshot"),
        }
    }

    fn autosave(&mut self) {
        if self.config.autosave == AutosavePolicy::AfterEachMutation {
            self.save();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::error::AllocationError;
    use crate::allocation::snapshot::MemoryStore;
    use chrono::NaiveDate;

    fn small_complex() -> Complex {
        let mut complex = Complex::new(HouseProfile::new("Maison internationale", None, "", ""));
        complex.add_house(
            House::new(HouseProfile::new("Maison A", Some("Français".to_string()), "", ""), &[1])
                .unwrap(),
        );
        complex.add_house(House::new(HouseProfile::new("Maison B", None, "", ""), &[1, 1]).unwrap());
        complex
    }

    fn service_with(complex: &Complex, config: EngineConfig) -> AllocationService<MemoryStore> {
        let mut store = MemoryStore::new();
        store.save(complex).unwrap();
        AllocationService::with_store(config, store).unwrap()
    }

    fn manual() -> EngineConfig {
        EngineConfig { autosave: AutosavePolicy::Manual, ..Default::default() }
    }

    /// Store whose writes always fail
    #[derive(Debug, Default)]
    struct BrokenStore;

    impl SnapshotStore for BrokenStore {
        fn load(&self) -> AllocationResult<Option<Complex>> {
            Err(AllocationError::snapshot_unavailable("broken"))
        }

        fn save(&mut self, _complex: &Complex) -> AllocationResult<()> {
            Err(AllocationError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")))
        }

        fn set_aside(&mut self) -> AllocationResult<()> {
            Err(AllocationError::Io(std::io::Error::new(std::io::ErrorKind::Other, "read-only")))
        }
    }

    #[test]
    fn test_empty_store_bootstraps_default_dataset() {
        let service = AllocationService::with_store(EngineConfig::default(), MemoryStore::new()).unwrap();

        assert_eq!(service.complex().house_count(), 4);
        assert_eq!(service.complex().roster().len(), 9);
        // Bootstrapped graph is persisted right away
        assert!(service.store().content().is_some());
    }

    #[test]
    fn test_corrupt_store_is_kept_until_next_save() {
        let store = MemoryStore::with_content("[1, 2, 3]");
        let mut service = AllocationService::with_store(EngineConfig::default(), store).unwrap();

        assert_eq!(service.complex().house_count(), 4);
        let _ = service.summary();
        assert_eq!(service.store().content(), Some("[1, 2, 3]"));

        let (id, _) = service.admit_student(NewStudent::new("Douglas", "Alfred", "Français")).unwrap();

        assert_eq!(service.store().set_aside_content(), Some("[1, 2, 3]"));
        assert!(service.store().load().unwrap().unwrap().student(id).is_some());
    }

    #[test]
    fn test_unusable_slot_is_not_overwritten_when_set_aside_fails() {
        let mut service = AllocationService::with_store(EngineConfig::default(), BrokenStore).unwrap();
        assert!(service.slot_untrusted);

        service.save();

        assert!(service.slot_untrusted);
    }

    #[test]
    fn test_admit_routes_and_autosaves() {
        let complex = small_complex();
        let mut service = service_with(&complex, EngineConfig::default());

        let (id, placement) = service.admit_student(NewStudent::new("Douglas", "Alfred", "Français")).unwrap();

        assert_eq!(placement.house(), Some(complex.houses()[0].id));
        let reloaded = service.store().load().unwrap().unwrap();
        assert!(reloaded.student(id).unwrap().is_resident());
    }

    #[test]
    fn test_manual_policy_saves_only_on_request() {
        let complex = small_complex();
        let mut service = service_with(&complex, manual());
        let (id, _) = service.admit_student(NewStudent::new("Douglas", "Alfred", "Français")).unwrap();

        assert!(service.store().load().unwrap().unwrap().student(id).is_none());

        service.save();
        assert!(service.store().load().unwrap().unwrap().student(id).is_some());
    }

    #[test]
    fn test_admit_with_unknown_preference_creates_nothing() {
        let mut service = service_with(&small_complex(), EngineConfig::default());

        let result = service.admit_student(NewStudent::new("X", "Y", "Z").preferring(HouseId::new()));

        assert!(matches!(result, Err(AllocationError::UnknownHouse(_))));
        assert!(service.complex().roster().is_empty());
    }

    #[test]
    fn test_homonyms_are_distinct_students() {
        let mut service = service_with(&small_complex(), EngineConfig::default());

        let (first, _) = service.admit_student(NewStudent::new("Martin", "Paul", "Belge")).unwrap();
        let (second, _) = service.admit_student(NewStudent::new("Martin", "Paul", "Belge")).unwrap();

        assert_ne!(first, second);
        assert_eq!(service.complex().roster().len(), 2);
    }

    #[test]
    fn test_withdraw_promotes_and_discharges() {
        let complex = small_complex();
        let house_a = complex.houses()[0].id;
        let mut service = service_with(&complex, EngineConfig::default());
        let (first, _) = service.admit_student(NewStudent::new("A", "A", "Français")).unwrap();
        let (second, placement) = service.admit_student(NewStudent::new("B", "B", "Français")).unwrap();
        assert_eq!(placement, Placement::Waitlisted { house: house_a, position: 0 });

        let (withdrawal, student) = service.withdraw_student(first).unwrap();

        assert_eq!(withdrawal.promoted(), Some(second));
        assert!(student.is_unassigned());
        assert!(service.complex().student(first).is_none());
        assert!(service.complex().student(second).unwrap().is_resident());
        assert!(service.complex().validate().is_ok());
    }

    #[test]
    fn test_add_house_uses_default_layout() {
        let config = EngineConfig {
            new_house_room_count: 3,
            new_house_room_capacity: 2,
            ..Default::default()
        };
        let mut service = service_with(&small_complex(), config);

        let id = service
            .add_house(HouseDraft::new(HouseProfile::new("Maison C", None, "", "")))
            .unwrap();
        let house = service.complex().get_house(id).unwrap();
        assert_eq!(house.room_count(), 3);
        assert_eq!(house.total_capacity(), 6);

        let explicit = service
            .add_house(
                HouseDraft::new(HouseProfile::new("Maison D", None, "", "")).with_capacities(vec![4]),
            )
            .unwrap();
        assert_eq!(service.complex().get_house(explicit).unwrap().total_capacity(), 4);
    }

    #[test]
    fn test_add_house_rejects_zero_capacity() {
        let mut service = service_with(&small_complex(), EngineConfig::default());

        let result = service.add_house(
            HouseDraft::new(HouseProfile::new("Maison C", None, "", "")).with_capacities(vec![1, 0]),
        );

        assert!(matches!(result, Err(AllocationError::InvalidCapacity(_))));
        assert_eq!(service.complex().house_count(), 2);
    }

    #[test]
    fn test_remove_house_follows_configured_policy() {
        let complex = small_complex();
        let house_a = complex.houses()[0].id;
        let house_b = complex.houses()[1].id;

        let mut forbid = service_with(&complex, EngineConfig::default());
        forbid.admit_student(NewStudent::new("A", "A", "Français")).unwrap();
        assert!(matches!(forbid.remove_house(house_a), Err(AllocationError::HouseNotEmpty { .. })));

        let config = EngineConfig {
            removal_policy: crate::types::HouseRemovalPolicy::Reassign,
            ..Default::default()
        };
        let mut reassign = service_with(&complex, config);
        let (id, _) = reassign.admit_student(NewStudent::new("A", "A", "Français")).unwrap();
        let removal = reassign.remove_house(house_a).unwrap();

        assert_eq!(removal.name, "Maison A");
        assert_eq!(removal.rerouted[0].0, id);
        assert_eq!(reassign.complex().student(id).unwrap().house(), Some(house_b));
    }

    #[test]
    fn test_update_details_and_find_house() {
        let complex = small_complex();
        let house_b = complex.houses()[1].id;
        let mut service = service_with(&complex, EngineConfig::default());

        let profile = service
            .update_house_details(
                house_b,
                HouseDetailsPatch {
                    name: Some("Maison du Brésil".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(profile.name, "Maison du Brésil");
        assert_eq!(service.find_house("maison du brésil").unwrap().id, house_b);
        assert!(service.find_house("Maison B").is_none());
    }

    #[test]
    fn test_agenda_operations() {
        let complex = small_complex();
        let house_a = complex.houses()[0].id;
        let mut service = service_with(&complex, EngineConfig::default());
        let (student, _) = service.admit_student(NewStudent::new("A", "A", "Français")).unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(20, 0, 0).unwrap();
        let event = Event::new("Soirée Salsa", "", date);
        let event_id = event.id;

        assert!(service.schedule_event(house_a, event).unwrap());
        assert!(!service.schedule_event(house_a, Event::new("Collision", "", date)).unwrap());
        assert!(service.register_attendee(house_a, event_id, student).unwrap());
        assert!(!service.register_attendee(house_a, event_id, student).unwrap());

        let removed = service.unschedule_event(house_a, event_id).unwrap();
        assert_eq!(removed.attendees, vec![student]);
        assert!(matches!(
            service.unschedule_event(house_a, event_id),
            Err(AllocationError::UnknownEvent(_))
        ));
    }

    #[test]
    fn test_reset_restores_default_dataset() {
        let mut service = service_with(&small_complex(), EngineConfig::default());
        assert_eq!(service.complex().house_count(), 2);

        service.reset().unwrap();

        assert_eq!(service.complex().house_count(), 4);
        assert_eq!(service.store().load().unwrap().unwrap().house_count(), 4);
    }

    #[test]
    fn test_save_failures_are_swallowed() {
        let mut service = AllocationService::with_store(EngineConfig::default(), BrokenStore).unwrap();

        let (id, _) = service.admit_student(NewStudent::new("Douglas", "Alfred", "Français")).unwrap();

        assert!(service.complex().student(id).is_some());
    }
}
