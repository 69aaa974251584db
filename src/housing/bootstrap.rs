//! Default dataset generation
//!
//! This module builds the canonical starting graph used when no snapshot is
//! available: the international house, four residential houses with their
//! literal room layouts, nine students admitted with a preferred house and a
//! handful of events.

use crate::allocation::error::AllocationResult;
use crate::housing::agenda::Event;
use crate::housing::complex::Complex;
use crate::housing::house::House;
use crate::housing::profile::HouseProfile;
use crate::student::Student;
use crate::types::{HouseId, StudentId};
use chrono::{Duration, Local, NaiveDateTime};

// Room capacities, one entry per room, in creation order
const PROVINCES_DE_FRANCE_ROOMS: [u32; 2] = [1, 1];

const ITALIE_ROOMS: [u32; 107] = [
    2, 1, 1, 2, 1, 2, 1, 2, 2, 1, 1, 1, 2, 1, 2, 1, 2, 1, 1, 2,
    2, 1, 1, 2, 2, 2, 1, 2, 1, 1, 1, 2, 1, 1, 2, 1, 2, 2, 1, 1,
    2, 1, 2, 2, 1, 2, 1, 1, 2, 1, 2, 2, 1, 2, 1, 1, 1, 2, 1, 1,
    2, 1, 2, 2, 1, 2, 1, 1, 1, 2, 2, 1, 2, 1, 2, 2, 1, 2, 1, 1,
    1, 2, 1, 2, 2, 1, 2, 1, 2, 2, 1, 2, 1, 2, 1, 2, 2, 1, 2, 2,
    1, 1, 2, 1, 2, 1, 1,
];

const FRANCO_BRITANNIQUE_ROOMS: [u32; 114] = [
    1, 2, 1, 2, 1, 1, 2, 1, 2, 2, 1, 2, 2, 1, 1, 2, 1, 1, 2, 2,
    1, 1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 1, 1, 2, 2, 1, 2, 1, 1, 2,
    1, 1, 2, 2, 1, 1, 2, 1, 2, 2, 2, 1, 2, 1, 2, 1, 2, 2, 1, 2,
    1, 2, 1, 1, 2, 2, 1, 2, 1, 2, 2, 1, 1, 2, 2, 1, 2, 1, 1, 2,
    2, 2, 1, 1, 2, 1, 2, 1, 2, 1, 1, 2, 1, 2, 2, 1, 1, 2, 1, 1,
    2, 1, 2, 2, 1, 1, 2, 1, 2, 2, 1, 1, 2, 2,
];

const JAPON_ROOMS: [u32; 292] = [
    1, 1, 2, 1, 2, 1, 1, 2, 2, 1, 2, 1, 2, 1, 1, 2, 2, 1, 1, 2,
    1, 1, 2, 2, 1, 1, 2, 1, 2, 1, 2, 2, 1, 1, 1, 2, 1, 1, 2, 2,
    1, 1, 2, 1, 2, 2, 1, 1, 2, 2, 1, 2, 1, 1, 2, 1, 2, 1, 1, 2,
    2, 1, 1, 2, 2, 1, 1, 2, 1, 1, 2, 2, 1, 1, 2, 2, 1, 1, 2, 2,
    1, 1, 2, 2, 1, 2, 1, 1, 2, 2, 1, 2, 1, 2, 1, 2, 2, 1, 2, 1,
    1, 1, 2, 2, 1, 1, 2, 1, 2, 1, 1, 2, 1, 2, 1, 2, 1, 2, 1, 1,
    2, 2, 1, 2, 1, 2, 1, 2, 1, 1, 2, 1, 2, 1, 1, 2, 2, 1, 2, 2,
    1, 1, 2, 2, 1, 2, 1, 2, 1, 1, 2, 2, 1, 2, 1, 1, 2, 2, 1, 2,
    2, 1, 1, 2, 2, 1, 1, 2, 2, 1, 2, 1, 1, 2, 1, 2, 1, 1, 2, 1,
    2, 1, 2, 1, 2, 2, 1, 1, 2, 1, 2, 1, 1, 2, 2, 1, 1, 2, 1, 2,
    1, 2, 1, 2, 1, 1, 2, 2, 1, 1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 1,
    1, 2, 2, 1, 2, 1, 2, 2, 1, 1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 1,
    2, 1, 1, 2, 1, 2, 1, 1, 2, 2, 1, 1, 2, 1, 2, 2, 1, 2, 1, 1,
    2, 1, 2, 1, 2, 1, 2, 2, 1, 1, 2, 1, 2, 1, 1, 2, 2, 1, 1, 2,
    1, 2, 1, 2, 1, 2, 1, 1, 2, 2, 1, 1,
];

/// Builder for the default complex
///
/// Event dates are offsets from `now`, so a fixed `now` yields a fully
/// reproducible graph (apart from generated identifiers).
#[derive(Debug, Clone, Copy)]
pub struct DatasetBuilder {
    now: NaiveDateTime,
}

impl DatasetBuilder {
    /// Create a builder anchored at the given date
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Create a builder anchored at the current local time
    pub fn from_local_now() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// Build the default complex
    pub fn build(&self) -> AllocationResult<Complex> {
        let mut complex = Complex::new(HouseProfile::new(
            "Maison internationale de la CIUP",
            Some("Française".to_string()),
            "M. Jean-Marc Sauvé",
            "17 Bd Jourdan, 75014 Paris",
        ));

        let provinces = complex.add_house(House::new(
            HouseProfile::new(
                "Maison des provinces de France",
                Some("Français".to_string()),
                "Hubert DUCOU LE POINTE",
                "55 Bd Jourdan, 75014 Paris",
            ),
            &PROVINCES_DE_FRANCE_ROOMS,
        )?);
        let italie = complex.add_house(House::new(
            HouseProfile::new(
                "Maison de l'Italie",
                Some("Italien".to_string()),
                "Maria Chiara PRODI",
                "7 A Bd Jourdan, 75014 Paris",
            ),
            &ITALIE_ROOMS,
        )?);
        let britannique = complex.add_house(House::new(
            HouseProfile::new(
                "Collège franco-britannique",
                Some("Britannique".to_string()),
                "Corinne NATIVEL",
                "9 B Bd Jourdan, 75014 Paris",
            ),
            &FRANCO_BRITANNIQUE_ROOMS,
        )?);
        let japon = complex.add_house(House::new(
            HouseProfile::new(
                "Maison du Japon",
                Some("Japonais".to_string()),
                "Naoki KANAYAMA",
                "7 C Av. Rockefeller, 75014 Paris",
            ),
            &JAPON_ROOMS,
        )?);

        let douglas = admit(&mut complex, "Douglas", "Alfred", "Français", provinces)?;
        let crude = admit(&mut complex, "Crude", "Donatien", "Français", provinces)?;
        let nolan = admit(&mut complex, "Nolan", "Louis", "Italien", provinces)?;
        admit(&mut complex, "Gostier", "Gerard", "Allemand", provinces)?;
        admit(&mut complex, "Delafosse", "Nathalie", "Français", britannique)?;
        admit(&mut complex, "Johnson", "Dave", "Américain", britannique)?;
        let miles = admit(&mut complex, "Miles", "Adam", "Britannique", britannique)?;
        let tele = admit(&mut complex, "Tele", "Kent", "Japonais", japon)?;
        let bayashi = admit(&mut complex, "Bayashi", "Kentaro", "Japonais", japon)?;

        let events = [
            (japon, "Soirée Salsa", "Ambiance latino festive", 1, vec![tele, bayashi]),
            (provinces, "Soirée Cinéma", "Projection de films cultes en plein air", 2, vec![douglas]),
            (provinces, "Soirée Déguisée", "Concours de costumes et DJ toute la nuit", 3, vec![crude]),
            (italie, "Soirée Karaoké", "Chantez vos tubes préférés entre amis", 4, vec![nolan]),
            (britannique, "Soirée Pyjama", "Projection de films courts", 5, vec![miles]),
        ];

        for (house, name, description, days, attendees) in events {
            let event = Event::new(name, description, self.now + Duration::days(days));
            let event_id = event.id;
            if complex.schedule_event(house, event)? {
                for student in attendees {
                    complex.register_attendee(house, event_id, student)?;
                }
            }
        }

        Ok(complex)
    }
}

fn admit(
    complex: &mut Complex,
    surname: &str,
    given_name: &str,
    nationality: &str,
    house: HouseId,
) -> AllocationResult<StudentId> {
    let student = Student::with_preference(surname, given_name, nationality, house);
    Ok(complex.admit(student)?.0)
}

/// Build the default complex anchored at the current local time
pub fn default_complex() -> AllocationResult<Complex> {
    DatasetBuilder::from_local_now().build()
}
