//! Houses, rooms and the assignment policy
//!
//! This module manages the housing graph of the complex: residential houses
//! with their rooms, waitlists and nationality counters, the registry that
//! routes students to a house, house agendas and the default dataset.
//!
//! # Overview
//!
//! - **Room**: Fixed-capacity unit with a derived vacant/full status
//! - **House**: Rooms, residents, FIFO waitlist and inscription/withdrawal rules
//! - **Complex**: Registry of houses and students with the nationality and equity policy
//! - **Agenda**: Date-ordered events of a house
//! - **DatasetBuilder**: The canonical starting graph
//!
//! # Usage Example
//!
//! ```rust
//! use residency_allocator::housing::*;
//! use residency_allocator::student::Student;
//!
//! let mut complex = Complex::new(HouseProfile::new("Maison internationale", None, "", ""));
//! let house = House::new(
//!     HouseProfile::new("Maison A", Some("Français".to_string()), "", ""),
//!     &[1, 1],
//! )?;
//! let house_id = complex.add_house(house);
//!
//! let (_, placement) = complex.admit(Student::new("Douglas", "Alfred", "Français"))?;
//! assert_eq!(placement.house(), Some(house_id));
//! assert!(placement.is_resident());
//! # Ok::<(), residency_allocator::AllocationError>(())
//! ```

pub mod agenda;
pub mod bootstrap;
pub mod complex;
pub mod house;
pub mod placement;
pub mod profile;
pub mod room;

// Re-export all public types for convenience
pub use agenda::{Agenda, Event};
pub use bootstrap::{default_complex, DatasetBuilder};
pub use complex::{Complex, ComplexSummary, EQUITY_THRESHOLD_PERCENT};
pub use house::House;
pub use placement::{HouseRemoval, Placement, Withdrawal};
pub use profile::{HouseDetailsPatch, HouseDraft, HouseProfile, DEFAULT_IMAGE};
pub use room::Room;
