//! Student modeling
//!
//! This module contains the Student entity, its tenancy back-references and
//! the roster arena that owns every student of the complex.

pub mod roster;
#[allow(clippy::module_inception)]
pub mod student;

pub use roster::Roster;
pub use student::{Student, Tenancy};
