//! Residency Allocator
//!
//! A residency allocation engine for a multi-house student complex: it decides
//! which house a new student joins, seats them in a room or queues them on the
//! house waitlist, and promotes the head of that waitlist when a bed frees up.
//!
//! # Overview
//!
//! The complex is a set of residential houses, each with fixed-capacity rooms,
//! a FIFO waitlist and per-nationality resident counters, plus an
//! international house that only reports aggregates.
//!
//! ## Key Features
//!
//! - **Nationality Matching**: Students go to the first house declaring their nationality
//! - **Equity Fallback**: Otherwise to the first house where their nationality holds at most half of the residents
//! - **Explicit Post-Conditions**: Every operation reports a [`Placement`] or [`Withdrawal`]
//! - **FIFO Waitlists**: A freed bed goes to the head of the house waitlist
//! - **Snapshots**: The whole graph persists as one JSON document, written atomically
//! - **House Agendas**: Date-ordered events with attendee lists
//!
//! ## Quick Start
//!
//! ```rust
//! use residency_allocator::*;
//!
//! let config = EngineConfig { autosave: AutosavePolicy::Manual, ..Default::default() };
//! let mut service = AllocationService::with_store(config, MemoryStore::new())?;
//!
//! let (student, placement) =
//!     service.admit_student(NewStudent::new("Lefebvre", "Anne", "Français"))?;
//! println!("{} is {}", student, placement);
//!
//! service.save();
//! # Ok::<(), AllocationError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums and configuration
//! - [`student`]: Student records and the roster
//! - [`housing`]: Rooms, houses, the complex and its assignment policy
//! - [`allocation`]: Service, snapshots, errors and logging
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │   Student   │    │ Allocation  │
//! │             │    │             │    │             │
//! │ Identifiers │◄───┤ Student     │◄───┤ Service     │
//! │ Enums       │    │ Roster      │    │ Snapshots   │
//! │ Config      │    │             │    │ Logging     │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                   ▲                   │
//!        │                   │                   ▼
//!        │           ┌─────────────┐    ┌─────────────┐
//!        │           │   Housing   │    │   Complex   │
//!        └───────────┤             │◄───┤             │
//!                    │ Room, House │    │ Policy      │
//!                    │ Agenda      │    │ Aggregates  │
//!                    └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod allocation;
pub mod housing;
pub mod student;

pub mod types;

// Core types and identifiers
pub use types::{
    AutosavePolicy,
    ConfigValidationError,
    // Configuration
    EngineConfig,
    EventId,
    HouseId,
    HouseRemovalPolicy,
    RoomId,
    // Enums
    RoomStatus,
    SortOrder,
    // Identifiers
    StudentId,
};

// Students
pub use student::{Roster, Student, Tenancy};

// Housing graph and policy
pub use housing::{
    default_complex, Agenda, Complex, ComplexSummary, DatasetBuilder, Event, House,
    HouseDetailsPatch, HouseDraft, HouseProfile, HouseRemoval, Placement, Room, Withdrawal,
    EQUITY_THRESHOLD_PERCENT,
};

// Service, persistence and diagnostics
pub use allocation::{
    AllocationError, AllocationResult, AllocationService, JsonFileStore, LoggingConfig,
    MemoryStore, NewStudent, Snapshot, SnapshotStore,
};
