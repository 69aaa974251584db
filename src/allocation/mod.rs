//! Allocation service, persistence and diagnostics
//!
//! This module contains the service that owns the complex, the snapshot
//! stores, the error taxonomy and the logging setup.
//!
//! # Overview
//!
//! - **AllocationService**: Entry point for every mutation, applies the autosave policy
//! - **SnapshotStore**: Load/save seam with a JSON file and an in-memory implementation
//! - **AllocationError**: Error taxonomy of the engine
//! - **LoggingConfig**: Tracing subscriber setup
//!
//! # Usage Example
//!
//! ```rust
//! use residency_allocator::allocation::*;
//! use residency_allocator::types::EngineConfig;
//!
//! // An empty store bootstraps the default dataset
//! let mut service = AllocationService::with_store(EngineConfig::default(), MemoryStore::new())?;
//! assert_eq!(service.complex().house_count(), 4);
//!
//! let (_, placement) = service.admit_student(NewStudent::new("Rossi", "Marco", "Italien"))?;
//! assert!(placement.is_resident());
//! # Ok::<(), AllocationError>(())
//! ```

pub mod error;
pub mod logging;
pub mod service;
pub mod snapshot;

// Re-export all public types for convenience
pub use error::*;
pub use logging::*;
pub use service::*;
pub use snapshot::*;
