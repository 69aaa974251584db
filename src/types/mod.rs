//! Core types and identifiers for the residency allocator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the allocation engine.
//!
//! # Overview
//!
//! The types module provides the foundational data types for the engine:
//!
//! - **Identifiers**: UUID-based unique identifiers for students, houses, rooms and events
//! - **Enums**: Room status, autosave and house-removal policies, listing order
//! - **Configuration**: Engine configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use residency_allocator::types::*;
//!
//! // Create unique identifiers
//! let student_id = StudentId::new();
//! let house_id = HouseId::new();
//! assert!(student_id.to_string().starts_with("STU_"));
//! assert!(house_id.to_string().starts_with("HSE_"));
//!
//! // Configure the engine
//! let config = EngineConfig {
//!     removal_policy: HouseRemovalPolicy::Reassign,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
