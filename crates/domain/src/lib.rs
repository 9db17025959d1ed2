//! # Tessera Domain
//!
//! Business domain types and models for the Tessera scheduling
//! preparation pipeline.
//!
//! This crate contains:
//! - Domain data types (Event, UserPreference, TimeSlot, EventPart, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Tessera crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
// Re-export clock utilities used throughout slot/break generation
pub use utils::clock::{anchor_in_tz, floor_to_granularity, iso_weekday, render_in};
