//! # Tessera Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The scheduling preparation algorithms (work times, timeslots, breaks,
//!   buffers, event partitioning)
//! - Port/adapter interfaces (traits) for every remote collaborator
//! - The category defaulting service and the request assembler
//!
//! ## Architecture Principles
//! - Only depends on `tessera-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod assembly;
pub mod category;
pub mod scheduling;

// Re-export specific items to avoid ambiguity
pub use assembly::dispatch::SolverDispatcher;
pub use assembly::ports::{Embedder, PayloadStore, SchedulingStore, SolverClient};
pub use assembly::service::{AssemblyRequest, RequestAssembler};
pub use assembly::PreparationPipeline;
pub use category::ports::Classifier;
pub use category::service::CategoryService;
pub use scheduling::breaks::BreakPlanner;
pub use scheduling::buffers::weave_buffer_times;
pub use scheduling::partition::{merge_buffer_parts, partition_event};
pub use scheduling::time_slots::{generate_time_slots, generate_time_slots_lite};
pub use scheduling::work_times::{build_work_times, build_work_times_from_events};
