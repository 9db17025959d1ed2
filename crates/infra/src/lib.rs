//! # Tessera Infra
//!
//! Infrastructure adapters for the Tessera pipeline.
//!
//! This crate contains:
//! - The retrying HTTP client shared by every adapter
//! - HTTP adapters for the calendar/preferences store, the classifier,
//!   the blob store, the solver, and the embedding service
//! - The environment-based configuration loader
//!
//! ## Architecture
//! - Implements the port traits defined in `tessera-core`
//! - All clients are constructed once at process start and injected as
//!   `Arc<dyn ..>` handles; none hold global state

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;

pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::blob::BlobStoreClient;
pub use integrations::classifier::ClassifierClient;
pub use integrations::embedding::EmbeddingClient;
pub use integrations::solver::SolverHttpClient;
pub use integrations::store::SchedulingStoreClient;
