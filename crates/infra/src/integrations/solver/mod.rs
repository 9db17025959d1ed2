//! Constraint-solver adapter

mod client;

pub use client::SolverHttpClient;
