//! Embedding service adapter

mod client;

pub use client::EmbeddingClient;
