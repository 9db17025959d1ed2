//! Blob store adapter

mod client;

pub use client::BlobStoreClient;
