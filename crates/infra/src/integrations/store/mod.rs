//! Calendar/preferences store adapter

mod client;

pub use client::SchedulingStoreClient;
