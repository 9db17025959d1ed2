//! Zero-shot classifier adapter

mod client;

pub use client::ClassifierClient;
