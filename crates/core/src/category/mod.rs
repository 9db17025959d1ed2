//! Category classification and defaulting

pub mod ports;
pub mod service;
