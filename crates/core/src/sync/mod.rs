//! Sync logging

pub mod ports;
