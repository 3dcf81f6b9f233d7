//! Shared test support for core integration tests

#![allow(dead_code)]

pub mod repositories;
pub mod service_layer;
