//! Dead-letter accounting for failed queue events

pub mod ports;
pub mod service;

pub use service::{DeadLetterService, FailureOutcome, RequeueOutcome};
