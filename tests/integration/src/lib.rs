//! Integration test utilities for the gateway client
//!
//! This crate provides a scripted transport so session behavior can be
//! driven end to end without a real server, deterministically under tokio's
//! paused clock.

pub mod helpers;

pub use helpers::*;
