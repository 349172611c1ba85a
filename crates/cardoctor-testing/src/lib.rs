//! Test utilities for Car Doctor services.
//!
//! Use from `[dev-dependencies]` only, never from production code.

pub mod auth;
