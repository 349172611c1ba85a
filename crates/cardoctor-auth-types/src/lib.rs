//! Session authentication for Car Doctor.
//!
//! Provides the JWT codec, the `token` cookie builders and the auth gate
//! middleware with its `RequestIdentity` extractor.

pub mod cookie;
pub mod identity;
pub mod token;
