//! Cross-cutting pieces shared by Car Doctor services: the error type,
//! tracing setup, request middleware, CORS policy and lifecycle helpers.

pub mod cors;
pub mod error;
pub mod health;
pub mod middleware;
pub mod shutdown;
pub mod tracing;
