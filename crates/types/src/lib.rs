/// Shared types for the SynthPool protocol client
///
/// This crate provides the pool, request and lifecycle types, constants and
/// the error type used by the core logic and the keeper service.

pub mod constants;
pub mod cycle_serde;
pub mod errors;
pub mod pool;
pub mod request;

// Re-export all public types
pub use constants::*;
pub use errors::*;
pub use pool::*;
pub use request::*;
