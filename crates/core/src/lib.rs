//! Vitatrack Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for tracked health goals.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod calendar;
pub mod errors;
pub mod goals;
pub mod readings;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
