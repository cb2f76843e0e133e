//! Readings module - observed health values extracted from user documents.

mod readings_model;
mod readings_traits;

pub use readings_model::HealthReading;
pub use readings_traits::ReadingRepositoryTrait;
