use crate::errors::Result;
use crate::readings::readings_model::HealthReading;

/// Trait for reading repository operations.
pub trait ReadingRepositoryTrait: Send + Sync {
    /// The readings from the user's most recent health log entry.
    fn latest_readings(&self, user_id: &str) -> Result<Vec<HealthReading>>;
}
