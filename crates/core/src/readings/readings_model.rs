//! Readings domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed value from a user's health log, e.g. a lab-test result.
/// Goal sync matches `test_name` against goal parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReading {
    pub test_name: String,
    pub value: f64,
    pub unit: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
