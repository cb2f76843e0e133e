//! Shared constants for the goals domain.

/// Fraction of the target value accepted as on-target for maintain goals.
pub const MAINTAIN_TOLERANCE_RATIO: f64 = 0.05;

/// Note attached to the milestone seeded from a goal's initial value.
pub const STARTING_VALUE_NOTE: &str = "Starting value (Initial)";

/// Note attached to a starting milestone re-seeded after an edit.
pub const STARTING_VALUE_UPDATED_NOTE: &str = "Starting value (Updated)";

/// Default note for manually recorded observations.
pub const MANUAL_ENTRY_NOTE: &str = "Manual entry";

/// Note attached to observations applied from health log readings.
pub const READING_SYNC_NOTE: &str = "Auto-updated from health log";
