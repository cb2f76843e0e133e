//! Goals domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};

/// Directional intent of a tracked parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Decrease,
    Increase,
    Maintain,
    Range,
}

impl GoalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Decrease => "decrease",
            GoalKind::Increase => "increase",
            GoalKind::Maintain => "maintain",
            GoalKind::Range => "range",
        }
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GoalKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "decrease" => Ok(GoalKind::Decrease),
            "increase" => Ok(GoalKind::Increase),
            "maintain" => Ok(GoalKind::Maintain),
            "range" => Ok(GoalKind::Range),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown goal kind '{}'",
                other
            )))),
        }
    }
}

/// Lifecycle status of a goal. None of the states are strictly terminal:
/// an achieved goal reverts to in-progress when a later observation no
/// longer satisfies its target condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GoalStatus {
    #[default]
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "achieved")]
    Achieved,
    #[serde(rename = "expired")]
    Expired,
    #[serde(rename = "failed")]
    Failed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::InProgress => "in-progress",
            GoalStatus::Achieved => "achieved",
            GoalStatus::Expired => "expired",
            GoalStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "in-progress" => Ok(GoalStatus::InProgress),
            "achieved" => Ok(GoalStatus::Achieved),
            "expired" => Ok(GoalStatus::Expired),
            "failed" => Ok(GoalStatus::Failed),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown goal status '{}'",
                other
            )))),
        }
    }
}

/// How often the user intends to record observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackingFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl TrackingFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingFrequency::Daily => "daily",
            TrackingFrequency::Weekly => "weekly",
            TrackingFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for TrackingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TrackingFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "daily" => Ok(TrackingFrequency::Daily),
            "weekly" => Ok(TrackingFrequency::Weekly),
            "monthly" => Ok(TrackingFrequency::Monthly),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown tracking frequency '{}'",
                other
            )))),
        }
    }
}

/// A timestamped observed value recorded against a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub date: DateTime<Utc>,
    pub value: f64,
    pub note: Option<String>,
}

/// The resolved target configuration of a goal.
///
/// Constructed once from the flat optional fields; everything downstream
/// branches on this instead of re-checking field presence. A band wins over
/// a point target whenever either bound is set, regardless of the goal kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GoalTarget {
    Fixed { target: f64 },
    Range { min: Option<f64>, max: Option<f64> },
}

impl GoalTarget {
    pub fn resolve(
        target_value: Option<f64>,
        min_value: Option<f64>,
        max_value: Option<f64>,
    ) -> Option<GoalTarget> {
        if min_value.is_some() || max_value.is_some() {
            Some(GoalTarget::Range {
                min: min_value,
                max: max_value,
            })
        } else {
            target_value.map(|target| GoalTarget::Fixed { target })
        }
    }
}

/// Domain model representing a tracked health goal for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthGoal {
    pub id: String,
    pub user_id: String,
    /// Name of the tracked health parameter, matched against reading names.
    pub parameter: String,
    pub unit: String,
    pub goal_kind: GoalKind,
    pub initial_value: Option<f64>,
    pub target_value: Option<f64>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub current_value: Option<f64>,
    /// Derived completion percentage, always within `[0, 100]`.
    pub progress: f64,
    pub status: GoalStatus,
    pub tracking_frequency: TrackingFrequency,
    pub start_date: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    /// Id of the calendar event mirroring this goal's deadline, if synced.
    pub calendar_event_id: Option<String>,
    pub sync_to_calendar: bool,
    /// Ordered observation history; the last entry's value defines
    /// `current_value` after any mutation.
    pub milestones: Vec<Milestone>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HealthGoal {
    /// Resolved target configuration, `None` when no target or bound is set.
    pub fn target(&self) -> Option<GoalTarget> {
        GoalTarget::resolve(self.target_value, self.min_value, self.max_value)
    }

    /// Re-checks the target configuration after an edit.
    pub fn validate_configuration(&self) -> Result<()> {
        validate_band(self.min_value, self.max_value)?;
        if self.target().is_none() {
            return Err(invalid_config(
                "provide either a targetValue or a min/max range",
            ));
        }
        Ok(())
    }
}

/// Input model for creating a new goal.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthGoal {
    pub parameter: String,
    pub unit: String,
    pub goal_kind: GoalKind,
    pub initial_value: Option<f64>,
    pub target_value: Option<f64>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub deadline: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub tracking_frequency: Option<TrackingFrequency>,
    #[serde(default)]
    pub sync_to_calendar: bool,
}

impl NewHealthGoal {
    /// Rejects unusable target configurations with a message naming the
    /// required field combination.
    pub fn validate(&self) -> Result<()> {
        if self.parameter.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "parameter".to_string(),
            )));
        }
        if self.unit.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "unit".to_string(),
            )));
        }

        let has_band = self.min_value.is_some() || self.max_value.is_some();
        match (self.target_value, has_band) {
            (None, false) => {
                return Err(invalid_config(
                    "provide either a targetValue or a min/max range",
                ))
            }
            (Some(_), false) if self.initial_value.is_none() => {
                return Err(invalid_config(
                    "initial value is required for fixed target goals",
                ))
            }
            _ => {}
        }

        validate_band(self.min_value, self.max_value)
    }

    /// A goal tracked only by a band is stored as a range goal no matter
    /// which kind was submitted.
    pub fn effective_kind(&self) -> GoalKind {
        let has_band = self.min_value.is_some() || self.max_value.is_some();
        if self.target_value.is_none() && has_band {
            GoalKind::Range
        } else {
            self.goal_kind
        }
    }
}

/// Partial edit of a goal. Outer `None` leaves a field unchanged, inner
/// `None` clears it.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HealthGoalUpdate {
    #[serde(default)]
    pub initial_value: Option<Option<f64>>,
    #[serde(default)]
    pub target_value: Option<Option<f64>>,
    #[serde(default)]
    pub min_value: Option<Option<f64>>,
    #[serde(default)]
    pub max_value: Option<Option<f64>>,
    #[serde(default)]
    pub deadline: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub tracking_frequency: Option<TrackingFrequency>,
}

/// Input model for a manually recorded observation.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewMilestone {
    pub value: f64,
    pub note: Option<String>,
}

/// Per-user aggregate over all goals.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GoalStats {
    pub total: usize,
    pub in_progress: usize,
    pub achieved: usize,
    pub expired: usize,
    pub failed: usize,
    /// Mean progress across all goals, rounded to one decimal.
    pub average_progress: f64,
    pub most_recent_achievement: Option<HealthGoal>,
}

fn validate_band(min_value: Option<f64>, max_value: Option<f64>) -> Result<()> {
    if let (Some(min), Some(max)) = (min_value, max_value) {
        // min == max would divide by zero in the range formula.
        if min >= max {
            return Err(invalid_config("min value must be less than max value"));
        }
    }
    Ok(())
}

fn invalid_config(message: &str) -> Error {
    Error::Validation(ValidationError::InvalidGoalConfiguration(
        message.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_goal() -> NewHealthGoal {
        NewHealthGoal {
            parameter: "Blood Glucose".to_string(),
            unit: "mg/dL".to_string(),
            goal_kind: GoalKind::Decrease,
            initial_value: Some(140.0),
            target_value: Some(100.0),
            min_value: None,
            max_value: None,
            deadline: None,
            notes: None,
            tracking_frequency: None,
            sync_to_calendar: false,
        }
    }

    #[test]
    fn test_validate_accepts_fixed_goal() {
        assert!(new_goal().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_target_or_band() {
        let mut goal = new_goal();
        goal.target_value = None;
        let err = goal.validate().unwrap_err();
        assert!(err.to_string().contains("targetValue"));
    }

    #[test]
    fn test_validate_fixed_goal_requires_initial_value() {
        let mut goal = new_goal();
        goal.initial_value = None;
        assert!(goal.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_band() {
        let mut goal = new_goal();
        goal.min_value = Some(20.0);
        goal.max_value = Some(10.0);
        assert!(goal.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_degenerate_band() {
        let mut goal = new_goal();
        goal.target_value = None;
        goal.min_value = Some(10.0);
        goal.max_value = Some(10.0);
        assert!(goal.validate().is_err());
    }

    #[test]
    fn test_band_only_goal_is_coerced_to_range() {
        let mut goal = new_goal();
        goal.target_value = None;
        goal.min_value = Some(80.0);
        goal.max_value = Some(120.0);
        assert_eq!(goal.effective_kind(), GoalKind::Range);
    }

    #[test]
    fn test_kind_is_kept_when_target_is_present() {
        let mut goal = new_goal();
        goal.max_value = Some(120.0);
        assert_eq!(goal.effective_kind(), GoalKind::Decrease);
    }

    #[test]
    fn test_target_resolution_prefers_band() {
        let resolved = GoalTarget::resolve(Some(100.0), Some(80.0), None);
        assert_eq!(
            resolved,
            Some(GoalTarget::Range {
                min: Some(80.0),
                max: None
            })
        );
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&GoalStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::from_str::<GoalStatus>("\"achieved\"").unwrap(),
            GoalStatus::Achieved
        );
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            GoalStatus::InProgress,
            GoalStatus::Achieved,
            GoalStatus::Expired,
            GoalStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<GoalStatus>().unwrap(), status);
        }
        assert!("done".parse::<GoalStatus>().is_err());
    }

    #[test]
    fn test_update_distinguishes_absent_from_cleared() {
        let update: HealthGoalUpdate =
            serde_json::from_str(r#"{"targetValue": null, "notes": "still going"}"#).unwrap();
        assert_eq!(update.target_value, Some(None));
        assert_eq!(update.initial_value, None);
        assert_eq!(update.notes, Some(Some("still going".to_string())));
    }
}
