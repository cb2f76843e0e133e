//! Database models for health goals.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;

use crate::errors::StorageError;
use vitatrack_core::goals::{HealthGoal, Milestone};
use vitatrack_core::Result;

/// Database model for health goals. Milestones ride along as a JSON blob;
/// timestamps are stored as naive UTC.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::health_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct HealthGoalDB {
    pub id: String,
    pub user_id: String,
    pub parameter: String,
    pub unit: String,
    pub goal_kind: String,
    pub initial_value: Option<f64>,
    pub target_value: Option<f64>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub current_value: Option<f64>,
    pub progress: f64,
    pub status: String,
    pub tracking_frequency: String,
    pub start_date: NaiveDateTime,
    pub deadline: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub calendar_event_id: Option<String>,
    pub sync_to_calendar: bool,
    pub milestones: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl HealthGoalDB {
    pub fn from_domain(goal: &HealthGoal) -> Result<Self> {
        let milestones = serde_json::to_string(&goal.milestones)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        Ok(HealthGoalDB {
            id: goal.id.clone(),
            user_id: goal.user_id.clone(),
            parameter: goal.parameter.clone(),
            unit: goal.unit.clone(),
            goal_kind: goal.goal_kind.to_string(),
            initial_value: goal.initial_value,
            target_value: goal.target_value,
            min_value: goal.min_value,
            max_value: goal.max_value,
            current_value: goal.current_value,
            progress: goal.progress,
            status: goal.status.to_string(),
            tracking_frequency: goal.tracking_frequency.to_string(),
            start_date: goal.start_date.naive_utc(),
            deadline: goal.deadline.map(|d| d.naive_utc()),
            notes: goal.notes.clone(),
            calendar_event_id: goal.calendar_event_id.clone(),
            sync_to_calendar: goal.sync_to_calendar,
            milestones,
            created_at: goal.created_at.naive_utc(),
            updated_at: goal.updated_at.naive_utc(),
        })
    }

    pub fn into_domain(self) -> Result<HealthGoal> {
        let milestones: Vec<Milestone> = serde_json::from_str(&self.milestones)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        Ok(HealthGoal {
            id: self.id,
            user_id: self.user_id,
            parameter: self.parameter,
            unit: self.unit,
            goal_kind: self.goal_kind.parse()?,
            initial_value: self.initial_value,
            target_value: self.target_value,
            min_value: self.min_value,
            max_value: self.max_value,
            current_value: self.current_value,
            progress: self.progress,
            status: self.status.parse()?,
            tracking_frequency: self.tracking_frequency.parse()?,
            start_date: to_utc(self.start_date),
            deadline: self.deadline.map(to_utc),
            notes: self.notes,
            calendar_event_id: self.calendar_event_id,
            sync_to_calendar: self.sync_to_calendar,
            milestones,
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        })
    }
}

fn to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&naive)
}
