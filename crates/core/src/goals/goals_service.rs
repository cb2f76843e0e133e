use chrono::Utc;
use log::{debug, warn};
use std::sync::Arc;

use super::goals_constants::{
    MANUAL_ENTRY_NOTE, READING_SYNC_NOTE, STARTING_VALUE_NOTE, STARTING_VALUE_UPDATED_NOTE,
};
use super::goals_engine::{apply_observation, reconcile, refresh_status};
use super::goals_model::{
    GoalKind, GoalStats, GoalStatus, HealthGoal, HealthGoalUpdate, Milestone, NewHealthGoal,
    NewMilestone,
};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::calendar::CalendarSyncTrait;
use crate::errors::{Error, Result, ValidationError};
use crate::readings::ReadingRepositoryTrait;
use async_trait::async_trait;

/// Service for managing health goals.
///
/// Owns no state of its own; all persistence and external effects go through
/// the injected capabilities.
pub struct GoalService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    reading_repository: Arc<dyn ReadingRepositoryTrait>,
    calendar_sync: Arc<dyn CalendarSyncTrait>,
}

impl GoalService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        reading_repository: Arc<dyn ReadingRepositoryTrait>,
        calendar_sync: Arc<dyn CalendarSyncTrait>,
    ) -> Self {
        GoalService {
            goal_repository,
            reading_repository,
            calendar_sync,
        }
    }

    async fn persist(&self, mut goal: HealthGoal) -> Result<HealthGoal> {
        goal.updated_at = Utc::now();
        self.goal_repository.update_goal(goal).await
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    async fn create_goal(&self, user_id: &str, new_goal: NewHealthGoal) -> Result<HealthGoal> {
        new_goal.validate()?;

        let now = Utc::now();
        let goal_kind = new_goal.effective_kind();
        let mut goal = HealthGoal {
            id: String::new(),
            user_id: user_id.to_string(),
            parameter: new_goal.parameter.trim().to_string(),
            unit: new_goal.unit,
            goal_kind,
            initial_value: new_goal.initial_value,
            target_value: new_goal.target_value,
            min_value: new_goal.min_value,
            max_value: new_goal.max_value,
            current_value: new_goal.initial_value,
            progress: 0.0,
            status: GoalStatus::InProgress,
            tracking_frequency: new_goal.tracking_frequency.unwrap_or_default(),
            start_date: now,
            deadline: new_goal.deadline,
            notes: new_goal.notes,
            calendar_event_id: None,
            sync_to_calendar: new_goal.sync_to_calendar,
            milestones: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        if let Some(initial) = goal.initial_value {
            goal.milestones.push(Milestone {
                date: now,
                value: initial,
                note: Some(STARTING_VALUE_NOTE.to_string()),
            });
            reconcile(&mut goal);
        }

        debug!(
            "Creating {} goal for parameter '{}' (user {})",
            goal.goal_kind, goal.parameter, user_id
        );
        self.goal_repository.insert_new_goal(goal).await
    }

    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<HealthGoal> {
        self.goal_repository.get_goal(user_id, goal_id)
    }

    async fn list_goals(
        &self,
        user_id: &str,
        status: Option<GoalStatus>,
    ) -> Result<Vec<HealthGoal>> {
        let mut goals = self.goal_repository.load_goals(user_id, status)?;
        let now = Utc::now();
        for goal in goals.iter_mut() {
            if refresh_status(goal, now) {
                goal.updated_at = now;
                *goal = self.goal_repository.update_goal(goal.clone()).await?;
            }
        }
        Ok(goals)
    }

    async fn update_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        update: HealthGoalUpdate,
    ) -> Result<HealthGoal> {
        let mut goal = self.goal_repository.get_goal(user_id, goal_id)?;
        let old_initial = goal.initial_value;
        let now = Utc::now();

        if let Some(initial) = update.initial_value {
            goal.initial_value = initial;
        }
        if let Some(target) = update.target_value {
            goal.target_value = target;
        }
        if let Some(min) = update.min_value {
            goal.min_value = min;
        }
        if let Some(max) = update.max_value {
            goal.max_value = max;
        }
        if let Some(deadline) = update.deadline {
            goal.deadline = deadline;
        }
        if let Some(notes) = update.notes {
            goal.notes = notes;
        }
        if let Some(frequency) = update.tracking_frequency {
            goal.tracking_frequency = frequency;
        }

        // A changed initial value only moves the current value while the goal
        // has no real observations yet; afterwards current reflects actual
        // progress and the seed milestone is left alone.
        if update.initial_value.is_some()
            && goal.initial_value != old_initial
            && goal.milestones.len() <= 1
        {
            goal.current_value = goal.initial_value;
            match goal.initial_value {
                Some(initial) => {
                    if let Some(first) = goal.milestones.first_mut() {
                        first.value = initial;
                        first.note = Some(STARTING_VALUE_UPDATED_NOTE.to_string());
                        first.date = now;
                    } else {
                        goal.milestones.push(Milestone {
                            date: now,
                            value: initial,
                            note: Some(STARTING_VALUE_NOTE.to_string()),
                        });
                    }
                }
                None => goal.milestones.clear(),
            }
        }

        goal.validate_configuration()?;

        if goal.target_value.is_none()
            && (goal.min_value.is_some() || goal.max_value.is_some())
        {
            goal.goal_kind = GoalKind::Range;
        }

        reconcile(&mut goal);
        self.persist(goal).await
    }

    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()> {
        let goal = self.goal_repository.get_goal(user_id, goal_id)?;

        // Best effort: a lingering calendar event must never block deletion.
        if let Some(event_id) = goal.calendar_event_id.as_deref() {
            if let Err(err) = self.calendar_sync.delete_event(user_id, event_id).await {
                warn!(
                    "Failed to remove calendar event {} for goal {}: {}",
                    event_id, goal.id, err
                );
            }
        }

        self.goal_repository.delete_goal(user_id, goal_id).await?;
        Ok(())
    }

    async fn record_observation(
        &self,
        user_id: &str,
        goal_id: &str,
        observation: NewMilestone,
    ) -> Result<HealthGoal> {
        let goal = self.goal_repository.get_goal(user_id, goal_id)?;
        let note = observation
            .note
            .or_else(|| Some(MANUAL_ENTRY_NOTE.to_string()));
        let goal = apply_observation(goal, observation.value, note, Utc::now());
        self.persist(goal).await
    }

    async fn update_milestone(
        &self,
        user_id: &str,
        goal_id: &str,
        index: usize,
        value: Option<f64>,
        note: Option<String>,
    ) -> Result<HealthGoal> {
        let mut goal = self.goal_repository.get_goal(user_id, goal_id)?;
        let last_index = goal.milestones.len().saturating_sub(1);
        let milestone = goal.milestones.get_mut(index).ok_or_else(|| {
            Error::Validation(ValidationError::InvalidInput(format!(
                "milestone {} does not exist",
                index
            )))
        })?;

        if let Some(value) = value {
            milestone.value = value;
        }
        if let Some(note) = note {
            milestone.note = Some(note);
        }

        if index == last_index {
            if let Some(value) = value {
                goal.current_value = Some(value);
            }
        }

        reconcile(&mut goal);
        self.persist(goal).await
    }

    async fn remove_milestone(
        &self,
        user_id: &str,
        goal_id: &str,
        index: usize,
    ) -> Result<HealthGoal> {
        let mut goal = self.goal_repository.get_goal(user_id, goal_id)?;
        if goal.milestones.len() <= 1 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "cannot delete the last milestone, delete the goal instead".to_string(),
            )));
        }
        if index >= goal.milestones.len() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "milestone {} does not exist",
                index
            ))));
        }

        goal.milestones.remove(index);
        goal.current_value = goal.milestones.last().map(|m| m.value);

        reconcile(&mut goal);
        self.persist(goal).await
    }

    async fn sync_goals_from_readings(&self, user_id: &str) -> Result<usize> {
        let goals = self
            .goal_repository
            .load_goals(user_id, Some(GoalStatus::InProgress))?;
        let readings = self.reading_repository.latest_readings(user_id)?;
        if readings.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut updated = 0;
        for goal in goals {
            let Some(reading) = readings
                .iter()
                .find(|r| names_match(&r.test_name, &goal.parameter))
            else {
                continue;
            };

            let mut goal = apply_observation(
                goal,
                reading.value,
                Some(READING_SYNC_NOTE.to_string()),
                now,
            );
            goal.updated_at = now;
            self.goal_repository.update_goal(goal).await?;
            updated += 1;
        }

        debug!("{} goals updated from latest readings (user {})", updated, user_id);
        Ok(updated)
    }

    fn goal_stats(&self, user_id: &str) -> Result<GoalStats> {
        let goals = self.goal_repository.load_goals(user_id, None)?;

        let count_by =
            |status: GoalStatus| goals.iter().filter(|g| g.status == status).count();
        let average_progress = if goals.is_empty() {
            0.0
        } else {
            let sum: f64 = goals.iter().map(|g| g.progress).sum();
            (sum / goals.len() as f64 * 10.0).round() / 10.0
        };
        let most_recent_achievement = goals
            .iter()
            .filter(|g| g.status == GoalStatus::Achieved)
            .max_by_key(|g| g.updated_at)
            .cloned();

        Ok(GoalStats {
            total: goals.len(),
            in_progress: count_by(GoalStatus::InProgress),
            achieved: count_by(GoalStatus::Achieved),
            expired: count_by(GoalStatus::Expired),
            failed: count_by(GoalStatus::Failed),
            average_progress,
            most_recent_achievement,
        })
    }
}

/// A reading feeds a goal when either name contains the other,
/// case-insensitively ("LDL" matches "LDL Cholesterol" and vice versa).
fn names_match(test_name: &str, parameter: &str) -> bool {
    let test_name = test_name.to_lowercase();
    let parameter = parameter.to_lowercase();
    test_name.contains(&parameter) || parameter.contains(&test_name)
}
