//! Pure progress, achievement, and lifecycle computation over one goal
//! snapshot. No I/O and no clock reads; callers pass the timestamp in.

use chrono::{DateTime, Utc};

use super::goals_constants::MAINTAIN_TOLERANCE_RATIO;
use super::goals_model::{GoalKind, GoalStatus, GoalTarget, HealthGoal, Milestone};

/// Maps the goal's configuration and current value to a completion
/// percentage in `[0, 100]`. Pure: calling it twice on the same snapshot
/// yields the same value.
pub fn compute_progress(goal: &HealthGoal) -> f64 {
    let Some(current) = goal.current_value else {
        return 0.0;
    };

    let raw = match goal.target() {
        Some(GoalTarget::Range { min, max }) => range_progress(current, min, max),
        Some(GoalTarget::Fixed { target }) => fixed_progress(goal, current, target),
        None => 0.0,
    };

    raw.clamp(0.0, 100.0)
}

fn range_progress(current: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    match (min, max) {
        (Some(min), Some(max)) => {
            if current >= min && current <= max {
                100.0
            } else {
                // Distance past the nearer bound, scaled by the band width.
                // Validation guarantees min < max.
                let distance = if current < min {
                    min - current
                } else {
                    current - max
                };
                100.0 - distance / (max - min) * 100.0
            }
        }
        (Some(min), None) => {
            if current >= min {
                100.0
            } else {
                current / min * 100.0
            }
        }
        (None, Some(max)) => {
            if current <= max {
                100.0
            } else {
                max / current * 100.0
            }
        }
        (None, None) => 0.0,
    }
}

fn fixed_progress(goal: &HealthGoal, current: f64, target: f64) -> f64 {
    let baseline = goal
        .initial_value
        .or_else(|| goal.milestones.first().map(|m| m.value))
        .unwrap_or(current);

    match goal.goal_kind {
        GoalKind::Decrease => {
            if baseline == target {
                if current <= target {
                    100.0
                } else {
                    0.0
                }
            } else {
                (baseline - current) / (baseline - target) * 100.0
            }
        }
        GoalKind::Increase => {
            if baseline == target {
                if current >= target {
                    100.0
                } else {
                    0.0
                }
            } else {
                (current - baseline) / (target - baseline) * 100.0
            }
        }
        GoalKind::Maintain => {
            let tolerance = target * MAINTAIN_TOLERANCE_RATIO;
            let deviation = (current - target).abs();
            if deviation <= tolerance {
                100.0
            } else {
                // Linear decay reaching zero at twice the tolerance distance.
                100.0 - deviation / tolerance * 50.0
            }
        }
        // A range-kind goal without bounds has nothing to measure against.
        GoalKind::Range => 0.0,
    }
}

/// Whether the goal's target condition currently holds.
pub fn is_achieved(goal: &HealthGoal) -> bool {
    let Some(current) = goal.current_value else {
        return false;
    };

    match goal.target() {
        Some(GoalTarget::Range { min, max }) => match (min, max) {
            (Some(min), Some(max)) => current >= min && current <= max,
            (Some(min), None) => current >= min,
            (None, Some(max)) => current <= max,
            (None, None) => false,
        },
        Some(GoalTarget::Fixed { target }) => match goal.goal_kind {
            GoalKind::Decrease => current <= target,
            GoalKind::Increase => current >= target,
            GoalKind::Maintain => (current - target).abs() <= target * MAINTAIN_TOLERANCE_RATIO,
            GoalKind::Range => false,
        },
        None => false,
    }
}

/// Recomputes the derived fields after any change to the goal's values or
/// target configuration: progress, and the achieve/revert transitions.
///
/// Reversion applies to every goal kind: whenever the achievement predicate
/// stops holding, an achieved goal returns to in-progress.
pub fn reconcile(goal: &mut HealthGoal) {
    goal.progress = compute_progress(goal);
    if is_achieved(goal) {
        goal.status = GoalStatus::Achieved;
    } else if goal.status == GoalStatus::Achieved {
        goal.status = GoalStatus::InProgress;
    }
}

/// Records a new observation: appends a milestone, promotes it to the
/// current value, and reconciles progress and status.
pub fn apply_observation(
    mut goal: HealthGoal,
    value: f64,
    note: Option<String>,
    timestamp: DateTime<Utc>,
) -> HealthGoal {
    goal.milestones.push(Milestone {
        date: timestamp,
        value,
        note,
    });
    goal.current_value = Some(value);
    reconcile(&mut goal);
    goal
}

/// Deadline-driven status refresh, evaluated on read. An in-progress goal
/// whose deadline has elapsed becomes achieved when its target condition
/// holds, expired otherwise. Returns whether the status changed.
pub fn refresh_status(goal: &mut HealthGoal, now: DateTime<Utc>) -> bool {
    if goal.status != GoalStatus::InProgress {
        return false;
    }
    match goal.deadline {
        Some(deadline) if deadline < now => {
            goal.status = if is_achieved(goal) {
                GoalStatus::Achieved
            } else {
                GoalStatus::Expired
            };
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::goals_model::TrackingFrequency;
    use chrono::{Duration, TimeZone};

    fn base_goal(goal_kind: GoalKind) -> HealthGoal {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        HealthGoal {
            id: "goal-1".to_string(),
            user_id: "user-1".to_string(),
            parameter: "Weight".to_string(),
            unit: "kg".to_string(),
            goal_kind,
            initial_value: None,
            target_value: None,
            min_value: None,
            max_value: None,
            current_value: None,
            progress: 0.0,
            status: GoalStatus::InProgress,
            tracking_frequency: TrackingFrequency::Daily,
            start_date: start,
            deadline: None,
            notes: None,
            calendar_event_id: None,
            sync_to_calendar: false,
            milestones: Vec::new(),
            created_at: start,
            updated_at: start,
        }
    }

    fn range_goal(min: Option<f64>, max: Option<f64>, current: f64) -> HealthGoal {
        let mut goal = base_goal(GoalKind::Range);
        goal.min_value = min;
        goal.max_value = max;
        goal.current_value = Some(current);
        goal
    }

    fn fixed_goal(goal_kind: GoalKind, initial: f64, target: f64, current: f64) -> HealthGoal {
        let mut goal = base_goal(goal_kind);
        goal.initial_value = Some(initial);
        goal.target_value = Some(target);
        goal.current_value = Some(current);
        goal
    }

    #[test]
    fn test_range_inside_band_is_complete() {
        let goal = range_goal(Some(10.0), Some(20.0), 15.0);
        assert_eq!(compute_progress(&goal), 100.0);
        assert!(is_achieved(&goal));
    }

    #[test]
    fn test_range_below_band_scales_with_distance() {
        // Distance 2 over a band of width 10 costs 20 points.
        let goal = range_goal(Some(10.0), Some(20.0), 8.0);
        assert_eq!(compute_progress(&goal), 80.0);
        assert!(!is_achieved(&goal));
    }

    #[test]
    fn test_range_far_below_band_floors_at_zero() {
        let goal = range_goal(Some(10.0), Some(20.0), 5.0);
        assert_eq!(compute_progress(&goal), 50.0);
        let goal = range_goal(Some(10.0), Some(20.0), -5.0);
        assert_eq!(compute_progress(&goal), 0.0);
    }

    #[test]
    fn test_range_above_band_is_symmetric() {
        let goal = range_goal(Some(10.0), Some(20.0), 22.0);
        assert_eq!(compute_progress(&goal), 80.0);
    }

    #[test]
    fn test_one_sided_min_bound() {
        assert_eq!(compute_progress(&range_goal(Some(50.0), None, 60.0)), 100.0);
        assert!(is_achieved(&range_goal(Some(50.0), None, 60.0)));
        assert_eq!(compute_progress(&range_goal(Some(50.0), None, 40.0)), 80.0);
        assert!(!is_achieved(&range_goal(Some(50.0), None, 40.0)));
    }

    #[test]
    fn test_one_sided_max_bound() {
        assert_eq!(compute_progress(&range_goal(None, Some(120.0), 110.0)), 100.0);
        assert_eq!(compute_progress(&range_goal(None, Some(120.0), 150.0)), 80.0);
        assert!(is_achieved(&range_goal(None, Some(120.0), 110.0)));
    }

    #[test]
    fn test_band_wins_over_kind() {
        // A decrease goal with bounds set is measured against the band.
        let mut goal = range_goal(Some(10.0), Some(20.0), 15.0);
        goal.goal_kind = GoalKind::Decrease;
        assert_eq!(compute_progress(&goal), 100.0);
    }

    #[test]
    fn test_decrease_midway() {
        let goal = fixed_goal(GoalKind::Decrease, 100.0, 50.0, 75.0);
        assert_eq!(compute_progress(&goal), 50.0);
        assert!(!is_achieved(&goal));
    }

    #[test]
    fn test_decrease_at_target() {
        let goal = fixed_goal(GoalKind::Decrease, 100.0, 50.0, 50.0);
        assert_eq!(compute_progress(&goal), 100.0);
        assert!(is_achieved(&goal));
    }

    #[test]
    fn test_decrease_no_movement() {
        let goal = fixed_goal(GoalKind::Decrease, 100.0, 50.0, 100.0);
        assert_eq!(compute_progress(&goal), 0.0);
    }

    #[test]
    fn test_decrease_overshoot_is_clamped() {
        let goal = fixed_goal(GoalKind::Decrease, 100.0, 50.0, 30.0);
        assert_eq!(compute_progress(&goal), 100.0);
        assert!(is_achieved(&goal));
    }

    #[test]
    fn test_decrease_regression_is_clamped_at_zero() {
        let goal = fixed_goal(GoalKind::Decrease, 100.0, 50.0, 120.0);
        assert_eq!(compute_progress(&goal), 0.0);
    }

    #[test]
    fn test_increase_midway() {
        let goal = fixed_goal(GoalKind::Increase, 0.0, 10.0, 5.0);
        assert_eq!(compute_progress(&goal), 50.0);
    }

    #[test]
    fn test_equal_baseline_and_target() {
        // The explicit equal-value branch, not a division.
        let goal = fixed_goal(GoalKind::Decrease, 50.0, 50.0, 50.0);
        assert_eq!(compute_progress(&goal), 100.0);
        let goal = fixed_goal(GoalKind::Decrease, 50.0, 50.0, 60.0);
        assert_eq!(compute_progress(&goal), 0.0);
        let goal = fixed_goal(GoalKind::Increase, 10.0, 10.0, 9.0);
        assert_eq!(compute_progress(&goal), 0.0);
    }

    #[test]
    fn test_maintain_within_tolerance() {
        let goal = fixed_goal(GoalKind::Maintain, 100.0, 100.0, 103.0);
        assert_eq!(compute_progress(&goal), 100.0);
        assert!(is_achieved(&goal));
    }

    #[test]
    fn test_maintain_outside_tolerance_decays() {
        // Deviation 12 against tolerance 5: 100 - (12/5)*50 < 0, floored.
        let goal = fixed_goal(GoalKind::Maintain, 100.0, 100.0, 112.0);
        assert_eq!(compute_progress(&goal), 0.0);
        assert!(!is_achieved(&goal));
        // Deviation 7.5 decays halfway.
        let goal = fixed_goal(GoalKind::Maintain, 100.0, 100.0, 107.5);
        assert_eq!(compute_progress(&goal), 25.0);
    }

    #[test]
    fn test_baseline_falls_back_to_first_milestone() {
        let mut goal = fixed_goal(GoalKind::Decrease, 0.0, 50.0, 75.0);
        goal.initial_value = None;
        goal.milestones.push(Milestone {
            date: goal.start_date,
            value: 100.0,
            note: None,
        });
        assert_eq!(compute_progress(&goal), 50.0);
    }

    #[test]
    fn test_baseline_falls_back_to_current_value() {
        let mut goal = fixed_goal(GoalKind::Decrease, 0.0, 50.0, 75.0);
        goal.initial_value = None;
        // baseline == current != target: (75-75)/(75-50) = 0.
        assert_eq!(compute_progress(&goal), 0.0);
    }

    #[test]
    fn test_no_current_value_means_no_progress() {
        let mut goal = fixed_goal(GoalKind::Decrease, 100.0, 50.0, 75.0);
        goal.current_value = None;
        assert_eq!(compute_progress(&goal), 0.0);
        assert!(!is_achieved(&goal));
    }

    #[test]
    fn test_fixed_goal_without_target_is_never_achieved() {
        let mut goal = base_goal(GoalKind::Decrease);
        goal.current_value = Some(10.0);
        assert!(!is_achieved(&goal));
        assert_eq!(compute_progress(&goal), 0.0);
    }

    #[test]
    fn test_compute_progress_is_idempotent() {
        let goal = fixed_goal(GoalKind::Decrease, 100.0, 50.0, 62.5);
        let first = compute_progress(&goal);
        assert_eq!(first, compute_progress(&goal));
        assert_eq!(first, 75.0);
    }

    #[test]
    fn test_observation_achieves_goal() {
        let goal = fixed_goal(GoalKind::Decrease, 100.0, 50.0, 75.0);
        let now = Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
        let goal = apply_observation(goal, 48.0, Some("fasting".to_string()), now);
        assert_eq!(goal.status, GoalStatus::Achieved);
        assert_eq!(goal.current_value, Some(48.0));
        assert_eq!(goal.progress, 100.0);
        assert_eq!(goal.milestones.len(), 1);
        assert_eq!(goal.milestones[0].date, now);
    }

    #[test]
    fn test_achieved_range_goal_reverts_when_leaving_band() {
        let mut goal = range_goal(Some(10.0), Some(20.0), 15.0);
        reconcile(&mut goal);
        assert_eq!(goal.status, GoalStatus::Achieved);

        let now = Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
        let goal = apply_observation(goal, 25.0, None, now);
        assert_eq!(goal.status, GoalStatus::InProgress);
        assert!(goal.progress < 100.0);
    }

    #[test]
    fn test_expired_when_deadline_passes_unachieved() {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let mut goal = fixed_goal(GoalKind::Decrease, 100.0, 50.0, 75.0);
        goal.deadline = Some(now - Duration::days(1));
        assert!(refresh_status(&mut goal, now));
        assert_eq!(goal.status, GoalStatus::Expired);
    }

    #[test]
    fn test_achieved_at_deadline_never_expires() {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let mut goal = fixed_goal(GoalKind::Decrease, 100.0, 50.0, 45.0);
        goal.deadline = Some(now - Duration::days(1));
        assert!(refresh_status(&mut goal, now));
        assert_eq!(goal.status, GoalStatus::Achieved);
    }

    #[test]
    fn test_future_deadline_leaves_status_alone() {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let mut goal = fixed_goal(GoalKind::Decrease, 100.0, 50.0, 75.0);
        goal.deadline = Some(now + Duration::days(1));
        assert!(!refresh_status(&mut goal, now));
        assert_eq!(goal.status, GoalStatus::InProgress);
    }

    #[test]
    fn test_refresh_only_touches_in_progress_goals() {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let mut goal = fixed_goal(GoalKind::Decrease, 100.0, 50.0, 45.0);
        goal.status = GoalStatus::Achieved;
        goal.deadline = Some(now - Duration::days(1));
        assert!(!refresh_status(&mut goal, now));
    }
}
