//! Goals module - domain models, the progress engine, services, and traits.

mod goals_constants;
mod goals_engine;
mod goals_model;
mod goals_service;
mod goals_traits;


// Re-export the public interface
pub use goals_constants::*;
pub use goals_engine::{apply_observation, compute_progress, is_achieved, reconcile, refresh_status};
pub use goals_model::{
    GoalKind, GoalStats, GoalStatus, GoalTarget, HealthGoal, HealthGoalUpdate, Milestone,
    NewHealthGoal, NewMilestone, TrackingFrequency,
};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
