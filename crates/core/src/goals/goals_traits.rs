use crate::errors::Result;
use crate::goals::goals_model::{
    GoalStats, GoalStatus, HealthGoal, HealthGoalUpdate, NewHealthGoal, NewMilestone,
};
use async_trait::async_trait;

/// Trait for goal repository operations.
///
/// `insert_new_goal` mints an id for the goal when the supplied one is empty;
/// everything else (milestones, progress, status) arrives fully computed.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn load_goals(&self, user_id: &str, status: Option<GoalStatus>) -> Result<Vec<HealthGoal>>;
    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<HealthGoal>;
    async fn insert_new_goal(&self, goal: HealthGoal) -> Result<HealthGoal>;
    async fn update_goal(&self, goal: HealthGoal) -> Result<HealthGoal>;
    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<usize>;
}

/// Trait for goal service operations.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    async fn create_goal(&self, user_id: &str, new_goal: NewHealthGoal) -> Result<HealthGoal>;
    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<HealthGoal>;
    /// Lists goals, settling any elapsed deadlines on the way out.
    async fn list_goals(
        &self,
        user_id: &str,
        status: Option<GoalStatus>,
    ) -> Result<Vec<HealthGoal>>;
    async fn update_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        update: HealthGoalUpdate,
    ) -> Result<HealthGoal>;
    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()>;
    async fn record_observation(
        &self,
        user_id: &str,
        goal_id: &str,
        observation: NewMilestone,
    ) -> Result<HealthGoal>;
    async fn update_milestone(
        &self,
        user_id: &str,
        goal_id: &str,
        index: usize,
        value: Option<f64>,
        note: Option<String>,
    ) -> Result<HealthGoal>;
    async fn remove_milestone(
        &self,
        user_id: &str,
        goal_id: &str,
        index: usize,
    ) -> Result<HealthGoal>;
    /// Applies the user's latest readings to every matching in-progress goal.
    /// Returns the number of goals updated.
    async fn sync_goals_from_readings(&self, user_id: &str) -> Result<usize>;
    fn goal_stats(&self, user_id: &str) -> Result<GoalStats>;
}
