use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use vitatrack_core::goals::{GoalRepositoryTrait, GoalStatus, HealthGoal};
use vitatrack_core::Result;

use super::model::HealthGoalDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::health_goals;

pub struct SqliteGoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteGoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SqliteGoalRepository { pool, writer }
    }
}

#[async_trait]
impl GoalRepositoryTrait for SqliteGoalRepository {
    fn load_goals(&self, user_id: &str, status: Option<GoalStatus>) -> Result<Vec<HealthGoal>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = health_goals::table
            .filter(health_goals::user_id.eq(user_id))
            .order(health_goals::created_at.desc())
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(health_goals::status.eq(status.as_str()));
        }

        let rows = query
            .load::<HealthGoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(HealthGoalDB::into_domain).collect()
    }

    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<HealthGoal> {
        let mut conn = get_connection(&self.pool)?;
        let row = health_goals::table
            .filter(health_goals::id.eq(goal_id))
            .filter(health_goals::user_id.eq(user_id))
            .first::<HealthGoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        row.into_domain()
    }

    async fn insert_new_goal(&self, mut goal: HealthGoal) -> Result<HealthGoal> {
        if goal.id.is_empty() {
            goal.id = Uuid::new_v4().to_string();
        }
        let row = HealthGoalDB::from_domain(&goal)?;

        self.writer
            .exec(move |conn| {
                let inserted = diesel::insert_into(health_goals::table)
                    .values(&row)
                    .returning(HealthGoalDB::as_returning())
                    .get_result::<HealthGoalDB>(conn)
                    .map_err(StorageError::from)?;
                inserted.into_domain()
            })
            .await
    }

    async fn update_goal(&self, goal: HealthGoal) -> Result<HealthGoal> {
        let row = HealthGoalDB::from_domain(&goal)?;

        self.writer
            .exec(move |conn| {
                let updated = diesel::update(health_goals::table.find(row.id.clone()))
                    .set(&row)
                    .returning(HealthGoalDB::as_returning())
                    .get_result::<HealthGoalDB>(conn)
                    .map_err(StorageError::from)?;
                updated.into_domain()
            })
            .await
    }

    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();

        self.writer
            .exec(move |conn| {
                let deleted = diesel::delete(
                    health_goals::table
                        .filter(health_goals::id.eq(goal_id))
                        .filter(health_goals::user_id.eq(user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(deleted)
            })
            .await
    }
}
