use std::sync::Arc;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use vitatrack_core::readings::{HealthReading, ReadingRepositoryTrait};
use vitatrack_core::Result;

use super::model::HealthReadingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::health_readings;

pub struct SqliteReadingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteReadingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SqliteReadingRepository { pool, writer }
    }

    /// Stores a batch of readings sharing one observation time, typically
    /// the extracted values of a single analyzed document.
    pub async fn insert_readings(
        &self,
        user_id: &str,
        readings: Vec<HealthReading>,
    ) -> Result<usize> {
        let rows: Vec<HealthReadingDB> = readings
            .into_iter()
            .map(|r| HealthReadingDB {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                test_name: r.test_name,
                value: r.value,
                unit: r.unit,
                recorded_at: r.recorded_at.naive_utc(),
            })
            .collect();

        self.writer
            .exec(move |conn| {
                let inserted = diesel::insert_into(health_readings::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted)
            })
            .await
    }
}

impl ReadingRepositoryTrait for SqliteReadingRepository {
    fn latest_readings(&self, user_id: &str) -> Result<Vec<HealthReading>> {
        let mut conn = get_connection(&self.pool)?;

        let latest: Option<NaiveDateTime> = health_readings::table
            .filter(health_readings::user_id.eq(user_id))
            .select(diesel::dsl::max(health_readings::recorded_at))
            .first(&mut conn)
            .map_err(StorageError::from)?;
        let Some(latest) = latest else {
            return Ok(Vec::new());
        };

        let rows = health_readings::table
            .filter(health_readings::user_id.eq(user_id))
            .filter(health_readings::recorded_at.eq(latest))
            .load::<HealthReadingDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(HealthReading::from).collect())
    }
}
