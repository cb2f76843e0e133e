//! Database models for health readings.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;

use vitatrack_core::readings::HealthReading;

/// Database model for one observed health value.
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::health_readings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HealthReadingDB {
    pub id: String,
    pub user_id: String,
    pub test_name: String,
    pub value: f64,
    pub unit: Option<String>,
    pub recorded_at: NaiveDateTime,
}

impl From<HealthReadingDB> for HealthReading {
    fn from(db: HealthReadingDB) -> Self {
        HealthReading {
            test_name: db.test_name,
            value: db.value,
            unit: db.unit,
            recorded_at: Utc.from_utc_datetime(&db.recorded_at),
        }
    }
}
