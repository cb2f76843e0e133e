//! Goal repository backed by SQLite.

mod model;
mod repository;

pub use model::HealthGoalDB;
pub use repository::SqliteGoalRepository;
