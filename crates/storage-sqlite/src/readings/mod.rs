//! Reading repository backed by SQLite.

mod model;
mod repository;

pub use model::HealthReadingDB;
pub use repository::SqliteReadingRepository;
