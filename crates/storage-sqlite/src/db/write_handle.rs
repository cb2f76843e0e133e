use std::sync::Arc;

use diesel::sqlite::SqliteConnection;
use tokio::sync::Mutex;

use vitatrack_core::errors::{Error, Result};

use super::{get_connection, DbConnection, DbPool};
use crate::errors::StorageError;

/// Serialized write access to the database.
///
/// SQLite allows a single writer at a time. Every mutation goes through one
/// dedicated connection guarded by an async mutex, inside an immediate
/// transaction, so writers queue instead of hitting `SQLITE_BUSY`.
#[derive(Clone)]
pub struct WriteHandle {
    conn: Arc<Mutex<DbConnection>>,
}

impl WriteHandle {
    /// Takes one connection out of the pool and dedicates it to writes.
    pub fn new(pool: &DbPool) -> Result<Self> {
        let conn = get_connection(pool)?;
        Ok(WriteHandle {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Executes a database job on the writer connection, wrapped in an
    /// immediate transaction.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send,
        T: Send,
    {
        let mut conn = self.conn.lock().await;
        conn.immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
            .map_err(Error::from)
    }
}
