//! Postgres-backed store implementations.

mod catalog;
mod chat;
mod posts;
mod settings;

pub use catalog::{PostgresAdStore, PostgresMagazineStore, PostgresVideoStore};
pub use chat::PostgresChatStore;
pub use posts::PostgresPostStore;
pub use settings::PostgresSettingsStore;

use crate::PgPool;
use diesel::pg::PgConnection;
use ton_error::{StoreError, StoreErrorKind};

/// Map a Diesel error onto the store taxonomy.
///
/// Connection loss and resource exhaustion are the degradable class that
/// read paths answer from fixtures; everything else is a plain query error.
pub(crate) fn map_diesel_error(e: diesel::result::Error) -> StoreError {
    use diesel::result::{DatabaseErrorKind as DbKind, Error};

    match e {
        Error::NotFound => StoreError::not_found("record"),
        Error::DatabaseError(kind, info) => {
            let msg = info.message().to_string();
            match kind {
                DbKind::ClosedConnection => StoreError::connection(msg),
                _ if msg.contains("quota")
                    || msg.contains("too many connections")
                    || msg.contains("insufficient resources") =>
                {
                    StoreError::new(StoreErrorKind::ResourceExhausted(msg))
                }
                _ => StoreError::query(msg),
            }
        }
        other => StoreError::query(other.to_string()),
    }
}

/// Run a blocking Diesel closure on the blocking thread pool.
pub(crate) async fn run_blocking<T, F>(pool: &PgPool, f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> Result<T, StoreError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .map_err(|e| StoreError::connection(e.to_string()))?;
        f(&mut conn)
    })
    .await
    .map_err(|e| StoreError::query(e.to_string()))?
}
