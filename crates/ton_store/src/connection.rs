//! Database connection utilities.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use ton_error::{StoreError, TonResult};

/// Shared r2d2 connection pool type.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Embedded schema migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Build a connection pool for the given database URL.
///
/// # Errors
///
/// Returns a connection error if the pool cannot be initialized.
pub fn build_pool(database_url: &str) -> TonResult<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(8)
        .build(manager)
        .map_err(|e| StoreError::connection(e.to_string()).into())
}

/// Run any pending embedded migrations.
///
/// # Errors
///
/// Returns a query error if a migration fails.
pub fn run_migrations(pool: &PgPool) -> TonResult<()> {
    let mut conn = pool
        .get()
        .map_err(|e| StoreError::connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::query(e.to_string()))?;
    Ok(())
}
