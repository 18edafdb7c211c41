//! PostgreSQL persistence for Talk of Nations.
//!
//! Each entity gets a repository implementing its `ton_interface` store
//! trait over a Diesel r2d2 pool. Read paths degrade to the built-in
//! fixture set when the database is unreachable or quota-exhausted, so the
//! public site serves sample content instead of failing outright. Write
//! paths propagate errors.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifacts;
mod connection;
mod filter;
pub mod fixtures;
mod memory;
mod postgres;
mod rows;
pub mod schema;

pub use artifacts::ArtifactStore;
pub use connection::{PgPool, build_pool, run_migrations};
pub use filter::apply_post_filter;
pub use memory::MemoryStore;
pub use postgres::{
    PostgresAdStore, PostgresChatStore, PostgresMagazineStore, PostgresPostStore,
    PostgresSettingsStore, PostgresVideoStore,
};
