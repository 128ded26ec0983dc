//! Persistence layer for restaurants, categories and their photos.
//!
//! [`models`] are always available. With the default `store` feature,
//! [`repositories`] talk to PostgreSQL directly and [`store::RestaurantStore`]
//! is the seam the API services program against, implemented by
//! [`store::PgStore`] and the in-process [`memory::MemoryStore`].

pub mod models;

#[cfg(feature = "store")]
pub mod memory;
#[cfg(feature = "store")]
pub mod repositories;
#[cfg(feature = "store")]
pub mod store;

#[cfg(feature = "store")]
pub use memory::MemoryStore;
#[cfg(feature = "store")]
pub use store::{PgStore, RestaurantStore, StoreError};

#[cfg(feature = "store")]
pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
#[cfg(feature = "store")]
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
#[cfg(feature = "store")]
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
#[cfg(feature = "store")]
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
