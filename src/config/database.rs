//! PostgreSQL connection pool initialization.
//!
//! The connection string is read from the `DATABASE_URL` environment
//! variable. The returned pool is cheaply cloneable and shared through the
//! application state; all persistence goes through it rather than any
//! module-level connection.

use sqlx::PgPool;
use std::env;

/// Panics if `DATABASE_URL` is unset or the database is unreachable; the
/// server cannot do anything useful without it.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
