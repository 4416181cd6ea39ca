//! Configuration modules, each loaded from environment variables via a
//! `from_env()` constructor and composed into [`crate::state::AppState`].
//!
//! - [`cors`]: allowed CORS origins
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: token secret and expiry
//! - [`upload`]: upload directory and size limit

pub mod cors;
pub mod database;
pub mod jwt;
pub mod upload;
