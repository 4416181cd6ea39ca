//! Shared utilities used throughout the application:
//!
//! - [`errors`]: Application error type and HTTP mapping
//! - [`jwt`]: Token creation and verification
//! - [`password`]: Password hashing and verification
//! - [`storage`]: Local file storage for uploaded images

pub mod errors;
pub mod jwt;
pub mod password;
pub mod storage;
