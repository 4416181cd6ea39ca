//! Request middleware and extractors.
//!
//! Authentication flow: the client sends `Authorization: Bearer <token>`,
//! the [`auth::AuthUser`] extractor verifies the token, and the handler runs
//! with the resolved user id. A missing header or a failed verification
//! rejects the request with 401 before the handler is reached.

pub mod auth;
