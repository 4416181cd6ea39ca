use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Application-wide error type carrying an HTTP status and the underlying
/// cause. Validation failures additionally carry the full list of violated
/// rules so the response can report all of them at once.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub messages: Option<Vec<String>>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            messages: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    /// A 400 carrying every violated validation rule.
    pub fn validation(messages: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!("Validation failed"),
            messages: Some(messages),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // The real cause of a 500 stays in the server log only.
        if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.error, "Internal server error");
            let body = Json(json!({ "error": "Something went wrong" }));
            return (self.status, body).into_response();
        }

        let body = match &self.messages {
            Some(messages) => Json(json!({ "errors": messages })),
            None => Json(json!({ "error": self.error.to_string() })),
        };

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
