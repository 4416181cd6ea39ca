use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::storage::{LocalUploadStore, StorageError};

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
}

fn storage_error(err: StorageError) -> AppError {
    match err {
        StorageError::Io(e) => AppError::internal(e),
        other => AppError::bad_request(anyhow::anyhow!("{}", other)),
    }
}

/// Upload an image
#[utoipa::path(
    post,
    path = "/upload",
    responses(
        (status = 200, description = "Public URL of the stored image", body = UploadResponse),
        (status = 400, description = "Missing or invalid image field", body = ErrorResponse),
        (status = 401, description = "No access", body = ErrorResponse)
    ),
    tag = "Uploads",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let store = LocalUploadStore::new(
        state.upload_config.dir.clone(),
        state.upload_config.max_file_size,
    );

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request(anyhow::anyhow!("Malformed multipart body")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        // Files are keyed by their original filename, matching the URL
        // the static file route serves them under.
        let file_name = field
            .file_name()
            .map(ToString::to_string)
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Missing file name")))?;

        let content = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request(anyhow::anyhow!("Failed to read uploaded file")))?;

        let url = store
            .save(&file_name, &content)
            .await
            .map_err(storage_error)?;

        return Ok(Json(UploadResponse { url }));
    }

    Err(AppError::bad_request(anyhow::anyhow!(
        "Missing 'image' field"
    )))
}
