use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{CommentDto, Post, PostDto, PostWithAuthor, SuccessResponse};
use super::service::{PostSort, PostService};

/// Most recent tags, sampled from the latest posts.
const LAST_TAGS_LIMIT: usize = 5;

/// List all posts
#[utoipa::path(
    get,
    path = "/posts",
    responses(
        (status = 200, description = "All posts with author display fields", body = Vec<PostWithAuthor>)
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn get_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostWithAuthor>>, AppError> {
    let posts = PostService::list(&state.db, PostSort::Unsorted).await?;
    Ok(Json(posts))
}

/// List posts, newest first
#[utoipa::path(
    get,
    path = "/posts/new",
    responses(
        (status = 200, description = "Posts ordered by creation time", body = Vec<PostWithAuthor>)
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn get_posts_new(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostWithAuthor>>, AppError> {
    let posts = PostService::list(&state.db, PostSort::Newest).await?;
    Ok(Json(posts))
}

/// List posts, most viewed first
#[utoipa::path(
    get,
    path = "/posts/popular",
    responses(
        (status = 200, description = "Posts ordered by view count", body = Vec<PostWithAuthor>)
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn get_posts_popular(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostWithAuthor>>, AppError> {
    let posts = PostService::list(&state.db, PostSort::MostViewed).await?;
    Ok(Json(posts))
}

/// Tags of the most recent posts
#[utoipa::path(
    get,
    path = "/posts/tags",
    responses(
        (status = 200, description = "Recent tag sample", body = Vec<String>)
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn get_last_tags(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let tags = PostService::get_last_tags(&state.db, LAST_TAGS_LIMIT).await?;
    Ok(Json(tags))
}

/// Fetch one post; increments its view counter
#[utoipa::path(
    get,
    path = "/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "The post, with its view counter already incremented", body = Post),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, AppError> {
    let post = PostService::get_one(&state.db, id).await?;
    Ok(Json(post))
}

/// Create a post
#[utoipa::path(
    post,
    path = "/posts",
    request_body = PostDto,
    responses(
        (status = 200, description = "Created post", body = Post),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "No access", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<PostDto>,
) -> Result<Json<Post>, AppError> {
    let post = PostService::create(&state.db, dto, auth_user.user_id()?).await?;
    Ok(Json(post))
}

/// Overwrite a post; the owner becomes the caller
#[utoipa::path(
    patch,
    path = "/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = PostDto,
    responses(
        (status = 200, description = "Update applied (or matched nothing)", body = SuccessResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "No access", body = ErrorResponse)
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<PostDto>,
) -> Result<Json<SuccessResponse>, AppError> {
    PostService::update(&state.db, id, dto, auth_user.user_id()?).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted", body = SuccessResponse),
        (status = 401, description = "No access", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn remove_post(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    PostService::remove(&state.db, id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Append a comment to a post
#[utoipa::path(
    patch,
    path = "/posts/{id}/postComment",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = CommentDto,
    responses(
        (status = 200, description = "Comment appended", body = SuccessResponse),
        (status = 401, description = "No access", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn post_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(dto): Json<CommentDto>,
) -> Result<Json<SuccessResponse>, AppError> {
    PostService::post_comment(&state.db, id, auth_user.user_id()?, dto.text).await?;
    Ok(Json(SuccessResponse { success: true }))
}
