use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{
    create_post, get_last_tags, get_post, get_posts, get_posts_new, get_posts_popular,
    post_comment, remove_post, update_post,
};

pub fn init_posts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_posts).post(create_post))
        .route("/new", get(get_posts_new))
        .route("/popular", get(get_posts_popular))
        .route("/tags", get(get_last_tags))
        .route("/{id}", get(get_post).patch(update_post).delete(remove_post))
        .route("/{id}/postComment", patch(post_comment))
}
