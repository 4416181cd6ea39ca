use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{AuthResponse, LoginDto, RegisterDto, User};
use crate::modules::posts::model::{
    Comment, CommentAuthor, CommentDto, Post, PostAuthor, PostDto, PostWithAuthor, SuccessResponse,
};
use crate::modules::uploads::controller::UploadResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::posts::controller::get_posts,
        crate::modules::posts::controller::get_posts_new,
        crate::modules::posts::controller::get_posts_popular,
        crate::modules::posts::controller::get_last_tags,
        crate::modules::posts::controller::get_post,
        crate::modules::posts::controller::create_post,
        crate::modules::posts::controller::update_post,
        crate::modules::posts::controller::remove_post,
        crate::modules::posts::controller::post_comment,
        crate::modules::uploads::controller::upload_image,
    ),
    components(
        schemas(
            User,
            RegisterDto,
            LoginDto,
            AuthResponse,
            Post,
            PostWithAuthor,
            PostAuthor,
            Comment,
            CommentAuthor,
            PostDto,
            CommentDto,
            SuccessResponse,
            UploadResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, and identity"),
        (name = "Posts", description = "Blog post CRUD, tags, and comments"),
        (name = "Uploads", description = "Image uploads")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
