use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::errors::AppError;

use super::model::{Comment, CommentAuthor, Post, PostDto, PostWithAuthor};

#[derive(Debug, Clone, Copy)]
pub enum PostSort {
    /// Stored order, no ORDER BY.
    Unsorted,
    Newest,
    MostViewed,
}

/// Callers send tags as one comma-joined string; stored as an ordered list.
pub(crate) fn parse_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

const POST_COLUMNS: &str =
    "id, title, text, tags, image_url, views_count, user_id, comments, created_at, updated_at";

pub struct PostService;

impl PostService {
    /// List posts with the owner's display name and avatar attached.
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool, sort: PostSort) -> Result<Vec<PostWithAuthor>, AppError> {
        let mut query = String::from(
            r#"SELECT p.id, p.title, p.text, p.tags, p.image_url, p.views_count, p.user_id,
                      u.full_name, u.avatar_url, p.comments, p.created_at, p.updated_at
               FROM posts p
               INNER JOIN users u ON u.id = p.user_id"#,
        );

        match sort {
            PostSort::Unsorted => {}
            PostSort::Newest => query.push_str(" ORDER BY p.created_at DESC"),
            PostSort::MostViewed => query.push_str(" ORDER BY p.views_count DESC"),
        }

        let posts = sqlx::query_as::<_, PostWithAuthor>(&query).fetch_all(db).await?;

        Ok(posts)
    }

    /// Fetch one post, incrementing its view counter as part of the read.
    /// The increment is a single update-and-return statement, so concurrent
    /// readers never lose a count.
    #[instrument(skip(db))]
    pub async fn get_one(db: &PgPool, id: Uuid) -> Result<Post, AppError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"UPDATE posts SET views_count = views_count + 1
               WHERE id = $1
               RETURNING {POST_COLUMNS}"#
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Post not found")))?;

        Ok(post)
    }

    #[instrument(skip(db, dto))]
    pub async fn create(db: &PgPool, dto: PostDto, owner_id: Uuid) -> Result<Post, AppError> {
        let tags = parse_tags(dto.tags.as_deref());

        let post = sqlx::query_as::<_, Post>(&format!(
            r#"INSERT INTO posts (title, text, tags, image_url, user_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {POST_COLUMNS}"#
        ))
        .bind(&dto.title)
        .bind(&dto.text)
        .bind(&tags)
        .bind(&dto.image_url)
        .bind(owner_id)
        .fetch_one(db)
        .await?;

        Ok(post)
    }

    /// Full-field overwrite; the owner is reset to the caller. The update
    /// is unconditional: a missing id affects zero rows and still reports
    /// success, creating nothing.
    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        dto: PostDto,
        caller_id: Uuid,
    ) -> Result<(), AppError> {
        let tags = parse_tags(dto.tags.as_deref());

        sqlx::query(
            r#"UPDATE posts
               SET title = $1, text = $2, tags = $3, image_url = $4, user_id = $5,
                   updated_at = NOW()
               WHERE id = $6"#,
        )
        .bind(&dto.title)
        .bind(&dto.text)
        .bind(&tags)
        .bind(&dto.image_url)
        .bind(caller_id)
        .bind(id)
        .execute(db)
        .await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn remove(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Post not found")));
        }

        Ok(())
    }

    /// Tags of the first `limit` posts in stored order, flattened and
    /// truncated to `limit`. An approximate trending sample, not a
    /// frequency count.
    #[instrument(skip(db))]
    pub async fn get_last_tags(db: &PgPool, limit: usize) -> Result<Vec<String>, AppError> {
        let tag_lists = sqlx::query_scalar::<_, Vec<String>>("SELECT tags FROM posts LIMIT $1")
            .bind(limit as i64)
            .fetch_all(db)
            .await?;

        let mut tags: Vec<String> = tag_lists.into_iter().flatten().collect();
        tags.truncate(limit);

        Ok(tags)
    }

    /// Append a comment carrying a snapshot of the commenter's current name
    /// and avatar. Read-then-write on the full comment list: concurrent
    /// commenters on the same post can lose an append (last write wins).
    #[instrument(skip(db, text))]
    pub async fn post_comment(
        db: &PgPool,
        post_id: Uuid,
        commenter_id: Uuid,
        text: String,
    ) -> Result<(), AppError> {
        let author = sqlx::query_as::<_, CommentAuthor>(
            "SELECT full_name, avatar_url FROM users WHERE id = $1",
        )
        .bind(commenter_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        let comments: Json<Vec<Comment>> =
            sqlx::query_scalar("SELECT comments FROM posts WHERE id = $1")
                .bind(post_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Post not found")))?;

        let mut comments = comments.0;
        comments.push(Comment { user: author, text });

        sqlx::query("UPDATE posts SET comments = $1, updated_at = NOW() WHERE id = $2")
            .bind(Json(comments))
            .bind(post_id)
            .execute(db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn post_dto(title: &str, tags: Option<&str>) -> PostDto {
        PostDto {
            title: title.to_string(),
            text: "A body text long enough to pass validation".to_string(),
            tags: tags.map(String::from),
            image_url: None,
        }
    }

    async fn seed_user(pool: &PgPool, name: &str) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (full_name, email, password) VALUES ($1, $2, 'hashed') RETURNING id",
        )
        .bind(name)
        .bind(format!("{}-{}@test.com", name, Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[test]
    fn test_parse_tags_splits_and_trims() {
        assert_eq!(
            parse_tags(Some("rust, axum ,web")),
            vec!["rust", "axum", "web"]
        );
    }

    #[test]
    fn test_parse_tags_drops_empty_segments() {
        assert_eq!(parse_tags(Some("rust,,  ,axum")), vec!["rust", "axum"]);
        assert!(parse_tags(None).is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_post_sets_owner_and_parses_tags(pool: PgPool) {
        let owner_id = seed_user(&pool, "Ann").await;

        let post = PostService::create(&pool, post_dto("First post", Some("rust,web")), owner_id)
            .await
            .unwrap();

        assert_eq!(post.user_id, owner_id);
        assert_eq!(post.tags, vec!["rust", "web"]);
        assert_eq!(post.views_count, 0);
        assert!(post.comments.0.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_one_increments_views_by_one_per_call(pool: PgPool) {
        let owner_id = seed_user(&pool, "Ann").await;
        let post = PostService::create(&pool, post_dto("Counted", None), owner_id)
            .await
            .unwrap();

        let first = PostService::get_one(&pool, post.id).await.unwrap();
        let second = PostService::get_one(&pool, post.id).await.unwrap();

        assert_eq!(first.views_count, 1);
        assert_eq!(second.views_count, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_one_not_found(pool: PgPool) {
        let result = PostService::get_one(&pool, Uuid::new_v4()).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_concurrent_views_sum_correctly(pool: PgPool) {
        let owner_id = seed_user(&pool, "Ann").await;
        let post = PostService::create(&pool, post_dto("Contended", None), owner_id)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let pool = pool.clone();
            let post_id = post.id;
            handles.push(tokio::spawn(async move {
                PostService::get_one(&pool, post_id).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let views: i64 = sqlx::query_scalar("SELECT views_count FROM posts WHERE id = $1")
            .bind(post.id)
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(views, 10);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_overwrites_all_fields_and_resets_owner(pool: PgPool) {
        let original_owner = seed_user(&pool, "Ann").await;
        let caller = seed_user(&pool, "Bob").await;
        let post = PostService::create(&pool, post_dto("Original", Some("old")), original_owner)
            .await
            .unwrap();

        PostService::update(&pool, post.id, post_dto("Rewritten", Some("new")), caller)
            .await
            .unwrap();

        let updated = PostService::get_one(&pool, post.id).await.unwrap();
        assert_eq!(updated.title, "Rewritten");
        assert_eq!(updated.tags, vec!["new"]);
        assert_eq!(updated.user_id, caller);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_nonexistent_id_succeeds_and_creates_nothing(pool: PgPool) {
        let caller = seed_user(&pool, "Ann").await;

        let result = PostService::update(&pool, Uuid::new_v4(), post_dto("Ghost", None), caller).await;
        assert!(result.is_ok());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_remove_post(pool: PgPool) {
        let owner_id = seed_user(&pool, "Ann").await;
        let post = PostService::create(&pool, post_dto("Doomed", None), owner_id)
            .await
            .unwrap();

        PostService::remove(&pool, post.id).await.unwrap();

        let result = PostService::get_one(&pool, post.id).await;
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_remove_nonexistent_id_not_found(pool: PgPool) {
        let result = PostService::remove(&pool, Uuid::new_v4()).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_newest_orders_by_created_at_desc(pool: PgPool) {
        let owner_id = seed_user(&pool, "Ann").await;
        let older = PostService::create(&pool, post_dto("Older post", None), owner_id)
            .await
            .unwrap();
        let newer = PostService::create(&pool, post_dto("Newer post", None), owner_id)
            .await
            .unwrap();

        sqlx::query("UPDATE posts SET created_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
            .bind(older.id)
            .execute(&pool)
            .await
            .unwrap();

        let posts = PostService::list(&pool, PostSort::Newest).await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, newer.id);
        assert_eq!(posts[1].id, older.id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_popular_orders_by_views_desc(pool: PgPool) {
        let owner_id = seed_user(&pool, "Ann").await;
        let quiet = PostService::create(&pool, post_dto("Quiet post", None), owner_id)
            .await
            .unwrap();
        let popular = PostService::create(&pool, post_dto("Popular post", None), owner_id)
            .await
            .unwrap();

        PostService::get_one(&pool, popular.id).await.unwrap();
        PostService::get_one(&pool, popular.id).await.unwrap();

        let posts = PostService::list(&pool, PostSort::MostViewed).await.unwrap();

        assert_eq!(posts[0].id, popular.id);
        assert_eq!(posts[1].id, quiet.id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_attaches_author_display_fields(pool: PgPool) {
        let owner_id = seed_user(&pool, "Ann Example").await;
        PostService::create(&pool, post_dto("Attributed", None), owner_id)
            .await
            .unwrap();

        let posts = PostService::list(&pool, PostSort::Unsorted).await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].user.full_name, "Ann Example");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_last_tags_flattens_and_truncates(pool: PgPool) {
        let owner_id = seed_user(&pool, "Ann").await;
        for i in 0..3 {
            PostService::create(
                &pool,
                post_dto(&format!("Post {}", i), Some("one,two")),
                owner_id,
            )
            .await
            .unwrap();
        }

        let tags = PostService::get_last_tags(&pool, 5).await.unwrap();

        assert_eq!(tags.len(), 5);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_post_comment_appends_snapshot(pool: PgPool) {
        let owner_id = seed_user(&pool, "Ann").await;
        let commenter_id = seed_user(&pool, "Bob Commenter").await;
        let post = PostService::create(&pool, post_dto("Discussed", None), owner_id)
            .await
            .unwrap();

        PostService::post_comment(&pool, post.id, commenter_id, "First!".to_string())
            .await
            .unwrap();
        PostService::post_comment(&pool, post.id, commenter_id, "Second!".to_string())
            .await
            .unwrap();

        let updated = PostService::get_one(&pool, post.id).await.unwrap();
        let comments = &updated.comments.0;

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].user.full_name, "Bob Commenter");
        assert_eq!(comments[0].text, "First!");
        assert_eq!(comments[1].text, "Second!");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_post_comment_missing_post_not_found(pool: PgPool) {
        let commenter_id = seed_user(&pool, "Bob").await;

        let result =
            PostService::post_comment(&pool, Uuid::new_v4(), commenter_id, "Hello".to_string())
                .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }
}
