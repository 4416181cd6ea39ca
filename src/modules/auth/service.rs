use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{AuthResponse, LoginDto, RegisterDto, User};

pub struct AuthService;

impl AuthService {
    /// Stores the bcrypt digest, never the plaintext. There is no
    /// duplicate-email pre-check: a unique violation rides the generic
    /// persistence error path and surfaces as a 500.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn register(
        db: &PgPool,
        dto: RegisterDto,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (full_name, email, password, avatar_url)
               VALUES ($1, $2, $3, $4)
               RETURNING id, full_name, email, avatar_url, created_at, updated_at"#,
        )
        .bind(&dto.full_name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(&dto.avatar_url)
        .fetch_one(db)
        .await?;

        let token = create_token(user.id, jwt_config)?;

        Ok(AuthResponse { user, token })
    }

    /// Unknown email and wrong password produce the same response.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login(
        db: &PgPool,
        dto: LoginDto,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: Uuid,
            full_name: String,
            email: String,
            avatar_url: Option<String>,
            password: String,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let row = sqlx::query_as::<_, UserWithPassword>(
            r#"SELECT id, full_name, email, avatar_url, password, created_at, updated_at
               FROM users WHERE email = $1"#,
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Wrong login or password")))?;

        let is_valid = verify_password(&dto.password, &row.password)?;
        if !is_valid {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Wrong login or password"
            )));
        }

        let token = create_token(row.id, jwt_config)?;

        Ok(AuthResponse {
            user: User {
                id: row.id,
                full_name: row.full_name,
                email: row.email,
                avatar_url: row.avatar_url,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            token,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_me(db: &PgPool, user_id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, full_name, email, avatar_url, created_at, updated_at
               FROM users WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::verify_token;
    use axum::http::StatusCode;

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_for_testing_purposes".to_string(),
            token_expiry: 3600,
        }
    }

    fn register_dto(email: &str) -> RegisterDto {
        RegisterDto {
            email: email.to_string(),
            password: "pass1".to_string(),
            full_name: "Ann Example".to_string(),
            avatar_url: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_then_login_succeeds(pool: PgPool) {
        let jwt_config = test_jwt_config();
        let email = format!("ann-{}@test.com", Uuid::new_v4());

        let registered = AuthService::register(&pool, register_dto(&email), &jwt_config)
            .await
            .unwrap();

        let logged_in = AuthService::login(
            &pool,
            LoginDto {
                email: email.clone(),
                password: "pass1".to_string(),
            },
            &jwt_config,
        )
        .await
        .unwrap();

        assert_eq!(logged_in.user.id, registered.user.id);
        assert_eq!(logged_in.user.email, email);

        let claims = verify_token(&logged_in.token, &jwt_config).unwrap();
        assert_eq!(claims.sub, registered.user.id.to_string());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_stores_hash_not_plaintext(pool: PgPool) {
        let jwt_config = test_jwt_config();
        let email = format!("ann-{}@test.com", Uuid::new_v4());

        AuthService::register(&pool, register_dto(&email), &jwt_config)
            .await
            .unwrap();

        let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_ne!(stored, "pass1");
        assert!(verify_password("pass1", &stored).unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_email_surfaces_as_internal_error(pool: PgPool) {
        let jwt_config = test_jwt_config();
        let email = format!("ann-{}@test.com", Uuid::new_v4());

        AuthService::register(&pool, register_dto(&email), &jwt_config)
            .await
            .unwrap();

        let result = AuthService::register(&pool, register_dto(&email), &jwt_config).await;

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_unknown_email_is_unauthorized(pool: PgPool) {
        let result = AuthService::login(
            &pool,
            LoginDto {
                email: "nobody@test.com".to_string(),
                password: "pass1".to_string(),
            },
            &test_jwt_config(),
        )
        .await;

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error.to_string(), "Wrong login or password");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_wrong_password_is_indistinguishable(pool: PgPool) {
        let jwt_config = test_jwt_config();
        let email = format!("ann-{}@test.com", Uuid::new_v4());

        AuthService::register(&pool, register_dto(&email), &jwt_config)
            .await
            .unwrap();

        let result = AuthService::login(
            &pool,
            LoginDto {
                email,
                password: "wrong-password".to_string(),
            },
            &jwt_config,
        )
        .await;

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error.to_string(), "Wrong login or password");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_me_returns_user(pool: PgPool) {
        let jwt_config = test_jwt_config();
        let email = format!("ann-{}@test.com", Uuid::new_v4());

        let registered = AuthService::register(&pool, register_dto(&email), &jwt_config)
            .await
            .unwrap();

        let user = AuthService::get_me(&pool, registered.user.id).await.unwrap();
        assert_eq!(user.email, email);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_me_not_found(pool: PgPool) {
        let result = AuthService::get_me(&pool, Uuid::new_v4()).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status, StatusCode::NOT_FOUND);
    }
}
