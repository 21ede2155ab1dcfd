use sqlx::{FromRow, SqlitePool};
use tracing::info;

use crate::db;
use crate::error::AppError;

use super::dto::PublicUser;
use super::password;

/// Full account row, stored hash included. Private to this module and
/// deliberately without `Debug` or `Serialize` so the hash cannot leak
/// through a log line or a response body.
#[derive(FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password: String,
    created_at: String,
}

impl From<UserRow> for PublicUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

async fn find_by_email(db: &SqlitePool, email: &str) -> Result<Option<UserRow>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, password, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Register a new account. The email must be unused; the password is hashed
/// before anything touches the database, so the plaintext is never persisted.
/// A duplicate email is a conflict whether the pre-check catches it or two
/// registrations race into the UNIQUE constraint.
pub async fn create(db: &SqlitePool, email: &str, password: &str) -> Result<PublicUser, AppError> {
    if find_by_email(db, email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered"));
    }

    let hash = password::hash_password(password)?;
    let created_at = db::now_rfc3339()?;

    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, password, created_at)
        VALUES (?, ?, ?)
        RETURNING id, email, password, created_at
        "#,
    )
    .bind(email)
    .bind(&hash)
    .bind(&created_at)
    .fetch_one(db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Email already registered")
        }
        _ => AppError::Database(e),
    })?;

    info!(user_id = row.id, "user row created");
    Ok(row.into())
}

/// Check credentials against the stored hash. Unknown email and wrong
/// password both come back as `Ok(None)`, so callers cannot tell the two
/// apart.
pub async fn login(
    db: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<Option<PublicUser>, AppError> {
    let Some(row) = find_by_email(db, email).await? else {
        return Ok(None);
    };

    if !password::verify_password(password, &row.password)? {
        return Ok(None);
    }

    Ok(Some(row.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::create_test_pool;

    #[tokio::test]
    async fn create_returns_public_fields_only() {
        let pool = create_test_pool().await.unwrap();

        let user = create(&pool, "dana@example.com", "hunter2hunter2")
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.email, "dana@example.com");
        assert!(!user.created_at.is_empty());
    }

    #[tokio::test]
    async fn create_stores_a_hash_not_the_plaintext() {
        let pool = create_test_pool().await.unwrap();

        create(&pool, "dana@example.com", "hunter2hunter2")
            .await
            .unwrap();

        let (stored,): (String,) = sqlx::query_as("SELECT password FROM users WHERE email = ?")
            .bind("dana@example.com")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_ne!(stored, "hunter2hunter2");
        assert!(stored.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict_and_keeps_one_row() {
        let pool = create_test_pool().await.unwrap();

        create(&pool, "dana@example.com", "hunter2hunter2")
            .await
            .unwrap();
        let err = create(&pool, "dana@example.com", "anotherpassword")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn login_returns_the_user_for_correct_credentials() {
        let pool = create_test_pool().await.unwrap();

        let created = create(&pool, "dana@example.com", "hunter2hunter2")
            .await
            .unwrap();
        let logged_in = login(&pool, "dana@example.com", "hunter2hunter2")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(logged_in, created);
    }

    #[tokio::test]
    async fn login_misses_look_the_same_for_unknown_email_and_wrong_password() {
        let pool = create_test_pool().await.unwrap();

        create(&pool, "dana@example.com", "hunter2hunter2")
            .await
            .unwrap();

        let wrong_password = login(&pool, "dana@example.com", "not-the-password")
            .await
            .unwrap();
        let unknown_email = login(&pool, "nobody@example.com", "hunter2hunter2")
            .await
            .unwrap();

        assert!(wrong_password.is_none());
        assert!(unknown_email.is_none());
    }
}
