use async_trait::async_trait;
use sqlx::PgPool;

use super::{CorrectionRepository, HealthCheck, PhotoBookRepository, UserRepository};
use crate::database::models::correction::CorrectionRow;
use crate::database::models::{Correction, CorrectionValues, NewUser, PhotoBook, User};
use crate::database::{DatabaseError, DatabaseManager};

const USER_COLUMNS: &str = "id, username, email, password_hash, refresh_token, created_at, updated_at";

const CORRECTION_COLUMNS: &str = "id, user_id, shape, skin, eyes, nose, lips, chin, created_at, updated_at";

const PHOTO_BOOK_COLUMNS: &str = "id, user_id, photo_url, created_at";

/// PostgreSQL implementation of every repository trait
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_refresh_token(&self, token_digest: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE refresh_token = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(token_digest)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn update_refresh_token(&self, id: i64, token_digest: Option<&str>) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE users SET refresh_token = $1, updated_at = now() WHERE id = $2")
            .bind(token_digest)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    async fn rotate_refresh_token(&self, id: i64, current: &str, next: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = $1, updated_at = now() WHERE id = $2 AND refresh_token = $3",
        )
        .bind(next)
        .bind(id)
        .bind(current)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl CorrectionRepository for PgStore {
    async fn insert(&self, user_id: i64, values: CorrectionValues) -> Result<Correction, DatabaseError> {
        let query = format!(
            "INSERT INTO corrections (user_id, shape, skin, eyes, nose, lips, chin) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            CORRECTION_COLUMNS
        );
        let row = sqlx::query_as::<_, CorrectionRow>(&query)
            .bind(user_id)
            .bind(values.shape.as_str())
            .bind(values.skin.as_str())
            .bind(values.eyes)
            .bind(values.nose)
            .bind(values.lips)
            .bind(values.chin)
            .fetch_one(&self.pool)
            .await?;
        Correction::try_from(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Correction>, DatabaseError> {
        let query = format!("SELECT {} FROM corrections WHERE id = $1", CORRECTION_COLUMNS);
        sqlx::query_as::<_, CorrectionRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Correction::try_from)
            .transpose()
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Correction>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM corrections WHERE user_id = $1 ORDER BY id",
            CORRECTION_COLUMNS
        );
        sqlx::query_as::<_, CorrectionRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Correction::try_from)
            .collect()
    }

    async fn update(&self, id: i64, values: CorrectionValues) -> Result<Option<Correction>, DatabaseError> {
        let query = format!(
            "UPDATE corrections \
             SET shape = $2, skin = $3, eyes = $4, nose = $5, lips = $6, chin = $7, updated_at = now() \
             WHERE id = $1 RETURNING {}",
            CORRECTION_COLUMNS
        );
        sqlx::query_as::<_, CorrectionRow>(&query)
            .bind(id)
            .bind(values.shape.as_str())
            .bind(values.skin.as_str())
            .bind(values.eyes)
            .bind(values.nose)
            .bind(values.lips)
            .bind(values.chin)
            .fetch_optional(&self.pool)
            .await?
            .map(Correction::try_from)
            .transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM corrections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PhotoBookRepository for PgStore {
    async fn insert(&self, user_id: i64, photo_url: &str) -> Result<PhotoBook, DatabaseError> {
        let query = format!(
            "INSERT INTO photo_books (user_id, photo_url) VALUES ($1, $2) RETURNING {}",
            PHOTO_BOOK_COLUMNS
        );
        let photo_book = sqlx::query_as::<_, PhotoBook>(&query)
            .bind(user_id)
            .bind(photo_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(photo_book)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PhotoBook>, DatabaseError> {
        let query = format!("SELECT {} FROM photo_books WHERE id = $1", PHOTO_BOOK_COLUMNS);
        let photo_book = sqlx::query_as::<_, PhotoBook>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(photo_book)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<PhotoBook>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM photo_books WHERE user_id = $1 ORDER BY id",
            PHOTO_BOOK_COLUMNS
        );
        let photo_books = sqlx::query_as::<_, PhotoBook>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(photo_books)
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM photo_books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
