//! Persistence seams.
//!
//! Services only see these traits; [`postgres`] backs them with sqlx and
//! `crate::testing::MemoryStore` backs them in tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::database::models::{Correction, CorrectionValues, NewUser, PhotoBook, User};
use crate::database::DatabaseError;

pub mod postgres;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Looks a user up by the stored digest of their refresh token
    async fn find_by_refresh_token(&self, token_digest: &str) -> Result<Option<User>, DatabaseError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, DatabaseError>;

    /// Overwrites only the refresh token column. `None` clears it.
    async fn update_refresh_token(&self, id: i64, token_digest: Option<&str>) -> Result<(), DatabaseError>;

    /// Replaces the stored digest only if it still equals `current`.
    /// Returns false when another request rotated it first.
    async fn rotate_refresh_token(&self, id: i64, current: &str, next: &str) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait CorrectionRepository: Send + Sync {
    async fn insert(&self, user_id: i64, values: CorrectionValues) -> Result<Correction, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Correction>, DatabaseError>;

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Correction>, DatabaseError>;

    async fn update(&self, id: i64, values: CorrectionValues) -> Result<Option<Correction>, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait PhotoBookRepository: Send + Sync {
    async fn insert(&self, user_id: i64, photo_url: &str) -> Result<PhotoBook, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<PhotoBook>, DatabaseError>;

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<PhotoBook>, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// One handle per repository, all sharing the same backing store
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub corrections: Arc<dyn CorrectionRepository>,
    pub photo_books: Arc<dyn PhotoBookRepository>,
    pub health: Arc<dyn HealthCheck>,
}

impl Repositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let store = Arc::new(postgres::PgStore::new(pool));
        Self {
            users: store.clone(),
            corrections: store.clone(),
            photo_books: store.clone(),
            health: store,
        }
    }
}
