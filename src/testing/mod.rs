//! In-memory repositories used by the test suites.
//!
//! `MemoryStore` enforces the same constraints as the PostgreSQL schema:
//! unique emails and owner foreign keys on corrections and photo books.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::Jwt;
use crate::config::AppConfig;
use crate::database::models::{Correction, CorrectionValues, NewUser, PhotoBook, User};
use crate::database::repository::HealthCheck;
use crate::database::{CorrectionRepository, DatabaseError, PhotoBookRepository, Repositories, UserRepository};
use crate::AppState;

/// Secret shared by test states and token assertions
pub const TEST_JWT_SECRET: &str = "photoism-test-secret-with-enough-entropy";

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    corrections: BTreeMap<i64, Correction>,
    photo_books: BTreeMap<i64, PhotoBook>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundles one shared store as every repository
    pub fn repositories() -> (Arc<MemoryStore>, Repositories) {
        let store = Arc::new(MemoryStore::new());
        let repositories = Repositories {
            users: store.clone(),
            corrections: store.clone(),
            photo_books: store.clone(),
            health: store.clone(),
        };
        (store, repositories)
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn stored_refresh_token(&self, user_id: i64) -> Option<String> {
        self.tables
            .read()
            .await
            .users
            .get(&user_id)
            .and_then(|user| user.refresh_token.clone())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }

        let now = Utc::now();
        let id = tables.next_id();
        let user = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_refresh_token(&self, token_digest: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.refresh_token.as_deref() == Some(token_digest))
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| u.email == email))
    }

    async fn update_refresh_token(&self, id: i64, token_digest: Option<&str>) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))?;
        user.refresh_token = token_digest.map(str::to_string);
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn rotate_refresh_token(&self, id: i64, current: &str, next: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) if user.refresh_token.as_deref() == Some(current) => {
                user.refresh_token = Some(next.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl CorrectionRepository for MemoryStore {
    async fn insert(&self, user_id: i64, values: CorrectionValues) -> Result<Correction, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(DatabaseError::ForeignKeyViolation("corrections_user_id_fkey".to_string()));
        }

        let now = Utc::now();
        let id = tables.next_id();
        let correction = Correction {
            id,
            user_id,
            shape: values.shape,
            skin: values.skin,
            eyes: values.eyes,
            nose: values.nose,
            lips: values.lips,
            chin: values.chin,
            created_at: now,
            updated_at: now,
        };
        tables.corrections.insert(id, correction.clone());
        Ok(correction)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Correction>, DatabaseError> {
        Ok(self.tables.read().await.corrections.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Correction>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .corrections
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, values: CorrectionValues) -> Result<Option<Correction>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.corrections.get_mut(&id).map(|correction| {
            correction.shape = values.shape;
            correction.skin = values.skin;
            correction.eyes = values.eyes;
            correction.nose = values.nose;
            correction.lips = values.lips;
            correction.chin = values.chin;
            correction.updated_at = Utc::now();
            correction.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.corrections.remove(&id).is_some())
    }
}

#[async_trait]
impl PhotoBookRepository for MemoryStore {
    async fn insert(&self, user_id: i64, photo_url: &str) -> Result<PhotoBook, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(DatabaseError::ForeignKeyViolation("photo_books_user_id_fkey".to_string()));
        }

        let id = tables.next_id();
        let photo_book = PhotoBook {
            id,
            user_id,
            photo_url: photo_url.to_string(),
            created_at: Utc::now(),
        };
        tables.photo_books.insert(id, photo_book.clone());
        Ok(photo_book)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PhotoBook>, DatabaseError> {
        Ok(self.tables.read().await.photo_books.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<PhotoBook>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .photo_books
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.photo_books.remove(&id).is_some())
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Development config with a fixed secret and the cheapest bcrypt cost
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_JWT_SECRET.to_string();
    config.security.bcrypt_cost = 4;
    config
}

/// Application state over a fresh in-memory store
pub fn test_state() -> (Arc<MemoryStore>, AppState) {
    let config = test_config();
    let (store, repositories) = MemoryStore::repositories();
    let jwt = Jwt::from_config(&config.security);
    (store, AppState::new(repositories, jwt, &config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{FaceShape, Skin};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "tester".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = MemoryStore::new();
        UserRepository::insert(&store, new_user("a@photoism.co.kr")).await.unwrap();
        let err = UserRepository::insert(&store, new_user("a@photoism.co.kr")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn rejects_orphan_correction() {
        let store = MemoryStore::new();
        let values = CorrectionValues {
            shape: FaceShape::Oval,
            skin: Skin::Natural,
            eyes: 0,
            nose: 0,
            lips: 0,
            chin: 0,
        };
        let err = CorrectionRepository::insert(&store, 42, values).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn rotation_is_compare_and_swap() {
        let store = MemoryStore::new();
        let user = UserRepository::insert(&store, new_user("b@photoism.co.kr")).await.unwrap();
        store.update_refresh_token(user.id, Some("first")).await.unwrap();

        assert!(store.rotate_refresh_token(user.id, "first", "second").await.unwrap());
        assert!(!store.rotate_refresh_token(user.id, "first", "third").await.unwrap());
        assert_eq!(store.stored_refresh_token(user.id).await.as_deref(), Some("second"));
    }
}
