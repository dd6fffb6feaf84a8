use std::sync::Arc;

use crate::database::models::PhotoBook;
use crate::database::{DatabaseError, PhotoBookRepository};
use crate::error::{ApiError, ErrorCode};

/// Saved photo references, each owned by one user
pub struct PhotoBookService {
    photo_books: Arc<dyn PhotoBookRepository>,
}

impl PhotoBookService {
    pub fn new(photo_books: Arc<dyn PhotoBookRepository>) -> Self {
        Self { photo_books }
    }

    pub async fn create(&self, user_id: i64, photo_url: &str) -> Result<PhotoBook, ApiError> {
        match self.photo_books.insert(user_id, photo_url).await {
            Ok(photo_book) => {
                tracing::info!(user_id, photo_book_id = photo_book.id, "Photo book created");
                Ok(photo_book)
            }
            Err(DatabaseError::ForeignKeyViolation(_)) => Err(ErrorCode::UserNotFound.into()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<PhotoBook>, ApiError> {
        Ok(self.photo_books.list_by_user(user_id).await?)
    }

    pub async fn get(&self, user_id: i64, id: i64) -> Result<PhotoBook, ApiError> {
        let photo_book = self
            .photo_books
            .find_by_id(id)
            .await?
            .ok_or(ErrorCode::PhotoBookNotFound)?;

        if photo_book.user_id != user_id {
            tracing::warn!(user_id, photo_book_id = id, "Photo book access denied");
            return Err(ApiError::access_denied());
        }
        Ok(photo_book)
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), ApiError> {
        self.get(user_id, id).await?;
        if !self.photo_books.delete(id).await? {
            return Err(ErrorCode::PhotoBookNotFound.into());
        }
        tracing::info!(user_id, photo_book_id = id, "Photo book deleted");
        Ok(())
    }
}
