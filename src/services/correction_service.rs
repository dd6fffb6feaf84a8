use std::sync::Arc;

use crate::database::models::{Correction, CorrectionValues};
use crate::database::{CorrectionRepository, DatabaseError};
use crate::error::{ApiError, ErrorCode};

/// Facial correction presets, each owned by one user
pub struct CorrectionService {
    corrections: Arc<dyn CorrectionRepository>,
}

impl CorrectionService {
    pub fn new(corrections: Arc<dyn CorrectionRepository>) -> Self {
        Self { corrections }
    }

    pub async fn create(&self, user_id: i64, values: CorrectionValues) -> Result<Correction, ApiError> {
        match self.corrections.insert(user_id, values).await {
            Ok(correction) => {
                tracing::info!(user_id, correction_id = correction.id, "Correction created");
                Ok(correction)
            }
            // Token outlived its account
            Err(DatabaseError::ForeignKeyViolation(_)) => Err(ErrorCode::UserNotFound.into()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<Correction>, ApiError> {
        Ok(self.corrections.list_by_user(user_id).await?)
    }

    pub async fn get(&self, user_id: i64, id: i64) -> Result<Correction, ApiError> {
        self.find_owned(user_id, id).await
    }

    pub async fn update(&self, user_id: i64, id: i64, values: CorrectionValues) -> Result<Correction, ApiError> {
        self.find_owned(user_id, id).await?;
        self.corrections
            .update(id, values)
            .await?
            .ok_or_else(|| ErrorCode::CorrectionNotFound.into())
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), ApiError> {
        self.find_owned(user_id, id).await?;
        if !self.corrections.delete(id).await? {
            return Err(ErrorCode::CorrectionNotFound.into());
        }
        tracing::info!(user_id, correction_id = id, "Correction deleted");
        Ok(())
    }

    async fn find_owned(&self, user_id: i64, id: i64) -> Result<Correction, ApiError> {
        let correction = self
            .corrections
            .find_by_id(id)
            .await?
            .ok_or(ErrorCode::CorrectionNotFound)?;

        if correction.user_id != user_id {
            tracing::warn!(user_id, correction_id = id, owner_id = correction.user_id, "Correction access denied");
            return Err(ApiError::access_denied());
        }
        Ok(correction)
    }
}
