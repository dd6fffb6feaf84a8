//! Account lifecycle: signup, login, token refresh and logout.
//!
//! Refresh tokens are persisted as SHA-256 digests. Rotation is a
//! compare-and-swap on the stored digest, so a replayed refresh token
//! loses to whichever request rotated it first.

use std::sync::Arc;

use crate::api::{LoginResponse, SignupRequest};
use crate::auth::{token_digest, Jwt, TokenKind, TokenResponse};
use crate::database::models::{NewUser, User, UserProfile};
use crate::database::{DatabaseError, UserRepository};
use crate::error::{ApiError, ErrorCode};

pub struct UserService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<Jwt>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: Arc<Jwt>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            jwt,
            bcrypt_cost,
        }
    }

    /// Registers a new account; the email must not be taken
    pub async fn create(&self, request: SignupRequest) -> Result<(), ApiError> {
        let exists = self
            .users
            .exists_by_email(&request.email)
            .await
            .map_err(|e| unknown("email lookup", e))?;
        if exists {
            return Err(ErrorCode::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(request.password, self.bcrypt_cost).await?;
        let new_user = NewUser {
            username: request.username,
            email: request.email,
            password_hash,
        };

        match self.users.insert(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "User registered");
                Ok(())
            }
            // Lost a race against a concurrent signup with the same email
            Err(DatabaseError::UniqueViolation(_)) => Err(ErrorCode::EmailAlreadyExists.into()),
            Err(e) => Err(unknown("user insert", e)),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(|e| unknown("email lookup", e))?
            .ok_or(ErrorCode::EmailNotFound)?;

        if !verify_password(password.to_string(), user.password_hash.clone()).await? {
            tracing::info!(user_id = user.id, "Login rejected: password mismatch");
            return Err(ErrorCode::InvalidPassword.into());
        }

        let tokens = self.publish_tokens(&user)?;
        self.users
            .update_refresh_token(user.id, Some(&token_digest(&tokens.refresh_token)))
            .await
            .map_err(|e| unknown("refresh token store", e))?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(LoginResponse { tokens })
    }

    /// Exchanges a live refresh token for a new pair, invalidating the old one
    pub async fn refresh(&self, refresh_token: &str) -> Result<LoginResponse, ApiError> {
        let claims = self
            .jwt
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|e| {
                tracing::info!(error = %e, "Refresh token rejected");
                ApiError::from(ErrorCode::InvalidRefreshToken)
            })?;
        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::from(ErrorCode::InvalidRefreshToken))?;

        let current = token_digest(refresh_token);
        let user = self
            .users
            .find_by_refresh_token(&current)
            .await
            .map_err(|e| unknown("refresh token lookup", e))?
            .filter(|user| user.id == user_id)
            .ok_or(ErrorCode::InvalidRefreshToken)?;

        let tokens = self.publish_tokens(&user)?;
        let rotated = self
            .users
            .rotate_refresh_token(user.id, &current, &token_digest(&tokens.refresh_token))
            .await
            .map_err(|e| unknown("refresh token rotation", e))?;
        if !rotated {
            tracing::info!(user_id = user.id, "Refresh token already rotated");
            return Err(ErrorCode::InvalidRefreshToken.into());
        }

        Ok(LoginResponse { tokens })
    }

    /// Clears the stored refresh token; outstanding access tokens live until expiry
    pub async fn logout(&self, user_id: i64) -> Result<(), ApiError> {
        match self.users.update_refresh_token(user_id, None).await {
            Ok(()) => {
                tracing::info!(user_id, "User logged out");
                Ok(())
            }
            Err(DatabaseError::NotFound(_)) => Err(ErrorCode::UserNotFound.into()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn me(&self, user_id: i64) -> Result<UserProfile, ApiError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| ErrorCode::UserNotFound.into())
    }

    fn publish_tokens(&self, user: &User) -> Result<TokenResponse, ApiError> {
        self.jwt.generate_all_tokens(user.id).map_err(|e| {
            tracing::error!(user_id = user.id, error = %e, "Token generation failed");
            ApiError::from(ErrorCode::UnknownError)
        })
    }
}

fn unknown(operation: &str, error: DatabaseError) -> ApiError {
    tracing::error!(operation, error = %error, "Persistence failure");
    ErrorCode::UnknownError.into()
}

async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::internal(format!("password hashing task failed: {}", e)))?
        .map_err(|e| ApiError::internal(format!("password hashing failed: {}", e)))
}

/// A malformed stored hash counts as a mismatch
async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::internal(format!("password verification task failed: {}", e)))?;

    Ok(verified.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Stored password hash could not be verified");
        false
    }))
}
