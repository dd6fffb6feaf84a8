use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Distinguishes access tokens from refresh tokens signed with the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub typ: TokenKind,
    /// Unique per token, so two tokens issued in the same second still differ
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    pub fn new(user_id: i64, typ: TokenKind, issuer: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            typ,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: issuer.to_string(),
        }
    }

    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse()
            .map_err(|_| JwtError::Invalid(format!("subject '{}' is not a user id", self.sub)))
    }
}

/// Access/refresh pair handed to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
    Expired,
    WrongKind { expected: TokenKind, found: TokenKind },
    Invalid(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
            JwtError::Expired => write!(f, "JWT has expired"),
            JwtError::WrongKind { expected, found } => {
                write!(f, "expected {:?} token, found {:?} token", expected, found)
            }
            JwtError::Invalid(msg) => write!(f, "Invalid JWT: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// Signs and verifies HS256 tokens
pub struct Jwt {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    has_secret: bool,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl Jwt {
    pub fn new(secret: &str, issuer: impl Into<String>, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            has_secret: !secret.is_empty(),
            issuer: issuer.into(),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            &security.jwt_secret,
            security.jwt_issuer.clone(),
            Duration::minutes(security.access_token_expiry_minutes as i64),
            Duration::days(security.refresh_token_expiry_days as i64),
        )
    }

    /// Issues a fresh access/refresh pair for the user
    pub fn generate_all_tokens(&self, user_id: i64) -> Result<TokenResponse, JwtError> {
        Ok(TokenResponse {
            access_token: self.issue(user_id, TokenKind::Access)?,
            refresh_token: self.issue(user_id, TokenKind::Refresh)?,
        })
    }

    pub fn issue(&self, user_id: i64, kind: TokenKind) -> Result<String, JwtError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        self.encode_claims(&Claims::new(user_id, kind, &self.issuer, ttl))
    }

    pub fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        if !self.has_secret {
            return Err(JwtError::InvalidSecret);
        }

        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Checks signature, issuer, expiry and token kind
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        if !self.has_secret {
            return Err(JwtError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })?
            .claims;

        if claims.typ != expected {
            return Err(JwtError::WrongKind {
                expected,
                found: claims.typ,
            });
        }
        Ok(claims)
    }
}

/// SHA-256 hex digest under which refresh tokens are stored
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
