use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Identity token payload, as issued by the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Claims {
    /// Subject (stable identity-provider id)
    pub sub: String,
    /// Preferred username; falls back to `sub` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.sub)
    }
}

/// Create an identity token for a subject.
///
/// Production tokens come from the identity provider; this is used by the
/// test harness and for local development.
pub fn create_token(
    subject: &str,
    username: Option<&str>,
    email: Option<&str>,
    secret: &str,
    expiry_hours: u64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let expires = now + Duration::hours(expiry_hours as i64);

    let claims = Claims {
        sub: subject.to_string(),
        username: username.map(str::to_string),
        email: email.map(str::to_string),
        exp: expires.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
}

/// Validate an identity token and return the claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    if token_data.claims.sub.trim().is_empty() {
        return Err(AppError::Unauthorized("Token has no subject".to_string()));
    }

    Ok(token_data.claims)
}
