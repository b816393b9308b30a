use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>, role: impl Into<String>) -> Self {
        let now = Utc::now();
        let jwt = &config::config().jwt;
        let exp = (now + Duration::hours(jwt.expiry_hours as i64)).timestamp();

        Self {
            sub: subject.into(),
            role: role.into(),
            iss: jwt.issuer.clone(),
            aud: jwt.audience.clone(),
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Credential defects, one variant per user-visible 401 reason.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: bad signature")]
    BadSignature,
    #[error("invalid token: wrong issuer")]
    WrongIssuer,
    #[error("invalid token: wrong audience")]
    WrongAudience,
    #[error("invalid token")]
    Malformed,
    #[error("JWT secret not configured")]
    MissingSecret,
    #[error("token generation failed: {0}")]
    Generation(String),
}

pub fn issue_token(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().jwt.secret;

    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| AuthError::Generation(e.to_string()))
}

/// Verify signature, expiry, issuer and audience; shape checks have already
/// happened at the gate.
pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    let jwt = &config::config().jwt;

    if jwt.secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(jwt.secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&jwt.issuer]);
    validation.set_audience(&[&jwt.audience]);

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::BadSignature,
            ErrorKind::InvalidIssuer => AuthError::WrongIssuer,
            ErrorKind::InvalidAudience => AuthError::WrongAudience,
            _ => AuthError::Malformed,
        })?;

    Ok(token_data.claims)
}
