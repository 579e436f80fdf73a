//! Bearer-token authentication for the HTTP surface.
//!
//! Tokens are HS256 JWTs carrying the caller's user id and role. Every
//! request re-derives its [`Caller`] from the verified token; identifiers in
//! request bodies are never trusted for authorisation.

use super::{AppState, error::ApiError};
use crate::task::domain::{Caller, Role, UserId};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use thiserror::Error;

/// JWT claims understood by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Caller's user identifier.
    pub sub: String,
    /// Caller's role.
    pub role: Role,
    /// Expiry as seconds since the Unix epoch.
    pub exp: usize,
}

/// Errors raised while issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No bearer token was supplied.
    #[error("missing bearer token")]
    Missing,
    /// The `Authorization` header is not a bearer credential.
    #[error("malformed authorization header")]
    Malformed,
    /// The token failed signature, expiry, or claim validation.
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    /// The subject claim is not a usable user id.
    #[error("invalid subject claim")]
    InvalidSubject,
    /// The requested expiry cannot be represented.
    #[error("token expiry out of range")]
    ExpiryOutOfRange,
}

/// Signing and verification keys for bearer tokens.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    /// Creates HS256 keys from a shared secret.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::default(),
            ttl,
        }
    }

    /// Issues a token for `user_id` with `role`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] when the expiry overflows or signing fails.
    pub fn issue(&self, user_id: &UserId, role: Role) -> Result<String, TokenError> {
        let expiry = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: user_id.as_str().to_owned(),
            role,
            exp: usize::try_from(expiry.timestamp()).map_err(|_| TokenError::ExpiryOutOfRange)?,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verifies `token` and returns the caller it identifies.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] for a bad signature, expired token, or
    /// malformed claims, and [`TokenError::InvalidSubject`] for a blank
    /// subject.
    pub fn verify(&self, token: &str) -> Result<Caller, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        let user_id = UserId::new(data.claims.sub).map_err(|_| TokenError::InvalidSubject)?;
        Ok(Caller::new(user_id, data.claims.role))
    }
}

/// Extractor yielding the verified caller of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller(pub Caller);

impl FromRequest for AuthenticatedCaller {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map(Self))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Caller, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or(ApiError::MissingState)?;
    let token = bearer_token(req)?;
    Ok(state.tokens.verify(token)?)
}

fn bearer_token(req: &HttpRequest) -> Result<&str, TokenError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(TokenError::Missing)?;
    let raw = value.to_str().map_err(|_| TokenError::Malformed)?;
    let token = raw
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(TokenError::Malformed)?;
    if token.is_empty() {
        return Err(TokenError::Missing);
    }
    Ok(token)
}
