//! Authentication for the contactbook API

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use contactbook::prelude::UserProfile;
use headers::{Authorization, Cookie, HeaderMapExt, authorization::Bearer};
use http::HeaderValue;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::ServerConfig,
    error::{ServerError, not_found},
    state::AppState,
};

/// Name of the cookie carrying the session token
pub const AUTH_COOKIE: &str = "jwt";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Issued at timestamp
    pub iat: usize,
    /// Expiration timestamp
    pub exp: usize,
}

/// Authenticated caller, inserted into request extensions by [`auth_middleware`]
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub profile: UserProfile,
}

/// Authentication middleware.
///
/// Reads the token from the `jwt` cookie, falling back to an
/// `Authorization: Bearer` header, and resolves it to a stored user.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = extract_token(&headers).ok_or_else(|| {
        ServerError::Unauthorized("No autorizado: no se proporciona ningún token".to_string())
    })?;

    let user_id = validate_jwt_token(&token, &state.config.jwt_secret)?;

    let user = state
        .contacts
        .users()
        .get_user(user_id)
        .await?
        .ok_or_else(|| not_found("Usuario no encontrado"))?;

    tracing::debug!(user = %user.id, path = %request.uri().path(), "Authenticated request");

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        profile: user.profile(),
    });

    Ok(next.run(request).await)
}

/// Token from the `jwt` cookie, or from a bearer authorization header
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = headers.typed_get::<Cookie>()
        && let Some(token) = cookie.get(AUTH_COOKIE)
        && !token.is_empty()
    {
        return Some(token.to_string());
    }

    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

/// Validate a JWT token and return the user id it was issued for
pub fn validate_jwt_token(token: &str, secret: &str) -> Result<Uuid, ServerError> {
    let invalid = || ServerError::Unauthorized("No autorizado - Token inválido".to_string());

    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default()).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        invalid()
    })?;

    Uuid::parse_str(&token_data.claims.sub).map_err(|_| invalid())
}

/// Generate a JWT token for a user
pub fn generate_jwt_token(
    user_id: &Uuid,
    secret: &str,
    expiration_hours: u64,
) -> Result<(String, i64), ServerError> {
    let now = chrono::Utc::now().timestamp();
    let exp = token_lifetime_secs(expiration_hours)
        .and_then(|secs| now.checked_add(secs))
        .ok_or_else(|| lifetime_out_of_range(expiration_hours))?;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now as usize,
        exp: exp as usize,
    };

    let encoding_key = EncodingKey::from_secret(secret.as_ref());
    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| ServerError::Internal(format!("Failed to generate token: {}", e)))?;

    Ok((token, exp))
}

/// `Set-Cookie` value carrying a session token
pub fn auth_cookie(token: &str, config: &ServerConfig) -> Result<HeaderValue, ServerError> {
    let max_age = token_lifetime_secs(config.jwt_expiration_hours)
        .ok_or_else(|| lifetime_out_of_range(config.jwt_expiration_hours))?;
    build_cookie(token, max_age, config.secure_cookies)
}

/// `Set-Cookie` value expiring the session cookie
pub fn clear_auth_cookie(config: &ServerConfig) -> Result<HeaderValue, ServerError> {
    build_cookie("", 0, config.secure_cookies)
}

/// Token lifetime in seconds, `None` when it does not fit a timestamp
fn token_lifetime_secs(expiration_hours: u64) -> Option<i64> {
    expiration_hours
        .checked_mul(3600)
        .and_then(|secs| i64::try_from(secs).ok())
}

fn lifetime_out_of_range(expiration_hours: u64) -> ServerError {
    ServerError::Internal(format!(
        "Token expiration of {} hours is out of range",
        expiration_hours
    ))
}

fn build_cookie(value: &str, max_age: i64, secure: bool) -> Result<HeaderValue, ServerError> {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Strict",
        AUTH_COOKIE, value, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
        .map_err(|e| ServerError::Internal(format!("Invalid cookie value: {}", e)))
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, ServerError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| ServerError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServerError> {
    bcrypt::verify(password, hash)
        .map_err(|e| ServerError::Internal(format!("Failed to verify password: {}", e)))
}
