//! Authentication endpoints for user signup, login and logout

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
};
use contactbook::prelude::{NewUser, StorageError, UserRecord};

use crate::{
    api::{
        auth::{auth_cookie, clear_auth_cookie, generate_jwt_token, hash_password, verify_password},
        dto::{AuthResponse, LoginRequest, MessageResponse, SignupRequest, UserDto},
        extract::ApiJson,
    },
    error::{ServerError, ServerResult, bad_request},
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 6;

/// User signup endpoint
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    summary = "Register a new user account",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created; the jwt cookie is set", body = AuthResponse),
        (status = 400, description = "Invalid data or email already registered", body = MessageResponse),
        (status = 403, description = "Signup disabled", body = MessageResponse),
    )
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> ServerResult<(StatusCode, HeaderMap, Json<AuthResponse>)> {
    if !state.config.allow_signup {
        return Err(ServerError::Forbidden(
            "El registro de usuarios está deshabilitado".to_string(),
        ));
    }

    let full_name = request.full_name.trim();
    let email = request.email.trim();

    if full_name.is_empty() || email.is_empty() || request.password.is_empty() {
        return Err(bad_request("Todos los campos son obligatorios"));
    }

    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(bad_request(
            "La contraseña debe tener al menos 6 caracteres",
        ));
    }

    if !is_valid_email(email) {
        return Err(bad_request("Formato de email inválido"));
    }

    let password_hash = hash_password(&request.password)?;

    let user = state
        .contacts
        .users()
        .create_user(NewUser::new(full_name, email, &password_hash))
        .await
        .map_err(|e| match e {
            StorageError::AlreadyExists(_) => bad_request("El email ya está registrado"),
            other => ServerError::from(other),
        })?;

    tracing::info!(user = %user.id, "User signed up");

    let (headers, response) = session_response(&state, user)?;
    Ok((StatusCode::CREATED, headers, Json(response)))
}

/// User login endpoint
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    summary = "Log in with email and password",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; the jwt cookie is set", body = AuthResponse),
        (status = 400, description = "Invalid credentials", body = MessageResponse),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ServerResult<(HeaderMap, Json<AuthResponse>)> {
    let invalid = || bad_request("Credenciales inválidas");

    let user = state
        .contacts
        .users()
        .find_user_by_email(&request.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(invalid());
    }

    tracing::info!(user = %user.id, "User logged in");

    let (headers, response) = session_response(&state, user)?;
    Ok((headers, Json(response)))
}

/// User logout endpoint
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    summary = "Clear the session cookie",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
    )
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
) -> ServerResult<(HeaderMap, Json<MessageResponse>)> {
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, clear_auth_cookie(&state.config)?);

    Ok((headers, Json(MessageResponse::new("Sesión cerrada exitosamente"))))
}

/// Issue a token for `user` and the cookie carrying it
fn session_response(state: &AppState, user: UserRecord) -> ServerResult<(HeaderMap, AuthResponse)> {
    let (token, expires_at) = generate_jwt_token(
        &user.id,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, auth_cookie(&token, &state.config)?);

    let response = AuthResponse {
        user: UserDto::from(user.profile()),
        token,
        expires_at,
    };

    Ok((headers, response))
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !email.contains(char::is_whitespace)
}
