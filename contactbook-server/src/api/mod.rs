//! API implementation for the contactbook HTTP server

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{delete, get, post, put},
};
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod auth;
pub mod auth_endpoints;
pub mod contacts;
pub mod dto;
pub mod extract;

use auth::auth_middleware;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        auth_endpoints::signup,
        auth_endpoints::login,
        auth_endpoints::logout,
        contacts::list_contacts,
        contacts::list_pending,
        contacts::search_users,
        contacts::send_request,
        contacts::accept_request,
        contacts::reject_request,
        contacts::remove_contact,
        contacts::update_nickname,
        health_check,
    ),
    components(
        schemas(
            dto::MessageResponse,
            dto::UserDto,
            dto::ContactDto,
            dto::PendingRequestDto,
            dto::PendingRequestsDto,
            dto::CandidateDto,
            dto::ContactRequestBody,
            dto::NicknameRequest,
            dto::NicknameResponse,
            dto::SignupRequest,
            dto::LoginRequest,
            dto::AuthResponse,
        )
    ),
    tags(
        (name = "auth", description = "Signup, login and logout"),
        (name = "contacts", description = "Contact requests, contacts and nicknames"),
        (name = "health", description = "Service health"),
    ),
    info(
        title = "Contactbook API",
        version = "1.0.0",
        description = "Bidirectional contact relationships between users: requests, acceptance, search and private nicknames.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api", description = "API base path")
    )
)]
pub struct ApiDoc;

/// Create the main router with all API endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Every contact route needs an authenticated user
    let contacts_router = Router::new()
        .route("/", get(contacts::list_contacts))
        .route("/pending", get(contacts::list_pending))
        .route("/search", get(contacts::search_users))
        .route("/request", post(contacts::send_request))
        .route("/accept/{request_id}", put(contacts::accept_request))
        .route("/reject/{request_id}", delete(contacts::reject_request))
        .route("/{contact_id}", delete(contacts::remove_contact))
        .route("/{contact_id}/nickname", put(contacts::update_nickname))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let auth_router = Router::new()
        .route("/signup", post(auth_endpoints::signup))
        .route("/login", post(auth_endpoints::login))
        .route("/logout", post(auth_endpoints::logout));

    let api_router = Router::new()
        .nest("/contacts", contacts_router)
        .nest("/auth", auth_router)
        .route("/health", get(health_check))
        .layer(RequestBodyLimitLayer::new(state.config.max_request_size))
        .with_state(state);

    let swagger_router = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new().nest("/api", api_router).merge(swagger_router)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Store reachable", body = serde_json::Value),
        (status = 503, description = "Store unavailable", body = serde_json::Value),
    )
)]
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let healthy = match state.contacts.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            false
        }
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = serde_json::json!({
        "status": if healthy { "OK" } else { "UNAVAILABLE" },
        "version": contactbook::VERSION,
        "signup": state.config.allow_signup,
    });

    (status, Json(body))
}
