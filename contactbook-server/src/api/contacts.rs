//! Contact management API endpoints

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use contactbook::prelude::ContactError;

use crate::{
    api::{
        auth::AuthUser,
        dto::{
            CandidateDto, ContactDto, ContactRequestBody, MessageResponse, NicknameRequest,
            NicknameResponse, PendingRequestsDto, SearchParams,
        },
        extract::{ApiJson, ApiPath, ApiQuery},
    },
    error::{ServerError, ServerResult, bad_request},
    state::AppState,
};

/// List accepted contacts
#[utoipa::path(
    get,
    path = "/api/contacts",
    tag = "contacts",
    responses(
        (status = 200, description = "Accepted contacts, most recently added first", body = Vec<ContactDto>),
        (status = 401, description = "Not authenticated", body = MessageResponse),
    )
)]
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> ServerResult<Json<Vec<ContactDto>>> {
    let contacts = state.contacts.list_accepted(user.id).await?;

    Ok(Json(contacts.into_iter().map(ContactDto::from).collect()))
}

/// List pending requests, received and sent
#[utoipa::path(
    get,
    path = "/api/contacts/pending",
    tag = "contacts",
    responses(
        (status = 200, description = "Pending requests split by direction", body = PendingRequestsDto),
        (status = 401, description = "Not authenticated", body = MessageResponse),
    )
)]
pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> ServerResult<Json<PendingRequestsDto>> {
    let pending = state.contacts.list_pending(user.id).await?;

    Ok(Json(PendingRequestsDto::from(pending)))
}

/// Search users to add
#[utoipa::path(
    get,
    path = "/api/contacts/search",
    tag = "contacts",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching users with the caller's relation to each", body = Vec<CandidateDto>),
        (status = 400, description = "Query too short", body = MessageResponse),
    )
)]
pub async fn search_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> ServerResult<Json<Vec<CandidateDto>>> {
    let min_len = state.contacts.config().min_query_len;

    let candidates = state
        .contacts
        .search_candidates(user.id, &params.query)
        .await
        .map_err(|e| match e {
            ContactError::Validation(_) => ServerError::BadRequest(format!(
                "La búsqueda debe tener al menos {} caracteres",
                min_len
            )),
            other => other.into(),
        })?;

    Ok(Json(candidates.into_iter().map(CandidateDto::from).collect()))
}

/// Send a contact request
#[utoipa::path(
    post,
    path = "/api/contacts/request",
    tag = "contacts",
    request_body = ContactRequestBody,
    responses(
        (status = 201, description = "Request sent", body = MessageResponse),
        (status = 400, description = "Missing, invalid or own id, or a relation already exists", body = MessageResponse),
        (status = 404, description = "Target user not found", body = MessageResponse),
    )
)]
pub async fn send_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<ContactRequestBody>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<MessageResponse>)> {
    let Json(body) = body.map_err(|rejection| match rejection {
        JsonRejection::MissingJsonContentType(_) => bad_request("ID de contacto requerido"),
        _ => bad_request("ID de contacto inválido"),
    })?;

    let contact_id = body.contact_id.as_deref().map(str::trim).unwrap_or_default();
    if contact_id.is_empty() {
        return Err(bad_request("ID de contacto requerido"));
    }

    state
        .contacts
        .send_request(user.id, contact_id)
        .await
        .map_err(|e| match e {
            ContactError::Validation(_) => bad_request("ID de contacto inválido"),
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Solicitud de contacto enviada exitosamente",
        )),
    ))
}

/// Accept a received request
#[utoipa::path(
    put,
    path = "/api/contacts/accept/{request_id}",
    tag = "contacts",
    params(
        ("request_id" = String, Path, description = "Request id from the pending list")
    ),
    responses(
        (status = 200, description = "Request accepted", body = MessageResponse),
        (status = 404, description = "Request not found", body = MessageResponse),
    )
)]
pub async fn accept_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(request_id): ApiPath<String>,
) -> ServerResult<Json<MessageResponse>> {
    state.contacts.accept_request(user.id, &request_id).await?;

    Ok(Json(MessageResponse::new("Solicitud de contacto aceptada")))
}

/// Reject a received request or cancel a sent one
#[utoipa::path(
    delete,
    path = "/api/contacts/reject/{request_id}",
    tag = "contacts",
    params(
        ("request_id" = String, Path, description = "Request id from the pending list")
    ),
    responses(
        (status = 200, description = "Request rejected", body = MessageResponse),
        (status = 404, description = "Request not found", body = MessageResponse),
    )
)]
pub async fn reject_request(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(request_id): ApiPath<String>,
) -> ServerResult<Json<MessageResponse>> {
    state.contacts.reject_request(user.id, &request_id).await?;

    Ok(Json(MessageResponse::new("Solicitud rechazada")))
}

/// Remove a contact, whatever the relation's status
#[utoipa::path(
    delete,
    path = "/api/contacts/{contact_id}",
    tag = "contacts",
    params(
        ("contact_id" = String, Path, description = "User id of the contact")
    ),
    responses(
        (status = 200, description = "Contact removed", body = MessageResponse),
        (status = 404, description = "Contact not found", body = MessageResponse),
    )
)]
pub async fn remove_contact(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(contact_id): ApiPath<String>,
) -> ServerResult<Json<MessageResponse>> {
    state.contacts.remove_contact(user.id, &contact_id).await?;

    Ok(Json(MessageResponse::new("Contacto eliminado exitosamente")))
}

/// Set or clear the caller's private nickname for a contact
#[utoipa::path(
    put,
    path = "/api/contacts/{contact_id}/nickname",
    tag = "contacts",
    params(
        ("contact_id" = String, Path, description = "User id of the contact")
    ),
    request_body = NicknameRequest,
    responses(
        (status = 200, description = "Nickname updated", body = NicknameResponse),
        (status = 400, description = "Nickname too long", body = MessageResponse),
        (status = 404, description = "No accepted contact", body = MessageResponse),
    )
)]
pub async fn update_nickname(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(contact_id): ApiPath<String>,
    ApiJson(body): ApiJson<NicknameRequest>,
) -> ServerResult<Json<NicknameResponse>> {
    let max_len = state.contacts.config().max_nickname_len;

    let nickname = state
        .contacts
        .set_nickname(user.id, &contact_id, body.nickname.as_deref())
        .await
        .map_err(|e| match e {
            ContactError::Validation(_) => ServerError::BadRequest(format!(
                "El nickname no puede tener más de {} caracteres",
                max_len
            )),
            other => other.into(),
        })?;

    Ok(Json(NicknameResponse {
        message: "Nickname actualizado exitosamente".to_string(),
        nickname,
    }))
}
