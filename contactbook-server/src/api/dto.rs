//! Data Transfer Objects for the contactbook API.
//!
//! Field names follow the JSON shape clients already consume: camelCase, and
//! user ids under `_id`.

use chrono::{DateTime, Utc};
use contactbook::prelude::{
    Candidate, ContactSummary, PendingRequest, PendingRequests, UserProfile,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body of every error and acknowledgement response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Public profile of a user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub profile_pic: Option<String>,
}

impl From<UserProfile> for UserDto {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id.to_string(),
            full_name: user.full_name,
            email: user.email,
            profile_pic: user.profile_pic,
        }
    }
}

/// An accepted contact
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactDto {
    /// Contact's user id
    #[serde(rename = "_id")]
    pub id: String,
    /// Nickname if set, otherwise the contact's name
    pub full_name: String,
    pub original_name: String,
    pub email: String,
    pub profile_pic: Option<String>,
    pub nickname: Option<String>,
    pub added_at: Option<DateTime<Utc>>,
    pub is_contact: bool,
}

impl From<ContactSummary> for ContactDto {
    fn from(contact: ContactSummary) -> Self {
        Self {
            id: contact.peer.id.to_string(),
            full_name: contact.display_name,
            original_name: contact.peer.full_name,
            email: contact.peer.email,
            profile_pic: contact.peer.profile_pic,
            nickname: contact.nickname,
            added_at: contact.added_at,
            is_contact: true,
        }
    }
}

/// A pending request; `_id` is the request id used to accept or reject it
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequestDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: UserDto,
    pub created_at: DateTime<Utc>,
}

impl From<PendingRequest> for PendingRequestDto {
    fn from(request: PendingRequest) -> Self {
        Self {
            id: request.request_id.to_string(),
            user: UserDto::from(request.user),
            created_at: request.created_at,
        }
    }
}

/// Pending requests split by direction
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PendingRequestsDto {
    pub received: Vec<PendingRequestDto>,
    pub sent: Vec<PendingRequestDto>,
}

impl From<PendingRequests> for PendingRequestsDto {
    fn from(pending: PendingRequests) -> Self {
        Self {
            received: pending.received.into_iter().map(Into::into).collect(),
            sent: pending.sent.into_iter().map(Into::into).collect(),
        }
    }
}

/// A search result annotated with the caller's relation to it
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub profile_pic: Option<String>,
    /// One of `none`, `pending`, `accepted`, `blocked`
    pub relation_status: String,
    pub can_add: bool,
}

impl From<Candidate> for CandidateDto {
    fn from(candidate: Candidate) -> Self {
        Self {
            id: candidate.user.id.to_string(),
            full_name: candidate.user.full_name,
            email: candidate.user.email,
            profile_pic: candidate.user.profile_pic,
            relation_status: candidate.relation_status.to_string(),
            can_add: candidate.can_add,
        }
    }
}

/// Search query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Name or email fragment, at least 2 characters
    #[serde(default)]
    pub query: String,
}

/// Contact request body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestBody {
    /// Id of the user to add
    #[serde(default)]
    pub contact_id: Option<String>,
}

/// Nickname update body; null or blank clears the nickname
#[derive(Debug, Deserialize, ToSchema)]
pub struct NicknameRequest {
    #[serde(default)]
    pub nickname: Option<String>,
}

/// Nickname update response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NicknameResponse {
    pub message: String,
    pub nickname: Option<String>,
}

/// User signup request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Authentication response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserDto,
    /// JWT token, also set as the `jwt` cookie
    pub token: String,
    /// Token expiration timestamp
    pub expires_at: i64,
}
