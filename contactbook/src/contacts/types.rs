//! Read-side views returned by the contact manager

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::storage::models::{ContactRecord, ContactStatus, UserProfile};

/// An accepted contact as seen by its owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactSummary {
    pub peer: UserProfile,
    /// Nickname if set, otherwise the peer's full name
    pub display_name: String,
    pub nickname: Option<String>,
    /// When the relation was accepted
    pub added_at: Option<DateTime<Utc>>,
}

impl ContactSummary {
    pub fn new(record: &ContactRecord, peer: UserProfile) -> Self {
        let display_name = record
            .nickname
            .clone()
            .unwrap_or_else(|| peer.full_name.clone());

        Self {
            peer,
            display_name,
            nickname: record.nickname.clone(),
            added_at: record.accepted_at,
        }
    }
}

/// One pending request, identified by the caller's row id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingRequest {
    pub request_id: Uuid,
    pub user: UserProfile,
    pub created_at: DateTime<Utc>,
}

/// Pending requests split by direction
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PendingRequests {
    /// Requests other users sent to the caller
    pub received: Vec<PendingRequest>,
    /// Requests the caller sent
    pub sent: Vec<PendingRequest>,
}

/// Relation between the caller and a search candidate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RelationStatus {
    None,
    Pending,
    Accepted,
    Blocked,
}

impl From<Option<ContactStatus>> for RelationStatus {
    fn from(status: Option<ContactStatus>) -> Self {
        match status {
            None => RelationStatus::None,
            Some(ContactStatus::Pending) => RelationStatus::Pending,
            Some(ContactStatus::Accepted) => RelationStatus::Accepted,
            Some(ContactStatus::Blocked) => RelationStatus::Blocked,
        }
    }
}

impl fmt::Display for RelationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelationStatus::None => "none",
            RelationStatus::Pending => "pending",
            RelationStatus::Accepted => "accepted",
            RelationStatus::Blocked => "blocked",
        };
        f.write_str(s)
    }
}

/// A user matching a search, annotated with the caller's relation to them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub user: UserProfile,
    pub relation_status: RelationStatus,
    /// True only when no relation of any kind exists
    pub can_add: bool,
}

impl Candidate {
    pub fn new(user: UserProfile, relation: Option<&ContactRecord>) -> Self {
        let relation_status = RelationStatus::from(relation.map(|r| r.status));
        Self {
            user,
            relation_status,
            can_add: relation.is_none(),
        }
    }
}
