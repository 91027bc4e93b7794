//! Data models for storage operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Status shared by both mirrored rows of a relation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    /// Requested by one side, not yet answered by the other
    Pending,
    /// Both sides are contacts
    Accepted,
    /// Set outside this crate; refuses new requests between the pair
    Blocked,
}

impl ContactStatus {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Pending => "pending",
            ContactStatus::Accepted => "accepted",
            ContactStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ContactStatus::Pending),
            "accepted" => Ok(ContactStatus::Accepted),
            "blocked" => Ok(ContactStatus::Blocked),
            _ => Err(format!("Invalid contact status: {}", s)),
        }
    }
}

/// One directed row of a contact relation, as seen by `owner`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactRecord {
    /// Row identifier; doubles as the request id of a pending relation
    pub id: Uuid,

    /// User this row belongs to
    pub owner: Uuid,

    /// The other side of the relation
    pub peer: Uuid,

    /// Relation status, identical on both rows
    pub status: ContactStatus,

    /// Owner's private name for the peer
    pub nickname: Option<String>,

    /// Initiator of the relation, identical on both rows
    pub requested_by: Uuid,

    pub created_at: DateTime<Utc>,

    /// Set when the relation became accepted
    pub accepted_at: Option<DateTime<Utc>>,

    pub updated_at: DateTime<Utc>,
}

impl ContactRecord {
    /// Build a fresh row for one direction of a new relation
    pub fn new(
        owner: Uuid,
        peer: Uuid,
        status: ContactStatus,
        requested_by: Uuid,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            peer,
            status,
            nickname: None,
            requested_by,
            created_at: now,
            accepted_at: (status == ContactStatus::Accepted).then_some(now),
            updated_at: now,
        }
    }

    /// Whether the owner of this row sent the request
    pub fn is_outgoing(&self) -> bool {
        self.requested_by == self.owner
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub id: Uuid,
    pub full_name: String,
    /// Stored lowercase
    pub email: String,
    pub profile_pic: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// The subset of the user that other users may see
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            profile_pic: self.profile_pic.clone(),
        }
    }
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub profile_pic: Option<String>,
}

/// Data needed to register a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_pic: Option<String>,
}

impl NewUser {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            profile_pic: None,
        }
    }

    pub fn with_profile_pic(mut self, url: impl Into<String>) -> Self {
        self.profile_pic = Some(url.into());
        self
    }
}
