//! Input validation for contact workflows

use uuid::Uuid;

use super::error::{ContactError, Result};

/// Parse a user-supplied identifier, rejecting missing and malformed values
pub fn parse_id(raw: &str, field: &str) -> Result<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ContactError::Validation(format!("{} is required", field)));
    }

    Uuid::parse_str(raw)
        .map_err(|_| ContactError::Validation(format!("{} is not a valid id: {}", field, raw)))
}

/// Trim a search query and check it is long enough
pub fn normalize_query(query: &str, min_len: usize) -> Result<String> {
    let query = query.trim();
    if query.chars().count() < min_len {
        return Err(ContactError::Validation(format!(
            "Search query must have at least {} characters",
            min_len
        )));
    }
    Ok(query.to_string())
}

/// Trim a nickname; blank clears it, over-long is rejected
pub fn normalize_nickname(nickname: Option<&str>, max_len: usize) -> Result<Option<String>> {
    let Some(nickname) = nickname.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if nickname.chars().count() > max_len {
        return Err(ContactError::Validation(format!(
            "Nickname cannot be longer than {} characters",
            max_len
        )));
    }

    Ok(Some(nickname.to_string()))
}
