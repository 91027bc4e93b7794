//! Application state management

use contactbook::prelude::ContactManager;

use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Debug)]
pub struct AppState {
    /// Contact workflows and user directory
    pub contacts: ContactManager,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create new application state
    pub fn new(contacts: ContactManager, config: ServerConfig) -> Self {
        Self { contacts, config }
    }
}
