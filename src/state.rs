//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::db::CustomerStore;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Customer storage, injected at startup
    pub customers: Arc<dyn CustomerStore>,
}

impl AppState {
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self { customers }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
