pub mod error;
pub mod event;
pub mod handlers;
pub mod hook;
pub mod rules;
pub mod runner;

use std::sync::Arc;

use crate::hook::HookRegistry;

/// Shared application state: the hook registry is loaded once at startup
/// and read-only thereafter, so no locking is needed across requests.
pub struct AppState {
    pub hooks: HookRegistry,
}

pub type SharedState = Arc<AppState>;
