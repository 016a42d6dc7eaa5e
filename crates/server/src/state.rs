//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::UserStore;
use crate::services::UserService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    users: UserService,
}

impl AppState {
    /// Create application state over a user store.
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                users: UserService::new(store),
            }),
        }
    }

    /// Get a reference to the user service.
    #[must_use]
    pub fn users(&self) -> &UserService {
        &self.inner.users
    }
}
