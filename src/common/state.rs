// Application state shared across all modules

use std::sync::Arc;

use crate::auth::AuthContext;
use crate::backend::{ChatWebhook, RemoteStore};

/// Shared handles threaded through every screen: the remote store, the
/// outbound chat webhook and the auth context.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn RemoteStore>,
    pub webhook: Arc<dyn ChatWebhook>,
    pub auth: Arc<AuthContext>,
}

impl AppContext {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        webhook: Arc<dyn ChatWebhook>,
        auth: Arc<AuthContext>,
    ) -> Self {
        Self {
            store,
            webhook,
            auth,
        }
    }
}
