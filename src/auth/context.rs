//! Single source of truth for "am I logged in and who am I".
//!
//! Screens call the operations here; the root controller watches the state
//! channel and re-derives the active screen on every change.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::backend::RemoteStore;

use super::models::{AuthError, ProfileUpdate, ProfileUpdateError, Session, UserProfile};
use super::store::SessionStore;

/// Snapshot of the auth state published to subscribers. `loading` is true
/// only until the initial session restore has finished.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub session: Option<Session>,
    pub user: Option<UserProfile>,
    pub loading: bool,
}

impl AuthState {
    fn initial() -> Self {
        Self {
            session: None,
            user: None,
            loading: true,
        }
    }
}

pub struct AuthContext {
    store: Arc<dyn RemoteStore>,
    sessions: SessionStore,
    tx: watch::Sender<AuthState>,
}

impl AuthContext {
    pub fn new(store: Arc<dyn RemoteStore>, sessions: SessionStore) -> Self {
        let (tx, _rx) = watch::channel(AuthState::initial());
        Self { store, sessions, tx }
    }

    /// Watch auth state changes for the lifetime of the app.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    fn publish(&self, session: Option<Session>, user: Option<UserProfile>) {
        self.tx.send_replace(AuthState {
            session,
            user,
            loading: false,
        });
    }

    /// Restore a persisted session, if any, then fetch the profile row.
    /// Always ends with `loading = false` so the controller can proceed.
    pub async fn restore(&self) {
        match self.sessions.load() {
            Some(session) => {
                self.store.set_session(Some(session.clone())).await;
                let user = self.fetch_user(&session.user_id).await;
                info!(user_id = %session.user_id, "Restored persisted session");
                self.publish(Some(session), user);
            }
            None => self.publish(None, None),
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let session = self.store.sign_up(email, password).await?;
        self.adopt_session(session).await;
        Ok(())
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let session = self.store.sign_in(email, password).await?;
        self.adopt_session(session).await;
        Ok(())
    }

    async fn adopt_session(&self, session: Session) {
        self.sessions.save(&session);
        let user = self.fetch_user(&session.user_id).await;
        self.publish(Some(session), user);
    }

    /// Sign out. The local session is always cleared, even when the remote
    /// invalidation fails, so the user is never stranded in a logged-in UI.
    pub async fn sign_out(&self) {
        if let Err(e) = self.store.sign_out().await {
            warn!(error = %e, "Remote sign-out failed; clearing local session anyway");
        }
        self.store.set_session(None).await;
        self.sessions.clear();
        self.publish(None, None);
    }

    /// Partial update against the current user's profile row, followed by a
    /// refresh of the cached profile.
    pub async fn update_user_profile(
        &self,
        changes: ProfileUpdate,
    ) -> Result<(), ProfileUpdateError> {
        let session = self.state().session.ok_or(ProfileUpdateError::NoSession)?;
        self.store
            .update_profile(&session.user_id, &changes)
            .await?;
        self.refresh_user().await
    }

    /// Re-fetch the profile row by id; used after any action that mutates
    /// server-side fields the UI does not track locally.
    pub async fn refresh_user(&self) -> Result<(), ProfileUpdateError> {
        let session = self.state().session.ok_or(ProfileUpdateError::NoSession)?;
        let user = self
            .store
            .fetch_profile(&session.user_id)
            .await
            .map_err(ProfileUpdateError::Rejected)?;
        self.publish(Some(session), user);
        Ok(())
    }

    async fn fetch_user(&self, user_id: &str) -> Option<UserProfile> {
        match self.store.fetch_profile(user_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Profile fetch failed");
                None
            }
        }
    }
}
