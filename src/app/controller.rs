//! The root screen state machine.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::models::UserProfile;
use crate::auth::AuthState;
use crate::backend::RemoteStore;
use crate::common::BackendError;

/// Embedded site shown when no `iframe_url` parameter is configured.
pub const DEFAULT_SITE_URL: &str = "https://sauvonstonexam.com";

/// Fixed external link in the chat header.
pub const SCHOOL_URL: &str = "https://ecolecanadienne.ca/";

/// Primary screen. Exactly one is mounted at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Onboarding,
    Auth,
    ProfileSetup,
    Paywall,
    Main,
}

/// Modal overlays, orthogonal to the primary screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlays {
    pub profile: bool,
    pub admin: bool,
    pub website: bool,
}

/// Explicit screen-raised events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    OnboardingComplete,
    AuthComplete,
    ProfileSaved,
    PlanChosen,
    LoggedOut,
    OpenProfile,
    CloseProfile,
    OpenWebsite,
    CloseWebsite,
    CloseAdmin,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("parameter not configured")]
    Missing,
}

pub struct AppController {
    pub screen: Screen,
    pub overlays: Overlays,
    pub website_url: String,
}

impl Default for AppController {
    fn default() -> Self {
        Self::new()
    }
}

impl AppController {
    pub fn new() -> Self {
        Self {
            screen: Screen::Onboarding,
            overlays: Overlays::default(),
            website_url: DEFAULT_SITE_URL.to_string(),
        }
    }

    /// Re-derive the primary screen from the auth state. Runs on every
    /// session/profile/loading change and can force a transition at any
    /// time, e.g. an external session expiry snaps back to `Auth`.
    pub fn sync_with_session(&mut self, state: &AuthState) {
        if state.loading {
            return;
        }
        match (&state.session, &state.user) {
            (None, _) => self.screen = Screen::Auth,
            (Some(_), Some(user)) if user.needs_setup() => self.screen = Screen::ProfileSetup,
            (Some(_), Some(_)) => self.screen = Screen::Main,
            // Session without a profile row yet: keep the current screen and
            // wait for the next refresh.
            (Some(_), None) => {}
        }
        debug!(screen = ?self.screen, "Screen derived from session state");
    }

    /// Apply one explicit event. Primary transitions only fire from the
    /// screen that raises them; sign-out snaps to `Auth` from anywhere.
    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::OnboardingComplete => {
                if self.screen == Screen::Onboarding {
                    self.screen = Screen::Auth;
                }
            }
            AppEvent::AuthComplete => {
                if self.screen == Screen::Auth {
                    self.screen = Screen::ProfileSetup;
                }
            }
            AppEvent::ProfileSaved => {
                if self.screen == Screen::ProfileSetup {
                    self.screen = Screen::Paywall;
                }
            }
            AppEvent::PlanChosen => {
                if self.screen == Screen::Paywall {
                    self.screen = Screen::Main;
                }
            }
            AppEvent::LoggedOut => {
                self.overlays.profile = false;
                self.screen = Screen::Auth;
            }
            AppEvent::OpenProfile => {
                if self.screen == Screen::Main {
                    self.overlays.profile = true;
                }
            }
            AppEvent::CloseProfile => self.overlays.profile = false,
            AppEvent::OpenWebsite => {
                if self.screen == Screen::Main {
                    self.overlays.website = true;
                }
            }
            AppEvent::CloseWebsite => self.overlays.website = false,
            AppEvent::CloseAdmin => self.overlays.admin = false,
        }
    }

    /// The admin overlay is only reachable for admin users.
    pub fn open_admin(&mut self, user: Option<&UserProfile>) -> bool {
        let allowed = self.screen == Screen::Main && user.map(|u| u.is_admin).unwrap_or(false);
        if allowed {
            self.overlays.admin = true;
        }
        allowed
    }

    /// Startup side effect: fetch the embedded-site URL, falling back to the
    /// default on any failure. Never surfaces an error and never gates a
    /// transition.
    pub async fn load_website_url(&mut self, store: &Arc<dyn RemoteStore>) {
        match Self::fetch_site_url(store).await {
            Ok(url) => self.website_url = url,
            Err(e) => {
                warn!(error = %e, fallback = %DEFAULT_SITE_URL, "Using default site URL");
                self.website_url = DEFAULT_SITE_URL.to_string();
            }
        }
    }

    async fn fetch_site_url(store: &Arc<dyn RemoteStore>) -> Result<String, ConfigLoadError> {
        let param = store
            .fetch_parameter("iframe_url")
            .await?
            .ok_or(ConfigLoadError::Missing)?;
        if param.value.is_empty() {
            return Err(ConfigLoadError::Missing);
        }
        Ok(param.value)
    }
}
