//! # Screens Module
//!
//! Per-screen local state and event handlers, presentation-free. The
//! terminal front-end renders these; the chat screen lives in the chat
//! module next to its send sequence.

pub mod auth_form;
pub mod onboarding;
pub mod paywall;
pub mod profile_setup;
pub mod profile_summary;


pub use auth_form::{AuthForm, AuthFormError, AuthMode};
pub use onboarding::{OnboardingScreen, ONBOARDING_PAGES};
pub use paywall::PaywallScreen;
pub use profile_setup::{ProfileSetupError, ProfileSetupForm, CLASSES, HEARD_FROM};
pub use profile_summary::summary_rows;
