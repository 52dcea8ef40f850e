//! # Auth Module
//!
//! Session lifecycle and user profile state:
//! - sign-up / sign-in / sign-out against the hosted auth service
//! - profile fetch, partial update and refresh
//! - session persistence across restarts
//! - change notifications for the root controller

pub mod context;
pub mod models;
pub mod store;


pub use context::{AuthContext, AuthState};
pub use models::{AuthError, PlanStatus, ProfileUpdate, ProfileUpdateError, Session, UserProfile};
pub use store::SessionStore;
