//! # App Module
//!
//! Root controller: one finite-state machine selecting the primary screen,
//! with modal overlays orthogonal to it. Screens raise events; the auth
//! watch channel re-derives the screen on every session/profile change.

pub mod controller;


pub use controller::{AppController, AppEvent, ConfigLoadError, Overlays, Screen, DEFAULT_SITE_URL};
