//! # Admin Module
//!
//! Read-modify-write settings form over three remote record groups: the chat
//! webhook row, the payment parameters and the embedded-site URL. The sole
//! writer of the configuration tables.

pub mod settings;


pub use settings::{AdminSettingsForm, SettingsSaveError};
