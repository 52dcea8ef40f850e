//! # stexam
//!
//! Client library for the SauvonsTonExam exam-help chat app: session and
//! profile management against a hosted table backend, the chat webhook
//! exchange, admin settings, and the screen state machine driven by the
//! terminal binary.

pub mod admin;
pub mod app;
pub mod auth;
pub mod backend;
pub mod chat;
pub mod common;
pub mod screens;
pub mod theme;
pub mod ui;

#[cfg(test)]
pub mod testing;
