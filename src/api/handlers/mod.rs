//! HTTP handlers, grouped by concern.

pub mod auth;
pub mod chat;
pub mod health;
