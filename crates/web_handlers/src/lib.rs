//! # Web Handlers for the 2hire callback receiver
//!
//! This crate provides the HTTP handlers the platform pushes webhook events to.

/// Webhook callback and health handlers
mod callback_handlers;
pub use callback_handlers::*;
