//! # Two Hire
//!
//! This crate provides a client for the 2hire mobility platform API. It covers the
//! operator ("admin") and end-user vehicle listings, the per-site service settings
//! and the webhook subscription endpoints.

/// Environment-backed configuration for the API client and webhooks.
mod config;
pub use config::*;

/// Error and payload types shared by the client and webhook service.
mod types;
pub use types::*;

/// Authenticated HTTP client for the settings and vehicle listing endpoints.
mod client;
pub use client::*;

/// Webhook subscription management.
mod webhooks;
pub use webhooks::*;
