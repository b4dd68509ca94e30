//! # Fleet Reconcile
//!
//! This crate compares the operator ("admin") and end-user views of a 2hire vehicle
//! fleet. For every configured asset type it fetches both listings, applies the
//! site's service-window and battery eligibility rules to the admin side, and
//! reports which vehicles only one side can see.

/// Errors and run configuration
mod reconcile_types;
pub use reconcile_types::*;

/// Site settings normalization into per-asset-type policies
mod settings;
pub use settings::*;

/// Service-window evaluation and the wall-clock abstraction
mod service_window;
pub use service_window::*;

/// Canonical vehicle shape and provider record normalization
mod vehicle;
pub use vehicle::*;

/// Data source abstraction over the provider API
mod fleet_source;
pub use fleet_source::*;

/// Admin and user fleet fetchers
mod fetcher;
pub use fetcher::*;

/// Key-based set differences between fleet snapshots
mod reconciler;
pub use reconciler::*;

/// Report building and sinks
mod reporter;
pub use reporter::*;

/// Per-asset-type pipeline fan-out
mod executor;
pub use executor::*;
