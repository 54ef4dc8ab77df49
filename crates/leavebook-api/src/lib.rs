//! JSON REST API for leavebook.
//!
//! Exposes an axum [`Router`] backed by any
//! [`leavebook_core::store::LeaveStore`]. Sessions, TLS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", leavebook_api::api_router(state))
//! ```

pub mod admin;
pub mod auth;
pub mod error;
pub mod leave_requests;
pub mod notifications;
pub mod reports;
pub mod settings;
pub mod staff;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use leavebook_core::{password::PasswordScheme, store::LeaveStore};

pub use auth::Argon2Scheme;
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:     Arc<S>,
  pub passwords: Arc<dyn PasswordScheme>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, passwords: Arc<dyn PasswordScheme>) -> Self {
    Self { store, passwords }
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      passwords: Arc::clone(&self.passwords),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: LeaveStore + 'static,
{
  Router::new()
    // Login
    .route("/auth/login", post(auth::login::<S>))
    // Staff
    .route("/staff", get(staff::list::<S>).post(staff::create::<S>))
    .route(
      "/staff/{id}",
      get(staff::get_one::<S>)
        .put(staff::update::<S>)
        .delete(staff::remove::<S>),
    )
    .route("/staff/{id}/stats", get(staff::stats::<S>))
    // Leave requests
    .route(
      "/leave-requests",
      get(leave_requests::list::<S>).post(leave_requests::create::<S>),
    )
    .route("/leave-requests/{id}", get(leave_requests::get_one::<S>))
    .route("/leave-requests/{id}/status", put(leave_requests::decide::<S>))
    .route("/leave-stats", get(reports::leave_stats::<S>))
    // Notifications
    .route(
      "/notifications",
      get(notifications::list::<S>).post(notifications::create::<S>),
    )
    .route("/notifications/read-all", put(notifications::mark_all_read::<S>))
    .route("/notifications/{id}", axum::routing::delete(notifications::remove::<S>))
    .route("/notifications/{id}/read", put(notifications::mark_read::<S>))
    // Settings
    .route("/settings", get(settings::get_one::<S>).post(settings::save::<S>))
    .route("/admin/settings", get(admin::get_one::<S>).post(admin::save::<S>))
    .route("/admin/settings/reset", post(admin::reset::<S>))
    // Reports
    .route("/reports/leave-types", get(reports::leave_types::<S>))
    .route("/reports/monthly", get(reports::monthly::<S>))
    .route("/reports/departments", get(reports::departments::<S>))
    .route("/reports/top-requesters", get(reports::top_requesters::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
