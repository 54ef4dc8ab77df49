//! Handlers for institution-wide settings.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/admin/settings` | Policy knobs; the admin password hash is never returned |
//! | `POST` | `/admin/settings` | Partial update; `adminPassword` is hashed before storage |
//! | `POST` | `/admin/settings/reset` | Defaults restored, admin credentials kept |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use leavebook_core::{
  admin::{AdminSettings, AdminSettingsUpdate},
  store::LeaveStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

/// `GET /admin/settings`
pub async fn get_one<S>(State(state): State<ApiState<S>>) -> Result<Json<AdminSettings>, ApiError>
where
  S: LeaveStore + 'static,
{
  let settings = state.store.admin_settings().await.map_err(ApiError::from_store)?;
  Ok(Json(settings))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveBody {
  pub institution_name:       Option<String>,
  pub admin_email:            Option<String>,
  pub default_total_leave:    Option<i64>,
  pub max_consecutive_days:   Option<i64>,
  pub allow_negative_balance: Option<bool>,
  pub admin_password:         Option<String>,
}

/// `POST /admin/settings`
pub async fn save<S>(
  State(state): State<ApiState<S>>,
  payload: Result<Json<SaveBody>, JsonRejection>,
) -> Result<Json<AdminSettings>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Json(body) = payload?;
  let mut update = AdminSettingsUpdate {
    institution_name:       body.institution_name,
    admin_email:            body.admin_email,
    default_total_leave:    body.default_total_leave,
    max_consecutive_days:   body.max_consecutive_days,
    allow_negative_balance: body.allow_negative_balance,
    admin_password_hash:    None,
  };
  update.validate()?;
  if let Some(password) = body.admin_password.filter(|p| !p.is_empty()) {
    update.admin_password_hash = Some(state.passwords.hash(&password)?);
  }

  let settings = state
    .store
    .save_admin_settings(update)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!("admin settings updated");
  Ok(Json(settings))
}

/// `POST /admin/settings/reset`
pub async fn reset<S>(State(state): State<ApiState<S>>) -> Result<Json<AdminSettings>, ApiError>
where
  S: LeaveStore + 'static,
{
  let settings = state
    .store
    .reset_admin_settings()
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!("admin settings reset to defaults");
  Ok(Json(settings))
}
