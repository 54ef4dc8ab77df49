//! Handlers for per-staff notification preferences.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/settings?staffId=` | All toggles `true` when nothing was saved |
//! | `POST` | `/settings` | Omitted toggles keep their current value |

use axum::{
  Json,
  extract::{
    Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
};
use leavebook_core::{settings::NotificationSettings, store::LeaveStore};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetParams {
  pub staff_id: Option<String>,
}

async fn current<S>(state: &ApiState<S>, staff_id: &str) -> Result<NotificationSettings, ApiError>
where
  S: LeaveStore + 'static,
{
  let stored = state
    .store
    .get_settings(staff_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(stored.unwrap_or_else(|| NotificationSettings::defaults_for(staff_id)))
}

/// `GET /settings?staffId=<id>`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<GetParams>, QueryRejection>,
) -> Result<Json<NotificationSettings>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Query(params) = params?;
  let staff_id = params
    .staff_id
    .filter(|s| !s.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest("staffId is required".into()))?;
  Ok(Json(current(&state, &staff_id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBody {
  pub staff_id:            Option<String>,
  pub email_notifications: Option<bool>,
  pub push_notifications:  Option<bool>,
  pub leave_reminders:     Option<bool>,
  pub approval_updates:    Option<bool>,
}

/// `POST /settings`
pub async fn save<S>(
  State(state): State<ApiState<S>>,
  payload: Result<Json<SaveBody>, JsonRejection>,
) -> Result<Json<NotificationSettings>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Json(body) = payload?;
  let staff_id = body
    .staff_id
    .filter(|s| !s.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest("staffId is required".into()))?;

  let mut settings = current(&state, &staff_id).await?;
  if let Some(v) = body.email_notifications {
    settings.email_notifications = v;
  }
  if let Some(v) = body.push_notifications {
    settings.push_notifications = v;
  }
  if let Some(v) = body.leave_reminders {
    settings.leave_reminders = v;
  }
  if let Some(v) = body.approval_updates {
    settings.approval_updates = v;
  }

  let saved = state
    .store
    .save_settings(settings)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(saved))
}
