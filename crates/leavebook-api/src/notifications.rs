//! Handlers for `/notifications` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/notifications?staffId=` | Newest first, with `title`, `link` and `relativeTime` |
//! | `POST`   | `/notifications` | Body: `{"staffId":…,"type":…,"message":…}` |
//! | `PUT`    | `/notifications/:id/read` | Optional body `{"read":false}` to mark unread |
//! | `PUT`    | `/notifications/read-all` | Body: `{"staffId":…}`; returns `{"updated":n}` |
//! | `DELETE` | `/notifications/:id` | 404 if not found |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use leavebook_core::{
  notification::{self, NewNotification, NotificationType, NotificationView},
  store::LeaveStore,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{ApiState, error::ApiError};

fn require_staff_id(staff_id: Option<String>) -> Result<String, ApiError> {
  staff_id
    .filter(|s| !s.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest("staffId is required".into()))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub staff_id: Option<String>,
}

/// `GET /notifications?staffId=<id>`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<NotificationView>>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Query(params) = params?;
  let staff_id = require_staff_id(params.staff_id)?;

  let now = Utc::now();
  let views = state
    .store
    .list_notifications(&staff_id)
    .await
    .map_err(ApiError::from_store)?
    .into_iter()
    .map(|n| notification::present(n, now))
    .collect();
  Ok(Json(views))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub staff_id: Option<String>,
  #[serde(rename = "type", default = "default_kind")]
  pub kind:     NotificationType,
  #[serde(default)]
  pub message:  String,
}

fn default_kind() -> NotificationType { NotificationType::System }

/// `POST /notifications`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  payload: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeaveStore + 'static,
{
  let Json(body) = payload?;
  let input = NewNotification {
    staff_id: require_staff_id(body.staff_id)?,
    kind:     body.kind,
    message:  body.message,
  };
  let stored = state.store.notify(input).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(notification::present(stored, Utc::now()))))
}

// ─── Mark read ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReadBody {
  #[serde(default = "default_read")]
  pub read: bool,
}

fn default_read() -> bool { true }

/// `PUT /notifications/:id/read`
pub async fn mark_read<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  payload: Result<Option<Json<ReadBody>>, JsonRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: LeaveStore + 'static,
{
  let read = payload?.is_none_or(|Json(body)| body.read);
  let changed = state.store.mark_read(&id, read).await.map_err(ApiError::from_store)?;
  if !changed {
    return Err(leavebook_core::Error::NotificationNotFound(id).into());
  }
  Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadAllBody {
  pub staff_id: Option<String>,
}

/// `PUT /notifications/read-all`
pub async fn mark_all_read<S>(
  State(state): State<ApiState<S>>,
  payload: Result<Json<ReadAllBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Json(body) = payload?;
  let staff_id = require_staff_id(body.staff_id)?;
  let updated = state
    .store
    .mark_all_read(&staff_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(json!({ "updated": updated })))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /notifications/:id`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: LeaveStore + 'static,
{
  let deleted = state
    .store
    .remove_notification(&id)
    .await
    .map_err(ApiError::from_store)?;
  if !deleted {
    return Err(leavebook_core::Error::NotificationNotFound(id).into());
  }
  Ok(Json(json!({ "success": true })))
}
