//! Handlers for `/staff` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/staff` | Ordered by name |
//! | `POST`   | `/staff` | 201 on insert, 200 with the existing record on a duplicate id or email |
//! | `GET`    | `/staff/:id` | 404 if not found |
//! | `PUT`    | `/staff/:id` | Partial update |
//! | `DELETE` | `/staff/:id` | Removes requests, notifications and settings too |
//! | `GET`    | `/staff/:id/stats` | Live balance |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use leavebook_core::{
  password::PasswordScheme,
  staff::{CreateOutcome, NewStaff, Staff, StaffStats, StaffUpdate},
  store::LeaveStore,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{ApiState, error::ApiError};

/// Hash a supplied password; blank passwords are treated as absent.
fn hash_password(
  scheme: &dyn PasswordScheme,
  password: Option<&str>,
) -> Result<Option<String>, ApiError> {
  match password.filter(|p| !p.is_empty()) {
    Some(plain) => Ok(Some(scheme.hash(plain)?)),
    None => Ok(None),
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /staff`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<Staff>>, ApiError>
where
  S: LeaveStore + 'static,
{
  let staff = state.store.list_staff().await.map_err(ApiError::from_store)?;
  Ok(Json(staff))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /staff`. Missing text fields read as blank so
/// that validation, not deserialisation, reports them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBody {
  pub id:              Option<String>,
  pub name:            String,
  pub email:           String,
  pub department:      String,
  pub position:        String,
  pub phone:           Option<String>,
  pub password:        Option<String>,
  pub total_leave:     Option<i64>,
  pub annual_leave:    Option<i64>,
  pub sick_leave:      Option<i64>,
  pub maternity_leave: Option<i64>,
  pub paternity_leave: Option<i64>,
  pub emergency_leave: Option<i64>,
}

/// `POST /staff`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  payload: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeaveStore + 'static,
{
  let Json(body) = payload?;
  let input = NewStaff {
    id:              body.id,
    name:            body.name,
    email:           body.email,
    department:      body.department,
    position:        body.position,
    phone:           body.phone,
    password_hash:   None,
    total_leave:     body.total_leave,
    annual_leave:    body.annual_leave,
    sick_leave:      body.sick_leave,
    maternity_leave: body.maternity_leave,
    paternity_leave: body.paternity_leave,
    emergency_leave: body.emergency_leave,
  };
  input.validate()?;
  let input = NewStaff {
    password_hash: hash_password(state.passwords.as_ref(), body.password.as_deref())?,
    ..input
  };

  let outcome = state.store.create_staff(input).await.map_err(ApiError::from_store)?;
  Ok(match outcome {
    CreateOutcome::Created(staff) => {
      tracing::info!(staff_id = %staff.id, "created staff");
      (StatusCode::CREATED, Json(staff))
    }
    CreateOutcome::Existing(staff) => (StatusCode::OK, Json(staff)),
  })
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /staff/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Staff>, ApiError>
where
  S: LeaveStore + 'static,
{
  let staff = state
    .store
    .get_staff(&id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(leavebook_core::Error::StaffNotFound(id))?;
  Ok(Json(staff))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateBody {
  pub name:        Option<String>,
  pub email:       Option<String>,
  pub department:  Option<String>,
  pub position:    Option<String>,
  pub phone:       Option<String>,
  pub password:    Option<String>,
  pub total_leave: Option<i64>,
}

/// `PUT /staff/:id`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  payload: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<Staff>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Json(body) = payload?;
  let update = StaffUpdate {
    name:          body.name,
    email:         body.email,
    department:    body.department,
    position:      body.position,
    phone:         body.phone,
    password_hash: None,
    total_leave:   body.total_leave,
  };
  update.validate()?;
  let update = StaffUpdate {
    password_hash: hash_password(state.passwords.as_ref(), body.password.as_deref())?,
    ..update
  };

  let staff = state
    .store
    .update_staff(&id, update)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(staff))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /staff/:id`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: LeaveStore + 'static,
{
  let deleted = state.store.delete_staff(&id).await.map_err(ApiError::from_store)?;
  if !deleted {
    return Err(leavebook_core::Error::StaffNotFound(id).into());
  }
  tracing::info!(staff_id = %id, "deleted staff");
  Ok(Json(json!({ "success": true })))
}

// ─── Stats ────────────────────────────────────────────────────────────────────

/// `GET /staff/:id/stats`
pub async fn stats<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<StaffStats>, ApiError>
where
  S: LeaveStore + 'static,
{
  let stats = state.store.staff_stats(&id).await.map_err(ApiError::from_store)?;
  Ok(Json(stats))
}
