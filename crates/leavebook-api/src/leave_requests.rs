//! Handlers for `/leave-requests` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/leave-requests` | Optional `?staffId=`; newest application first |
//! | `POST` | `/leave-requests` | Body: [`CreateBody`]; returns 201 + the pending request |
//! | `GET`  | `/leave-requests/:id` | 404 if not found |
//! | `PUT`  | `/leave-requests/:id/status` | Body: [`StatusBody`]; decides a pending request |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use leavebook_core::{
  leave::{Decision, LeaveRequest, LeaveRequestEntry, LeaveStatus, LeaveType, NewLeaveRequest},
  store::LeaveStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub staff_id: Option<String>,
}

/// `GET /leave-requests[?staffId=<id>]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<LeaveRequestEntry>>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Query(params) = params?;
  let staff_id = params.staff_id.as_deref().filter(|s| !s.is_empty());
  let requests = state
    .store
    .list_leave_requests(staff_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(requests))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /leave-requests/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<LeaveRequest>, ApiError>
where
  S: LeaveStore + 'static,
{
  let request = state
    .store
    .get_leave_request(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(leavebook_core::Error::LeaveRequestNotFound(id))?;
  Ok(Json(request))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub staff_id:   String,
  #[serde(rename = "type")]
  pub leave_type: LeaveType,
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
  pub days:       i64,
  #[serde(default)]
  pub reason:     String,
}

impl From<CreateBody> for NewLeaveRequest {
  fn from(b: CreateBody) -> Self {
    NewLeaveRequest {
      staff_id:   b.staff_id,
      leave_type: b.leave_type,
      start_date: b.start_date,
      end_date:   b.end_date,
      days:       b.days,
      reason:     b.reason,
    }
  }
}

/// `POST /leave-requests`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  payload: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeaveStore + 'static,
{
  let Json(body) = payload?;
  let request = state
    .store
    .create_leave_request(NewLeaveRequest::from(body))
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(
    request_id = request.id,
    staff_id = %request.staff_id,
    days = request.days,
    "leave requested"
  );
  Ok((StatusCode::CREATED, Json(request)))
}

// ─── Decide ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
  pub status:          LeaveStatus,
  pub approved_by:     Option<String>,
  pub rejected_reason: Option<String>,
}

/// `PUT /leave-requests/:id/status`, body:
/// `{"status":"Approved","approvedBy":"…"}` or
/// `{"status":"Rejected","rejectedReason":"…"}`.
pub async fn decide<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  payload: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<LeaveRequest>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Json(body) = payload?;
  let decision = Decision::from_parts(body.status, body.approved_by, body.rejected_reason)?;
  let request = state
    .store
    .update_status(id, decision)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(request_id = id, status = %request.status, "leave decided");
  Ok(Json(request))
}
