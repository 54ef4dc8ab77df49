//! Read-only dashboard aggregates.
//!
//! `from` and `to` are inclusive `YYYY-MM-DD` bounds on a request's start
//! date; a malformed date is a 400.

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use chrono::{Datelike, NaiveDate, Utc};
use leavebook_core::{
  report::{DepartmentStats, LeaveStats, MonthlyTrend, ReportFilter, TopRequester, TypeCount},
  store::LeaveStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

const DEFAULT_TOP_REQUESTERS: usize = 5;

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
  pub from:       Option<NaiveDate>,
  pub to:         Option<NaiveDate>,
  pub department: Option<String>,
  pub limit:      Option<usize>,
}

impl ReportParams {
  fn filter(&self) -> ReportFilter {
    ReportFilter {
      from:       self.from,
      to:         self.to,
      department: self.department.clone().filter(|d| !d.is_empty()),
    }
  }
}

/// `GET /leave-stats`
pub async fn leave_stats<S>(State(state): State<ApiState<S>>) -> Result<Json<LeaveStats>, ApiError>
where
  S: LeaveStore + 'static,
{
  let stats = state.store.leave_stats(None).await.map_err(ApiError::from_store)?;
  Ok(Json(stats))
}

/// `GET /reports/leave-types[?from=…][&to=…][&department=…]`
pub async fn leave_types<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Json<Vec<TypeCount>>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Query(params) = params?;
  let counts = state
    .store
    .leave_type_distribution(&params.filter())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(counts))
}

#[derive(Debug, Deserialize)]
pub struct MonthlyParams {
  pub year: Option<i32>,
}

/// `GET /reports/monthly[?year=…]`, defaulting to the current year.
pub async fn monthly<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<MonthlyParams>, QueryRejection>,
) -> Result<Json<Vec<MonthlyTrend>>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Query(params) = params?;
  let year = params.year.unwrap_or_else(|| Utc::now().year());
  let trend = state.store.monthly_trend(year).await.map_err(ApiError::from_store)?;
  Ok(Json(trend))
}

/// `GET /reports/departments[?from=…][&to=…]`
pub async fn departments<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Json<Vec<DepartmentStats>>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Query(params) = params?;
  let stats = state
    .store
    .department_stats(&params.filter())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(stats))
}

/// `GET /reports/top-requesters[?from=…][&to=…][&department=…][&limit=…]`
pub async fn top_requesters<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Json<Vec<TopRequester>>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Query(params) = params?;
  let limit = params.limit.unwrap_or(DEFAULT_TOP_REQUESTERS);
  let top = state
    .store
    .top_requesters(&params.filter(), limit)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(top))
}
