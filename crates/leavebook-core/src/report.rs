//! Read-only rollups over leave requests for dashboards.
//!
//! Aggregation happens in the store; this module holds the result shapes and
//! the arithmetic that must not depend on the backend (ratios, rounding).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::leave::LeaveType;

/// Restricts a report to requests whose `start_date` lies in `[from, to]`
/// and, optionally, to one department.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
  pub from:       Option<NaiveDate>,
  pub to:         Option<NaiveDate>,
  pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
  #[serde(rename = "type")]
  pub leave_type: LeaveType,
  pub count:      i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
  /// 1 = January.
  pub month:    u32,
  pub total:    i64,
  pub approved: i64,
  pub rejected: i64,
  pub pending:  i64,
}

impl MonthlyTrend {
  /// Twelve zeroed months, January first.
  pub fn empty_year() -> Vec<Self> {
    (1..=12).map(|month| Self { month, ..Default::default() }).collect()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStats {
  pub department:        String,
  pub staff_count:       i64,
  pub total_requests:    i64,
  pub approved_requests: i64,
  pub average_days:      f64,
  /// `approved / total` in `[0, 1]`; `0` for a department with no requests.
  pub approval_rate:     f64,
}

impl DepartmentStats {
  pub fn from_counts(
    department: String,
    staff_count: i64,
    total_requests: i64,
    approved_requests: i64,
    average_days: Option<f64>,
  ) -> Self {
    Self {
      department,
      staff_count,
      total_requests,
      approved_requests,
      average_days: round1(average_days.unwrap_or(0.0)),
      approval_rate: approval_rate(approved_requests, total_requests),
    }
  }
}

/// `approved / total`, or `0.0` when there is nothing to divide by.
pub fn approval_rate(approved: i64, total: i64) -> f64 {
  if total <= 0 {
    return 0.0;
  }
  approved as f64 / total as f64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRequester {
  pub staff_id:      String,
  pub name:          String,
  pub department:    String,
  pub total_days:    i64,
  pub request_count: i64,
}

/// The global dashboard tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStats {
  pub total_applications:  i64,
  pub pending_approval:    i64,
  pub approved_this_month: i64,
  /// Mean days from application to decision, one decimal.
  pub processing_time:     f64,
}

impl LeaveStats {
  pub fn new(
    total_applications: i64,
    pending_approval: i64,
    approved_this_month: i64,
    mean_processing_days: Option<f64>,
  ) -> Self {
    Self {
      total_applications,
      pending_approval,
      approved_this_month,
      processing_time: round1(mean_processing_days.unwrap_or(0.0)),
    }
  }
}

fn round1(x: f64) -> f64 { (x * 10.0).round() / 10.0 }
