//! Leave requests and their status machine.
//!
//! A request starts `Pending` and is decided exactly once. `Approved` and
//! `Rejected` are terminal; nothing ever re-enters `Pending`.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  admin::AdminSettings,
  error::require,
  staff::StaffStats,
};

// ─── LeaveType ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
  #[serde(rename = "Annual Leave")]
  Annual,
  #[serde(rename = "Sick Leave")]
  Sick,
  #[serde(rename = "Personal Leave")]
  Personal,
  #[serde(rename = "Maternity Leave")]
  Maternity,
  #[serde(rename = "Paternity Leave")]
  Paternity,
  #[serde(rename = "Emergency Leave")]
  Emergency,
  #[serde(rename = "Study Leave")]
  Study,
  #[serde(rename = "Research Leave")]
  Research,
}

impl LeaveType {
  pub const ALL: [LeaveType; 8] = [
    Self::Annual,
    Self::Sick,
    Self::Personal,
    Self::Maternity,
    Self::Paternity,
    Self::Emergency,
    Self::Study,
    Self::Research,
  ];

  /// The label stored in the `leave_type` column; matches the serde names.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Annual => "Annual Leave",
      Self::Sick => "Sick Leave",
      Self::Personal => "Personal Leave",
      Self::Maternity => "Maternity Leave",
      Self::Paternity => "Paternity Leave",
      Self::Emergency => "Emergency Leave",
      Self::Study => "Study Leave",
      Self::Research => "Research Leave",
    }
  }
}

impl fmt::Display for LeaveType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for LeaveType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|t| t.as_str() == s)
      .ok_or_else(|| Error::UnknownLeaveType(s.to_owned()))
  }
}

// ─── LeaveStatus ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveStatus {
  Pending,
  Approved,
  Rejected,
}

impl LeaveStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "Pending",
      Self::Approved => "Approved",
      Self::Rejected => "Rejected",
    }
  }

  pub fn is_terminal(self) -> bool { !matches!(self, Self::Pending) }

  /// Check that request `id`, currently in `self`, may move to `to`.
  pub fn check_transition(self, id: i64, to: LeaveStatus) -> Result<()> {
    if to == Self::Pending {
      return Err(Error::Validation(
        "status must be Approved or Rejected".into(),
      ));
    }
    if self.is_terminal() {
      return Err(Error::InvalidTransition { id, from: self, to });
    }
    Ok(())
  }
}

impl fmt::Display for LeaveStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for LeaveStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "Pending" => Ok(Self::Pending),
      "Approved" => Ok(Self::Approved),
      "Rejected" => Ok(Self::Rejected),
      other => Err(Error::UnknownLeaveStatus(other.to_owned())),
    }
  }
}

// ─── LeaveRequest ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
  pub id:              i64,
  pub staff_id:        String,
  #[serde(rename = "type")]
  pub leave_type:      LeaveType,
  pub start_date:      NaiveDate,
  /// Inclusive.
  pub end_date:        NaiveDate,
  /// Caller-supplied; not recomputed from the dates.
  pub days:            i64,
  pub reason:          String,
  pub status:          LeaveStatus,
  pub applied_date:    NaiveDate,
  pub approved_by:     Option<String>,
  /// The decision date, set on approval and on rejection alike.
  pub approved_date:   Option<NaiveDate>,
  pub rejected_reason: Option<String>,
}

/// A leave request joined with its owner's name and department, as returned
/// by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestEntry {
  #[serde(flatten)]
  pub request:    LeaveRequest,
  pub staff_name: String,
  pub department: String,
}

// ─── NewLeaveRequest ─────────────────────────────────────────────────────────

/// Input to [`crate::store::LeaveStore::create_leave_request`]. Status and
/// applied date are always set by the store.
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
  pub staff_id:   String,
  pub leave_type: LeaveType,
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
  pub days:       i64,
  pub reason:     String,
}

impl NewLeaveRequest {
  /// Shape checks that need no stored state.
  pub fn validate(&self) -> Result<()> {
    require("staffId", &self.staff_id)?;
    require("reason", &self.reason)?;
    if self.days < 1 {
      return Err(Error::Validation("days must be at least 1".into()));
    }
    if self.start_date > self.end_date {
      return Err(Error::Validation(format!(
        "startDate {} is after endDate {}",
        self.start_date, self.end_date
      )));
    }
    Ok(())
  }

  /// Institution policy checks against the owner's current balance.
  pub fn check_policy(
    &self,
    balance: &StaffStats,
    policy: &AdminSettings,
  ) -> Result<()> {
    if self.days > policy.max_consecutive_days {
      return Err(Error::Validation(format!(
        "a single request may not exceed {} day(s)",
        policy.max_consecutive_days
      )));
    }
    if !policy.allow_negative_balance && self.days > balance.remaining_leave {
      return Err(Error::InsufficientBalance {
        staff_id:  self.staff_id.clone(),
        requested: self.days,
        remaining: balance.remaining_leave,
      });
    }
    Ok(())
  }
}

// ─── Decision ────────────────────────────────────────────────────────────────

/// An administrator's resolution of a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
  Approve { approved_by: Option<String> },
  Reject { reason: Option<String> },
}

impl Decision {
  /// Build a decision from the loosely-typed status update payload.
  pub fn from_parts(
    status: LeaveStatus,
    approved_by: Option<String>,
    rejected_reason: Option<String>,
  ) -> Result<Self> {
    match status {
      LeaveStatus::Approved => Ok(Self::Approve { approved_by }),
      LeaveStatus::Rejected => Ok(Self::Reject { reason: rejected_reason }),
      LeaveStatus::Pending => Err(Error::Validation(
        "status must be Approved or Rejected".into(),
      )),
    }
  }

  pub fn target(&self) -> LeaveStatus {
    match self {
      Self::Approve { .. } => LeaveStatus::Approved,
      Self::Reject { .. } => LeaveStatus::Rejected,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

  fn request(days: i64) -> NewLeaveRequest {
    NewLeaveRequest {
      staff_id:   "s1".into(),
      leave_type: LeaveType::Annual,
      start_date: date("2026-03-02"),
      end_date:   date("2026-03-06"),
      days,
      reason:     "family visit".into(),
    }
  }

  #[test]
  fn leave_type_labels_round_trip_through_from_str() {
    for t in LeaveType::ALL {
      assert_eq!(t.as_str().parse::<LeaveType>().unwrap(), t);
    }
    assert!(matches!(
      "Gardening Leave".parse::<LeaveType>(),
      Err(Error::UnknownLeaveType(_))
    ));
  }

  #[test]
  fn leave_type_serde_name_matches_column_label() {
    let json = serde_json::to_string(&LeaveType::Research).unwrap();
    assert_eq!(json, "\"Research Leave\"");
  }

  #[test]
  fn pending_may_be_decided_either_way() {
    assert!(LeaveStatus::Pending.check_transition(1, LeaveStatus::Approved).is_ok());
    assert!(LeaveStatus::Pending.check_transition(1, LeaveStatus::Rejected).is_ok());
  }

  #[test]
  fn decided_requests_are_terminal() {
    for from in [LeaveStatus::Approved, LeaveStatus::Rejected] {
      for to in [LeaveStatus::Approved, LeaveStatus::Rejected] {
        let err = from.check_transition(7, to).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { id: 7, .. }));
      }
    }
  }

  #[test]
  fn nothing_transitions_back_to_pending() {
    let err = LeaveStatus::Pending
      .check_transition(1, LeaveStatus::Pending)
      .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn inverted_dates_are_rejected() {
    let mut input = request(3);
    input.start_date = date("2026-03-10");
    assert!(matches!(input.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn zero_days_are_rejected() {
    assert!(matches!(request(0).validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn policy_rejects_requests_beyond_the_remaining_balance() {
    let policy = AdminSettings::default();
    let balance = StaffStats::new(20, 10, 6);
    assert!(request(4).check_policy(&balance, &policy).is_ok());
    let err = request(5).check_policy(&balance, &policy).unwrap_err();
    assert!(matches!(
      err,
      Error::InsufficientBalance { requested: 5, remaining: 4, .. }
    ));
  }

  #[test]
  fn policy_can_allow_a_negative_balance() {
    let policy = AdminSettings {
      allow_negative_balance: true,
      ..Default::default()
    };
    let balance = StaffStats::new(2, 2, 0);
    assert!(request(3).check_policy(&balance, &policy).is_ok());
  }

  #[test]
  fn policy_caps_consecutive_days() {
    let policy = AdminSettings {
      max_consecutive_days: 10,
      ..Default::default()
    };
    let balance = StaffStats::new(60, 0, 0);
    assert!(matches!(
      request(11).check_policy(&balance, &policy),
      Err(Error::Validation(_))
    ));
  }

  #[test]
  fn pending_is_not_a_decision() {
    assert!(Decision::from_parts(LeaveStatus::Pending, None, None).is_err());
    let d = Decision::from_parts(
      LeaveStatus::Rejected,
      Some("ignored".into()),
      Some("short staffed".into()),
    )
    .unwrap();
    assert_eq!(d, Decision::Reject { reason: Some("short staffed".into()) });
  }
}
