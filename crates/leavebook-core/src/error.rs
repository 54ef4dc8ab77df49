//! Error types for `leavebook-core`.

use thiserror::Error;

use crate::leave::LeaveStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("staff not found: {0}")]
  StaffNotFound(String),

  #[error("leave request not found: {0}")]
  LeaveRequestNotFound(i64),

  #[error("notification not found: {0}")]
  NotificationNotFound(String),

  #[error("leave request {id} is {from}; it can no longer become {to}")]
  InvalidTransition {
    id:   i64,
    from: LeaveStatus,
    to:   LeaveStatus,
  },

  #[error(
    "insufficient leave balance for {staff_id}: requested {requested} day(s), {remaining} remaining"
  )]
  InsufficientBalance {
    staff_id:  String,
    requested: i64,
    remaining: i64,
  },

  #[error("unknown leave type: {0:?}")]
  UnknownLeaveType(String),

  #[error("unknown leave status: {0:?}")]
  UnknownLeaveStatus(String),

  #[error("unknown notification type: {0:?}")]
  UnknownNotificationType(String),

  #[error("password hashing failed: {0}")]
  PasswordHash(String),
}

impl Error {
  /// Whether the failure was caused by the caller's input rather than by a
  /// missing record or the backend.
  pub fn is_invalid_input(&self) -> bool {
    matches!(
      self,
      Self::Validation(_)
        | Self::InvalidTransition { .. }
        | Self::InsufficientBalance { .. }
        | Self::UnknownLeaveType(_)
        | Self::UnknownLeaveStatus(_)
        | Self::UnknownNotificationType(_)
    )
  }

  /// Whether the failure names a record that does not exist.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::StaffNotFound(_)
        | Self::LeaveRequestNotFound(_)
        | Self::NotificationNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reject a blank (empty or whitespace-only) required field.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Validation(format!("{field} is required")));
  }
  Ok(())
}
