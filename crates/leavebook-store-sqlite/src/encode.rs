//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width
//! so that they sort lexically. Calendar dates are stored as `YYYY-MM-DD`.
//! Enums are stored as their wire labels.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use leavebook_core::{
  admin::AdminSettings,
  leave::{LeaveRequest, LeaveRequestEntry, LeaveStatus, LeaveType},
  notification::{Notification, NotificationType},
  settings::NotificationSettings,
  staff::Staff,
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_leave_type(s: &str) -> Result<LeaveType> {
  s.parse().map_err(|e: leavebook_core::Error| Error::Decode(e.to_string()))
}

pub fn decode_status(s: &str) -> Result<LeaveStatus> {
  s.parse().map_err(|e: leavebook_core::Error| Error::Decode(e.to_string()))
}

pub fn decode_notification_type(s: &str) -> Result<NotificationType> {
  s.parse().map_err(|e: leavebook_core::Error| Error::Decode(e.to_string()))
}

// ─── Admin settings ──────────────────────────────────────────────────────────

const KEY_INSTITUTION_NAME: &str = "institution_name";
const KEY_ADMIN_EMAIL: &str = "admin_email";
const KEY_DEFAULT_TOTAL_LEAVE: &str = "default_total_leave";
const KEY_MAX_CONSECUTIVE_DAYS: &str = "max_consecutive_days";
const KEY_ALLOW_NEGATIVE_BALANCE: &str = "allow_negative_balance";
const KEY_ADMIN_PASSWORD_HASH: &str = "admin_password_hash";

/// Flatten settings into `(key, value)` rows. The password hash row is
/// omitted while no admin password has been set.
pub fn encode_admin_settings(s: &AdminSettings) -> Vec<(&'static str, String)> {
  let mut pairs = vec![
    (KEY_INSTITUTION_NAME, s.institution_name.clone()),
    (KEY_ADMIN_EMAIL, s.admin_email.clone()),
    (KEY_DEFAULT_TOTAL_LEAVE, s.default_total_leave.to_string()),
    (KEY_MAX_CONSECUTIVE_DAYS, s.max_consecutive_days.to_string()),
    (KEY_ALLOW_NEGATIVE_BALANCE, s.allow_negative_balance.to_string()),
  ];
  if let Some(hash) = &s.admin_password_hash {
    pairs.push((KEY_ADMIN_PASSWORD_HASH, hash.clone()));
  }
  pairs
}

/// Rebuild settings from stored rows; missing keys keep their defaults and
/// unknown keys are ignored.
pub fn decode_admin_settings(pairs: Vec<(String, String)>) -> Result<AdminSettings> {
  fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
      .parse()
      .map_err(|_| Error::Decode(format!("admin setting {key}: {value:?}")))
  }

  let mut settings = AdminSettings::default();
  for (key, value) in pairs {
    match key.as_str() {
      KEY_INSTITUTION_NAME => settings.institution_name = value,
      KEY_ADMIN_EMAIL => settings.admin_email = value,
      KEY_DEFAULT_TOTAL_LEAVE => settings.default_total_leave = parse(&key, &value)?,
      KEY_MAX_CONSECUTIVE_DAYS => settings.max_consecutive_days = parse(&key, &value)?,
      KEY_ALLOW_NEGATIVE_BALANCE => {
        settings.allow_negative_balance = parse(&key, &value)?
      }
      KEY_ADMIN_PASSWORD_HASH => settings.admin_password_hash = Some(value),
      _ => {}
    }
  }
  Ok(settings)
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const STAFF_COLUMNS: &str = "id, name, email, department, position, phone,
  password_hash, total_leave, used_leave, pending_leave, annual_leave,
  sick_leave, maternity_leave, paternity_leave, emergency_leave, created_at";

/// Raw values read directly from a `staff` row.
pub struct RawStaff {
  pub id:              String,
  pub name:            String,
  pub email:           String,
  pub department:      String,
  pub position:        String,
  pub phone:           Option<String>,
  pub password_hash:   Option<String>,
  pub total_leave:     i64,
  pub used_leave:      i64,
  pub pending_leave:   i64,
  pub annual_leave:    Option<i64>,
  pub sick_leave:      Option<i64>,
  pub maternity_leave: Option<i64>,
  pub paternity_leave: Option<i64>,
  pub emergency_leave: Option<i64>,
  pub created_at:      String,
}

impl RawStaff {
  /// Map a row selected with [`STAFF_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      name:            row.get(1)?,
      email:           row.get(2)?,
      department:      row.get(3)?,
      position:        row.get(4)?,
      phone:           row.get(5)?,
      password_hash:   row.get(6)?,
      total_leave:     row.get(7)?,
      used_leave:      row.get(8)?,
      pending_leave:   row.get(9)?,
      annual_leave:    row.get(10)?,
      sick_leave:      row.get(11)?,
      maternity_leave: row.get(12)?,
      paternity_leave: row.get(13)?,
      emergency_leave: row.get(14)?,
      created_at:      row.get(15)?,
    })
  }

  pub fn into_staff(self) -> Result<Staff> {
    Ok(Staff {
      id:              self.id,
      name:            self.name,
      email:           self.email,
      department:      self.department,
      position:        self.position,
      phone:           self.phone,
      password_hash:   self.password_hash,
      total_leave:     self.total_leave,
      used_leave:      self.used_leave,
      pending_leave:   self.pending_leave,
      annual_leave:    self.annual_leave,
      sick_leave:      self.sick_leave,
      maternity_leave: self.maternity_leave,
      paternity_leave: self.paternity_leave,
      emergency_leave: self.emergency_leave,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub const LEAVE_COLUMNS: &str = "l.id, l.staff_id, l.leave_type, l.start_date,
  l.end_date, l.days, l.reason, l.status, l.applied_date, l.approved_by,
  l.approved_date, l.rejected_reason";

/// Raw values read directly from a `leave_requests` row (aliased `l`).
pub struct RawLeaveRequest {
  pub id:              i64,
  pub staff_id:        String,
  pub leave_type:      String,
  pub start_date:      String,
  pub end_date:        String,
  pub days:            i64,
  pub reason:          String,
  pub status:          String,
  pub applied_date:    String,
  pub approved_by:     Option<String>,
  pub approved_date:   Option<String>,
  pub rejected_reason: Option<String>,
}

impl RawLeaveRequest {
  /// Map a row selected with [`LEAVE_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      staff_id:        row.get(1)?,
      leave_type:      row.get(2)?,
      start_date:      row.get(3)?,
      end_date:        row.get(4)?,
      days:            row.get(5)?,
      reason:          row.get(6)?,
      status:          row.get(7)?,
      applied_date:    row.get(8)?,
      approved_by:     row.get(9)?,
      approved_date:   row.get(10)?,
      rejected_reason: row.get(11)?,
    })
  }

  pub fn into_request(self) -> Result<LeaveRequest> {
    Ok(LeaveRequest {
      id:              self.id,
      staff_id:        self.staff_id,
      leave_type:      decode_leave_type(&self.leave_type)?,
      start_date:      decode_date(&self.start_date)?,
      end_date:        decode_date(&self.end_date)?,
      days:            self.days,
      reason:          self.reason,
      status:          decode_status(&self.status)?,
      applied_date:    decode_date(&self.applied_date)?,
      approved_by:     self.approved_by,
      approved_date:   self.approved_date.as_deref().map(decode_date).transpose()?,
      rejected_reason: self.rejected_reason,
    })
  }
}

/// A leave request row joined with its owner's name and department, selected
/// as [`LEAVE_COLUMNS`] followed by `s.name, s.department`.
pub struct RawLeaveRequestEntry {
  pub request:    RawLeaveRequest,
  pub staff_name: String,
  pub department: String,
}

impl RawLeaveRequestEntry {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      request:    RawLeaveRequest::from_row(row)?,
      staff_name: row.get(12)?,
      department: row.get(13)?,
    })
  }

  pub fn into_entry(self) -> Result<LeaveRequestEntry> {
    Ok(LeaveRequestEntry {
      request:    self.request.into_request()?,
      staff_name: self.staff_name,
      department: self.department,
    })
  }
}

pub const NOTIFICATION_COLUMNS: &str = "id, staff_id, type, message, created_at, read";

/// Raw values read directly from a `notifications` row.
pub struct RawNotification {
  pub id:         String,
  pub staff_id:   String,
  pub kind:       String,
  pub message:    String,
  pub created_at: String,
  pub read:       bool,
}

impl RawNotification {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      staff_id:   row.get(1)?,
      kind:       row.get(2)?,
      message:    row.get(3)?,
      created_at: row.get(4)?,
      read:       row.get(5)?,
    })
  }

  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      id:         self.id,
      staff_id:   self.staff_id,
      kind:       decode_notification_type(&self.kind)?,
      message:    self.message,
      created_at: decode_dt(&self.created_at)?,
      read:       self.read,
    })
  }
}

pub const SETTINGS_COLUMNS: &str = "staff_id, email_notifications,
  push_notifications, leave_reminders, approval_updates";

pub fn settings_from_row(row: &Row<'_>) -> rusqlite::Result<NotificationSettings> {
  Ok(NotificationSettings {
    staff_id:            row.get(0)?,
    email_notifications: row.get(1)?,
    push_notifications:  row.get(2)?,
    leave_reminders:     row.get(3)?,
    approval_updates:    row.get(4)?,
  })
}
