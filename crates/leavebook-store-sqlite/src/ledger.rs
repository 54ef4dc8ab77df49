//! Synchronous, transactional bodies of the mutating store operations.
//!
//! Each function runs on the `tokio_rusqlite` connection thread. Functions
//! that take `&mut Connection` open their own transaction; dropping it on an
//! early `?` return rolls everything back.

use chrono::{DateTime, NaiveDate, Utc};
use leavebook_core::{
  admin::{AdminSettings, AdminSettingsUpdate},
  leave::{Decision, LeaveRequest, LeaveStatus, NewLeaveRequest},
  notification::{self, Notification, NotificationType},
  settings::NotificationSettings,
  staff::{NewStaff, Staff, StaffStats, StaffUpdate},
};
use rusqlite::{Connection, OptionalExtension as _, params};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    LEAVE_COLUMNS, NOTIFICATION_COLUMNS, RawLeaveRequest, RawStaff,
    SETTINGS_COLUMNS, STAFF_COLUMNS, decode_admin_settings, encode_admin_settings,
    encode_date, encode_dt, settings_from_row,
  },
};

// ─── Reads shared by several operations ──────────────────────────────────────

pub fn load_staff(conn: &Connection, id: &str) -> Result<Option<RawStaff>> {
  Ok(
    conn
      .query_row(
        &format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = ?1"),
        params![id],
        RawStaff::from_row,
      )
      .optional()?,
  )
}

pub fn load_staff_by_email(conn: &Connection, email: &str) -> Result<Option<RawStaff>> {
  Ok(
    conn
      .query_row(
        &format!("SELECT {STAFF_COLUMNS} FROM staff WHERE email = ?1"),
        params![email],
        RawStaff::from_row,
      )
      .optional()?,
  )
}

pub fn load_leave_request(conn: &Connection, id: i64) -> Result<Option<RawLeaveRequest>> {
  Ok(
    conn
      .query_row(
        &format!("SELECT {LEAVE_COLUMNS} FROM leave_requests l WHERE l.id = ?1"),
        params![id],
        RawLeaveRequest::from_row,
      )
      .optional()?,
  )
}

pub fn load_settings(conn: &Connection, staff_id: &str) -> Result<Option<NotificationSettings>> {
  Ok(
    conn
      .query_row(
        &format!("SELECT {SETTINGS_COLUMNS} FROM settings WHERE staff_id = ?1"),
        params![staff_id],
        settings_from_row,
      )
      .optional()?,
  )
}

pub fn load_admin_settings(conn: &Connection) -> Result<AdminSettings> {
  let mut stmt = conn.prepare("SELECT key, value FROM admin_settings")?;
  let pairs = stmt
    .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
    .collect::<rusqlite::Result<Vec<(String, String)>>>()?;
  decode_admin_settings(pairs)
}

fn staff_exists(conn: &Connection, id: &str) -> Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM staff WHERE id = ?1", params![id], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

fn require_staff(conn: &Connection, id: &str) -> Result<()> {
  if !staff_exists(conn, id)? {
    return Err(leavebook_core::Error::StaffNotFound(id.to_owned()).into());
  }
  Ok(())
}

// ─── Balances ────────────────────────────────────────────────────────────────

/// Live balance derived from the requests; `None` if the staff is unknown.
pub fn balance(conn: &Connection, staff_id: &str) -> Result<Option<StaffStats>> {
  Ok(
    conn
      .query_row(
        "SELECT s.total_leave,
           COALESCE((SELECT SUM(days) FROM leave_requests
                     WHERE staff_id = s.id AND status = 'Approved'), 0),
           COALESCE((SELECT SUM(days) FROM leave_requests
                     WHERE staff_id = s.id AND status = 'Pending'), 0)
         FROM staff s WHERE s.id = ?1",
        params![staff_id],
        |row| Ok(StaffStats::new(row.get(0)?, row.get(1)?, row.get(2)?)),
      )
      .optional()?,
  )
}

/// Rewrite the bookkeeping columns of one staff row from its requests.
fn recompute_balance(conn: &Connection, staff_id: &str) -> Result<()> {
  conn.execute(
    "UPDATE staff SET
       used_leave = COALESCE((SELECT SUM(days) FROM leave_requests
                              WHERE staff_id = ?1 AND status = 'Approved'), 0),
       pending_leave = COALESCE((SELECT SUM(days) FROM leave_requests
                                 WHERE staff_id = ?1 AND status = 'Pending'), 0)
     WHERE id = ?1",
    params![staff_id],
  )?;
  Ok(())
}

// ─── Staff ───────────────────────────────────────────────────────────────────

/// Insert a staff record unless one with the same id or email exists.
/// Returns the stored row and whether it was inserted.
pub fn create_staff(
  conn: &mut Connection,
  id: String,
  input: NewStaff,
  now: DateTime<Utc>,
) -> Result<(RawStaff, bool)> {
  let tx = conn.transaction()?;

  // Prefer the id match when the id and the email point at different rows.
  let existing = tx
    .query_row(
      &format!(
        "SELECT {STAFF_COLUMNS} FROM staff WHERE id = ?1 OR email = ?2
         ORDER BY (id = ?1) DESC LIMIT 1"
      ),
      params![id, input.email],
      RawStaff::from_row,
    )
    .optional()?;
  if let Some(raw) = existing {
    return Ok((raw, false));
  }

  tx.execute(
    "INSERT INTO staff (
       id, name, email, department, position, phone, password_hash,
       total_leave, used_leave, pending_leave, annual_leave, sick_leave,
       maternity_leave, paternity_leave, emergency_leave, created_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, 0, ?9, ?10, ?11, ?12, ?13, ?14)",
    params![
      id,
      input.name,
      input.email,
      input.department,
      input.position,
      input.phone,
      input.password_hash,
      input.total_leave.unwrap_or_default(),
      input.annual_leave,
      input.sick_leave,
      input.maternity_leave,
      input.paternity_leave,
      input.emergency_leave,
      encode_dt(now),
    ],
  )?;

  let raw = load_staff(&tx, &id)?
    .ok_or_else(|| leavebook_core::Error::StaffNotFound(id.clone()))?;
  tx.commit()?;
  Ok((raw, true))
}

pub fn update_staff(conn: &mut Connection, id: &str, update: StaffUpdate) -> Result<Staff> {
  let tx = conn.transaction()?;

  let mut staff = load_staff(&tx, id)?
    .ok_or_else(|| leavebook_core::Error::StaffNotFound(id.to_owned()))?
    .into_staff()?;

  if let Some(email) = &update.email
    && let Some(other) = load_staff_by_email(&tx, email)?
    && other.id != id
  {
    return Err(
      leavebook_core::Error::Validation(format!("email {email} is already in use")).into(),
    );
  }

  update.apply_to(&mut staff);
  tx.execute(
    "UPDATE staff SET name = ?2, email = ?3, department = ?4, position = ?5,
       phone = ?6, password_hash = ?7, total_leave = ?8
     WHERE id = ?1",
    params![
      staff.id,
      staff.name,
      staff.email,
      staff.department,
      staff.position,
      staff.phone,
      staff.password_hash,
      staff.total_leave,
    ],
  )?;
  tx.commit()?;
  Ok(staff)
}

/// Remove a staff row and every row that references it, atomically.
pub fn delete_staff(conn: &mut Connection, id: &str) -> Result<bool> {
  let tx = conn.transaction()?;
  if !staff_exists(&tx, id)? {
    return Ok(false);
  }

  let notifications = tx.execute("DELETE FROM notifications WHERE staff_id = ?1", params![id])?;
  let settings = tx.execute("DELETE FROM settings WHERE staff_id = ?1", params![id])?;
  let requests = tx.execute("DELETE FROM leave_requests WHERE staff_id = ?1", params![id])?;
  tx.execute("DELETE FROM staff WHERE id = ?1", params![id])?;
  tx.commit()?;

  tracing::debug!(
    staff_id = id,
    requests,
    notifications,
    settings,
    "deleted staff with dependents"
  );
  Ok(true)
}

// ─── Leave request lifecycle ─────────────────────────────────────────────────

pub fn create_leave_request(
  conn: &mut Connection,
  input: NewLeaveRequest,
  today: NaiveDate,
) -> Result<LeaveRequest> {
  let tx = conn.transaction()?;

  let current = balance(&tx, &input.staff_id)?
    .ok_or_else(|| leavebook_core::Error::StaffNotFound(input.staff_id.clone()))?;
  let policy = load_admin_settings(&tx)?;
  input.check_policy(&current, &policy)?;

  tx.execute(
    "INSERT INTO leave_requests (
       staff_id, leave_type, start_date, end_date, days, reason, status, applied_date
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'Pending', ?7)",
    params![
      input.staff_id,
      input.leave_type.as_str(),
      encode_date(input.start_date),
      encode_date(input.end_date),
      input.days,
      input.reason,
      encode_date(today),
    ],
  )?;

  let request = LeaveRequest {
    id:              tx.last_insert_rowid(),
    staff_id:        input.staff_id,
    leave_type:      input.leave_type,
    start_date:      input.start_date,
    end_date:        input.end_date,
    days:            input.days,
    reason:          input.reason,
    status:          LeaveStatus::Pending,
    applied_date:    today,
    approved_by:     None,
    approved_date:   None,
    rejected_reason: None,
  };
  recompute_balance(&tx, &request.staff_id)?;

  let prefs = load_settings(&tx, &request.staff_id)?
    .unwrap_or_else(|| NotificationSettings::defaults_for(&request.staff_id));
  if prefs.wants_submission_notices() {
    insert_notification(
      &tx,
      &new_notification(&request.staff_id, NotificationType::Leave, notification::leave_submitted(&request)),
    )?;
  }

  tx.commit()?;
  Ok(request)
}

pub fn update_status(
  conn: &mut Connection,
  id: i64,
  decision: Decision,
  today: NaiveDate,
) -> Result<LeaveRequest> {
  let tx = conn.transaction()?;

  let mut request = load_leave_request(&tx, id)?
    .ok_or(leavebook_core::Error::LeaveRequestNotFound(id))?
    .into_request()?;
  let target = decision.target();
  request.status.check_transition(id, target)?;

  let (approved_by, rejected_reason) = match decision {
    Decision::Approve { approved_by } => (approved_by, None),
    Decision::Reject { reason } => (None, reason),
  };

  // The status guard in the WHERE clause is what makes a decision final.
  let changed = tx.execute(
    "UPDATE leave_requests
     SET status = ?2, approved_by = ?3, approved_date = ?4, rejected_reason = ?5
     WHERE id = ?1 AND status = 'Pending'",
    params![id, target.as_str(), approved_by, encode_date(today), rejected_reason],
  )?;
  if changed == 0 {
    return Err(
      leavebook_core::Error::InvalidTransition { id, from: request.status, to: target }.into(),
    );
  }

  request.status = target;
  request.approved_by = approved_by;
  request.approved_date = Some(today);
  request.rejected_reason = rejected_reason;
  recompute_balance(&tx, &request.staff_id)?;

  let prefs = load_settings(&tx, &request.staff_id)?
    .unwrap_or_else(|| NotificationSettings::defaults_for(&request.staff_id));
  if prefs.wants_decision_notices()
    && let Some(message) = notification::leave_decided(&request)
  {
    insert_notification(
      &tx,
      &new_notification(&request.staff_id, NotificationType::Leave, message),
    )?;
  }

  tx.commit()?;
  Ok(request)
}

// ─── Notifications ───────────────────────────────────────────────────────────

pub fn new_notification(staff_id: &str, kind: NotificationType, message: String) -> Notification {
  Notification {
    id: Uuid::new_v4().to_string(),
    staff_id: staff_id.to_owned(),
    kind,
    message,
    created_at: Utc::now(),
    read: false,
  }
}

fn insert_notification(conn: &Connection, n: &Notification) -> Result<()> {
  conn.execute(
    &format!("INSERT INTO notifications ({NOTIFICATION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
    params![n.id, n.staff_id, n.kind.as_str(), n.message, encode_dt(n.created_at), n.read],
  )?;
  Ok(())
}

pub fn notify(conn: &Connection, notification: &Notification) -> Result<()> {
  require_staff(conn, &notification.staff_id)?;
  insert_notification(conn, notification)
}

// ─── Settings ────────────────────────────────────────────────────────────────

pub fn save_settings(conn: &Connection, s: &NotificationSettings) -> Result<()> {
  require_staff(conn, &s.staff_id)?;
  conn.execute(
    "INSERT INTO settings (
       staff_id, email_notifications, push_notifications, leave_reminders, approval_updates
     ) VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT (staff_id) DO UPDATE SET
       email_notifications = excluded.email_notifications,
       push_notifications  = excluded.push_notifications,
       leave_reminders     = excluded.leave_reminders,
       approval_updates    = excluded.approval_updates",
    params![
      s.staff_id,
      s.email_notifications,
      s.push_notifications,
      s.leave_reminders,
      s.approval_updates,
    ],
  )?;
  Ok(())
}

fn write_admin_settings(conn: &Connection, settings: &AdminSettings) -> Result<()> {
  let mut stmt = conn.prepare(
    "INSERT INTO admin_settings (key, value) VALUES (?1, ?2)
     ON CONFLICT (key) DO UPDATE SET value = excluded.value",
  )?;
  for (key, value) in encode_admin_settings(settings) {
    stmt.execute(params![key, value])?;
  }
  Ok(())
}

pub fn save_admin_settings(conn: &mut Connection, update: AdminSettingsUpdate) -> Result<AdminSettings> {
  let tx = conn.transaction()?;
  let mut settings = load_admin_settings(&tx)?;
  update.apply_to(&mut settings);
  write_admin_settings(&tx, &settings)?;
  tx.commit()?;
  Ok(settings)
}

pub fn reset_admin_settings(conn: &mut Connection) -> Result<AdminSettings> {
  let tx = conn.transaction()?;
  let settings = load_admin_settings(&tx)?.reset();
  tx.execute("DELETE FROM admin_settings", [])?;
  write_admin_settings(&tx, &settings)?;
  tx.commit()?;
  Ok(settings)
}
