//! [`SqliteStore`]: the SQLite implementation of [`LeaveStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use leavebook_core::{
  admin::{AdminSettings, AdminSettingsUpdate},
  leave::{Decision, LeaveRequest, LeaveRequestEntry, NewLeaveRequest},
  notification::{NewNotification, Notification},
  report::{
    DepartmentStats, LeaveStats, MonthlyTrend, ReportFilter, TopRequester,
    TypeCount,
  },
  settings::NotificationSettings,
  staff::{CreateOutcome, NewStaff, Staff, StaffStats, StaffUpdate},
  store::LeaveStore,
};

use crate::{
  Result,
  encode::{
    LEAVE_COLUMNS, NOTIFICATION_COLUMNS, RawLeaveRequestEntry,
    RawNotification, RawStaff, STAFF_COLUMNS,
  },
  ledger, report,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A leavebook store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, as the tests do.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run raw SQL against the connection; tests use it to inject failures.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn find_staff(&self, column: &'static str, value: &str) -> Result<Option<Staff>> {
    let value = value.to_owned();

    let raw: Option<RawStaff> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {STAFF_COLUMNS} FROM staff WHERE {column} = ?1"),
              rusqlite::params![value],
              RawStaff::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStaff::into_staff).transpose()
  }
}

// ─── LeaveStore impl ─────────────────────────────────────────────────────────

impl LeaveStore for SqliteStore {
  type Error = crate::Error;

  // ── Staff ledger ──────────────────────────────────────────────────────────

  async fn create_staff(&self, input: NewStaff) -> Result<CreateOutcome> {
    input.validate()?;
    let id = input
      .id
      .clone()
      .unwrap_or_else(|| Uuid::new_v4().to_string());
    let now = Utc::now();

    let (raw, created) = self
      .conn
      .call(move |conn| Ok(ledger::create_staff(conn, id, input, now)))
      .await??;

    let staff = raw.into_staff()?;
    Ok(if created {
      CreateOutcome::Created(staff)
    } else {
      CreateOutcome::Existing(staff)
    })
  }

  async fn get_staff(&self, id: &str) -> Result<Option<Staff>> {
    self.find_staff("id", id).await
  }

  async fn get_staff_by_email(&self, email: &str) -> Result<Option<Staff>> {
    self.find_staff("email", email).await
  }

  async fn list_staff(&self) -> Result<Vec<Staff>> {
    let raws: Vec<RawStaff> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {STAFF_COLUMNS} FROM staff ORDER BY name, id"))?;
        let rows = stmt
          .query_map([], RawStaff::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStaff::into_staff).collect()
  }

  async fn update_staff(&self, id: &str, update: StaffUpdate) -> Result<Staff> {
    update.validate()?;
    let id = id.to_owned();
    self
      .conn
      .call(move |conn| Ok(ledger::update_staff(conn, &id, update)))
      .await?
  }

  async fn delete_staff(&self, id: &str) -> Result<bool> {
    let id = id.to_owned();
    self
      .conn
      .call(move |conn| Ok(ledger::delete_staff(conn, &id)))
      .await?
  }

  async fn staff_stats(&self, id: &str) -> Result<StaffStats> {
    let id_owned = id.to_owned();
    let stats = self
      .conn
      .call(move |conn| Ok(ledger::balance(conn, &id_owned)))
      .await??;
    Ok(stats.ok_or_else(|| leavebook_core::Error::StaffNotFound(id.to_owned()))?)
  }

  // ── Leave request lifecycle ───────────────────────────────────────────────

  async fn create_leave_request(&self, input: NewLeaveRequest) -> Result<LeaveRequest> {
    input.validate()?;
    let today = Utc::now().date_naive();
    self
      .conn
      .call(move |conn| Ok(ledger::create_leave_request(conn, input, today)))
      .await?
  }

  async fn get_leave_request(&self, id: i64) -> Result<Option<LeaveRequest>> {
    let raw = self
      .conn
      .call(move |conn| Ok(ledger::load_leave_request(conn, id)))
      .await??;
    raw.map(|r| r.into_request()).transpose()
  }

  async fn list_leave_requests(&self, staff_id: Option<&str>) -> Result<Vec<LeaveRequestEntry>> {
    let staff_id = staff_id.map(str::to_owned);

    let raws: Vec<RawLeaveRequestEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {LEAVE_COLUMNS}, s.name, s.department
           FROM leave_requests l
           JOIN staff s ON s.id = l.staff_id
           WHERE (?1 IS NULL OR l.staff_id = ?1)
           ORDER BY l.applied_date DESC, l.id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![staff_id], RawLeaveRequestEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLeaveRequestEntry::into_entry).collect()
  }

  async fn update_status(&self, id: i64, decision: Decision) -> Result<LeaveRequest> {
    let today = Utc::now().date_naive();
    self
      .conn
      .call(move |conn| Ok(ledger::update_status(conn, id, decision, today)))
      .await?
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  async fn notify(&self, input: NewNotification) -> Result<Notification> {
    input.validate()?;
    let notification = ledger::new_notification(&input.staff_id, input.kind, input.message);
    let stored = notification.clone();

    self
      .conn
      .call(move |conn| Ok(ledger::notify(conn, &stored)))
      .await??;
    Ok(notification)
  }

  async fn list_notifications(&self, staff_id: &str) -> Result<Vec<Notification>> {
    let staff_id = staff_id.to_owned();

    let raws: Vec<RawNotification> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {NOTIFICATION_COLUMNS} FROM notifications
           WHERE staff_id = ?1
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![staff_id], RawNotification::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNotification::into_notification).collect()
  }

  async fn mark_read(&self, id: &str, read: bool) -> Result<bool> {
    let id = id.to_owned();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE notifications SET read = ?2 WHERE id = ?1",
          rusqlite::params![id, read],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn mark_all_read(&self, staff_id: &str) -> Result<usize> {
    let staff_id = staff_id.to_owned();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE notifications SET read = 1 WHERE staff_id = ?1 AND read = 0",
          rusqlite::params![staff_id],
        )?)
      })
      .await?;
    Ok(changed)
  }

  async fn remove_notification(&self, id: &str) -> Result<bool> {
    let id = id.to_owned();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM notifications WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn get_settings(&self, staff_id: &str) -> Result<Option<NotificationSettings>> {
    let staff_id = staff_id.to_owned();
    self
      .conn
      .call(move |conn| Ok(ledger::load_settings(conn, &staff_id)))
      .await?
  }

  async fn save_settings(&self, settings: NotificationSettings) -> Result<NotificationSettings> {
    if settings.staff_id.trim().is_empty() {
      return Err(leavebook_core::Error::Validation("staffId is required".into()).into());
    }
    let stored = settings.clone();
    self
      .conn
      .call(move |conn| Ok(ledger::save_settings(conn, &stored)))
      .await??;
    Ok(settings)
  }

  async fn admin_settings(&self) -> Result<AdminSettings> {
    self
      .conn
      .call(|conn| Ok(ledger::load_admin_settings(conn)))
      .await?
  }

  async fn save_admin_settings(&self, update: AdminSettingsUpdate) -> Result<AdminSettings> {
    update.validate()?;
    self
      .conn
      .call(move |conn| Ok(ledger::save_admin_settings(conn, update)))
      .await?
  }

  async fn reset_admin_settings(&self) -> Result<AdminSettings> {
    self
      .conn
      .call(|conn| Ok(ledger::reset_admin_settings(conn)))
      .await?
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn leave_stats(&self, as_of: Option<NaiveDate>) -> Result<LeaveStats> {
    let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());
    self
      .conn
      .call(move |conn| Ok(report::leave_stats(conn, as_of)))
      .await?
  }

  async fn leave_type_distribution(&self, filter: &ReportFilter) -> Result<Vec<TypeCount>> {
    let filter = filter.clone();
    self
      .conn
      .call(move |conn| Ok(report::leave_type_distribution(conn, &filter)))
      .await?
  }

  async fn monthly_trend(&self, year: i32) -> Result<Vec<MonthlyTrend>> {
    self
      .conn
      .call(move |conn| Ok(report::monthly_trend(conn, year)))
      .await?
  }

  async fn department_stats(&self, filter: &ReportFilter) -> Result<Vec<DepartmentStats>> {
    let filter = filter.clone();
    self
      .conn
      .call(move |conn| Ok(report::department_stats(conn, &filter)))
      .await?
  }

  async fn top_requesters(&self, filter: &ReportFilter, limit: usize) -> Result<Vec<TopRequester>> {
    let filter = filter.clone();
    self
      .conn
      .call(move |conn| Ok(report::top_requesters(conn, &filter, limit)))
      .await?
  }
}
