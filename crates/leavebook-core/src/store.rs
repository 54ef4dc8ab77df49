//! The `LeaveStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `leavebook-store-sqlite`). Higher layers (`leavebook-api`,
//! `leavebook-server`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  admin::{AdminSettings, AdminSettingsUpdate},
  leave::{Decision, LeaveRequest, LeaveRequestEntry, NewLeaveRequest},
  notification::{NewNotification, Notification},
  report::{
    DepartmentStats, LeaveStats, MonthlyTrend, ReportFilter, TopRequester,
    TypeCount,
  },
  settings::NotificationSettings,
  staff::{CreateOutcome, NewStaff, Staff, StaffStats, StaffUpdate},
};

/// Implemented by backend errors so callers can tell domain failures
/// (bad input, unknown ids) apart from storage failures.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The domain failure behind this error, if it is one.
  fn domain(&self) -> Option<&crate::Error>;
}

/// Abstraction over a leavebook storage backend.
///
/// Every mutation that touches more than one row is atomic. Balance columns
/// on staff rows are maintained by the store itself.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait LeaveStore: Send + Sync {
  type Error: StoreError;

  // ── Staff ledger ──────────────────────────────────────────────────────

  /// Create a staff record. Idempotent: when a record with the same id or
  /// email exists it is returned as [`CreateOutcome::Existing`].
  fn create_staff(
    &self,
    input: NewStaff,
  ) -> impl Future<Output = Result<CreateOutcome, Self::Error>> + Send + '_;

  /// Returns `None` if not found.
  fn get_staff<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Staff>, Self::Error>> + Send + 'a;

  /// Login lookup. Returns `None` if not found.
  fn get_staff_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Staff>, Self::Error>> + Send + 'a;

  /// All staff, ordered by name.
  fn list_staff(
    &self,
  ) -> impl Future<Output = Result<Vec<Staff>, Self::Error>> + Send + '_;

  /// Merge `update` into an existing record.
  fn update_staff<'a>(
    &'a self,
    id: &'a str,
    update: StaffUpdate,
  ) -> impl Future<Output = Result<Staff, Self::Error>> + Send + 'a;

  /// Delete a staff record together with its leave requests, notifications
  /// and settings, in one transaction. Returns `false` if the id was
  /// unknown.
  fn delete_staff<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Live balance computed from the staff member's requests.
  fn staff_stats<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<StaffStats, Self::Error>> + Send + 'a;

  // ── Leave request lifecycle ───────────────────────────────────────────

  /// Record a new `Pending` request dated today, refresh the owner's
  /// balance and emit a submission notification.
  fn create_leave_request(
    &self,
    input: NewLeaveRequest,
  ) -> impl Future<Output = Result<LeaveRequest, Self::Error>> + Send + '_;

  /// Returns `None` if not found.
  fn get_leave_request(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<LeaveRequest>, Self::Error>> + Send + '_;

  /// One staff member's requests, or everybody's when `staff_id` is `None`.
  /// Newest application first; ties broken by id ascending.
  fn list_leave_requests<'a>(
    &'a self,
    staff_id: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<LeaveRequestEntry>, Self::Error>> + Send + 'a;

  /// Decide a pending request, refresh the owner's balance and emit a
  /// decision notification.
  ///
  /// Returns an error if the request is unknown or already decided.
  fn update_status(
    &self,
    id: i64,
    decision: Decision,
  ) -> impl Future<Output = Result<LeaveRequest, Self::Error>> + Send + '_;

  // ── Notifications ─────────────────────────────────────────────────────

  fn notify(
    &self,
    input: NewNotification,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_notifications<'a>(
    &'a self,
    staff_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + 'a;

  /// Returns `false` if the id was unknown.
  fn mark_read<'a>(
    &'a self,
    id: &'a str,
    read: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Returns the number of notifications that changed.
  fn mark_all_read<'a>(
    &'a self,
    staff_id: &'a str,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Returns `false` if the id was unknown.
  fn remove_notification<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Settings ──────────────────────────────────────────────────────────

  /// Returns `None` if the staff member never saved preferences.
  fn get_settings<'a>(
    &'a self,
    staff_id: &'a str,
  ) -> impl Future<Output = Result<Option<NotificationSettings>, Self::Error>> + Send + 'a;

  /// Insert or replace a staff member's preferences.
  fn save_settings(
    &self,
    settings: NotificationSettings,
  ) -> impl Future<Output = Result<NotificationSettings, Self::Error>> + Send + '_;

  fn admin_settings(
    &self,
  ) -> impl Future<Output = Result<AdminSettings, Self::Error>> + Send + '_;

  fn save_admin_settings(
    &self,
    update: AdminSettingsUpdate,
  ) -> impl Future<Output = Result<AdminSettings, Self::Error>> + Send + '_;

  /// Restore policy defaults; admin credentials are kept.
  fn reset_admin_settings(
    &self,
  ) -> impl Future<Output = Result<AdminSettings, Self::Error>> + Send + '_;

  // ── Reports ───────────────────────────────────────────────────────────

  /// Dashboard totals. `as_of` selects the "this month" window and
  /// defaults to today.
  fn leave_stats(
    &self,
    as_of: Option<NaiveDate>,
  ) -> impl Future<Output = Result<LeaveStats, Self::Error>> + Send + '_;

  fn leave_type_distribution<'a>(
    &'a self,
    filter: &'a ReportFilter,
  ) -> impl Future<Output = Result<Vec<TypeCount>, Self::Error>> + Send + 'a;

  /// Always twelve entries, January first.
  fn monthly_trend(
    &self,
    year: i32,
  ) -> impl Future<Output = Result<Vec<MonthlyTrend>, Self::Error>> + Send + '_;

  fn department_stats<'a>(
    &'a self,
    filter: &'a ReportFilter,
  ) -> impl Future<Output = Result<Vec<DepartmentStats>, Self::Error>> + Send + 'a;

  fn top_requesters<'a>(
    &'a self,
    filter: &'a ReportFilter,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<TopRequester>, Self::Error>> + Send + 'a;
}
