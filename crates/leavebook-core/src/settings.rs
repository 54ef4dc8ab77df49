//! Per-staff notification preferences, keyed 1:1 by staff id.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
  pub staff_id:            String,
  pub email_notifications: bool,
  /// In-app notifications; when off, leave events write nothing.
  pub push_notifications:  bool,
  pub leave_reminders:     bool,
  /// Notifications about approval and rejection decisions.
  pub approval_updates:    bool,
}

impl NotificationSettings {
  /// Preferences of a staff member who never saved any.
  pub fn defaults_for(staff_id: impl Into<String>) -> Self {
    Self {
      staff_id:            staff_id.into(),
      email_notifications: true,
      push_notifications:  true,
      leave_reminders:     true,
      approval_updates:    true,
    }
  }

  pub fn wants_submission_notices(&self) -> bool { self.push_notifications }

  pub fn wants_decision_notices(&self) -> bool {
    self.push_notifications && self.approval_updates
  }
}
