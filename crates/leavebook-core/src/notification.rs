//! In-app notifications.
//!
//! Only `type`, `message`, `created_at` and `read` are stored. The title,
//! link and relative time shown to users are derived on read by
//! [`present`].

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  error::require,
  leave::{LeaveRequest, LeaveStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
  Leave,
  System,
  Alert,
}

impl NotificationType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Leave => "leave",
      Self::System => "system",
      Self::Alert => "alert",
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      Self::Leave => "Leave Update",
      Self::System => "System Notice",
      Self::Alert => "Alert",
    }
  }

  pub fn link(self) -> &'static str {
    match self {
      Self::Leave => "/leave-history",
      Self::System => "/notifications",
      Self::Alert => "/dashboard",
    }
  }
}

impl fmt::Display for NotificationType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for NotificationType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "leave" => Ok(Self::Leave),
      "system" => Ok(Self::System),
      "alert" => Ok(Self::Alert),
      other => Err(Error::UnknownNotificationType(other.to_owned())),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
  pub id:         String,
  pub staff_id:   String,
  #[serde(rename = "type")]
  pub kind:       NotificationType,
  pub message:    String,
  pub created_at: DateTime<Utc>,
  pub read:       bool,
}

/// Input to [`crate::store::LeaveStore::notify`].
#[derive(Debug, Clone)]
pub struct NewNotification {
  pub staff_id: String,
  pub kind:     NotificationType,
  pub message:  String,
}

impl NewNotification {
  pub fn validate(&self) -> Result<()> {
    require("staffId", &self.staff_id)?;
    require("message", &self.message)
  }
}

// ─── Presentation ────────────────────────────────────────────────────────────

/// A notification with its display fields filled in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
  #[serde(flatten)]
  pub notification:  Notification,
  pub title:         &'static str,
  pub link:          &'static str,
  pub relative_time: String,
}

pub fn present(notification: Notification, now: DateTime<Utc>) -> NotificationView {
  let relative_time = relative_time(notification.created_at, now);
  NotificationView {
    title: notification.kind.title(),
    link: notification.kind.link(),
    relative_time,
    notification,
  }
}

fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let elapsed = now.signed_duration_since(then);
  let (n, unit) = if elapsed.num_minutes() < 1 {
    return "just now".to_owned();
  } else if elapsed.num_hours() < 1 {
    (elapsed.num_minutes(), "minute")
  } else if elapsed.num_days() < 1 {
    (elapsed.num_hours(), "hour")
  } else {
    (elapsed.num_days(), "day")
  };
  let plural = if n == 1 { "" } else { "s" };
  format!("{n} {unit}{plural} ago")
}

// ─── Leave-event messages ────────────────────────────────────────────────────

pub fn leave_submitted(request: &LeaveRequest) -> String {
  format!(
    "Your {} request for {} day(s) from {} to {} has been submitted.",
    request.leave_type, request.days, request.start_date, request.end_date
  )
}

/// Message for a decided request; `None` while it is still pending.
pub fn leave_decided(request: &LeaveRequest) -> Option<String> {
  let verb = match request.status {
    LeaveStatus::Pending => return None,
    LeaveStatus::Approved => "approved",
    LeaveStatus::Rejected => "rejected",
  };
  let mut message = format!(
    "Your {} request from {} to {} has been {verb}.",
    request.leave_type, request.start_date, request.end_date
  );
  if let Some(reason) = request.rejected_reason.as_deref().filter(|r| !r.trim().is_empty()) {
    message.push_str(&format!(" Reason: {reason}"));
  }
  Some(message)
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, NaiveDate};

  use super::*;
  use crate::leave::LeaveType;

  fn notification(created_at: DateTime<Utc>) -> Notification {
    Notification {
      id: "n1".into(),
      staff_id: "s1".into(),
      kind: NotificationType::Leave,
      message: "hello".into(),
      created_at,
      read: false,
    }
  }

  #[test]
  fn relative_time_buckets() {
    let now = Utc::now();
    let cases = [
      (Duration::seconds(20), "just now"),
      (Duration::minutes(1), "1 minute ago"),
      (Duration::minutes(42), "42 minutes ago"),
      (Duration::hours(1), "1 hour ago"),
      (Duration::hours(23), "23 hours ago"),
      (Duration::days(3), "3 days ago"),
    ];
    for (ago, expected) in cases {
      assert_eq!(relative_time(now - ago, now), expected);
    }
  }

  #[test]
  fn present_derives_display_fields_from_type() {
    let now = Utc::now();
    let mut n = notification(now - Duration::hours(2));
    n.kind = NotificationType::Alert;
    let view = present(n, now);
    assert_eq!(view.title, "Alert");
    assert_eq!(view.link, "/dashboard");
    assert_eq!(view.relative_time, "2 hours ago");

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["type"], "alert");
    assert_eq!(json["relativeTime"], "2 hours ago");
    assert_eq!(json["staffId"], "s1");
  }

  #[test]
  fn rejection_message_carries_the_reason() {
    let d = |s: &str| s.parse::<NaiveDate>().unwrap();
    let mut request = LeaveRequest {
      id:              1,
      staff_id:        "s1".into(),
      leave_type:      LeaveType::Study,
      start_date:      d("2026-05-04"),
      end_date:        d("2026-05-08"),
      days:            5,
      reason:          "conference".into(),
      status:          LeaveStatus::Pending,
      applied_date:    d("2026-04-01"),
      approved_by:     None,
      approved_date:   None,
      rejected_reason: None,
    };
    assert!(leave_decided(&request).is_none());

    request.status = LeaveStatus::Rejected;
    request.rejected_reason = Some("exam period".into());
    assert_eq!(
      leave_decided(&request).unwrap(),
      "Your Study Leave request from 2026-05-04 to 2026-05-08 has been rejected. Reason: exam period"
    );
  }
}
