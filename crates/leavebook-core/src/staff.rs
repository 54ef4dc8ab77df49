//! Staff records and their leave balances.
//!
//! `used_leave` and `pending_leave` are bookkeeping columns owned by the
//! store: they are recomputed from the leave requests whenever a request is
//! created or decided, so callers never write them directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, error::require};

// ─── Staff ───────────────────────────────────────────────────────────────────

/// A university employee with a leave entitlement and a login identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
  pub id:              String,
  pub name:            String,
  pub email:           String,
  pub department:      String,
  pub position:        String,
  pub phone:           Option<String>,
  /// Argon2 PHC string; never leaves the server.
  #[serde(skip)]
  pub password_hash:   Option<String>,
  pub total_leave:     i64,
  pub used_leave:      i64,
  pub pending_leave:   i64,
  // Itemized entitlements recorded at creation; informational only.
  pub annual_leave:    Option<i64>,
  pub sick_leave:      Option<i64>,
  pub maternity_leave: Option<i64>,
  pub paternity_leave: Option<i64>,
  pub emergency_leave: Option<i64>,
  pub created_at:      DateTime<Utc>,
}

// ─── NewStaff ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::LeaveStore::create_staff`].
///
/// `total_leave` is optional here only so that a missing value can be
/// reported as a validation failure instead of a deserialisation error.
#[derive(Debug, Clone, Default)]
pub struct NewStaff {
  /// Caller-supplied id; a UUID is generated when absent.
  pub id:              Option<String>,
  pub name:            String,
  pub email:           String,
  pub department:      String,
  pub position:        String,
  pub phone:           Option<String>,
  pub password_hash:   Option<String>,
  pub total_leave:     Option<i64>,
  pub annual_leave:    Option<i64>,
  pub sick_leave:      Option<i64>,
  pub maternity_leave: Option<i64>,
  pub paternity_leave: Option<i64>,
  pub emergency_leave: Option<i64>,
}

impl NewStaff {
  pub fn validate(&self) -> Result<()> {
    require("name", &self.name)?;
    require("email", &self.email)?;
    require("department", &self.department)?;
    require("position", &self.position)?;
    if let Some(id) = &self.id {
      require("id", id)?;
    }
    match self.total_leave {
      None => Err(Error::Validation("totalLeave is required".into())),
      Some(n) if n < 0 => {
        Err(Error::Validation("totalLeave must not be negative".into()))
      }
      Some(_) => Ok(()),
    }
  }
}

/// Result of [`crate::store::LeaveStore::create_staff`]: creation is
/// idempotent by id and by email.
#[derive(Debug, Clone)]
pub enum CreateOutcome {
  Created(Staff),
  /// A record with the same id or email already existed; nothing was
  /// inserted.
  Existing(Staff),
}

impl CreateOutcome {
  pub fn is_created(&self) -> bool { matches!(self, Self::Created(_)) }

  pub fn into_staff(self) -> Staff {
    match self {
      Self::Created(s) | Self::Existing(s) => s,
    }
  }
}

// ─── StaffUpdate ─────────────────────────────────────────────────────────────

/// A partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct StaffUpdate {
  pub name:          Option<String>,
  pub email:         Option<String>,
  pub department:    Option<String>,
  pub position:      Option<String>,
  pub phone:         Option<String>,
  pub password_hash: Option<String>,
  pub total_leave:   Option<i64>,
}

impl StaffUpdate {
  pub fn validate(&self) -> Result<()> {
    let fields = [
      ("name", &self.name),
      ("email", &self.email),
      ("department", &self.department),
      ("position", &self.position),
    ];
    for (field, value) in fields {
      if let Some(v) = value {
        require(field, v)?;
      }
    }
    if self.total_leave.is_some_and(|n| n < 0) {
      return Err(Error::Validation("totalLeave must not be negative".into()));
    }
    Ok(())
  }

  /// Merge the supplied fields into `staff`.
  pub fn apply_to(self, staff: &mut Staff) {
    if let Some(v) = self.name {
      staff.name = v;
    }
    if let Some(v) = self.email {
      staff.email = v;
    }
    if let Some(v) = self.department {
      staff.department = v;
    }
    if let Some(v) = self.position {
      staff.position = v;
    }
    if let Some(v) = self.phone {
      staff.phone = Some(v);
    }
    if let Some(v) = self.password_hash {
      staff.password_hash = Some(v);
    }
    if let Some(v) = self.total_leave {
      staff.total_leave = v;
    }
  }
}

// ─── StaffStats ──────────────────────────────────────────────────────────────

/// Derived leave balance for one staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffStats {
  pub total_leave:     i64,
  pub used_leave:      i64,
  pub pending_leave:   i64,
  /// `total - used - pending`; pending days are already spoken for.
  pub remaining_leave: i64,
}

impl StaffStats {
  pub fn new(total_leave: i64, used_leave: i64, pending_leave: i64) -> Self {
    Self {
      total_leave,
      used_leave,
      pending_leave,
      remaining_leave: total_leave - used_leave - pending_leave,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_staff() -> NewStaff {
    NewStaff {
      name: "Ada Lovelace".into(),
      email: "ada@uni.edu".into(),
      department: "Mathematics".into(),
      position: "Lecturer".into(),
      total_leave: Some(20),
      ..Default::default()
    }
  }

  #[test]
  fn complete_input_validates() {
    assert!(new_staff().validate().is_ok());
  }

  #[test]
  fn blank_required_field_is_rejected() {
    let mut input = new_staff();
    input.department = "   ".into();
    let err = input.validate().unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m.contains("department")));
  }

  #[test]
  fn missing_total_leave_is_rejected() {
    let mut input = new_staff();
    input.total_leave = None;
    assert!(matches!(input.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn remaining_subtracts_pending() {
    let stats = StaffStats::new(20, 5, 3);
    assert_eq!(stats.remaining_leave, 12);
  }

  #[test]
  fn update_merges_only_supplied_fields() {
    let mut staff = Staff {
      id:              "s1".into(),
      name:            "Ada".into(),
      email:           "ada@uni.edu".into(),
      department:      "Mathematics".into(),
      position:        "Lecturer".into(),
      phone:           None,
      password_hash:   None,
      total_leave:     20,
      used_leave:      2,
      pending_leave:   1,
      annual_leave:    None,
      sick_leave:      None,
      maternity_leave: None,
      paternity_leave: None,
      emergency_leave: None,
      created_at:      Utc::now(),
    };
    StaffUpdate {
      position: Some("Senior Lecturer".into()),
      total_leave: Some(25),
      ..Default::default()
    }
    .apply_to(&mut staff);

    assert_eq!(staff.position, "Senior Lecturer");
    assert_eq!(staff.total_leave, 25);
    assert_eq!(staff.name, "Ada");
    assert_eq!(staff.used_leave, 2);
  }

  #[test]
  fn password_hash_is_never_serialised() {
    let staff = Staff {
      id:              "s1".into(),
      name:            "Ada".into(),
      email:           "ada@uni.edu".into(),
      department:      "Mathematics".into(),
      position:        "Lecturer".into(),
      phone:           None,
      password_hash:   Some("$argon2id$secret".into()),
      total_leave:     20,
      used_leave:      0,
      pending_leave:   0,
      annual_leave:    Some(15),
      sick_leave:      None,
      maternity_leave: None,
      paternity_leave: None,
      emergency_leave: None,
      created_at:      Utc::now(),
    };
    let json = serde_json::to_value(&staff).unwrap();
    assert!(json.get("passwordHash").is_none());
    assert_eq!(json["totalLeave"], 20);
    assert_eq!(json["annualLeave"], 15);
  }
}
