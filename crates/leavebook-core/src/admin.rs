//! Institution-wide policy knobs and the admin login.
//!
//! Persisted as a key/value table; missing keys read as their defaults.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, error::require};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSettings {
  pub institution_name:       String,
  pub admin_email:            String,
  /// Suggested entitlement for new staff; the UI pre-fills it.
  pub default_total_leave:    i64,
  /// Upper bound on `days` for a single request.
  pub max_consecutive_days:   i64,
  /// When false, a request may not exceed the remaining balance.
  pub allow_negative_balance: bool,
  /// Argon2 PHC string for the admin login; never serialised.
  #[serde(skip)]
  pub admin_password_hash:    Option<String>,
}

impl Default for AdminSettings {
  fn default() -> Self {
    Self {
      institution_name:       "University".into(),
      admin_email:            "admin@university.edu".into(),
      default_total_leave:    20,
      max_consecutive_days:   30,
      allow_negative_balance: false,
      admin_password_hash:    None,
    }
  }
}

impl AdminSettings {
  /// The policy defaults, keeping this instance's admin credentials.
  pub fn reset(&self) -> Self {
    Self {
      admin_email: self.admin_email.clone(),
      admin_password_hash: self.admin_password_hash.clone(),
      ..Self::default()
    }
  }
}

/// A partial update of [`AdminSettings`].
#[derive(Debug, Clone, Default)]
pub struct AdminSettingsUpdate {
  pub institution_name:       Option<String>,
  pub admin_email:            Option<String>,
  pub default_total_leave:    Option<i64>,
  pub max_consecutive_days:   Option<i64>,
  pub allow_negative_balance: Option<bool>,
  pub admin_password_hash:    Option<String>,
}

impl AdminSettingsUpdate {
  pub fn validate(&self) -> Result<()> {
    if let Some(v) = &self.institution_name {
      require("institutionName", v)?;
    }
    if let Some(v) = &self.admin_email {
      require("adminEmail", v)?;
    }
    if self.default_total_leave.is_some_and(|n| n < 0) {
      return Err(Error::Validation(
        "defaultTotalLeave must not be negative".into(),
      ));
    }
    if self.max_consecutive_days.is_some_and(|n| n < 1) {
      return Err(Error::Validation(
        "maxConsecutiveDays must be at least 1".into(),
      ));
    }
    Ok(())
  }

  pub fn apply_to(self, settings: &mut AdminSettings) {
    if let Some(v) = self.institution_name {
      settings.institution_name = v;
    }
    if let Some(v) = self.admin_email {
      settings.admin_email = v;
    }
    if let Some(v) = self.default_total_leave {
      settings.default_total_leave = v;
    }
    if let Some(v) = self.max_consecutive_days {
      settings.max_consecutive_days = v;
    }
    if let Some(v) = self.allow_negative_balance {
      settings.allow_negative_balance = v;
    }
    if let Some(v) = self.admin_password_hash {
      settings.admin_password_hash = Some(v);
    }
  }
}
