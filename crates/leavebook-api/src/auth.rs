//! Argon2 password scheme and the `POST /auth/login` handler.
//!
//! Login only checks credentials; no token or session is issued.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use leavebook_core::{password::PasswordScheme, store::LeaveStore};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

/// Id reported for the administrator, who has no staff row.
pub const ADMIN_USER_ID: &str = "admin";

// ─── Password scheme ──────────────────────────────────────────────────────────

/// Salted argon2id hashes stored as PHC strings (`$argon2id$v=19$…`).
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Scheme;

impl PasswordScheme for Argon2Scheme {
  fn hash(&self, plain: &str) -> leavebook_core::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(plain.as_bytes(), &salt)
      .map(|hash| hash.to_string())
      .map_err(|e| leavebook_core::Error::PasswordHash(e.to_string()))
  }

  fn verify(&self, plain: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|parsed| {
      Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
    })
  }
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
  /// `staff` or `admin`.
  #[serde(default)]
  pub role:     String,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
  pub id:         String,
  pub name:       String,
  pub email:      String,
  pub role:       &'static str,
  pub department: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub success: bool,
  pub user:    LoginUser,
}

/// `POST /auth/login`, body: `{"email":…,"password":…,"role":"staff"|"admin"}`
pub async fn login<S>(
  State(state): State<ApiState<S>>,
  payload: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Json(body) = payload?;

  let user = match body.role.as_str() {
    "staff" => login_staff(&state, &body).await?,
    "admin" => login_admin(&state, &body).await?,
    _ => None,
  };

  match user {
    Some(user) => {
      tracing::info!(user = %user.id, role = user.role, "login");
      Ok(Json(LoginResponse { success: true, user }))
    }
    None => {
      tracing::warn!(email = %body.email, role = %body.role, "rejected login");
      Err(ApiError::Unauthorized)
    }
  }
}

async fn login_staff<S>(
  state: &ApiState<S>,
  body: &LoginBody,
) -> Result<Option<LoginUser>, ApiError>
where
  S: LeaveStore + 'static,
{
  let Some(staff) = state
    .store
    .get_staff_by_email(&body.email)
    .await
    .map_err(ApiError::from_store)?
  else {
    return Ok(None);
  };

  let verified = staff
    .password_hash
    .as_deref()
    .is_some_and(|stored| state.passwords.verify(&body.password, stored));
  if !verified {
    return Ok(None);
  }

  Ok(Some(LoginUser {
    id:         staff.id,
    name:       staff.name,
    email:      staff.email,
    role:       "staff",
    department: staff.department,
  }))
}

async fn login_admin<S>(
  state: &ApiState<S>,
  body: &LoginBody,
) -> Result<Option<LoginUser>, ApiError>
where
  S: LeaveStore + 'static,
{
  let settings = state
    .store
    .admin_settings()
    .await
    .map_err(ApiError::from_store)?;

  if !settings.admin_email.eq_ignore_ascii_case(body.email.trim()) {
    return Ok(None);
  }
  let verified = settings
    .admin_password_hash
    .as_deref()
    .is_some_and(|stored| state.passwords.verify(&body.password, stored));
  if !verified {
    return Ok(None);
  }

  Ok(Some(LoginUser {
    id:         ADMIN_USER_ID.to_owned(),
    name:       "Administrator".to_owned(),
    email:      settings.admin_email,
    role:       "admin",
    department: "Administration".to_owned(),
  }))
}
