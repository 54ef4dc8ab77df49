//! Wiring for the leavebook server binary: configuration, admin seeding and
//! the HTTP application.

use std::path::{Path, PathBuf};

use axum::Router;
use leavebook_api::{ApiState, api_router};
use leavebook_core::{admin::AdminSettingsUpdate, store::LeaveStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, read from `leavebook.toml` and `LEAVEBOOK_*`
/// environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  /// Written to the admin credentials at startup when set.
  pub admin_email:         Option<String>,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub admin_password_hash: Option<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_owned(),
      port:                8080,
      store_path:          PathBuf::from("leavebook.db"),
      admin_email:         None,
      admin_password_hash: None,
    }
  }
}

impl ServerConfig {
  /// Layer the optional file at `path` under the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("LEAVEBOOK").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Startup ──────────────────────────────────────────────────────────────────

/// Copy admin credentials from the configuration into the store. Values from
/// the configuration replace stored ones; absent values leave them alone.
pub async fn seed_admin<S: LeaveStore>(store: &S, config: &ServerConfig) -> Result<(), S::Error> {
  if config.admin_email.is_none() && config.admin_password_hash.is_none() {
    return Ok(());
  }

  let settings = store
    .save_admin_settings(AdminSettingsUpdate {
      admin_email: config.admin_email.clone(),
      admin_password_hash: config.admin_password_hash.clone(),
      ..Default::default()
    })
    .await?;
  tracing::info!(admin_email = %settings.admin_email, "seeded admin credentials");
  Ok(())
}

/// The full HTTP application: the API under `/api` with request tracing.
pub fn app<S>(state: ApiState<S>) -> Router
where
  S: LeaveStore + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{body::Body, http::Request};
  use leavebook_api::Argon2Scheme;
  use leavebook_core::password::PasswordScheme;
  use leavebook_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let path = std::env::temp_dir().join("leavebook-no-such-config.toml");
    let config = ServerConfig::load(&path).unwrap();
    assert_eq!(config.address(), "127.0.0.1:8080");
    assert_eq!(config.store_path, PathBuf::from("leavebook.db"));
    assert!(config.admin_password_hash.is_none());
  }

  #[test]
  fn file_values_override_defaults() {
    let path = std::env::temp_dir().join(format!("leavebook-{}.toml", std::process::id()));
    std::fs::write(&path, "port = 9090\nstore_path = \"/tmp/leave.db\"\n").unwrap();
    let config = ServerConfig::load(&path);
    std::fs::remove_file(&path).ok();

    let config = config.unwrap();
    assert_eq!(config.port, 9090);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.store_path, PathBuf::from("/tmp/leave.db"));
  }

  #[test]
  fn tilde_only_expands_at_start() {
    assert_eq!(expand_tilde(Path::new("/var/db/x.db")), PathBuf::from("/var/db/x.db"));
    assert_eq!(expand_tilde(Path::new("data/~/x.db")), PathBuf::from("data/~/x.db"));
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/x.db")), PathBuf::from(home).join("x.db"));
    }
  }

  #[tokio::test]
  async fn seeding_sets_credentials() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let hash = Argon2Scheme.hash("s3cret").unwrap();
    let config = ServerConfig {
      admin_email: Some("registrar@university.edu".into()),
      admin_password_hash: Some(hash.clone()),
      ..Default::default()
    };

    seed_admin(&store, &config).await.unwrap();

    let settings = store.admin_settings().await.unwrap();
    assert_eq!(settings.admin_email, "registrar@university.edu");
    assert_eq!(settings.admin_password_hash, Some(hash));
    assert_eq!(settings.institution_name, "University");
  }

  #[tokio::test]
  async fn seeding_without_credentials_is_a_no_op() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    seed_admin(&store, &ServerConfig::default()).await.unwrap();
    assert!(store.admin_settings().await.unwrap().admin_password_hash.is_none());
  }

  #[tokio::test]
  async fn app_serves_api_under_prefix() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = app(ApiState::new(Arc::new(store), Arc::new(Argon2Scheme)));

    let resp = app
      .clone()
      .oneshot(Request::get("/api/staff").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
      .oneshot(Request::get("/staff").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), 404);
  }
}
