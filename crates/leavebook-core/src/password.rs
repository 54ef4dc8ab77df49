//! Password verification capability used at the login boundary.

use crate::Result;

/// Hashes and verifies passwords. Stored values are opaque to callers.
pub trait PasswordScheme: Send + Sync {
  /// Produce a salted hash suitable for storage.
  fn hash(&self, plain: &str) -> Result<String>;

  /// Whether `plain` matches `stored`. Malformed stored values never match.
  fn verify(&self, plain: &str, stored: &str) -> bool;
}
