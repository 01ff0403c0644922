//! HTTP Basic-auth extractor for admin routes, and the Easter-egg password
//! check.
//!
//! Both secrets are argon2 PHC strings from configuration. Neither is a
//! security boundary for the engine itself.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use ludz_core::store::StagStore;

use crate::{AppState, error::Error};

/// Secrets accepted by this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub admin_username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub admin_password_hash: String,
  /// PHC string of the upper-cased Easter-egg password.
  pub egg_password_hash:   String,
}

/// Zero-size marker: present in the handler means the request came from the
/// admin.
pub struct Admin;

fn verify_password(password: &str, phc: &str) -> Result<(), Error> {
  let parsed_hash = PasswordHash::new(phc).map_err(|_| Error::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)
}

/// Verify admin credentials directly from headers.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  if username != config.admin_username {
    return Err(Error::Unauthorized);
  }

  verify_password(password, &config.admin_password_hash)
}

/// Check a guess at the Easter-egg password. Case-insensitive: the guess is
/// upper-cased before comparison.
pub fn verify_egg_password(guess: &str, config: &AuthConfig) -> Result<(), Error> {
  verify_password(&guess.trim().to_uppercase(), &config.egg_password_hash)
}

impl<S> FromRequestParts<AppState<S>> for Admin
where
  S: StagStore + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_auth(&parts.headers, &state.auth)?;
    Ok(Admin)
  }
}
