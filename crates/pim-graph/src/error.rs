//! Error type for `pim-graph`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// Graph answered with a non-success status.
  #[error("graph returned {status}: {code}: {message}")]
  Api {
    status:  StatusCode,
    code:    String,
    message: String,
  },

  /// The identity platform rejected the sign-in.
  #[error("sign-in failed: {code}: {description}")]
  OAuth { code: String, description: String },

  #[error("device code expired before sign-in completed")]
  DeviceCodeExpired,

  #[error("signed in as {actual}, expected {expected}")]
  AccountMismatch { expected: String, actual: String },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
