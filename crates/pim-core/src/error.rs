//! Error types for `pim-core`.

use std::fmt;

use thiserror::Error;

use crate::single::CountMismatch;

/// A boxed error coming from a [`PimDirectory`](crate::directory::PimDirectory)
/// implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// Rejected before any remote call was made.
  #[error("invalid request: {0}")]
  InvalidRequest(String),

  #[error("authentication failed for {username}")]
  Authentication {
    username: String,
    #[source]
    source:   BoxError,
  },

  #[error("{target} lookup for {query:?} failed")]
  Lookup {
    target: LookupTarget,
    query:  String,
    #[source]
    source: LookupFailure,
  },

  #[error("activation request was not accepted")]
  Submission(#[source] BoxError),
}

impl Error {
  pub(crate) fn invalid(msg: impl Into<String>) -> Self {
    Self::InvalidRequest(msg.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Lookups ─────────────────────────────────────────────────────────────────

/// Which of the three lookups failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTarget {
  User,
  Resource,
  RoleDefinition,
}

impl fmt::Display for LookupTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::User => "user",
      Self::Resource => "resource",
      Self::RoleDefinition => "role definition",
    })
  }
}

/// Why a lookup did not yield exactly one record.
#[derive(Debug, Error)]
pub enum LookupFailure {
  #[error(transparent)]
  Count(#[from] CountMismatch),

  #[error("directory service error")]
  Service(#[source] BoxError),
}

impl LookupFailure {
  /// Number of matches the service returned, if the call itself succeeded.
  pub fn found(&self) -> Option<usize> {
    match self {
      Self::Count(mismatch) => Some(mismatch.found),
      Self::Service(_) => None,
    }
  }
}
