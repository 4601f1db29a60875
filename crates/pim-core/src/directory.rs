//! The `PimDirectory` trait and the session it is driven with.
//!
//! The trait is implemented by service backends (e.g. `pim-graph`). The
//! driver depends on this abstraction only, so it can be exercised against an
//! in-memory directory in tests.

use std::{fmt, future::Future};

use crate::{
  model::{
    ActivationSubmission, DirectoryUser, PrivilegedResource, RoleAssignmentRequest,
    RoleDefinition,
  },
  request::{ResourceFilter, RoleName},
};

// ─── Session ─────────────────────────────────────────────────────────────────

/// Credentials for one run, passed explicitly into every directory call.
#[derive(Clone)]
pub struct Session {
  access_token: String,
  account:      Option<String>,
}

impl Session {
  pub fn new(access_token: impl Into<String>) -> Self {
    Self {
      access_token: access_token.into(),
      account:      None,
    }
  }

  /// Record the principal name the token was issued to.
  pub fn with_account(mut self, account: impl Into<String>) -> Self {
    self.account = Some(account.into());
    self
  }

  pub fn access_token(&self) -> &str { &self.access_token }

  pub fn account(&self) -> Option<&str> { self.account.as_deref() }
}

impl fmt::Debug for Session {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Session")
      .field("access_token", &"<redacted>")
      .field("account", &self.account)
      .finish()
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// The identity / PIM service an activation is driven against.
///
/// Lookups return every match; deciding that exactly one is acceptable is the
/// caller's job.
pub trait PimDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Sign in as `username` and return a session for the remaining calls.
  fn authenticate<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + 'a;

  /// Users whose principal name equals `principal_name`.
  fn find_users<'a>(
    &'a self,
    session: &'a Session,
    principal_name: &'a str,
  ) -> impl Future<Output = Result<Vec<DirectoryUser>, Self::Error>> + Send + 'a;

  /// Privileged resources matching `filter`, compared as given.
  fn find_privileged_resources<'a>(
    &'a self,
    session: &'a Session,
    filter: &'a ResourceFilter,
  ) -> impl Future<Output = Result<Vec<PrivilegedResource>, Self::Error>> + Send + 'a;

  /// Role definitions of `resource_id` whose display name is `role`.
  fn find_role_definitions<'a>(
    &'a self,
    session: &'a Session,
    resource_id: &'a str,
    role: RoleName,
  ) -> impl Future<Output = Result<Vec<RoleDefinition>, Self::Error>> + Send + 'a;

  /// Submit a role assignment request and return the service's record of it.
  fn submit_activation<'a>(
    &'a self,
    session: &'a Session,
    submission: &'a ActivationSubmission,
  ) -> impl Future<Output = Result<RoleAssignmentRequest, Self::Error>> + Send + 'a;
}
