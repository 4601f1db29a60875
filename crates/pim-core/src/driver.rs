//! The activation driver.
//!
//! Runs the fixed sequence authenticate → user → resource → schedule → role
//! definition → submit. Each step depends on the one before it; the first
//! failure ends the run and nothing after it is attempted.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  directory::{PimDirectory, Session},
  error::{LookupFailure, LookupTarget},
  model::{ActivationSubmission, RoleAssignmentRequest},
  request::ActivationRequest,
  schedule::Schedule,
  single::exactly_one,
};

// ─── Login ───────────────────────────────────────────────────────────────────

/// How the run obtains its session.
#[derive(Debug, Clone)]
pub enum Login {
  /// Sign in through the directory as the requesting user.
  Interactive,
  /// Reuse a session acquired elsewhere; no authentication call is made.
  Skip(Session),
}

impl Login {
  /// Build a skipped login from a pre-acquired access token.
  pub fn skip_with(access_token: Option<String>) -> Result<Self> {
    match access_token.filter(|t| !t.trim().is_empty()) {
      Some(token) => Ok(Self::Skip(Session::new(token.trim()))),
      None => Err(Error::invalid(
        "skipping login requires a pre-acquired access token",
      )),
    }
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outcome {
  /// The service accepted the request.
  Submitted(RoleAssignmentRequest),
  /// Everything was resolved but, as asked, nothing was sent.
  DryRun(ActivationSubmission),
}

// ─── Driver ──────────────────────────────────────────────────────────────────

pub struct Activation<'d, D> {
  directory: &'d D,
  dry_run:   bool,
}

impl<'d, D: PimDirectory> Activation<'d, D> {
  pub fn new(directory: &'d D) -> Self {
    Self {
      directory,
      dry_run: false,
    }
  }

  /// Stop after resolving the submission instead of sending it.
  pub fn dry_run(mut self, dry_run: bool) -> Self {
    self.dry_run = dry_run;
    self
  }

  pub async fn run(&self, request: &ActivationRequest, login: Login) -> Result<Outcome> {
    let session = match login {
      Login::Skip(session) => {
        debug!("login skipped; using supplied session");
        session
      }
      Login::Interactive => self.authenticate(&request.username).await?,
    };

    let user = settle(
      LookupTarget::User,
      &request.username,
      self.directory.find_users(&session, &request.username).await,
    )?;
    info!(user_id = %user.id, "resolved user");

    let filter = request.resource_filter();
    let resource = settle(
      LookupTarget::Resource,
      &filter.display_name,
      self
        .directory
        .find_privileged_resources(&session, &filter)
        .await,
    )?;
    info!(resource_id = %resource.id, resource_type = %filter.resource_type, "resolved resource");

    let schedule = Schedule::starting_now(request.request_length);
    debug!(
      start = %schedule.start_date_time,
      end = %schedule.end_date_time,
      "built schedule"
    );

    let role = settle(
      LookupTarget::RoleDefinition,
      request.role.as_str(),
      self
        .directory
        .find_role_definitions(&session, &resource.id, request.role)
        .await,
    )?;
    info!(role_definition_id = %role.id, "resolved role definition");

    let submission =
      ActivationSubmission::activate(&user, &resource, &role, schedule, &request.reason);

    if self.dry_run {
      info!("dry run; activation request not submitted");
      return Ok(Outcome::DryRun(submission));
    }

    let record = self
      .directory
      .submit_activation(&session, &submission)
      .await
      .map_err(|e| {
        warn!(error = %e, "activation request failed");
        Error::Submission(Box::new(e))
      })?;
    info!(request_id = %record.id, "activation request submitted");

    Ok(Outcome::Submitted(record))
  }

  async fn authenticate(&self, username: &str) -> Result<Session> {
    let session = self.directory.authenticate(username).await.map_err(|e| {
      warn!(%username, error = %e, "authentication failed");
      Error::Authentication {
        username: username.to_owned(),
        source:   Box::new(e),
      }
    })?;
    info!(%username, "authenticated");
    Ok(session)
  }
}

/// Turn a lookup call's result into its single record.
fn settle<T, E>(
  target: LookupTarget,
  query: &str,
  found: std::result::Result<Vec<T>, E>,
) -> Result<T>
where
  E: std::error::Error + Send + Sync + 'static,
{
  found
    .map_err(|e| LookupFailure::Service(Box::new(e)))
    .and_then(|items| exactly_one(items).map_err(LookupFailure::from))
    .map_err(|source| {
      let detail = std::error::Error::source(&source).map(ToString::to_string);
      warn!(%target, query, error = %source, ?detail, "lookup failed");
      Error::Lookup {
        target,
        query: query.to_owned(),
        source,
      }
    })
}
