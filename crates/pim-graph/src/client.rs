//! Async HTTP client for the Graph directory and PIM endpoints.

use pim_core::{
  directory::{PimDirectory, Session},
  model::{
    ActivationSubmission, DirectoryUser, PrivilegedResource, RoleAssignmentRequest,
    RoleDefinition,
  },
  request::{ResourceFilter, RoleName},
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
  Error, Result, auth,
  config::GraphConfig,
  odata::{self, ErrorEnvelope, Page},
};

const AZURE_RESOURCES: &str = "/beta/privilegedAccess/azureResources";

/// Graph-backed [`PimDirectory`].
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GraphClient {
  pub(crate) http:   Client,
  pub(crate) config: GraphConfig,
}

impl GraphClient {
  pub fn new(config: GraphConfig) -> Result<Self> {
    let http = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { http, config })
  }

  pub(crate) fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.graph_url.trim_end_matches('/'), path)
  }

  /// The signed-in user behind `access_token`.
  pub(crate) async fn me(&self, access_token: &str) -> Result<DirectoryUser> {
    let resp = self
      .http
      .get(self.url("/v1.0/me"))
      .bearer_auth(access_token)
      .query(&[("$select", "id,userPrincipalName,displayName")])
      .send()
      .await?;
    read(resp).await
  }

  /// GET a filtered collection, following `@odata.nextLink` to the end.
  async fn collect<T: DeserializeOwned>(
    &self,
    session: &Session,
    path: &str,
    filter: String,
    select: Option<&str>,
  ) -> Result<Vec<T>> {
    debug!(%path, %filter, "graph query");
    let mut query = vec![("$filter", filter)];
    if let Some(select) = select {
      query.push(("$select", select.to_string()));
    }

    let first = self
      .http
      .get(self.url(path))
      .bearer_auth(session.access_token())
      .query(&query)
      .send()
      .await?;
    let mut page: Page<T> = read(first).await?;
    let mut items = std::mem::take(&mut page.value);

    while let Some(next) = page.next_link.take() {
      debug!(%next, "following next link");
      let resp = self
        .http
        .get(next)
        .bearer_auth(session.access_token())
        .send()
        .await?;
      page = read(resp).await?;
      items.append(&mut page.value);
    }
    Ok(items)
  }
}

/// Decode a success body, or turn an error status into [`Error::Api`].
pub(crate) async fn read<T: DeserializeOwned>(resp: Response) -> Result<T> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp.json().await?);
  }

  let body = resp.text().await?;
  let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&body) {
    Ok(envelope) => (envelope.error.code, envelope.error.message),
    Err(_) => (
      status.canonical_reason().unwrap_or("Error").to_string(),
      body,
    ),
  };
  Err(Error::Api {
    status,
    code,
    message,
  })
}

impl PimDirectory for GraphClient {
  type Error = Error;

  async fn authenticate(&self, username: &str) -> Result<Session> {
    let token = auth::device_code_login(&self.http, &self.config).await?;
    let me = self.me(&token).await?;
    if !me.user_principal_name.eq_ignore_ascii_case(username) {
      return Err(Error::AccountMismatch {
        expected: username.to_owned(),
        actual:   me.user_principal_name,
      });
    }
    Ok(Session::new(token).with_account(me.user_principal_name))
  }

  async fn find_users(
    &self,
    session: &Session,
    principal_name: &str,
  ) -> Result<Vec<DirectoryUser>> {
    self
      .collect(
        session,
        "/v1.0/users",
        odata::user_filter(principal_name),
        Some("id,userPrincipalName,displayName"),
      )
      .await
  }

  async fn find_privileged_resources(
    &self,
    session: &Session,
    filter: &ResourceFilter,
  ) -> Result<Vec<PrivilegedResource>> {
    self
      .collect(
        session,
        &format!("{AZURE_RESOURCES}/resources"),
        odata::resource_filter(filter),
        None,
      )
      .await
  }

  async fn find_role_definitions(
    &self,
    session: &Session,
    resource_id: &str,
    role: RoleName,
  ) -> Result<Vec<RoleDefinition>> {
    self
      .collect(
        session,
        &format!("{AZURE_RESOURCES}/resources/{resource_id}/roleDefinitions"),
        odata::role_filter(role),
        None,
      )
      .await
  }

  async fn submit_activation(
    &self,
    session: &Session,
    submission: &ActivationSubmission,
  ) -> Result<RoleAssignmentRequest> {
    let resp = self
      .http
      .post(self.url(&format!("{AZURE_RESOURCES}/roleAssignmentRequests")))
      .bearer_auth(session.access_token())
      .json(submission)
      .send()
      .await?;
    read(resp).await
  }
}
