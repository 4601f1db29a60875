//! Connection settings for Graph and the sign-in endpoint.

use std::time::Duration;

/// Public client id of Azure PowerShell, which is pre-consented for the
/// Graph PIM scopes in most tenants.
pub const DEFAULT_CLIENT_ID: &str = "1950a258-227b-4e31-a9cf-717495945fc2";

#[derive(Debug, Clone)]
pub struct GraphConfig {
  /// Graph root, without the version segment.
  pub graph_url: String,
  /// Identity platform root the device-code flow runs against.
  pub login_url: String,
  /// Tenant id or domain; `organizations` lets any work account sign in.
  pub tenant:    String,
  pub client_id: String,
  pub scope:     String,
  pub timeout:   Duration,
}

impl Default for GraphConfig {
  fn default() -> Self {
    Self {
      graph_url: "https://graph.microsoft.com".to_string(),
      login_url: "https://login.microsoftonline.com".to_string(),
      tenant:    "organizations".to_string(),
      client_id: DEFAULT_CLIENT_ID.to_string(),
      scope:     "https://graph.microsoft.com/.default".to_string(),
      timeout:   Duration::from_secs(30),
    }
  }
}
