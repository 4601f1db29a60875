//! OAuth 2.0 device-code sign-in against the Microsoft identity platform.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::{Error, Result, config::GraphConfig};

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Extra wait the identity platform asks for on `slow_down`.
const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

/// A pending device-code sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCode {
  pub device_code:      String,
  pub user_code:        String,
  pub verification_uri: String,
  pub expires_in:       u64,
  #[serde(default = "default_interval")]
  pub interval:         u64,
  pub message:          Option<String>,
}

fn default_interval() -> u64 { 5 }

impl DeviceCode {
  /// What the user has to do to finish signing in.
  pub fn instructions(&self) -> String {
    self.message.clone().unwrap_or_else(|| {
      format!(
        "To sign in, open {} and enter the code {}",
        self.verification_uri, self.user_code
      )
    })
  }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
  access_token: String,
}

#[derive(Debug, Deserialize)]
struct OAuthError {
  error:             String,
  #[serde(default)]
  error_description: String,
}

fn endpoint(config: &GraphConfig, leaf: &str) -> String {
  format!(
    "{}/{}/oauth2/v2.0/{leaf}",
    config.login_url.trim_end_matches('/'),
    config.tenant
  )
}

/// Run the device-code flow and return an access token.
///
/// The instructions are written to stderr; the token endpoint is polled at
/// the interval the identity platform asks for until the user finishes, the
/// sign-in is refused, or the code expires.
pub async fn device_code_login(http: &Client, config: &GraphConfig) -> Result<String> {
  let resp = http
    .post(endpoint(config, "devicecode"))
    .form(&[
      ("client_id", config.client_id.as_str()),
      ("scope", config.scope.as_str()),
    ])
    .send()
    .await?;
  let code: DeviceCode = oauth_body(resp).await?;

  eprintln!("{}", code.instructions());
  info!(verification_uri = %code.verification_uri, "waiting for device sign-in");

  let deadline = Instant::now() + Duration::from_secs(code.expires_in);
  let mut interval = Duration::from_secs(code.interval);
  let token_url = endpoint(config, "token");

  loop {
    sleep(interval).await;

    let resp = http
      .post(&token_url)
      .form(&[
        ("grant_type", DEVICE_CODE_GRANT),
        ("client_id", config.client_id.as_str()),
        ("device_code", code.device_code.as_str()),
      ])
      .send()
      .await?;

    match oauth_body::<TokenResponse>(resp).await {
      Ok(token) => return Ok(token.access_token),
      Err(Error::OAuth { code: reason, .. }) if reason == "authorization_pending" => {
        debug!("sign-in still pending");
      }
      Err(Error::OAuth { code: reason, .. }) if reason == "slow_down" => {
        interval += SLOW_DOWN_STEP;
        debug!(?interval, "asked to slow down");
      }
      Err(Error::OAuth { code: reason, .. }) if reason == "expired_token" => {
        return Err(Error::DeviceCodeExpired);
      }
      Err(e) => return Err(e),
    }

    if Instant::now() >= deadline {
      return Err(Error::DeviceCodeExpired);
    }
  }
}

/// Decode a success body, or the OAuth error document on failure.
async fn oauth_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
  if resp.status().is_success() {
    return Ok(resp.json().await?);
  }
  let status = resp.status();
  let body = resp.text().await?;
  match serde_json::from_str::<OAuthError>(&body) {
    Ok(err) => Err(Error::OAuth {
      code:        err.error,
      description: err.error_description,
    }),
    Err(_) => Err(Error::OAuth {
      code:        status.as_str().to_string(),
      description: body,
    }),
  }
}
