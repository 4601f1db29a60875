//! `pim-activate` — activate an eligible Azure PIM role for a few hours.
//!
//! # Usage
//!
//! ```text
//! pim-activate --username john.doe@contoso.com --type managementgroup \
//!   --name P-C00 --role Contributor --reason "change work"
//! PIM_ACCESS_TOKEN=... pim-activate --skip-login -u john.doe@contoso.com \
//!   -t subscription -n prod -r Owner --reason deploy --request-length 2
//! ```
//!
//! The submitted request is printed to stdout as JSON; diagnostics go to
//! stderr (`RUST_LOG` controls verbosity).

mod settings;

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use pim_core::{
  driver::{Activation, Login},
  request::{ActivationRequest, RequestLength, ResourceType, RoleName},
};
use pim_graph::GraphClient;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "pim-activate",
  version,
  about = "Activate an eligible Azure PIM role on a management group or subscription"
)]
struct Args {
  /// Principal name to sign in as and activate the role for.
  #[arg(short, long)]
  username: String,

  /// Resource type: managementgroup or subscription (any case).
  #[arg(short = 't', long = "type", value_name = "TYPE")]
  resource_type: ResourceType,

  /// Display name of the management group or subscription.
  #[arg(short, long)]
  name: String,

  /// Role to activate: Contributor or Owner (any case).
  #[arg(short, long)]
  role: RoleName,

  /// Justification attached to the request.
  #[arg(long)]
  reason: String,

  /// Activation length in hours (1-8).
  #[arg(short = 'l', long, default_value_t = RequestLength::MAX)]
  request_length: u32,

  /// Do not sign in; use a pre-acquired access token instead.
  #[arg(long)]
  skip_login: bool,

  /// Graph access token used with --skip-login.
  #[arg(long, env = "PIM_ACCESS_TOKEN", hide_env_values = true)]
  access_token: Option<String>,

  /// Directory tenant to sign in to.
  #[arg(long, env = "PIM_TENANT")]
  tenant: Option<String>,

  /// Path to a TOML settings file.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Resolve everything and print the request without submitting it.
  #[arg(long)]
  dry_run: bool,
}

impl Args {
  /// Everything that can be checked without contacting the directory.
  fn activation_request(&self) -> pim_core::Result<ActivationRequest> {
    ActivationRequest::new(
      &self.username,
      self.resource_type,
      &self.name,
      self.role,
      &self.reason,
      RequestLength::new(self.request_length)?,
    )
  }

  fn login(&self, settings: &Settings) -> pim_core::Result<Login> {
    if self.skip_login {
      Login::skip_with(
        self
          .access_token
          .clone()
          .or_else(|| settings.access_token.clone()),
      )
    } else {
      Ok(Login::Interactive)
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::ERROR.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  match run(args).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("error: {e:#}");
      ExitCode::FAILURE
    }
  }
}

async fn run(args: Args) -> Result<()> {
  let request = args.activation_request()?;
  let settings = Settings::load(args.config.as_deref())?;
  let login = args.login(&settings)?;

  let mut graph = settings.graph_config();
  if let Some(tenant) = &args.tenant {
    graph.tenant = tenant.clone();
  }
  let client = GraphClient::new(graph).context("failed to build HTTP client")?;

  let outcome = Activation::new(&client)
    .dry_run(args.dry_run)
    .run(&request, login)
    .await
    .with_context(|| format!("could not activate {} on {}", request.role, request.resource_name))?;

  let json = serde_json::to_string_pretty(&outcome).context("serialising result")?;
  println!("{json}");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
    let mut argv = vec![
      "pim-activate",
      "--username",
      "john.doe@contoso.com",
      "--type",
      "managementgroup",
      "--name",
      "P-C00",
      "--role",
      "Contributor",
      "--reason",
      "change work",
    ];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv)
  }

  fn settings() -> Settings {
    Settings {
      tenant:       "organizations".into(),
      client_id:    "client".into(),
      graph_url:    "https://graph.microsoft.com".into(),
      login_url:    "https://login.microsoftonline.com".into(),
      scope:        "https://graph.microsoft.com/.default".into(),
      timeout_secs: 30,
      access_token: Some("from-settings".into()),
    }
  }

  #[test]
  fn scenario_defaults_to_eight_hours() {
    let args = parse(&[]).unwrap();
    let request = args.activation_request().unwrap();
    assert_eq!(request.request_length.hours(), 8);
    assert_eq!(request.resource_type, ResourceType::ManagementGroup);
    assert_eq!(request.role, RoleName::Contributor);
    assert!(!args.skip_login);
  }

  #[test]
  fn type_and_role_accept_any_case() {
    let args = Args::try_parse_from([
      "pim-activate", "-u", "a@b.c", "-t", "Subscription", "-n", "prod", "-r", "OWNER",
      "--reason", "deploy",
    ])
    .unwrap();
    assert_eq!(args.resource_type, ResourceType::Subscription);
    assert_eq!(args.role, RoleName::Owner);
    assert_eq!(
      args.activation_request().unwrap().resource_filter().display_name,
      "PROD"
    );
  }

  #[test]
  fn unknown_role_is_rejected() {
    let mut argv = vec!["pim-activate", "-u", "a@b.c", "-t", "subscription", "-n", "x"];
    argv.extend(["-r", "Reader", "--reason", "why"]);
    assert!(Args::try_parse_from(argv).is_err());
  }

  #[test]
  fn request_length_out_of_range_is_rejected_locally() {
    for hours in ["0", "9"] {
      let args = parse(&["--request-length", hours]).unwrap();
      assert!(matches!(
        args.activation_request(),
        Err(pim_core::Error::InvalidRequest(_))
      ));
    }
  }

  #[test]
  fn skip_login_prefers_flag_token_over_settings() {
    let args = parse(&["--skip-login", "--access-token", "from-flag"]).unwrap();
    let Login::Skip(session) = args.login(&settings()).unwrap() else {
      panic!("expected a skipped login");
    };
    assert_eq!(session.access_token(), "from-flag");
  }

  #[test]
  fn skip_login_falls_back_to_settings_token() {
    let mut args = parse(&["--skip-login"]).unwrap();
    args.access_token = None;
    let Login::Skip(session) = args.login(&settings()).unwrap() else {
      panic!("expected a skipped login");
    };
    assert_eq!(session.access_token(), "from-settings");
  }

  #[test]
  fn interactive_login_by_default() {
    let args = parse(&[]).unwrap();
    assert!(matches!(args.login(&settings()).unwrap(), Login::Interactive));
  }
}
