//! Layered settings: built-in defaults, an optional TOML file, then `PIM_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result};
use pim_graph::GraphConfig;
use serde::Deserialize;

const DEFAULT_CONFIG: &str = "~/.config/pim-activate/config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub tenant:       String,
  pub client_id:    String,
  pub graph_url:    String,
  pub login_url:    String,
  pub scope:        String,
  pub timeout_secs: u64,
  /// Pre-acquired Graph token, only used when login is skipped.
  pub access_token: Option<String>,
}

impl Settings {
  /// Read settings from `path`, or from the default location if `None`.
  ///
  /// An explicitly named file must exist; the default one is optional.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let (file, required) = match path {
      Some(path) => (path.to_path_buf(), true),
      None => (expand_tilde(Path::new(DEFAULT_CONFIG)), false),
    };
    let defaults = GraphConfig::default();

    let settings = config::Config::builder()
      .set_default("tenant", defaults.tenant)?
      .set_default("client_id", defaults.client_id)?
      .set_default("graph_url", defaults.graph_url)?
      .set_default("login_url", defaults.login_url)?
      .set_default("scope", defaults.scope)?
      .set_default("timeout_secs", defaults.timeout.as_secs())?
      .add_source(config::File::from(file.clone()).required(required))
      .add_source(config::Environment::with_prefix("PIM").try_parsing(true))
      .build()
      .with_context(|| format!("failed to read settings from {}", file.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn graph_config(&self) -> GraphConfig {
    GraphConfig {
      graph_url: self.graph_url.clone(),
      login_url: self.login_url.clone(),
      tenant:    self.tenant.clone(),
      client_id: self.client_id.clone(),
      scope:     self.scope.clone(),
      timeout:   Duration::from_secs(self.timeout_secs),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;

  fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir()
      .join(format!("pim-activate-{}-{name}.toml", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn file_overrides_defaults() {
    let path = temp_file(
      "override",
      "tenant = \"contoso.onmicrosoft.com\"\ntimeout_secs = 10\n",
    );
    let settings = Settings::load(Some(&path)).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(settings.tenant, "contoso.onmicrosoft.com");
    assert_eq!(settings.client_id, pim_graph::config::DEFAULT_CLIENT_ID);

    let graph = settings.graph_config();
    assert_eq!(graph.timeout, Duration::from_secs(10));
    assert_eq!(graph.graph_url, "https://graph.microsoft.com");
  }

  #[test]
  fn explicit_file_must_exist() {
    let missing = std::env::temp_dir().join("pim-activate-does-not-exist.toml");
    assert!(Settings::load(Some(&missing)).is_err());
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else {
      return;
    };
    assert_eq!(
      expand_tilde(Path::new("~/x/config.toml")),
      PathBuf::from(home).join("x/config.toml")
    );
    assert_eq!(expand_tilde(Path::new("/etc/pim.toml")), PathBuf::from("/etc/pim.toml"));
  }
}
