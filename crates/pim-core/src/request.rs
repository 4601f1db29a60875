//! The validated activation request and its parts.
//!
//! Everything here is checked locally, so a malformed invocation is rejected
//! before the directory is contacted.

use std::{fmt, str::FromStr};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Resource type ───────────────────────────────────────────────────────────

/// The kind of Azure resource a role is activated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
  ManagementGroup,
  Subscription,
}

impl ResourceType {
  /// The lower-case form the PIM resource filter matches on.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::ManagementGroup => "managementgroup",
      Self::Subscription => "subscription",
    }
  }
}

impl fmt::Display for ResourceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ResourceType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "managementgroup" => Ok(Self::ManagementGroup),
      "subscription" => Ok(Self::Subscription),
      other => Err(Error::invalid(format!(
        "unknown resource type {other:?} (expected managementgroup or subscription)"
      ))),
    }
  }
}

// ─── Role ────────────────────────────────────────────────────────────────────

/// The roles this tool is allowed to activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleName {
  Contributor,
  Owner,
}

impl RoleName {
  /// Display name of the role definition in PIM.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Contributor => "Contributor",
      Self::Owner => "Owner",
    }
  }
}

impl fmt::Display for RoleName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for RoleName {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let s = s.trim();
    [Self::Contributor, Self::Owner]
      .into_iter()
      .find(|role| role.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| {
        Error::invalid(format!("unknown role {s:?} (expected Contributor or Owner)"))
      })
  }
}

// ─── Request length ──────────────────────────────────────────────────────────

/// How long the activation lasts, in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestLength(u32);

impl RequestLength {
  pub const MIN: u32 = 1;
  pub const MAX: u32 = 8;

  pub fn new(hours: u32) -> Result<Self> {
    if (Self::MIN..=Self::MAX).contains(&hours) {
      Ok(Self(hours))
    } else {
      Err(Error::invalid(format!(
        "request length must be between {} and {} hours, got {hours}",
        Self::MIN,
        Self::MAX
      )))
    }
  }

  pub fn hours(&self) -> u32 { self.0 }

  pub fn as_delta(&self) -> TimeDelta { TimeDelta::hours(i64::from(self.0)) }
}

impl Default for RequestLength {
  fn default() -> Self { Self(Self::MAX) }
}

// ─── Resource filter ─────────────────────────────────────────────────────────

/// Query values for the privileged-resource lookup.
///
/// The service compares these fields case-sensitively: the type is always
/// lower-case and the display name is upper-cased here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFilter {
  pub resource_type: ResourceType,
  pub display_name:  String,
}

impl ResourceFilter {
  pub fn new(resource_type: ResourceType, display_name: &str) -> Self {
    Self {
      resource_type,
      display_name: display_name.trim().to_uppercase(),
    }
  }

  pub fn type_value(&self) -> &'static str { self.resource_type.as_str() }
}

// ─── Activation request ──────────────────────────────────────────────────────

/// A fully validated activation request, built once per run.
#[derive(Debug, Clone)]
pub struct ActivationRequest {
  pub username:       String,
  pub resource_type:  ResourceType,
  pub resource_name:  String,
  pub role:           RoleName,
  pub reason:         String,
  pub request_length: RequestLength,
}

impl ActivationRequest {
  pub fn new(
    username: &str,
    resource_type: ResourceType,
    resource_name: &str,
    role: RoleName,
    reason: &str,
    request_length: RequestLength,
  ) -> Result<Self> {
    Ok(Self {
      username: required("username", username)?,
      resource_type,
      resource_name: required("resource name", resource_name)?,
      role,
      reason: required("reason", reason)?,
      request_length,
    })
  }

  pub fn resource_filter(&self) -> ResourceFilter {
    ResourceFilter::new(self.resource_type, &self.resource_name)
  }
}

fn required(field: &str, value: &str) -> Result<String> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Error::invalid(format!("{field} must not be empty")));
  }
  Ok(value.to_owned())
}
