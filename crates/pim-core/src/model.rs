//! Directory and PIM records, in the shape the service exchanges them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::Schedule;

// ─── Lookup results ──────────────────────────────────────────────────────────

/// A directory user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
  pub id:                  String,
  pub user_principal_name: String,
  pub display_name:        Option<String>,
}

/// A resource managed by PIM (management group, subscription, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivilegedResource {
  pub id:            String,
  pub external_id:   Option<String>,
  #[serde(rename = "type")]
  pub resource_type: String,
  pub display_name:  String,
  pub status:        Option<String>,
}

/// A role definition scoped to one privileged resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDefinition {
  pub id:           String,
  pub resource_id:  Option<String>,
  pub external_id:  Option<String>,
  pub display_name: String,
  pub template_id:  Option<String>,
}

// ─── Submission ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentState {
  Active,
}

/// Request type for a user activating their own eligible assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
  UserAdd,
}

/// The body of a role assignment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationSubmission {
  pub role_definition_id: String,
  pub resource_id:        String,
  pub subject_id:         String,
  pub assignment_state:   AssignmentState,
  #[serde(rename = "type")]
  pub kind:               RequestType,
  pub reason:             String,
  pub schedule:           Schedule,
}

impl ActivationSubmission {
  /// Self-activation of `role` on `resource` for `user`.
  pub fn activate(
    user: &DirectoryUser,
    resource: &PrivilegedResource,
    role: &RoleDefinition,
    schedule: Schedule,
    reason: &str,
  ) -> Self {
    Self {
      role_definition_id: role.id.clone(),
      resource_id:        resource.id.clone(),
      subject_id:         user.id.clone(),
      assignment_state:   AssignmentState::Active,
      kind:               RequestType::UserAdd,
      reason:             reason.to_owned(),
      schedule,
    }
  }
}

// ─── Service response ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatus {
  pub status:     Option<String>,
  pub sub_status: Option<String>,
}

/// Schedule as echoed back by the service; either end may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedSchedule {
  #[serde(rename = "type")]
  pub kind:            Option<String>,
  pub start_date_time: Option<DateTime<Utc>>,
  pub end_date_time:   Option<DateTime<Utc>>,
}

/// The request record returned after a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignmentRequest {
  pub id:                  String,
  pub resource_id:         Option<String>,
  pub role_definition_id:  Option<String>,
  pub subject_id:          Option<String>,
  #[serde(rename = "type")]
  pub kind:                Option<String>,
  pub assignment_state:    Option<String>,
  pub requested_date_time: Option<DateTime<Utc>>,
  pub reason:              Option<String>,
  pub status:              Option<RequestStatus>,
  pub schedule:            Option<RequestedSchedule>,
}
