//! OData query strings and response envelopes.

use pim_core::request::{ResourceFilter, RoleName};
use serde::Deserialize;

/// Quote `value` as an OData string literal.
pub fn quote(value: &str) -> String { format!("'{}'", value.replace('\'', "''")) }

fn eq(field: &str, value: &str) -> String { format!("{field} eq {}", quote(value)) }

pub fn user_filter(principal_name: &str) -> String {
  eq("userPrincipalName", principal_name)
}

pub fn resource_filter(filter: &ResourceFilter) -> String {
  format!(
    "{} and {}",
    eq("type", filter.type_value()),
    eq("displayName", &filter.display_name)
  )
}

pub fn role_filter(role: RoleName) -> String { eq("displayName", role.as_str()) }

/// One page of a collection response.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
  pub value:     Vec<T>,
  #[serde(rename = "@odata.nextLink")]
  pub next_link: Option<String>,
}

/// `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
  pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
  pub code:    String,
  #[serde(default)]
  pub message: String,
}

#[cfg(test)]
mod tests {
  use pim_core::request::ResourceType;

  use super::*;

  #[test]
  fn quotes_are_doubled() {
    assert_eq!(quote("o'brien@contoso.com"), "'o''brien@contoso.com'");
    assert_eq!(quote("plain"), "'plain'");
  }

  #[test]
  fn user_filter_matches_principal_name_exactly() {
    assert_eq!(
      user_filter("john.doe@contoso.com"),
      "userPrincipalName eq 'john.doe@contoso.com'"
    );
  }

  #[test]
  fn resource_filter_uses_normalised_values() {
    let filter = ResourceFilter::new(ResourceType::Subscription, "prod");
    assert_eq!(
      resource_filter(&filter),
      "type eq 'subscription' and displayName eq 'PROD'"
    );
  }

  #[test]
  fn role_filter_uses_canonical_name() {
    assert_eq!(role_filter(RoleName::Owner), "displayName eq 'Owner'");
  }

  #[test]
  fn page_reads_next_link() {
    let page: Page<serde_json::Value> = serde_json::from_str(
      r#"{"value":[{"id":"a"}],"@odata.nextLink":"https://graph/next"}"#,
    )
    .unwrap();
    assert_eq!(page.value.len(), 1);
    assert_eq!(page.next_link.as_deref(), Some("https://graph/next"));
  }
}
