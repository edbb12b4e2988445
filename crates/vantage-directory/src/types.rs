//! Vantage Directory Types
//!
//! The directory record as delivered by the directory source. Optional
//! fields that are missing or null are defaulted during decode and never
//! surface as errors.
//!
//! @version 0.1.0
//! @author Vantage Development Team

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Role assigned to records that arrive without any role information.
pub const DEFAULT_ROLE: &str = "user";

// =============================================================================
// Directory Record
// =============================================================================

/// A single user in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRecord {
    pub id: String,
    #[serde(default)]
    pub cn: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub business_unit: Option<String>,
    #[serde(default)]
    pub slack_handle: Option<String>,
    #[serde(default = "default_roles", deserialize_with = "deserialize_roles")]
    pub roles: BTreeSet<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sequence_value: i64,
}

fn default_roles() -> BTreeSet<String> {
    BTreeSet::from([DEFAULT_ROLE.to_string()])
}

fn default_active() -> bool {
    true
}

// `null` is treated the same as a missing key.
fn deserialize_roles<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let roles: Option<BTreeSet<String>> = Option::deserialize(deserializer)?;
    Ok(roles.unwrap_or_else(default_roles))
}

impl DirectoryRecord {
    pub fn new(id: impl Into<String>, cn: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cn: cn.into(),
            email: email.into(),
            manager: None,
            org: None,
            business_unit: None,
            slack_handle: None,
            roles: default_roles(),
            is_active: true,
            last_login: None,
            sequence_value: 0,
        }
    }

    pub fn with_manager(mut self, manager: impl Into<String>) -> Self {
        self.manager = Some(manager.into());
        self
    }

    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    pub fn with_business_unit(mut self, business_unit: impl Into<String>) -> Self {
        self.business_unit = Some(business_unit.into());
        self
    }

    pub fn with_slack_handle(mut self, handle: impl Into<String>) -> Self {
        self.slack_handle = Some(handle.into());
        self
    }

    /// Replace the role set.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_last_login(mut self, last_login: DateTime<Utc>) -> Self {
        self.last_login = Some(last_login);
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Fields compared for exact equality against the query.
    pub fn identifier_fields(&self) -> [&str; 3] {
        [self.id.as_str(), self.email.as_str(), self.cn.as_str()]
    }

    /// Fields scanned for substring matches; empty optional fields are skipped.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.cn.as_str()),
            Some(self.id.as_str()),
            Some(self.email.as_str()),
            self.slack_handle.as_deref(),
            self.manager.as_deref(),
            self.business_unit.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|field| !field.is_empty())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_are_defaulted() {
        let record: DirectoryRecord =
            serde_json::from_str(r#"{"id":"u1","cn":"Alice A","email":"a@x.com"}"#).unwrap();

        assert_eq!(record.roles, BTreeSet::from(["user".to_string()]));
        assert_eq!(record.sequence_value, 0);
        assert!(record.is_active);
        assert!(record.manager.is_none());
    }

    #[test]
    fn test_null_roles_default_to_user() {
        let record: DirectoryRecord =
            serde_json::from_str(r#"{"id":"u1","roles":null}"#).unwrap();
        assert!(record.has_role("user"));
    }

    #[test]
    fn test_camel_case_fields() {
        let record: DirectoryRecord = serde_json::from_str(
            r#"{
                "id": "u7",
                "cn": "Grace H",
                "email": "grace@x.com",
                "businessUnit": "Storage",
                "slackHandle": "@grace",
                "roles": ["admin", "user"],
                "isActive": false,
                "lastLogin": "2024-03-01T12:00:00Z",
                "sequenceValue": 42
            }"#,
        )
        .unwrap();

        assert_eq!(record.business_unit.as_deref(), Some("Storage"));
        assert_eq!(record.slack_handle.as_deref(), Some("@grace"));
        assert!(record.has_role("admin"));
        assert!(!record.is_active);
        assert!(record.last_login.is_some());
        assert_eq!(record.sequence_value, 42);
    }

    #[test]
    fn test_searchable_fields_skip_empty() {
        let record = DirectoryRecord::new("u1", "Alice A", "").with_manager("bob");
        let fields: Vec<&str> = record.searchable_fields().collect();
        assert_eq!(fields, vec!["Alice A", "u1", "bob"]);
    }
}
