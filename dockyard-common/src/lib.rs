//! Common types and utilities shared between the registry backend and dockyard-ui

pub mod auth;
pub mod paging;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use auth::{Account, CreationRestriction};
pub use paging::{FilterDescriptor, GridState, PageDescriptor, SortDescriptor};

/// Project creation request awaiting administrative action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    pub request_id: i64,
    pub name: String,
    #[serde(default)]
    pub owner_name: String,
    /// Role of the current user on the requested project (1 = project admin)
    #[serde(default)]
    pub current_user_role_id: Option<i64>,
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
}

impl Request {
    pub fn new(request_id: i64, name: impl Into<String>) -> Self {
        Self {
            request_id,
            name: name.into(),
            owner_name: String::new(),
            current_user_role_id: None,
            creation_time: None,
            update_time: None,
        }
    }
}

/// System information served by `GET /api/systeminfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub project_creation_restriction: CreationRestriction,
    pub with_notary: bool,
    pub registry_url: String,
    pub harbor_version: String,
    pub auth_mode: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_creation_restriction: CreationRestriction::Everyone,
            with_notary: false,
            registry_url: String::new(),
            harbor_version: String::new(),
            auth_mode: "db_auth".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialize_minimal() {
        let json = r#"{"request_id": 7, "name": "team-a"}"#;
        let request: Request = serde_json::from_str(json).unwrap();

        assert_eq!(request.request_id, 7);
        assert_eq!(request.name, "team-a");
        assert!(request.owner_name.is_empty());
        assert!(request.creation_time.is_none());
    }

    #[test]
    fn test_request_deserialize_timestamps() {
        let json = r#"{
            "request_id": 3,
            "name": "infra",
            "owner_name": "alice",
            "current_user_role_id": 1,
            "creation_time": "2025-10-09T10:30:45Z"
        }"#;
        let request: Request = serde_json::from_str(json).unwrap();

        assert_eq!(request.owner_name, "alice");
        assert_eq!(request.current_user_role_id, Some(1));
        assert!(request.creation_time.is_some());
    }

    #[test]
    fn test_app_config_defaults_for_missing_fields() {
        let config: AppConfig = serde_json::from_str(r#"{"with_notary": true}"#).unwrap();

        assert!(config.with_notary);
        assert_eq!(config.project_creation_restriction, CreationRestriction::Everyone);
        assert_eq!(config.auth_mode, "db_auth");
    }

    #[test]
    fn test_app_config_unknown_restriction() {
        let config: AppConfig =
            serde_json::from_str(r#"{"project_creation_restriction": "nobody"}"#).unwrap();

        assert_eq!(config.project_creation_restriction, CreationRestriction::Deny);
    }
}
