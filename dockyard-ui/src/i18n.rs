//! Message catalog

use std::collections::HashMap;

use async_trait::async_trait;

use crate::services::Translator;

const EN_US: &str = r#"{
    "REQUEST.DELETION_TITLE": "Confirm request deletion",
    "REQUEST.DELETION_SUMMARY": "Do you want to delete request(s) {param}?",
    "REQUEST.NEW_REQUEST": "New Request",
    "REQUEST.FILTER_PLACEHOLDER": "Filter requests",
    "OPERATION.DELETE_REQUEST": "Delete request",
    "BATCH.DELETED_SUCCESS": "Deleted successfully",
    "BATCH.DELETED_FAILURE": "Deleted failed or partly failed",
    "UNAUTHORIZED_ERROR": "Your session is invalid or has expired. You need to sign in to continue your action.",
    "FORBIDDEN_ERROR": "You do not have the proper privileges to perform the action.",
    "NOT_FOUND_ERROR": "Your request cannot be completed because the object does not exist.",
    "CONFLICT_ERROR": "Your action cannot be submitted because of conflict.",
    "PRECONDITION_FAILED": "Precondition failed.",
    "SERVER_ERROR": "We are unable to perform your action because internal server errors have occurred.",
    "NETWORK_ERROR": "Unable to reach the server.",
    "UNKNOWN_ERROR": "Unknown errors have occurred. Please try again later."
}"#;

/// Key to message map for one locale
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            messages: serde_json::from_str(json)?,
        })
    }

    pub fn en_us() -> Self {
        Self::from_json(EN_US).unwrap_or_default()
    }

    /// Resolves `key`, or returns it unchanged when missing.
    pub fn lookup(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Resolves `key` and substitutes `{param}`.
    pub fn format(&self, key: &str, param: &str) -> String {
        self.lookup(key).replace("{param}", param)
    }
}

#[async_trait(?Send)]
impl Translator for Catalog {
    async fn get(&self, key: &str) -> String {
        self.lookup(key)
    }
}
