//! Account and authorization types

use serde::{Deserialize, Serialize};

/// Signed-in user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub has_admin_role: bool,
}

impl Account {
    pub fn new(user_id: i64, username: impl Into<String>, has_admin_role: bool) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: None,
            has_admin_role,
        }
    }
}

/// Who may create projects, as configured by `project_creation_restriction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CreationRestriction {
    AdminOnly,
    Everyone,
    /// Any unrecognized value
    Deny,
}

impl From<&str> for CreationRestriction {
    fn from(value: &str) -> Self {
        match value {
            "adminonly" => CreationRestriction::AdminOnly,
            "everyone" => CreationRestriction::Everyone,
            _ => CreationRestriction::Deny,
        }
    }
}

impl From<String> for CreationRestriction {
    fn from(value: String) -> Self {
        CreationRestriction::from(value.as_str())
    }
}

impl From<CreationRestriction> for String {
    fn from(value: CreationRestriction) -> Self {
        match value {
            CreationRestriction::AdminOnly => "adminonly".to_string(),
            CreationRestriction::Everyone => "everyone".to_string(),
            CreationRestriction::Deny => "deny".to_string(),
        }
    }
}

impl CreationRestriction {
    /// Whether the list view offers request creation to `account`.
    ///
    /// Under `AdminOnly` only non-admin accounts get the request form,
    /// admins create projects directly.
    pub fn allows_request(&self, account: Option<&Account>) -> bool {
        let Some(account) = account else {
            return false;
        };

        match self {
            CreationRestriction::AdminOnly => !account.has_admin_role,
            CreationRestriction::Everyone => true,
            CreationRestriction::Deny => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_restriction() {
        assert_eq!(CreationRestriction::from("adminonly"), CreationRestriction::AdminOnly);
        assert_eq!(CreationRestriction::from("everyone"), CreationRestriction::Everyone);
        assert_eq!(CreationRestriction::from("AdminOnly"), CreationRestriction::Deny);
        assert_eq!(CreationRestriction::from(""), CreationRestriction::Deny);
    }

    #[test]
    fn test_allows_request() {
        let admin = Account::new(1, "admin", true);
        let dev = Account::new(2, "dev", false);

        assert!(CreationRestriction::AdminOnly.allows_request(Some(&dev)));
        assert!(!CreationRestriction::AdminOnly.allows_request(Some(&admin)));
        assert!(CreationRestriction::Everyone.allows_request(Some(&admin)));
        assert!(CreationRestriction::Everyone.allows_request(Some(&dev)));
        assert!(!CreationRestriction::Deny.allows_request(Some(&dev)));
        assert!(!CreationRestriction::Everyone.allows_request(None));
    }

    #[test]
    fn test_restriction_serde() {
        let json = serde_json::to_string(&CreationRestriction::AdminOnly).unwrap();
        assert_eq!(json, "\"adminonly\"");

        let parsed: CreationRestriction = serde_json::from_str("\"everyone\"").unwrap();
        assert_eq!(parsed, CreationRestriction::Everyone);
    }
}
