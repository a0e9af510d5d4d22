//! Collaborator contracts the list views depend on
//!
//! Views hold these behind `Rc<dyn ...>` so the browser wiring and the test
//! doubles are interchangeable.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use dockyard_common::{Account, AppConfig, Request};

use crate::error::ApiError;

/// Paged list response: decoded body plus the response headers
#[derive(Clone, Debug, Default)]
pub struct ListResponse<T> {
    pub body: Vec<T>,
    headers: HashMap<String, String>,
}

impl<T> ListResponse<T> {
    pub fn new(body: Vec<T>) -> Self {
        Self {
            body,
            headers: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[async_trait(?Send)]
pub trait RequestService {
    async fn list_requests(
        &self,
        keyword: &str,
        page: u32,
        page_size: u32,
        sort: Option<&str>,
    ) -> Result<ListResponse<Request>, ApiError>;

    async fn delete_request(&self, request_id: i64) -> Result<(), ApiError>;
}

pub trait SessionService {
    fn current_user(&self) -> Option<Account>;
}

pub trait AppConfigService {
    fn config(&self) -> AppConfig;
}

/// Resolves message keys to localized strings
#[async_trait(?Send)]
pub trait Translator {
    async fn get(&self, key: &str) -> String;
}

/// Shared notification channel
pub trait MessageHandler {
    fn handle_error(&self, error: &ApiError);
    fn show_success(&self, message: &str);
}

/// Signed-in account, replaced on login and logout
#[derive(Default)]
pub struct SessionStore {
    account: RefCell<Option<Account>>,
}

impl SessionStore {
    pub fn sign_in(&self, account: Account) {
        *self.account.borrow_mut() = Some(account);
    }

    pub fn sign_out(&self) {
        self.account.borrow_mut().take();
    }
}

impl SessionService for SessionStore {
    fn current_user(&self) -> Option<Account> {
        self.account.borrow().clone()
    }
}

/// Configuration fetched once at startup; defaults until it arrives
#[derive(Default)]
pub struct StaticAppConfig {
    config: RefCell<AppConfig>,
}

impl StaticAppConfig {
    pub fn replace(&self, config: AppConfig) {
        *self.config.borrow_mut() = config;
    }
}

impl AppConfigService for StaticAppConfig {
    fn config(&self) -> AppConfig {
        self.config.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = ListResponse::<Request>::new(vec![]).with_header("X-Total-Count", "31");

        assert_eq!(response.header("x-total-count"), Some("31"));
        assert_eq!(response.header("X-TOTAL-COUNT"), Some("31"));
        assert_eq!(response.header("Link"), None);
    }

    #[test]
    fn test_session_store() {
        let session = SessionStore::default();
        assert!(session.current_user().is_none());

        session.sign_in(Account::new(1, "admin", true));
        assert_eq!(session.current_user().map(|a| a.username), Some("admin".to_string()));

        session.sign_out();
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_static_app_config_replace() {
        let config = StaticAppConfig::default();
        assert_eq!(
            config.config().project_creation_restriction,
            dockyard_common::CreationRestriction::Everyone
        );

        config.replace(AppConfig {
            project_creation_restriction: dockyard_common::CreationRestriction::AdminOnly,
            ..AppConfig::default()
        });
        assert_eq!(
            config.config().project_creation_restriction,
            dockyard_common::CreationRestriction::AdminOnly
        );
    }
}
