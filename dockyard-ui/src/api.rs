//! API client for communicating with the registry backend

use async_trait::async_trait;
use dockyard_common::paging::TOTAL_COUNT_HEADER;
use dockyard_common::{AppConfig, Request};
use reqwasm::http::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{extract_api_error, ApiError};
use crate::services::{ListResponse, RequestService};

const API_BASE: &str = "/api";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Query string for one page of requests
pub fn list_requests_url(
    config: &ApiConfig,
    keyword: &str,
    page: u32,
    page_size: u32,
    sort: Option<&str>,
) -> String {
    let mut url = config.url(&format!("/requests?page={}&page_size={}", page, page_size));
    if !keyword.is_empty() {
        url.push_str(&format!("&name={}", urlencoding::encode(keyword)));
    }
    if let Some(sort) = sort {
        url.push_str(&format!("&sort={}", urlencoding::encode(sort)));
    }
    url
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    response
        .json()
        .await
        .map_err(|e| ApiError::decode(status, e.to_string()))
}

/// `RequestService` backed by the HTTP API
#[derive(Clone, Debug, Default)]
pub struct HttpRequestService {
    config: ApiConfig,
}

impl HttpRequestService {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }
}

#[async_trait(?Send)]
impl RequestService for HttpRequestService {
    async fn list_requests(
        &self,
        keyword: &str,
        page: u32,
        page_size: u32,
        sort: Option<&str>,
    ) -> Result<ListResponse<Request>, ApiError> {
        let url = list_requests_url(&self.config, keyword, page, page_size, sort);
        debug!(%url, "listing requests");

        let response = reqwasm::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        if !response.ok() {
            return Err(extract_api_error(response).await);
        }

        let total = response.headers().get(TOTAL_COUNT_HEADER);
        let body: Vec<Request> = decode(response).await?;

        let mut list = ListResponse::new(body);
        if let Some(total) = total {
            list = list.with_header(TOTAL_COUNT_HEADER, total);
        }
        Ok(list)
    }

    async fn delete_request(&self, request_id: i64) -> Result<(), ApiError> {
        let url = self.config.url(&format!("/requests/{}", request_id));

        let response = reqwasm::http::Request::delete(&url)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        if response.ok() {
            Ok(())
        } else {
            Err(extract_api_error(response).await)
        }
    }
}

/// Fetch system information once at startup
pub async fn load_app_config(config: &ApiConfig) -> Result<AppConfig, ApiError> {
    let response = reqwasm::http::Request::get(&config.url("/systeminfo"))
        .send()
        .await
        .map_err(|e| ApiError::network(e.to_string()))?;

    if response.ok() {
        decode(response).await
    } else {
        Err(extract_api_error(response).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_requests_url() {
        let config = ApiConfig::default();

        assert_eq!(
            list_requests_url(&config, "", 1, 15, None),
            "/api/requests?page=1&page_size=15"
        );
        assert_eq!(
            list_requests_url(&config, "team a", 2, 15, Some("-name")),
            "/api/requests?page=2&page_size=15&name=team%20a&sort=-name"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ApiConfig {
            base_url: "https://registry.example.com/api/".to_string(),
        };
        assert_eq!(config.url("/systeminfo"), "https://registry.example.com/api/systeminfo");
    }
}
