//! User-friendly error handling for the UI
//!
//! Provides error message formatting and the response error decoder

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error response format (matches backend)
#[derive(Clone, Debug, Error, PartialEq, Serialize, Deserialize)]
#[error("{message} (HTTP {status})")]
pub struct ApiError {
    /// HTTP status, 0 when the request never reached the server
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request_id: Option<String>,
}

impl ApiError {
    pub fn new(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
            details: None,
            request_id: None,
        }
    }

    /// Transport failure: no HTTP response was received.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(0, "NETWORK_ERROR", message)
    }

    /// Response body could not be decoded.
    pub fn decode(status: u16, message: impl Into<String>) -> Self {
        Self::new(status, "DECODE_ERROR", message)
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self.error.as_str() {
            "NOT_FOUND" => "The requested resource was not found.".to_string(),
            "UNAUTHORIZED" | "AUTHENTICATION_FAILED" => {
                "Your session has expired. Please log in again.".to_string()
            }
            "FORBIDDEN" => "You don't have permission to perform this action.".to_string(),
            "CONFLICT" => format!("Operation conflict: {}", self.message),
            "NETWORK_ERROR" => "Unable to reach the server. Check your connection.".to_string(),
            "SERVICE_UNAVAILABLE" => {
                "The service is temporarily unavailable. Please try again later.".to_string()
            }
            "INTERNAL_ERROR" => {
                "An unexpected error occurred. Please try again or contact support.".to_string()
            }
            _ if self.message.is_empty() => format!("Request failed with status {}", self.status),
            _ => self.message.clone(),
        }
    }

    /// Get severity level for UI styling
    pub fn severity(&self) -> ErrorSeverity {
        match self.status {
            400..=499 => ErrorSeverity::Warning,
            0 | 500..=599 => ErrorSeverity::Error,
            _ => ErrorSeverity::Info,
        }
    }
}

/// Localization key describing `error`.
///
/// Bad requests carry a backend message worth showing verbatim; the catalog
/// resolves unknown keys to themselves so that message passes through.
pub fn error_message_key(error: &ApiError) -> String {
    let key = match error.status {
        0 => "NETWORK_ERROR",
        400 if !error.message.is_empty() => return error.message.clone(),
        401 => "UNAUTHORIZED_ERROR",
        403 => "FORBIDDEN_ERROR",
        404 => "NOT_FOUND_ERROR",
        409 => "CONFLICT_ERROR",
        412 => "PRECONDITION_FAILED",
        500..=599 => "SERVER_ERROR",
        _ => "UNKNOWN_ERROR",
    };
    key.to_string()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}

impl ErrorSeverity {
    pub fn class(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "alert-info",
            ErrorSeverity::Warning => "alert-warning",
            ErrorSeverity::Error => "alert-error",
        }
    }
}

/// Helper to extract error from reqwasm response
pub async fn extract_api_error(response: reqwasm::http::Response) -> ApiError {
    let status = response.status();

    // Try to parse as ApiError JSON
    if let Ok(mut error) = response.json::<ApiError>().await {
        if error.status == 0 {
            error.status = status;
        }
        return error;
    }

    // Fallback to generic error
    ApiError::new(
        status,
        "UNKNOWN_ERROR",
        format!("Request failed with status {}", status),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_not_found() {
        let error = ApiError::new(404, "NOT_FOUND", "request 12 not found");

        assert_eq!(error.user_message(), "The requested resource was not found.");
    }

    #[test]
    fn test_user_message_falls_back_to_backend_message() {
        let error = ApiError::new(400, "BAD_REQUEST", "name is required");
        assert_eq!(error.user_message(), "name is required");

        let empty = ApiError::new(418, "", "");
        assert_eq!(empty.user_message(), "Request failed with status 418");
    }

    #[test]
    fn test_severity() {
        assert_eq!(ApiError::new(400, "BAD_REQUEST", "x").severity(), ErrorSeverity::Warning);
        assert_eq!(ApiError::new(500, "INTERNAL_ERROR", "x").severity(), ErrorSeverity::Error);
        assert_eq!(ApiError::network("offline").severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_error_message_key() {
        assert_eq!(error_message_key(&ApiError::new(401, "", "")), "UNAUTHORIZED_ERROR");
        assert_eq!(error_message_key(&ApiError::new(403, "", "")), "FORBIDDEN_ERROR");
        assert_eq!(error_message_key(&ApiError::new(404, "", "")), "NOT_FOUND_ERROR");
        assert_eq!(error_message_key(&ApiError::new(409, "", "")), "CONFLICT_ERROR");
        assert_eq!(error_message_key(&ApiError::new(412, "", "")), "PRECONDITION_FAILED");
        assert_eq!(error_message_key(&ApiError::new(502, "", "")), "SERVER_ERROR");
        assert_eq!(error_message_key(&ApiError::network("offline")), "NETWORK_ERROR");
        assert_eq!(error_message_key(&ApiError::new(400, "", "bad name")), "bad name");
        assert_eq!(error_message_key(&ApiError::new(400, "", "")), "UNKNOWN_ERROR");
    }

    #[test]
    fn test_deserialize_backend_error() {
        let json = r#"{"status": 409, "error": "CONFLICT", "message": "already exists"}"#;
        let error: ApiError = serde_json::from_str(json).unwrap();

        assert_eq!(error.status, 409);
        assert!(error.details.is_none());
        assert_eq!(error.to_string(), "already exists (HTTP 409)");
    }
}
