// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;

use crate::models::HttpValidationError;

/// isyourday API client errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-2xx status.
    #[error("Request failed with {status}: {detail}")]
    Status {
        /// Response status code.
        status: StatusCode,
        /// The server's error message (`detail` field when present).
        detail: String,
        /// Raw response body.
        body: String,
    },

    /// The server rejected the request payload (HTTP 422).
    #[error("Validation Error: {0}")]
    Validation(HttpValidationError),

    /// The response body could not be decoded.
    #[error("Invalid server response: {0}")]
    Decode(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The credential store could not be read or written.
    #[error("Credential store error: {0}")]
    Store(String),

    /// The call was cancelled before it completed.
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Returns the HTTP status code carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Validation(_) => Some(StatusCode::UNPROCESSABLE_ENTITY),
            _ => None,
        }
    }

    /// Whether the server refused the credentials (401 or 403).
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        Self::Store(format!("IO error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_reported_for_http_failures() {
        let err = ApiError::Status {
            status: StatusCode::FORBIDDEN,
            detail: "forbidden".to_string(),
            body: r#"{"detail":"forbidden"}"#.to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert!(err.is_auth_failure());

        let err = ApiError::Validation(HttpValidationError::default());
        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(!err.is_auth_failure());

        assert_eq!(ApiError::Cancelled.status(), None);
    }

    #[test]
    fn display_includes_detail() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            detail: "用户不存在".to_string(),
            body: String::new(),
        };
        assert_eq!(err.to_string(), "Request failed with 404 Not Found: 用户不存在");
    }
}
