// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with bearer authentication and error surfacing.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::HttpValidationError;
use crate::request::{ApiRequest, Body};
use crate::session::Session;

/// HTTP client shared by all API services.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    session: Session,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or HTTP client creation fails.
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("Invalid base URL {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "Invalid base URL: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// The session whose credentials are attached to requests.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The base URL all request paths are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds a request with the authentication and content-type headers.
    ///
    /// `Authorization` is attached only when the session holds both the token
    /// and its type. `Content-Type` defaults to JSON unless the body decides.
    /// Headers set on the request replace those defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built or the body cannot be encoded.
    pub fn build_request(&self, request: ApiRequest) -> Result<RequestBuilder, ApiError> {
        let url = request.url(&self.base_url)?;
        let (method, headers, body) = request.into_parts();
        tracing::debug!(%method, %url, media_type = body.media_type(), "dispatching request");

        let mut req = self.client.request(method, url);
        if let Some(authorization) = self.session.authorization() {
            req = req.header(AUTHORIZATION, authorization);
        }

        req = match body {
            Body::Empty => req.header(CONTENT_TYPE, "application/json"),
            Body::Json(value) => req.json(&value),
            Body::Form(fields) => req.form(&fields),
            Body::Multipart(form) => req.multipart(form.into_reqwest()?),
        };

        let mut overrides = HeaderMap::new();
        for (name, value) in headers {
            overrides.append(name, value);
        }

        Ok(req.headers(overrides))
    }

    /// Sends a request and checks for HTTP errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server answers non-2xx.
    pub async fn execute(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let resp = self.build_request(request)?.send().await?;
        Self::check(resp).await
    }

    /// Sends a request and decodes the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not the expected shape.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let resp = self.execute(request).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Passes 2xx responses through and turns the rest into errors.
    async fn check(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let url = resp.url().clone();
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());
        let err = error_from_body(status, body);
        tracing::warn!(%status, %url, "request failed: {err}");
        Err(err)
    }
}

/// Maps an error response to [`ApiError`].
fn error_from_body(status: StatusCode, body: String) -> ApiError {
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Ok(e) = serde_json::from_str::<HttpValidationError>(&body) {
            return ApiError::Validation(e);
        }
    }

    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| match v.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => v.get("msg").and_then(|m| m.as_str()).map(str::to_string),
        })
        .unwrap_or_else(|| body.clone());

    ApiError::Status {
        status,
        detail,
        body,
    }
}
