// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! isyourday API client.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::services::auth::Auth;
use crate::services::email::Email;
use crate::services::event::Events;
use crate::services::file::Files;
use crate::services::virtual_user::VirtualUsers;
use crate::session::Session;

/// Client for the isyourday REST API.
///
/// Cloning is cheap: all clones share one connection pool and one session.
///
/// # Example
///
/// ```ignore
/// use isyourday_client::{ApiClient, ApiConfig, LoginForm, Session};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::new(ApiConfig::new("https://api.example.com"), Session::in_memory())?;
/// client.auth().login(&LoginForm::new("alice", "secret")).await?;
/// let users = client.virtual_users().list(0, 10).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Arc<HttpClient>,
}

impl ApiClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: ApiConfig, session: Session) -> Result<Self, ApiError> {
        let http = HttpClient::new(&config, session)?;
        Ok(Self {
            http: Arc::new(http),
        })
    }

    /// The underlying HTTP client.
    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// The session holding the login credentials.
    #[must_use]
    pub fn session(&self) -> &Session {
        self.http.session()
    }

    /// Virtual user endpoints (`/isyourday/user...`).
    #[must_use]
    pub fn virtual_users(&self) -> VirtualUsers<'_> {
        VirtualUsers::new(&self.http)
    }

    /// Event endpoints (`/isyourday/user/{user_id}/event...`).
    #[must_use]
    pub fn events(&self) -> Events<'_> {
        Events::new(&self.http)
    }

    /// File management endpoints (`/file/...`).
    #[must_use]
    pub fn files(&self) -> Files<'_> {
        Files::new(&self.http)
    }

    /// Authentication and account endpoints (`/auth/...`).
    #[must_use]
    pub fn auth(&self) -> Auth<'_> {
        Auth::new(&self.http)
    }

    /// Email endpoints (`/auth/send-email...`).
    #[must_use]
    pub fn email(&self) -> Email<'_> {
        Email::new(&self.http)
    }
}
