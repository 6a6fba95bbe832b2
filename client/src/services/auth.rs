// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Account and authentication endpoints.

use std::fmt;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::{Message, Page, Token, UserPublic, UserSearchRole, UserUpdate};
use crate::request::ApiRequest;

/// Account operations, see [`crate::ApiClient::auth`].
#[derive(Debug, Clone, Copy)]
pub struct Auth<'a> {
    http: &'a HttpClient,
}

impl<'a> Auth<'a> {
    pub(crate) const fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Lists accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn users(&self, skip: u64, limit: u64) -> Result<Page<UserPublic>, ApiError> {
        let req = ApiRequest::get("/auth/users")
            .query("skip", skip)
            .query("limit", limit);
        self.http.send(req).await
    }

    /// The account the session is logged in as.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the session is not logged in.
    #[tracing::instrument(skip(self))]
    pub async fn me(&self) -> Result<UserPublic, ApiError> {
        self.http.send(ApiRequest::get("/auth/me")).await
    }

    /// Searches accounts by keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, q: &str, skip: u64, limit: u64) -> Result<Page<UserPublic>, ApiError> {
        let req = ApiRequest::get("/auth/search")
            .query("q", q)
            .query("skip", skip)
            .query("limit", limit);
        self.http.send(req).await
    }

    /// Looks up one account by username, email or id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no account matches.
    #[tracing::instrument(skip(self))]
    pub async fn profile(&self, role: UserSearchRole, value: &str) -> Result<UserPublic, ApiError> {
        let req = ApiRequest::get("/auth/profile/{user_search_role}/{user_search_value}")
            .path("user_search_role", role)
            .path("user_search_value", value);
        self.http.send(req).await
    }

    /// Registers a new account. The server mails an activation link.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the name or email is taken.
    #[tracing::instrument(skip(self, form), fields(username = %form.username))]
    pub async fn register(&self, form: &RegisterForm) -> Result<UserPublic, ApiError> {
        let req = ApiRequest::post("/auth/register").form(form.fields());
        self.http.send(req).await
    }

    /// Logs in and stores the returned token in the session, so that every
    /// later call carries it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the credentials are rejected or
    /// the token cannot be stored.
    #[tracing::instrument(skip(self, form), fields(username = %form.username))]
    pub async fn login(&self, form: &LoginForm) -> Result<Token, ApiError> {
        let req = ApiRequest::post("/auth/login").form(form.fields());
        let token: Token = self.http.send(req).await?;
        self.http.session().store_token(&token)?;
        tracing::info!("logged in");
        Ok(token)
    }

    /// Forgets the stored token. No request is sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot be written.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.http.session().clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    /// Updates an account; without `user_pk` the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self, user))]
    pub async fn update(&self, user: &UserUpdate, user_pk: Option<&str>) -> Result<UserPublic, ApiError> {
        let req = ApiRequest::patch("/auth/update")
            .query_opt("user_pk", user_pk)
            .json(user)?;
        self.http.send(req).await
    }

    /// Deletes accounts by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn delete_batch<S: AsRef<str>>(&self, ids: &[S]) -> Result<serde_json::Value, ApiError> {
        let req = ids
            .iter()
            .fold(ApiRequest::delete("/auth/delete/batch"), |req, id| {
                req.query("user_pk", id.as_ref())
            });
        self.http.send(req).await
    }

    /// Mails a new activation link.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn resend_activation(&self, email: &str) -> Result<Message, ApiError> {
        let req = ApiRequest::post("/auth/resend-activation")
            .form(vec![("email".to_string(), email.to_string())]);
        self.http.send(req).await
    }

    /// Mails a password reset link.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn request_password_reset(&self, email: &str) -> Result<Message, ApiError> {
        let req = ApiRequest::post("/auth/reset-password")
            .form(vec![("email".to_string(), email.to_string())]);
        self.http.send(req).await
    }
}

/// OAuth2 password-flow login form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Must be `password` when set.
    pub grant_type: Option<String>,
    /// Login name.
    pub username: String,
    /// Password.
    pub password: String,
    /// Space-separated scopes.
    pub scope: String,
    /// OAuth2 client id.
    pub client_id: Option<String>,
    /// OAuth2 client secret.
    pub client_secret: Option<String>,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("grant_type", &self.grant_type)
            .field("username", &self.username)
            .field("scope", &self.scope)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl LoginForm {
    /// Creates a login form with the password grant.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            grant_type: Some("password".to_string()),
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    fn fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        if let Some(grant_type) = &self.grant_type {
            fields.push(("grant_type".to_string(), grant_type.clone()));
        }
        fields.push(("username".to_string(), self.username.clone()));
        fields.push(("password".to_string(), self.password.clone()));
        fields.push(("scope".to_string(), self.scope.clone()));
        if let Some(client_id) = &self.client_id {
            fields.push(("client_id".to_string(), client_id.clone()));
        }
        if let Some(client_secret) = &self.client_secret {
            fields.push(("client_secret".to_string(), client_secret.clone()));
        }
        fields
    }
}

/// Account registration form.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterForm {
    /// Login name.
    pub username: String,
    /// Email address, receives the activation link.
    pub email: String,
    /// Password.
    pub password: String,
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl RegisterForm {
    fn fields(&self) -> Vec<(String, String)> {
        vec![
            ("username".to_string(), self.username.clone()),
            ("email".to_string(), self.email.clone()),
            ("password".to_string(), self.password.clone()),
        ]
    }
}
