// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Virtual user endpoints.

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::{Message, Page, VirtualUser, VirtualUserPublic};
use crate::request::ApiRequest;
use crate::services::id_list;

/// Virtual user operations, see [`crate::ApiClient::virtual_users`].
#[derive(Debug, Clone, Copy)]
pub struct VirtualUsers<'a> {
    http: &'a HttpClient,
}

impl<'a> VirtualUsers<'a> {
    pub(crate) const fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Lists virtual users, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, skip: u64, limit: u64) -> Result<Page<VirtualUser>, ApiError> {
        let req = ApiRequest::get("/isyourday/users")
            .query("skip", skip)
            .query("limit", limit);
        self.http.send(req).await
    }

    /// Lists virtual users with the server's default paging.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Page<VirtualUser>, ApiError> {
        self.http.send(ApiRequest::get("/isyourday/users")).await
    }

    /// Fetches one virtual user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the user does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<VirtualUser, ApiError> {
        let req = ApiRequest::get("/isyourday/user/{user_id}").path("user_id", id);
        self.http.send(req).await
    }

    /// Creates virtual users in one call; the server answers with the created records.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self, users), fields(count = users.len()))]
    pub async fn create(&self, users: &[VirtualUserPublic]) -> Result<Vec<VirtualUser>, ApiError> {
        let req = ApiRequest::post("/isyourday/user").json(&users)?;
        self.http.send(req).await
    }

    /// Updates a virtual user. Fields left unset are not sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self, user))]
    pub async fn update(&self, id: &str, user: &VirtualUserPublic) -> Result<VirtualUser, ApiError> {
        let req = ApiRequest::patch("/isyourday/user/{user_id}")
            .path("user_id", id)
            .json(user)?;
        self.http.send(req).await
    }

    /// Searches virtual users by a free-text query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn search(
        &self,
        query: Option<&str>,
        skip: u64,
        limit: u64,
    ) -> Result<Page<VirtualUser>, ApiError> {
        let req = ApiRequest::get("/isyourday/users/search")
            .query_opt("query", query)
            .query("skip", skip)
            .query("limit", limit);
        self.http.send(req).await
    }

    /// Deletes virtual users by id. The ids travel as a bare JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn delete_batch<S: AsRef<str>>(&self, ids: &[S]) -> Result<Message, ApiError> {
        let req = ApiRequest::delete("/isyourday/users/batch").json(&id_list(ids))?;
        self.http.send(req).await
    }
}
