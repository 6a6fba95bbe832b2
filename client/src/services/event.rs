// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Event endpoints, nested below their owning virtual user.

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::{Event, EventPublic, Message, Page};
use crate::request::ApiRequest;
use crate::services::id_list;

/// Event operations, see [`crate::ApiClient::events`].
#[derive(Debug, Clone, Copy)]
pub struct Events<'a> {
    http: &'a HttpClient,
}

impl<'a> Events<'a> {
    pub(crate) const fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Lists the events of a virtual user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the user does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, user_id: &str, skip: u64, limit: u64) -> Result<Page<Event>, ApiError> {
        let req = ApiRequest::get("/isyourday/user/{user_id}/events")
            .path("user_id", user_id)
            .query("skip", skip)
            .query("limit", limit);
        self.http.send(req).await
    }

    /// Creates an event for a virtual user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the user does not exist.
    #[tracing::instrument(skip(self, event))]
    pub async fn create(&self, user_id: &str, event: &EventPublic) -> Result<Event, ApiError> {
        let req = ApiRequest::post("/isyourday/user/{user_id}/events")
            .path("user_id", user_id)
            .json(event)?;
        self.http.send(req).await
    }

    /// Updates an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the event does not belong to the user.
    #[tracing::instrument(skip(self, event))]
    pub async fn update(
        &self,
        user_id: &str,
        event_id: &str,
        event: &EventPublic,
    ) -> Result<Event, ApiError> {
        let req = ApiRequest::patch("/isyourday/user/{user_id}/event/{event_id}")
            .path("user_id", user_id)
            .path("event_id", event_id)
            .json(event)?;
        self.http.send(req).await
    }

    /// Deletes events of a virtual user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn delete_batch<S: AsRef<str>>(
        &self,
        user_id: &str,
        ids: &[S],
    ) -> Result<Message, ApiError> {
        let req = ApiRequest::delete("/isyourday/user/{user_id}/events/batch")
            .path("user_id", user_id)
            .json(&id_list(ids))?;
        self.http.send(req).await
    }
}
