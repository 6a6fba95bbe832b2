// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Email sending and history endpoints.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::{
    EmailHistorySearchType, EmailReceiverType, EmailSendHistory, EmailSendHistoryUpdate, Page,
};
use crate::request::{ApiRequest, FilePart, MultipartForm};
use crate::services::{DEFAULT_LIMIT, DEFAULT_SKIP};

/// Email operations, see [`crate::ApiClient::email`].
#[derive(Debug, Clone, Copy)]
pub struct Email<'a> {
    http: &'a HttpClient,
}

impl<'a> Email<'a> {
    pub(crate) const fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Sends an email, or records it as pending when `send_directly` is off.
    ///
    /// Attachments already on the server are referenced by id; uploaded ones
    /// travel as file parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a receiver does not exist.
    #[tracing::instrument(skip(self, form), fields(receivers = form.receiver.len()))]
    pub async fn send(
        &self,
        receiver_type: EmailReceiverType,
        form: SendEmail,
    ) -> Result<EmailQueued, ApiError> {
        let req = ApiRequest::post("/auth/send-email/{receiver_type}")
            .path("receiver_type", receiver_type)
            .multipart(form.into_multipart());
        self.http.send(req).await
    }

    /// Searches the email history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn history(
        &self,
        search_type: EmailHistorySearchType,
        query: &EmailHistoryQuery,
    ) -> Result<Page<EmailSendHistory>, ApiError> {
        let req = ApiRequest::get("/auth/send-email/history/{search_type}")
            .path("search_type", search_type)
            .query_opt("q", query.q.as_deref())
            .query("skip", query.skip)
            .query("limit", query.limit)
            .query("global_search", query.global_search);
        self.http.send(req).await
    }

    /// Edits a history record, typically a pending one before sending it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_history(
        &self,
        history_id: &str,
        update: &EmailSendHistoryUpdate,
    ) -> Result<EmailSendHistory, ApiError> {
        let req = ApiRequest::patch("/auth/send-email/history")
            .query("history_id", history_id)
            .json(update)?;
        self.http.send(req).await
    }

    /// Queues a pending email for sending.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the email was already sent.
    #[tracing::instrument(skip(self))]
    pub async fn send_pending(&self, history_id: &str) -> Result<EmailQueued, ApiError> {
        let req =
            ApiRequest::get("/auth/send-email/pending/{history_id}").path("history_id", history_id);
        self.http.send(req).await
    }
}

/// Form of [`Email::send`].
#[derive(Debug, Clone)]
pub struct SendEmail {
    /// Receiver ids, of accounts or virtual users depending on the receiver type.
    pub receiver: Vec<String>,
    /// Subject.
    pub subject: String,
    /// HTML is allowed.
    pub content: String,
    /// Attachments uploaded with the email.
    pub files: Vec<FilePart>,
    /// Ids of stored files to attach.
    pub files_in_store: Vec<String>,
    /// Keep uploaded attachments on the server.
    pub store_upload_files: bool,
    /// Send now rather than recording the email as pending.
    pub send_directly: bool,
}

impl SendEmail {
    /// Creates an email that is sent right away.
    #[must_use]
    pub fn new(
        receiver: Vec<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            receiver,
            subject: subject.into(),
            content: content.into(),
            files: Vec::new(),
            files_in_store: Vec::new(),
            store_upload_files: false,
            send_directly: true,
        }
    }

    fn into_multipart(self) -> MultipartForm {
        let mut form = MultipartForm::new();
        for receiver in self.receiver {
            form = form.text("receiver", receiver);
        }
        form = form
            .text("subject", self.subject)
            .text("content", self.content);
        for file in self.files {
            form = form.file("files", file);
        }
        for id in self.files_in_store {
            form = form.text("files_in_store", id);
        }
        form.text("store_upload_files", self.store_upload_files)
            .text("send_directly", self.send_directly)
    }
}

/// Query of [`Email::history`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailHistoryQuery {
    /// Keyword; without one the search type only selects the ordering.
    pub q: Option<String>,
    /// Records to skip.
    pub skip: u64,
    /// Page size.
    pub limit: u64,
    /// Search every user's history; requires admin rights.
    pub global_search: bool,
}

impl Default for EmailHistoryQuery {
    fn default() -> Self {
        Self {
            q: None,
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
            global_search: false,
        }
    }
}

/// Answer of the send endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailQueued {
    /// Server remark.
    pub message: String,
    /// Id of the history record tracking the email.
    pub email_history_id: String,
}
