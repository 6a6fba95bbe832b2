// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Typed client for the isyourday REST API.
//!
//! One [`ApiClient`] is built per process from an [`ApiConfig`] and an explicit
//! [`Session`]. Resources are reached through accessor methods such as
//! [`ApiClient::virtual_users`] or [`ApiClient::files`], each of which maps
//! typed arguments onto exactly one HTTP call.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::struct_excessive_bools
)]

mod cancel;
mod client;
mod config;
mod error;
mod http;
mod models;
mod request;
mod services;
mod session;

pub use crate::cancel::{CancelHandle, cancelable};
pub use crate::client::ApiClient;
pub use crate::config::ApiConfig;
pub use crate::error::ApiError;
pub use crate::http::HttpClient;
pub use crate::models::{
    EmailHistorySearchType, EmailReceiverType, EmailSendHistory, EmailSendHistoryUpdate, Event,
    EventPublic, FileDb, FileRangeRole, HttpValidationError, Message, Page, PaginationInfo, Token,
    UserPublic, UserSearchRole, UserUpdate, ValidationError, VirtualUser, VirtualUserPublic,
};
pub use crate::request::{ApiRequest, Body, FilePart, MultipartForm};
pub use crate::services::auth::{Auth, LoginForm, RegisterForm};
pub use crate::services::email::{Email, EmailHistoryQuery, EmailQueued, SendEmail};
pub use crate::services::event::Events;
pub use crate::services::file::{
    ByteRange, ChunkReceipt, DownloadInfo, FileSearch, FileStats, FileStream, Files, ReplaceFile,
    TempCleanup, UpdateFileInfo, UploadChunk, UploadFiles, UploadReport, UploadStatus,
    UploadSummary,
};
pub use crate::services::virtual_user::VirtualUsers;
pub use crate::session::{
    ACCESS_TOKEN_KEY, CredentialStore, MemoryStore, Session, TOKEN_TYPE_KEY,
};
