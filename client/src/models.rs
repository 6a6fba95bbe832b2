// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Data shapes exchanged with the server.
//!
//! All entities are owned by the server; the client only holds transient
//! copies. Optional fields that are unset are left out of request bodies so
//! that partial updates never clear data by accident.

use std::fmt;
use std::str::FromStr;

use jiff::civil::DateTime;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

const fn default_true() -> bool {
    true
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Virtual user managed by the isyourday service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualUser {
    /// Unique identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Real name.
    pub real_name: String,
    /// 0 is unknown, 1 is man, 2 is woman.
    #[serde(default)]
    pub sex: i32,
    /// Birthday.
    #[serde(default)]
    pub birthday: Option<DateTime>,
    /// Telephone number.
    #[serde(default)]
    pub tel: Option<String>,
    /// Prompt used in AI interactions.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Location.
    #[serde(default)]
    pub location: Option<String>,
    /// QQ number.
    #[serde(rename = "QQ", default)]
    pub qq: Option<String>,
    /// WeChat ID.
    #[serde(default)]
    pub wechat: Option<String>,
    /// Identification information.
    #[serde(default)]
    pub identify: Option<String>,
    /// Whether the virtual user is active.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Email address.
    pub email: String,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

/// Writable fields of a virtual user, used to create or update one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualUserPublic {
    /// Real name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    /// 0 unknown, 1 male, 2 female.
    #[serde(default)]
    pub sex: i32,
    /// Date of birth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<DateTime>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    /// Prompt used in AI interactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Home location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// QQ number.
    #[serde(rename = "QQ", default, skip_serializing_if = "Option::is_none")]
    pub qq: Option<String>,
    /// WeChat id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wechat: Option<String>,
    /// Identity card number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identify: Option<String>,
    /// Email address.
    pub email: String,
}

impl From<&VirtualUser> for VirtualUserPublic {
    fn from(user: &VirtualUser) -> Self {
        Self {
            real_name: Some(user.real_name.clone()),
            sex: user.sex,
            birthday: user.birthday,
            tel: user.tel.clone(),
            prompt: user.prompt.clone(),
            location: user.location.clone(),
            qq: user.qq.clone(),
            wechat: user.wechat.clone(),
            identify: user.identify.clone(),
            email: user.email.clone(),
        }
    }
}

/// Event owned by a virtual user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Owner of the event.
    pub user_id: Uuid,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Prompt used in AI interactions.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Start time.
    #[serde(default)]
    pub start_time: Option<DateTime>,
    /// End time.
    #[serde(default)]
    pub end_time: Option<DateTime>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

/// Writable fields of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPublic {
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Prompt used in AI interactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime>,
    /// End time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime>,
}

impl From<&Event> for EventPublic {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            prompt: event.prompt.clone(),
            start_time: event.start_time,
            end_time: event.end_time,
        }
    }
}

/// Stored file metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDb {
    /// Unique identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// File name.
    pub name: String,
    /// MD5 hash of the content.
    pub md5: String,
    /// Whether the file is publicly accessible.
    #[serde(default)]
    pub is_public: bool,
    /// Storage path on the server.
    pub path: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: i64,
    /// Uploader.
    #[serde(default)]
    pub uploader_id: Option<Uuid>,
    /// Upload time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_time: Option<DateTime>,
}

/// Account as exposed by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPublic {
    /// Unique identifier.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Stored file used as the avatar.
    #[serde(default)]
    pub avatar_id: Option<Uuid>,
    /// Whether the account is activated.
    pub active: bool,
    /// Administrator flag.
    #[serde(default)]
    pub is_superuser: bool,
    /// Staff flag, spelled as the server spells it.
    #[serde(default)]
    pub is_stuff: bool,
}

/// Partial account update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New login name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New real name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    /// New password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Bearer token pair returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The access token.
    pub access_token: String,
    /// The token type, `bearer` unless the server says otherwise.
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

/// Plain acknowledgement returned by delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Human-readable outcome.
    pub message: String,
}

/// Record of a sent (or pending) email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailSendHistory {
    /// Unique identifier.
    pub id: Uuid,
    /// `user` or `isyourday`.
    pub receiver_type: String,
    /// Comma-separated receiver addresses.
    pub receiver_emails: String,
    /// Comma-separated receiver names.
    pub receiver_names: String,
    /// Account that sent the email.
    pub sender_id: Uuid,
    /// Subject.
    pub subject: String,
    /// Content, possibly HTML.
    pub content: String,
    /// Comma-separated attachment file ids.
    #[serde(default)]
    pub attachments: String,
    /// Send time, unset while pending.
    #[serde(default)]
    pub sent_at: Option<DateTime>,
    /// `pending`, `sent`, `success` or `failed`.
    pub status: String,
    /// Failure reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Partial update of an email history record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailSendHistoryUpdate {
    /// Receiver kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_type: Option<String>,
    /// Comma-separated receiver addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_emails: Option<String>,
    /// Comma-separated receiver names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_names: Option<String>,
    /// Subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Comma-separated attachment file ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<String>,
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// Records skipped.
    pub skip: u64,
    /// Page size.
    pub limit: u64,
    /// Total number of records.
    pub total: u64,
    /// Current page, starting at 1.
    pub page: u64,
    /// Number of pages.
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

/// One page of a list endpoint.
///
/// Servers answer either `{"items": [...], "pagination": {...}}` or a bare
/// array; the latter yields a page without pagination info.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Records of this page.
    pub items: Vec<T>,
    /// Absent when the server sent a bare array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationInfo>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw<T> {
            Paged {
                items: Vec<T>,
                pagination: PaginationInfo,
            },
            Bare(Vec<T>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Paged { items, pagination } => Self {
                items,
                pagination: Some(pagination),
            },
            Raw::Bare(items) => Self {
                items,
                pagination: None,
            },
        })
    }
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.pagination.is_some_and(|p| p.has_next)
    }

    /// Total number of records, falling back to the page length.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.pagination
            .map_or(self.items.len() as u64, |p| p.total)
    }
}

/// A single schema violation reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Location of the offending value, e.g. `["body", "email"]`.
    pub loc: Vec<serde_json::Value>,
    /// Human-readable message.
    pub msg: String,
    /// Error kind, e.g. `missing`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc: Vec<String> = self
            .loc
            .iter()
            .map(|a| match a {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        write!(f, "{}: {}", loc.join("."), self.msg)
    }
}

/// Body of an HTTP 422 response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpValidationError {
    /// Every violation found.
    #[serde(default)]
    pub detail: Vec<ValidationError>,
}

impl fmt::Display for HttpValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.detail.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

/// Defines a string-valued enum used in paths and query strings.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant, )+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &[Self] = &[$(Self::$variant),+];

            /// Returns the wire value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ApiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(ApiError::Config(format!(
                        concat!("Invalid ", stringify!($name), ": {}"),
                        s
                    ))),
                }
            }
        }
    };
}

string_enum! {
    /// Which files a listing covers.
    pub enum FileRangeRole {
        /// Files uploaded by the current user.
        Private => "private",
        /// Public files.
        Public => "public",
        /// Own and public files.
        All => "all",
        /// Every file; requires admin rights.
        Global => "global",
    }
}

string_enum! {
    /// Field used to look up an account profile.
    pub enum UserSearchRole {
        /// Look up by username.
        Username => "username",
        /// Look up by email.
        Email => "email",
        /// Look up by id.
        Id => "id",
    }
}

string_enum! {
    /// Kind of email receivers.
    pub enum EmailReceiverType {
        /// Registered accounts.
        User => "user",
        /// Virtual users.
        IsYourDay => "isyourday",
    }
}

string_enum! {
    /// Field searched in the email history.
    pub enum EmailHistorySearchType {
        /// Search the subject.
        Subject => "subject_search",
        /// Search the content.
        Content => "content_search",
        /// Search receiver addresses.
        ReceiverEmail => "receiver_email_search",
        /// Search receiver names.
        ReceiverName => "receiver_name_search",
        /// No filtering.
        All => "all",
    }
}
