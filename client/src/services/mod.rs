// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! One module per API resource; each method issues exactly one HTTP call.

pub mod auth;
pub mod email;
pub mod event;
pub mod file;
pub mod virtual_user;

/// Default `skip` of paginated endpoints.
pub(crate) const DEFAULT_SKIP: u64 = 0;

/// Default `limit` of paginated endpoints.
pub(crate) const DEFAULT_LIMIT: u64 = 10;

/// Serializes ids for a batch body without touching their content.
pub(crate) fn id_list<S: AsRef<str>>(ids: &[S]) -> Vec<&str> {
    ids.iter().map(AsRef::as_ref).collect()
}
