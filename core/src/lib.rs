// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Application layer of isyourday: configuration, persisted credentials and
//! the login-guarded route table.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_debug_implementations,
    unsafe_code,
    unused_import_braces,
    clippy::dbg_macro,
    clippy::pedantic
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod router;
mod store;

pub use crate::config::{APP_NAME, Config, StateConfig};
pub use crate::router::{Guard, LOGIN_PATH, Navigation, ROUTES, Route, Router, View};
pub use crate::store::FileStore;
