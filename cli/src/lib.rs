// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line front-end of isyourday.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    clippy::dbg_macro
)]

mod arg;
mod cli;
mod cmd_auth;
mod cmd_completion;
mod cmd_email;
mod cmd_event;
mod cmd_file;
mod cmd_nav;
mod cmd_user;
mod table;
mod util;

pub use crate::cli::{Cli, Commands, run};
