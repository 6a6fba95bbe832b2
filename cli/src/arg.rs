// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgAction, ArgMatches, arg, value_parser};

use crate::util::OutputFormat;

const DEFAULT_LIMIT: u64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn verbose() -> Arg {
        arg!(-v --verbose "Show more detailed information")
    }

    pub fn get_verbose(matches: &ArgMatches) -> bool {
        matches.get_flag("verbose")
    }

    pub fn output_format() -> Arg {
        arg!(--"output-format" <FORMAT> "Output format")
            .value_parser(value_parser!(OutputFormat))
            .default_value("table")
    }

    pub fn get_output_format(matches: &ArgMatches) -> OutputFormat {
        matches
            .get_one("output-format")
            .copied()
            .unwrap_or(OutputFormat::Table)
    }
}

/// Paging of list commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageArgs {
    pub skip: u64,
    pub limit: u64,
}

impl PageArgs {
    pub fn skip() -> Arg {
        arg!(--skip <N> "Number of records to skip")
            .value_parser(value_parser!(u64))
            .default_value("0")
    }

    pub fn limit() -> Arg {
        arg!(-n --limit <N> "Maximum number of records to show")
            .value_parser(value_parser!(u64).range(1..))
            .default_value("10")
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            skip: matches.get_one("skip").copied().unwrap_or_default(),
            limit: matches.get_one("limit").copied().unwrap_or(DEFAULT_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IdArgs {
    kind: &'static str,
}

impl IdArgs {
    pub const fn new(kind: &'static str) -> Self {
        Self { kind }
    }

    pub fn id(self) -> Arg {
        let help = format!("The id of the {}", self.kind);
        arg!(id: <ID>).help(help)
    }

    pub fn get_id(matches: &ArgMatches) -> String {
        matches.get_one::<String>("id").cloned().unwrap_or_default()
    }

    pub fn ids(self) -> Arg {
        let help = format!("The ids of the {}s", self.kind);
        arg!(id: <ID>).help(help).num_args(1..)
    }

    pub fn get_ids(matches: &ArgMatches) -> Vec<String> {
        matches
            .get_many::<String>("id")
            .map(|ids| ids.cloned().collect())
            .unwrap_or_default()
    }

    pub fn user() -> Arg {
        arg!(user: -u --user <USER_ID> "The id of the virtual user").required(true)
    }

    pub fn get_user(matches: &ArgMatches) -> String {
        matches
            .get_one::<String>("user")
            .cloned()
            .unwrap_or_default()
    }
}

pub fn arg_yes() -> Arg {
    arg!(-y --yes "Do not ask for confirmation").action(ArgAction::SetTrue)
}

pub fn get_yes(matches: &ArgMatches) -> bool {
    matches.get_flag("yes")
}
