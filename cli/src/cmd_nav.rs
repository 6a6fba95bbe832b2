// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use isyourday_client::ApiClient;
use isyourday_core::{Guard, Router, View};

use crate::arg::CommonArgs;
use crate::util::{OutputFormat, print_json};

/// Resolves a page path the way the web front-end does, login guard included.
#[derive(Debug, Clone)]
pub struct CmdNav {
    pub path: String,
    pub output_format: OutputFormat,
}

impl CmdNav {
    pub const NAME: &str = "nav";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show which page a path leads to")
            .arg(arg!(path: [PATH] "Path to navigate to").default_value("/"))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            path: matches
                .get_one::<String>("path")
                .cloned()
                .unwrap_or_else(|| "/".to_string()),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "navigating...");
        let router = Router::new(client.session().clone());
        let guard = router.before_each(&self.path);
        let nav = router.navigate(&self.path);

        match self.output_format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "from": self.path,
                "redirected": guard != Guard::Proceed,
                "path": nav.path,
                "view": nav.view.to_string(),
            })),
            OutputFormat::Table => {
                if let Guard::Redirect(to) = &guard {
                    println!("{} not logged in, redirected to {to}", "Guard:".yellow());
                }
                let view = match nav.view {
                    View::NotFound => nav.view.to_string().red(),
                    _ => nav.view.to_string().green(),
                };
                println!("{} {view}", nav.path.bold());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nav() {
        let cmd = Command::new("test")
            .subcommand_required(true)
            .subcommand(CmdNav::command());

        let matches = cmd.try_get_matches_from(["test", "nav", "/user"]).unwrap();
        let parsed = CmdNav::from(matches.subcommand_matches("nav").unwrap());
        assert_eq!(parsed.path, "/user");
        assert_eq!(parsed.output_format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_nav_default_root() {
        let cmd = Command::new("test")
            .subcommand_required(true)
            .subcommand(CmdNav::command());

        let matches = cmd.try_get_matches_from(["test", "nav"]).unwrap();
        let parsed = CmdNav::from(matches.subcommand_matches("nav").unwrap());
        assert_eq!(parsed.path, "/");
    }
}
