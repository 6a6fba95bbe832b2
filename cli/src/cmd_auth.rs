// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use isyourday_client::{ApiClient, LoginForm, UserPublic};

use crate::arg::CommonArgs;
use crate::table::{Column, Table};
use crate::util::{OutputFormat, print_json};

#[derive(Debug, Clone)]
pub struct CmdLogin {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CmdLogin {
    pub const NAME: &str = "login";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Log in and remember the access token")
            .arg(arg!(username: [USERNAME] "Username or email"))
            .arg(
                arg!(-p --password <PASSWORD> "Password, prompted for when omitted")
                    .env("ISYOURDAY_PASSWORD")
                    .hide_env_values(true),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            username: matches.get_one("username").cloned(),
            password: matches.get_one("password").cloned(),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(username = ?self.username, "logging in...");
        let username = match self.username {
            Some(username) => username,
            None => cliclack::input("Username").interact()?,
        };
        let password = match self.password {
            Some(password) => password,
            None => cliclack::password("Password").mask('▪').interact()?,
        };

        let form = LoginForm::new(username, password);
        client.auth().login(&form).await?;

        let user = client.auth().me().await?;
        println!("Logged in as {}", user.username.bold());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdLogout;

impl CmdLogout {
    pub const NAME: &str = "logout";

    pub fn command() -> Command {
        Command::new(Self::NAME).about("Forget the stored access token")
    }

    pub fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!("logging out...");
        client.auth().logout()?;
        println!("Logged out");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdWhoami {
    pub output_format: OutputFormat,
}

impl CmdWhoami {
    pub const NAME: &str = "whoami";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show the logged-in account")
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        if !client.session().is_authenticated() {
            return Err("Not logged in, run `isyourday login` first".into());
        }

        let user = client.auth().me().await?;
        match self.output_format {
            OutputFormat::Json => print_json(&user)?,
            OutputFormat::Table => {
                let columns = user_columns();
                print!("{}", Table::new(&columns, &[user]));
            }
        }
        Ok(())
    }
}

pub fn user_columns() -> Vec<Column<UserPublic>> {
    vec![
        Column::new("ID", |a: &UserPublic| a.id.to_string()),
        Column::new("Username", |a: &UserPublic| a.username.clone()),
        Column::new("Email", |a: &UserPublic| a.email.clone()),
        Column::new("Role", |a: &UserPublic| {
            if a.is_superuser { "admin" } else { "user" }.to_string()
        }),
        Column::new("Active", |a: &UserPublic| a.active.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login() {
        let cmd = Command::new("test")
            .subcommand_required(true)
            .subcommand(CmdLogin::command());

        let matches = cmd
            .try_get_matches_from(["test", "login", "alice", "--password", "secret"])
            .unwrap();
        let sub_matches = matches.subcommand_matches("login").unwrap();
        let parsed = CmdLogin::from(sub_matches);
        assert_eq!(parsed.username.as_deref(), Some("alice"));
        assert_eq!(parsed.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_parse_whoami() {
        let cmd = Command::new("test")
            .subcommand_required(true)
            .subcommand(CmdWhoami::command());

        let matches = cmd
            .try_get_matches_from(["test", "whoami", "--output-format", "json"])
            .unwrap();
        let sub_matches = matches.subcommand_matches("whoami").unwrap();
        let parsed = CmdWhoami::from(sub_matches);
        assert_eq!(parsed.output_format, OutputFormat::Json);
    }
}
