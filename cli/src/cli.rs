// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use futures::{FutureExt, future::LocalBoxFuture};
use isyourday_client::{ApiClient, ApiError, Session};
use isyourday_core::{APP_NAME, Config, FileStore};
use tracing_subscriber::EnvFilter;

use crate::cmd_auth::{CmdLogin, CmdLogout, CmdWhoami};
use crate::cmd_completion::CmdCompletion;
use crate::cmd_email::{CmdEmailHistory, CmdEmailSend};
use crate::cmd_event::{CmdEventDelete, CmdEventList, CmdEventNew};
use crate::cmd_file::{
    CmdFileDelete, CmdFileDownload, CmdFileInfo, CmdFileList, CmdFileSearch, CmdFileUpload,
    CmdFileUsage,
};
use crate::cmd_nav::CmdNav;
use crate::cmd_user::{CmdUserDelete, CmdUserGet, CmdUserList, CmdUserNew, CmdUserSearch};
use crate::util::interruptible;

/// Run the isyourday command-line interface.
pub async fn run() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse() {
        Ok(cli) => {
            if let Err(e) = cli.run().await {
                println!("{} {}", "Error:".red(), e);
                let auth_failure = e
                    .downcast_ref::<ApiError>()
                    .is_some_and(ApiError::is_auth_failure);
                if auth_failure {
                    println!("Run `{APP_NAME} login` to log in again");
                }
            }
        }
        Err(e) => println!("{} {}", "Error:".red(), e),
    }
    Ok(())
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Manage virtual users, events, files and emails of isyourday.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $ISYOURDAY_CONFIG, then to \
$XDG_CONFIG_HOME/isyourday/config.toml on Linux and MacOS, \
%LOCALAPPDATA%/isyourday/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .subcommand(CmdLogin::command())
            .subcommand(CmdLogout::command())
            .subcommand(CmdWhoami::command())
            .subcommand(
                Command::new("user")
                    .alias("u")
                    .about("Manage virtual users")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdUserList::command())
                    .subcommand(CmdUserGet::command())
                    .subcommand(CmdUserSearch::command())
                    .subcommand(CmdUserNew::command())
                    .subcommand(CmdUserDelete::command()),
            )
            .subcommand(
                Command::new("event")
                    .alias("e")
                    .about("Manage events of virtual users")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdEventList::command())
                    .subcommand(CmdEventNew::command())
                    .subcommand(CmdEventDelete::command()),
            )
            .subcommand(
                Command::new("file")
                    .alias("f")
                    .about("Manage stored files")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdFileList::command())
                    .subcommand(CmdFileSearch::command())
                    .subcommand(CmdFileInfo::command())
                    .subcommand(CmdFileUpload::command())
                    .subcommand(CmdFileDownload::command())
                    .subcommand(CmdFileDelete::command())
                    .subcommand(CmdFileUsage::command()),
            )
            .subcommand(
                Command::new("email")
                    .alias("mail")
                    .about("Send emails and browse the history")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdEmailSend::command())
                    .subcommand(CmdEmailHistory::command()),
            )
            .subcommand(CmdNav::command())
            .subcommand(CmdCompletion::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(&matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(&matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some((CmdLogin::NAME, matches)) => Login(CmdLogin::from(matches)),
            Some((CmdLogout::NAME, _)) => Logout(CmdLogout),
            Some((CmdWhoami::NAME, matches)) => Whoami(CmdWhoami::from(matches)),
            Some(("user", matches)) => match matches.subcommand() {
                Some((CmdUserList::NAME, matches)) => UserList(CmdUserList::from(matches)),
                Some((CmdUserGet::NAME, matches)) => UserGet(CmdUserGet::from(matches)),
                Some((CmdUserSearch::NAME, matches)) => UserSearch(CmdUserSearch::from(matches)),
                Some((CmdUserNew::NAME, matches)) => UserNew(CmdUserNew::from(matches)?),
                Some((CmdUserDelete::NAME, matches)) => UserDelete(CmdUserDelete::from(matches)),
                _ => return Err("Unknown user command".into()),
            },
            Some(("event", matches)) => match matches.subcommand() {
                Some((CmdEventList::NAME, matches)) => EventList(CmdEventList::from(matches)),
                Some((CmdEventNew::NAME, matches)) => EventNew(CmdEventNew::from(matches)?),
                Some((CmdEventDelete::NAME, matches)) => EventDelete(CmdEventDelete::from(matches)),
                _ => return Err("Unknown event command".into()),
            },
            Some(("file", matches)) => match matches.subcommand() {
                Some((CmdFileList::NAME, matches)) => FileList(CmdFileList::from(matches)?),
                Some((CmdFileSearch::NAME, matches)) => FileSearch(CmdFileSearch::from(matches)),
                Some((CmdFileInfo::NAME, matches)) => FileInfo(CmdFileInfo::from(matches)),
                Some((CmdFileUpload::NAME, matches)) => FileUpload(CmdFileUpload::from(matches)),
                Some((CmdFileDownload::NAME, matches)) => {
                    FileDownload(CmdFileDownload::from(matches)?)
                }
                Some((CmdFileDelete::NAME, matches)) => FileDelete(CmdFileDelete::from(matches)),
                Some((CmdFileUsage::NAME, matches)) => FileUsage(CmdFileUsage::from(matches)),
                _ => return Err("Unknown file command".into()),
            },
            Some(("email", matches)) => match matches.subcommand() {
                Some((CmdEmailSend::NAME, matches)) => EmailSend(CmdEmailSend::from(matches)?),
                Some((CmdEmailHistory::NAME, matches)) => {
                    EmailHistory(CmdEmailHistory::from(matches))
                }
                _ => return Err("Unknown email command".into()),
            },
            Some((CmdNav::NAME, matches)) => Nav(CmdNav::from(matches)),
            Some((CmdCompletion::NAME, matches)) => Completion(CmdCompletion::from(matches)),
            _ => return Err("No command given, see `--help`".into()),
        };

        let config = matches.get_one("config").cloned();
        Ok(Cli { config, command })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Log in
    Login(CmdLogin),

    /// Forget the access token
    Logout(CmdLogout),

    /// Show the current account
    Whoami(CmdWhoami),

    /// List virtual users
    UserList(CmdUserList),

    /// Show a virtual user
    UserGet(CmdUserGet),

    /// Search virtual users
    UserSearch(CmdUserSearch),

    /// Create a virtual user
    UserNew(CmdUserNew),

    /// Delete virtual users
    UserDelete(CmdUserDelete),

    /// List events of a virtual user
    EventList(CmdEventList),

    /// Add an event
    EventNew(CmdEventNew),

    /// Delete events
    EventDelete(CmdEventDelete),

    /// List files
    FileList(CmdFileList),

    /// Search files
    FileSearch(CmdFileSearch),

    /// Show file metadata
    FileInfo(CmdFileInfo),

    /// Upload files
    FileUpload(CmdFileUpload),

    /// Download a file
    FileDownload(CmdFileDownload),

    /// Delete files
    FileDelete(CmdFileDelete),

    /// Show storage usage
    FileUsage(CmdFileUsage),

    /// Send an email
    EmailSend(CmdEmailSend),

    /// Search the email history
    EmailHistory(CmdEmailHistory),

    /// Resolve a page path
    Nav(CmdNav),

    /// Generate shell completion
    Completion(CmdCompletion),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            Login(a)        => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            Logout(a)       => Self::run_with(config, |x| ready(a.run(x))).await,
            Whoami(a)       => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            UserList(a)     => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            UserGet(a)      => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            UserSearch(a)   => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            UserNew(a)      => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            UserDelete(a)   => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            EventList(a)    => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            EventNew(a)     => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            EventDelete(a)  => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            FileList(a)     => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            FileSearch(a)   => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            FileInfo(a)     => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            FileUpload(a)   => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            FileDownload(a) => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            FileDelete(a)   => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            FileUsage(a)    => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            EmailSend(a)    => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            EmailHistory(a) => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            Nav(a)          => Self::run_with(config, |x| ready(a.run(x))).await,
            Completion(a)   => a.run(),
        }
    }

    async fn run_with<F>(config: Option<PathBuf>, f: F) -> Result<(), Box<dyn Error>>
    where
        F: for<'a> FnOnce(&'a ApiClient) -> LocalBoxFuture<'a, Result<(), Box<dyn Error>>>,
    {
        tracing::debug!("parsing configuration...");
        let config = Config::parse(config).await?;

        let session = match config.credentials_path() {
            Some(path) => Session::new(FileStore::open(path)?),
            None => {
                tracing::warn!("no state directory, the login will not be remembered");
                Session::in_memory()
            }
        };
        let client = ApiClient::new(config.client, session)?;

        interruptible(f(&client)).await
    }
}

fn ready<'a>(
    result: Result<(), Box<dyn Error>>,
) -> LocalBoxFuture<'a, Result<(), Box<dyn Error>>> {
    futures::future::ready(result).boxed_local()
}

#[cfg(test)]
mod tests {
    use isyourday_client::{EmailReceiverType, FileRangeRole};

    use super::*;
    use crate::cmd_completion::Shell;
    use crate::util::OutputFormat;

    #[test]
    fn test_parse_config() {
        let cli = Cli::try_parse_from(vec!["test", "-c", "/tmp/config.toml", "whoami"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
        assert!(matches!(cli.command, Commands::Whoami(_)));
    }

    #[test]
    fn test_parse_requires_command() {
        assert!(Cli::try_parse_from(vec!["test"]).is_err());
    }

    #[test]
    fn test_parse_login() {
        let cli = Cli::try_parse_from(vec!["test", "login", "alice", "-p", "pw"]).unwrap();
        match cli.command {
            Commands::Login(cmd) => assert_eq!(cmd.username.as_deref(), Some("alice")),
            _ => panic!("Expected Login command"),
        }
    }

    #[test]
    fn test_parse_logout() {
        let cli = Cli::try_parse_from(vec!["test", "logout"]).unwrap();
        assert!(matches!(cli.command, Commands::Logout(_)));
    }

    #[test]
    fn test_parse_user_list() {
        let args = vec!["test", "user", "list", "--output-format", "json"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::UserList(cmd) => assert_eq!(cmd.output_format, OutputFormat::Json),
            _ => panic!("Expected UserList command"),
        }
    }

    #[test]
    fn test_parse_user_alias() {
        let cli = Cli::try_parse_from(vec!["test", "u", "ls"]).unwrap();
        assert!(matches!(cli.command, Commands::UserList(_)));
    }

    #[test]
    fn test_parse_user_get() {
        let cli = Cli::try_parse_from(vec!["test", "user", "get", "42"]).unwrap();
        match cli.command {
            Commands::UserGet(cmd) => assert_eq!(cmd.id, "42"),
            _ => panic!("Expected UserGet command"),
        }
    }

    #[test]
    fn test_parse_user_delete() {
        let cli = Cli::try_parse_from(vec!["test", "user", "rm", "id1", "id2"]).unwrap();
        match cli.command {
            Commands::UserDelete(cmd) => {
                assert_eq!(cmd.ids, vec!["id1".to_string(), "id2".to_string()]);
            }
            _ => panic!("Expected UserDelete command"),
        }
    }

    #[test]
    fn test_parse_event_new() {
        let args = vec!["test", "event", "add", "Standup", "-u", "u1"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::EventNew(cmd) => {
                assert_eq!(cmd.user_id, "u1");
                assert_eq!(cmd.event.title, "Standup");
            }
            _ => panic!("Expected EventNew command"),
        }
    }

    #[test]
    fn test_parse_file_list() {
        let cli = Cli::try_parse_from(vec!["test", "file", "list", "all"]).unwrap();
        match cli.command {
            Commands::FileList(cmd) => assert_eq!(cmd.range, FileRangeRole::All),
            _ => panic!("Expected FileList command"),
        }
    }

    #[test]
    fn test_parse_file_usage() {
        let cli = Cli::try_parse_from(vec!["test", "file", "usage", "--global"]).unwrap();
        match cli.command {
            Commands::FileUsage(cmd) => assert!(cmd.global),
            _ => panic!("Expected FileUsage command"),
        }
    }

    #[test]
    fn test_parse_email_send() {
        let args = vec!["test", "mail", "send", "u1", "-t", "user", "-s", "S", "-c", "C"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::EmailSend(cmd) => assert_eq!(cmd.receiver_type, EmailReceiverType::User),
            _ => panic!("Expected EmailSend command"),
        }
    }

    #[test]
    fn test_parse_email_history() {
        let cli = Cli::try_parse_from(vec!["test", "email", "history"]).unwrap();
        assert!(matches!(cli.command, Commands::EmailHistory(_)));
    }

    #[test]
    fn test_parse_nav() {
        let cli = Cli::try_parse_from(vec!["test", "nav", "/sendemail"]).unwrap();
        match cli.command {
            Commands::Nav(cmd) => assert_eq!(cmd.path, "/sendemail"),
            _ => panic!("Expected Nav command"),
        }
    }

    #[test]
    fn test_parse_completion() {
        let cli = Cli::try_parse_from(vec!["test", "completion", "zsh"]).unwrap();
        match cli.command {
            Commands::Completion(cmd) => assert_eq!(cmd.shell, Shell::Zsh),
            _ => panic!("Expected Completion command"),
        }
    }
}
