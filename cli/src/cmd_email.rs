// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::PathBuf;

use clap::{ArgMatches, Command, ValueHint, arg, value_parser};
use colored::{Color, Colorize};
use isyourday_client::{
    ApiClient, EmailHistoryQuery, EmailHistorySearchType, EmailReceiverType, EmailSendHistory,
    FilePart, SendEmail,
};

use crate::arg::{CommonArgs, PageArgs};
use crate::table::{Column, Table};
use crate::util::{OutputFormat, format_datetime, print_json};

#[derive(Debug, Clone)]
pub struct CmdEmailSend {
    pub receiver_type: EmailReceiverType,
    pub receivers: Vec<String>,
    pub subject: String,
    pub content: Option<String>,
    pub content_file: Option<PathBuf>,
    pub attachments: Vec<PathBuf>,
    pub stored: Vec<String>,
    pub keep_attachments: bool,
    pub pending: bool,
}

impl CmdEmailSend {
    pub const NAME: &str = "send";

    pub fn command() -> Command {
        let types: Vec<&str> = EmailReceiverType::ALL.iter().map(|a| a.as_str()).collect();
        Command::new(Self::NAME)
            .about("Send an email to accounts or virtual users")
            .arg(arg!(to: <RECEIVER> "Receiver ids").num_args(1..))
            .arg(
                arg!(-t --"receiver-type" <TYPE> "Kind of the receivers")
                    .value_parser(types)
                    .default_value(EmailReceiverType::IsYourDay.as_str()),
            )
            .arg(arg!(-s --subject <SUBJECT> "Subject of the email").required(true))
            .arg(
                arg!(-c --content <CONTENT> "Content of the email, HTML is allowed")
                    .conflicts_with("content-file"),
            )
            .arg(
                arg!(--"content-file" <PATH> "Read the content from a file")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(
                arg!(-a --attach <PATH> "Attach a local file")
                    .action(clap::ArgAction::Append)
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(
                arg!(--stored <FILE_ID> "Attach a file already on the server")
                    .action(clap::ArgAction::Append),
            )
            .arg(arg!(--"keep-attachments" "Keep uploaded attachments on the server"))
            .arg(arg!(--pending "Record the email as pending instead of sending it now"))
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let receiver_type = match matches.get_one::<String>("receiver-type") {
            Some(a) => a.parse()?,
            None => EmailReceiverType::IsYourDay,
        };
        let content = matches.get_one::<String>("content").cloned();
        let content_file = matches.get_one::<PathBuf>("content-file").cloned();
        if content.is_none() && content_file.is_none() {
            return Err("Content is required, use --content or --content-file".into());
        }

        Ok(Self {
            receiver_type,
            receivers: matches
                .get_many::<String>("to")
                .map(|a| a.cloned().collect())
                .unwrap_or_default(),
            subject: matches
                .get_one::<String>("subject")
                .cloned()
                .unwrap_or_default(),
            content,
            content_file,
            attachments: matches
                .get_many::<PathBuf>("attach")
                .map(|a| a.cloned().collect())
                .unwrap_or_default(),
            stored: matches
                .get_many::<String>("stored")
                .map(|a| a.cloned().collect())
                .unwrap_or_default(),
            keep_attachments: matches.get_flag("keep-attachments"),
            pending: matches.get_flag("pending"),
        })
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "sending email...");
        let content = match (self.content, &self.content_file) {
            (Some(content), _) => content,
            (None, Some(path)) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
            (None, None) => return Err("Content is required".into()),
        };

        let mut files = Vec::with_capacity(self.attachments.len());
        for path in &self.attachments {
            files.push(FilePart::from_path(path).await?);
        }

        let form = SendEmail {
            files,
            files_in_store: self.stored,
            store_upload_files: self.keep_attachments,
            send_directly: !self.pending,
            ..SendEmail::new(self.receivers, self.subject, content)
        };
        let queued = client.email().send(self.receiver_type, form).await?;
        println!("{} (history {})", queued.message, queued.email_history_id);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdEmailHistory {
    pub search_type: EmailHistorySearchType,
    pub query: EmailHistoryQuery,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdEmailHistory {
    pub const NAME: &str = "history";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Search the sent emails")
            .arg(arg!(query: [QUERY] "Keyword to search for"))
            .arg(
                arg!(--by <FIELD> "Field to search")
                    .value_parser(["subject", "content", "email", "name", "all"])
                    .default_value("all"),
            )
            .arg(arg!(--global "Search every user's history, requires admin rights"))
            .arg(PageArgs::skip())
            .arg(PageArgs::limit())
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let search_type = match matches.get_one::<String>("by").map(String::as_str) {
            Some("subject") => EmailHistorySearchType::Subject,
            Some("content") => EmailHistorySearchType::Content,
            Some("email") => EmailHistorySearchType::ReceiverEmail,
            Some("name") => EmailHistorySearchType::ReceiverName,
            _ => EmailHistorySearchType::All,
        };
        let page = PageArgs::from(matches);
        Self {
            search_type,
            query: EmailHistoryQuery {
                q: matches.get_one("query").cloned(),
                skip: page.skip,
                limit: page.limit,
                global_search: matches.get_flag("global"),
            },
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "searching email history...");
        let page = client.email().history(self.search_type, &self.query).await?;
        if self.output_format == OutputFormat::Json {
            return print_json(&page);
        } else if page.items.is_empty() {
            println!("{}", "No emails found".italic());
            return Ok(());
        }

        let mut columns = vec![
            Column::new("ID", |a: &EmailSendHistory| a.id.to_string()),
            Column::new("Status", |a: &EmailSendHistory| a.status.clone()).with_color(status),
            Column::new("Sent", |a: &EmailSendHistory| format_datetime(a.sent_at)),
            Column::new("Receivers", |a: &EmailSendHistory| a.receiver_emails.clone()),
            Column::new("Subject", |a: &EmailSendHistory| a.subject.clone()),
        ];
        if self.verbose {
            columns.push(Column::new("Reason", |a: &EmailSendHistory| {
                a.reason.clone().unwrap_or_default()
            }));
        }
        print!("{}", Table::new(&columns, &page.items));

        if page.has_next() {
            let prompt = format!("Displaying {}/{} emails", page.items.len(), page.total());
            println!("{}", prompt.italic());
        }
        Ok(())
    }
}

fn status(history: &EmailSendHistory) -> Option<Color> {
    match history.status.as_str() {
        "failed" => Some(Color::Red),
        "pending" => Some(Color::Yellow),
        _ => None,
    }
}
