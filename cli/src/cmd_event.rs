// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use isyourday_client::{ApiClient, Event, EventPublic};

use crate::arg::{CommonArgs, IdArgs, PageArgs, arg_yes, get_yes};
use crate::table::{Column, Table};
use crate::util::{OutputFormat, confirm, format_datetime, parse_datetime, print_json};

const ARGS: IdArgs = IdArgs::new("event");

#[derive(Debug, Clone)]
pub struct CmdEventList {
    pub user_id: String,
    pub page: PageArgs,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdEventList {
    pub const NAME: &str = "list";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List events of a virtual user")
            .arg(IdArgs::user())
            .arg(PageArgs::skip())
            .arg(PageArgs::limit())
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            user_id: IdArgs::get_user(matches),
            page: PageArgs::from(matches),
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing events...");
        let events = client.events();
        let page = events.list(&self.user_id, self.page.skip, self.page.limit).await?;
        match self.output_format {
            OutputFormat::Json => print_json(&page),
            OutputFormat::Table if page.items.is_empty() => {
                println!("{}", "No events found".italic());
                Ok(())
            }
            OutputFormat::Table => {
                print_events(&page.items, self.output_format, self.verbose)?;
                if page.has_next() {
                    let prompt = format!("Displaying {}/{} events", page.items.len(), page.total());
                    println!("{}", prompt.italic());
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CmdEventNew {
    pub user_id: String,
    pub event: EventPublic,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdEventNew {
    pub const NAME: &str = "new";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("add")
            .about("Add an event to a virtual user")
            .arg(IdArgs::user())
            .arg(arg!(title: <TITLE> "Title of the event"))
            .arg(arg!(--description <DESCRIPTION> "Description of the event"))
            .arg(arg!(--start <START> "Start date and time of the event"))
            .arg(arg!(--end <END> "End date and time of the event"))
            .arg(arg!(--prompt <PROMPT> "Prompt used in AI interactions"))
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let get = |name: &str| matches.get_one::<String>(name).cloned();
        let start_time = get("start").map(|a| parse_datetime(&a)).transpose()?;
        let end_time = get("end").map(|a| parse_datetime(&a)).transpose()?;
        if let (Some(start), Some(end)) = (start_time, end_time) {
            if end < start {
                return Err("End time must not be before start time".into());
            }
        }

        let event = EventPublic {
            title: get("title").ok_or("Title is required for new event")?,
            description: get("description"),
            prompt: get("prompt"),
            start_time,
            end_time,
        };

        Ok(Self {
            user_id: IdArgs::get_user(matches),
            event,
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        })
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "adding new event...");
        let event = client.events().create(&self.user_id, &self.event).await?;
        print_events(&[event], self.output_format, self.verbose)
    }
}

#[derive(Debug, Clone)]
pub struct CmdEventDelete {
    pub user_id: String,
    pub ids: Vec<String>,
    pub yes: bool,
}

impl CmdEventDelete {
    pub const NAME: &str = "delete";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("rm")
            .about("Delete events of a virtual user")
            .arg(IdArgs::user())
            .arg(ARGS.ids())
            .arg(arg_yes())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            user_id: IdArgs::get_user(matches),
            ids: IdArgs::get_ids(matches),
            yes: get_yes(matches),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "deleting events...");
        let prompt = format!("Delete {} event(s)?", self.ids.len());
        if !self.yes && !confirm(&prompt)? {
            tracing::info!("user cancel the deletion");
            return Ok(());
        }

        let events = client.events();
        let call = events.delete_batch(&self.user_id, &self.ids);
        let message = call.await?;
        println!("{}", message.message);
        Ok(())
    }
}

fn print_events(
    events: &[Event],
    output_format: OutputFormat,
    verbose: bool,
) -> Result<(), Box<dyn Error>> {
    if output_format == OutputFormat::Json {
        return print_json(&events);
    }

    let mut columns = vec![
        Column::new("ID", |a: &Event| a.id.map(|id| id.to_string()).unwrap_or_default()),
        Column::new("Time Range", time_range),
        Column::new("Title", |a: &Event| a.title.clone()),
    ];
    if verbose {
        columns.push(Column::new("Description", |a: &Event| {
            a.description.clone().unwrap_or_default()
        }));
    }
    print!("{}", Table::new(&columns, events));
    Ok(())
}

fn time_range(event: &Event) -> String {
    match (event.start_time, event.end_time) {
        (Some(start), Some(end)) if start.date() == end.date() => format!(
            "{} {}~{}",
            start.strftime("%Y-%m-%d"),
            start.strftime("%H:%M"),
            end.strftime("%H:%M")
        ),
        (Some(start), Some(end)) => format!(
            "{}~{}",
            format_datetime(Some(start)),
            format_datetime(Some(end))
        ),
        (Some(start), None) => format_datetime(Some(start)),
        (None, Some(end)) => format!("~{}", format_datetime(Some(end))),
        (None, None) => String::new(),
    }
}
