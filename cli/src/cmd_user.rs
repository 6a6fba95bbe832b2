// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg, value_parser};
use colored::{Color, Colorize};
use isyourday_client::{ApiClient, Page, VirtualUser, VirtualUserPublic};

use crate::arg::{CommonArgs, IdArgs, PageArgs, arg_yes, get_yes};
use crate::table::{Column, Table};
use crate::util::{OutputFormat, confirm, format_datetime, parse_datetime, print_json};

const ARGS: IdArgs = IdArgs::new("virtual user");

#[derive(Debug, Clone, Copy)]
pub struct CmdUserList {
    pub page: PageArgs,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdUserList {
    pub const NAME: &str = "list";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List virtual users")
            .arg(PageArgs::skip())
            .arg(PageArgs::limit())
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            page: PageArgs::from(matches),
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing virtual users...");
        let users = client.virtual_users();
        let page = users.list(self.page.skip, self.page.limit).await?;
        print_page(&page, self.output_format, self.verbose)
    }
}

#[derive(Debug, Clone)]
pub struct CmdUserGet {
    pub id: String,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdUserGet {
    pub const NAME: &str = "get";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("show")
            .about("Show a virtual user")
            .arg(ARGS.id())
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            id: IdArgs::get_id(matches),
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "getting virtual user...");
        let user = client.virtual_users().get(&self.id).await?;
        print_users(&[user], self.output_format, self.verbose)
    }
}

#[derive(Debug, Clone)]
pub struct CmdUserSearch {
    pub query: Option<String>,
    pub page: PageArgs,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdUserSearch {
    pub const NAME: &str = "search";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Search virtual users by name, email or phone")
            .arg(arg!(query: [QUERY] "Keyword to search for"))
            .arg(PageArgs::skip())
            .arg(PageArgs::limit())
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            query: matches.get_one("query").cloned(),
            page: PageArgs::from(matches),
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "searching virtual users...");
        let users = client.virtual_users();
        let call = users.search(self.query.as_deref(), self.page.skip, self.page.limit);
        let page = call.await?;
        print_page(&page, self.output_format, self.verbose)
    }
}

#[derive(Debug, Clone)]
pub struct CmdUserNew {
    pub user: VirtualUserPublic,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdUserNew {
    pub const NAME: &str = "new";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("add")
            .about("Create a virtual user")
            .arg(arg!(name: <NAME> "Real name of the virtual user"))
            .arg(arg!(--email <EMAIL> "Email address").required(true))
            .arg(
                arg!(--sex <SEX> "0 for unknown, 1 for man, 2 for woman")
                    .value_parser(value_parser!(i32).range(0..=2))
                    .default_value("0"),
            )
            .arg(arg!(--birthday <DATE> "Birthday, e.g. 1990-01-31"))
            .arg(arg!(--tel <TEL> "Telephone number"))
            .arg(arg!(--location <LOCATION> "Location"))
            .arg(arg!(--qq <QQ> "QQ number"))
            .arg(arg!(--wechat <WECHAT> "WeChat ID"))
            .arg(arg!(--identify <IDENTIFY> "Identification information"))
            .arg(arg!(--prompt <PROMPT> "Prompt used in AI interactions"))
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let get = |name: &str| matches.get_one::<String>(name).cloned();
        let birthday = get("birthday").map(|a| parse_datetime(&a)).transpose()?;

        let user = VirtualUserPublic {
            real_name: get("name"),
            sex: matches.get_one("sex").copied().unwrap_or_default(),
            birthday,
            tel: get("tel"),
            prompt: get("prompt"),
            location: get("location"),
            qq: get("qq"),
            wechat: get("wechat"),
            identify: get("identify"),
            email: get("email").ok_or("Email is required for new virtual user")?,
        };

        Ok(Self {
            user,
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        })
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "creating virtual user...");
        let users = client.virtual_users().create(&[self.user]).await?;
        print_users(&users, self.output_format, self.verbose)
    }
}

#[derive(Debug, Clone)]
pub struct CmdUserDelete {
    pub ids: Vec<String>,
    pub yes: bool,
}

impl CmdUserDelete {
    pub const NAME: &str = "delete";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("rm")
            .about("Delete virtual users")
            .arg(ARGS.ids())
            .arg(arg_yes())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            ids: IdArgs::get_ids(matches),
            yes: get_yes(matches),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "deleting virtual users...");
        let prompt = format!("Delete {} virtual user(s)?", self.ids.len());
        if !self.yes && !confirm(&prompt)? {
            tracing::info!("user cancel the deletion");
            return Ok(());
        }

        let message = client.virtual_users().delete_batch(&self.ids).await?;
        println!("{}", message.message);
        Ok(())
    }
}

fn print_page(
    page: &Page<VirtualUser>,
    output_format: OutputFormat,
    verbose: bool,
) -> Result<(), Box<dyn Error>> {
    match output_format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Table if page.items.is_empty() => {
            println!("{}", "No virtual users found".italic());
            Ok(())
        }
        OutputFormat::Table => {
            print_users(&page.items, output_format, verbose)?;
            if page.has_next() {
                let prompt = format!("Displaying {}/{} virtual users", page.items.len(), page.total());
                println!("{}", prompt.italic());
            }
            Ok(())
        }
    }
}

fn print_users(
    users: &[VirtualUser],
    output_format: OutputFormat,
    verbose: bool,
) -> Result<(), Box<dyn Error>> {
    if output_format == OutputFormat::Json {
        return print_json(&users);
    }

    let mut columns = vec![
        Column::new("ID", |a: &VirtualUser| a.id.map(|id| id.to_string()).unwrap_or_default()),
        Column::new("Name", |a: &VirtualUser| a.real_name.clone()).with_color(inactive),
        Column::new("Email", |a: &VirtualUser| a.email.clone()),
    ];
    if verbose {
        columns.extend([
            Column::new("Sex", |a: &VirtualUser| sex(a.sex).to_string()),
            Column::new("Birthday", |a: &VirtualUser| format_datetime(a.birthday)),
            Column::new("Tel", |a: &VirtualUser| a.tel.clone().unwrap_or_default()),
            Column::new("Location", |a: &VirtualUser| a.location.clone().unwrap_or_default()),
        ]);
    }
    print!("{}", Table::new(&columns, users));
    Ok(())
}

fn inactive(user: &VirtualUser) -> Option<Color> {
    (!user.is_active).then_some(Color::BrightBlack)
}

const fn sex(value: i32) -> &'static str {
    match value {
        1 => "man",
        2 => "woman",
        _ => "unknown",
    }
}
