// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, value_parser};
use colored::{Color, Colorize};
use isyourday_client::{
    ApiClient, ByteRange, FileDb, FilePart, FileRangeRole, FileSearch, Page, UploadFiles,
};
use tokio::io::AsyncWriteExt;

use crate::arg::{CommonArgs, IdArgs, PageArgs, arg_yes, get_yes};
use crate::table::{Column, Table};
use crate::util::{OutputFormat, confirm, format_datetime, format_size, print_json};

const ARGS: IdArgs = IdArgs::new("file");

/// Files above this size are sent in chunks.
const CHUNKED_THRESHOLD: u64 = 32 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct CmdFileList {
    pub range: FileRangeRole,
    pub page: PageArgs,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdFileList {
    pub const NAME: &str = "list";

    pub fn command() -> Command {
        let ranges: Vec<&str> = FileRangeRole::ALL.iter().map(|a| a.as_str()).collect();
        Command::new(Self::NAME)
            .alias("ls")
            .about("List files")
            .arg(
                arg!(range: [RANGE] "Which files to list")
                    .value_parser(ranges)
                    .default_value(FileRangeRole::Private.as_str()),
            )
            .arg(PageArgs::skip())
            .arg(PageArgs::limit())
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let range = match matches.get_one::<String>("range") {
            Some(range) => range.parse()?,
            None => FileRangeRole::Private,
        };
        Ok(Self {
            range,
            page: PageArgs::from(matches),
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        })
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing files...");
        let files = client.files();
        let page = files.list(self.range, self.page.skip, self.page.limit).await?;
        print_page(&page, self.output_format, self.verbose)
    }
}

#[derive(Debug, Clone)]
pub struct CmdFileSearch {
    pub search: FileSearch,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdFileSearch {
    pub const NAME: &str = "search";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Search files by name")
            .arg(arg!(query: <QUERY> "Keyword matched against file names"))
            .arg(arg!(--public "Only search public files"))
            .arg(arg!(--global "Search every user's files, requires admin rights"))
            .arg(PageArgs::skip())
            .arg(PageArgs::limit())
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let page = PageArgs::from(matches);
        let query = matches.get_one::<String>("query").cloned().unwrap_or_default();
        let search = FileSearch {
            skip: page.skip,
            limit: page.limit,
            public_only: matches.get_flag("public"),
            global_search: matches.get_flag("global"),
            ..FileSearch::new(query)
        };
        Self {
            search,
            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "searching files...");
        let page = client.files().search(&self.search).await?;
        print_page(&page, self.output_format, self.verbose)
    }
}

#[derive(Debug, Clone)]
pub struct CmdFileInfo {
    pub id: String,
    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdFileInfo {
    pub const NAME: &str = "info";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show metadata of a file")
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
        tracing::debug!(?self, "getting file info...");
        let file = client.files().get(&self.id).await?;
        print_files(&[file], self.output_format, self.verbose)?;

        if self.verbose && self.output_format == OutputFormat::Table {
            let info = client.files().download_info(&self.id).await?;
            println!();
            println!("Content type:  {}", info.content_type.unwrap_or_default());
            println!("ETag:          {}", info.etag.unwrap_or_default());
            println!("Last modified: {}", info.last_modified.unwrap_or_default());
            println!("Ranges:        {}", info.accepts_ranges);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdFileUpload {
    pub paths: Vec<PathBuf>,
    pub public: bool,
    pub chunk_size: Option<usize>,
    pub output_format: OutputFormat,
}

impl CmdFileUpload {
    pub const NAME: &str = "upload";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("up")
            .about("Upload files")
            .arg(
                arg!(path: <PATH> "Files to upload")
                    .num_args(1..)
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(arg!(--public "Make the files publicly accessible"))
            .arg(
                arg!(--"chunk-size" <BYTES> "Upload in chunks of this size, default for large files")
                    .value_parser(value_parser!(u64).range(1..)),
            )
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            paths: matches
                .get_many::<PathBuf>("path")
                .map(|a| a.cloned().collect())
                .unwrap_or_default(),
            public: matches.get_flag("public"),
            chunk_size: matches
                .get_one::<u64>("chunk-size")
                .map(|a| usize::try_from(*a).unwrap_or(usize::MAX)),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "uploading files...");
        let files = client.files();

        let mut small = Vec::new();
        let mut uploaded = Vec::new();
        for path in &self.paths {
            let size = tokio::fs::metadata(path).await?.len();
            let chunk_size = match self.chunk_size {
                Some(chunk_size) => chunk_size,
                None if size > CHUNKED_THRESHOLD => 8 * 1024 * 1024,
                None => {
                    small.push(FilePart::from_path(path).await?);
                    continue;
                }
            };

            let part = FilePart::from_path(path).await?;
            let call = files.upload_chunked(&part.file_name, &part.bytes, chunk_size, self.public);
            let receipt = call.await?;
            match receipt.file_info {
                Some(file) => uploaded.push(file),
                None => {
                    return Err(format!(
                        "Upload of {} incomplete: {}/{} chunks",
                        path.display(),
                        receipt.uploaded_chunks,
                        receipt.total_chunks
                    )
                    .into());
                }
            }
        }

        if !small.is_empty() {
            let form = UploadFiles {
                is_public: self.public,
                ..UploadFiles::new(small)
            };
            let report = files.upload(form).await?;
            if report.summary.failed_count > 0 || report.summary.skipped_count > 0 {
                let prompt = format!(
                    "{} failed, {} skipped",
                    report.summary.failed_count, report.summary.skipped_count
                );
                eprintln!("{} {}", "Warning:".yellow(), prompt);
                for failed in &report.failed_files {
                    tracing::warn!(%failed, "file rejected");
                }
            }
            uploaded.extend(report.uploaded_files);
        }

        print_files(&uploaded, self.output_format, false)
    }
}

#[derive(Debug, Clone)]
pub struct CmdFileDownload {
    pub id: String,
    pub output: Option<PathBuf>,
    pub range: Option<ByteRange>,
}

impl CmdFileDownload {
    pub const NAME: &str = "download";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("get")
            .about("Download a file")
            .arg(ARGS.id())
            .arg(
                arg!(-o --output <PATH> "Where to write the file, defaults to its name")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(arg!(--range <RANGE> "Only download a byte range, e.g. 0-1023 or 1024-"))
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let range = matches
            .get_one::<String>("range")
            .map(|a| parse_range(a))
            .transpose()?;
        Ok(Self {
            id: IdArgs::get_id(matches),
            output: matches.get_one("output").cloned(),
            range,
        })
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "downloading file...");
        let files = client.files();
        let output = match self.output {
            Some(output) => output,
            None => local_name(&files.get(&self.id).await?.name)?,
        };

        if self.range.is_some() {
            let bytes = files.download(&self.id, self.range).await?;
            tokio::fs::write(&output, &bytes).await?;
            println!("Saved {} to {}", format_size(len(&bytes)), output.display());
            return Ok(());
        }

        let mut stream = files.stream(&self.id).await?;
        let mut file = tokio::fs::File::create(&output).await?;
        let mut written: i64 = 0;
        while let Some(chunk) = stream.next_chunk().await? {
            file.write_all(&chunk).await?;
            written += len(&chunk);
        }
        file.flush().await?;

        println!("Saved {} to {}", format_size(written), output.display());
        Ok(())
    }
}

/// Keeps only the last component of a server-side file name.
fn local_name(name: &str) -> Result<PathBuf, Box<dyn Error>> {
    match Path::new(name).file_name() {
        Some(file_name) => Ok(PathBuf::from(file_name)),
        None => Err(format!("Cannot save file named {name:?}, pass --output").into()),
    }
}

#[derive(Debug, Clone)]
pub struct CmdFileDelete {
    pub ids: Vec<String>,
    pub force: bool,
    pub yes: bool,
}

impl CmdFileDelete {
    pub const NAME: &str = "delete";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("rm")
            .about("Delete files")
            .arg(ARGS.ids())
            .arg(arg!(-f --force "Delete the records even if the stored content is missing"))
            .arg(arg_yes())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            ids: IdArgs::get_ids(matches),
            force: matches.get_flag("force"),
            yes: get_yes(matches),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "deleting files...");
        let prompt = format!("Delete {} file(s)?", self.ids.len());
        if !self.yes && !confirm(&prompt)? {
            tracing::info!("user cancel the deletion");
            return Ok(());
        }

        let result = client.files().delete_batch(&self.ids, self.force).await?;
        print_json(&result)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdFileUsage {
    pub global: bool,
    pub output_format: OutputFormat,
}

impl CmdFileUsage {
    pub const NAME: &str = "usage";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("stats")
            .about("Show file statistics and storage usage")
            .arg(arg!(--global "Report usage of every user, requires admin rights"))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            global: matches.get_flag("global"),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, client: &ApiClient) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "getting storage usage...");
        let files = client.files();
        let stats = files.stats().await?;
        let usage = files.storage_usage(self.global).await?;

        match self.output_format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "stats": stats,
                "usage": usage,
            })),
            OutputFormat::Table => {
                println!(
                    "Files:   {} ({} public, {} private)",
                    stats.total_files, stats.public_files, stats.private_files
                );
                println!("Size:    {:.2} MB", stats.total_size_mb);
                println!("Storage: {}", serde_json::to_string_pretty(&usage)?);
                Ok(())
            }
        }
    }
}

fn print_page(
    page: &Page<FileDb>,
    output_format: OutputFormat,
    verbose: bool,
) -> Result<(), Box<dyn Error>> {
    match output_format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Table if page.items.is_empty() => {
            println!("{}", "No files found".italic());
            Ok(())
        }
        OutputFormat::Table => {
            print_files(&page.items, output_format, verbose)?;
            if page.has_next() {
                let prompt = format!("Displaying {}/{} files", page.items.len(), page.total());
                println!("{}", prompt.italic());
            }
            Ok(())
        }
    }
}

fn print_files(
    files: &[FileDb],
    output_format: OutputFormat,
    verbose: bool,
) -> Result<(), Box<dyn Error>> {
    if output_format == OutputFormat::Json {
        return print_json(&files);
    }

    let mut columns = vec![
        Column::new("ID", |a: &FileDb| a.id.map(|id| id.to_string()).unwrap_or_default()),
        Column::new("Size", |a: &FileDb| format_size(a.size)).right(),
        Column::new("Uploaded", |a: &FileDb| format_datetime(a.upload_time)),
        Column::new("Name", |a: &FileDb| a.name.clone()).with_color(public),
    ];
    if verbose {
        columns.push(Column::new("MD5", |a: &FileDb| a.md5.clone()));
    }
    print!("{}", Table::new(&columns, files));
    Ok(())
}

fn public(file: &FileDb) -> Option<Color> {
    file.is_public.then_some(Color::Green)
}

fn len(bytes: &[u8]) -> i64 {
    i64::try_from(bytes.len()).unwrap_or(i64::MAX)
}

fn parse_range(range: &str) -> Result<ByteRange, Box<dyn Error>> {
    let err = || format!("Invalid range: {range}. Expected START-END or START-");
    let (start, end) = range.split_once('-').ok_or_else(err)?;
    let start: u64 = start.trim().parse().map_err(|_| err())?;
    let end = match end.trim() {
        "" => None,
        end => Some(end.parse::<u64>().map_err(|_| err())?),
    };
    if end.is_some_and(|end| end < start) {
        return Err(err().into());
    }
    Ok(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        Command::new("test")
            .subcommand_required(true)
            .subcommand(CmdFileList::command())
            .subcommand(CmdFileSearch::command())
            .subcommand(CmdFileUpload::command())
            .subcommand(CmdFileDownload::command())
            .subcommand(CmdFileDelete::command())
            .subcommand(CmdFileUsage::command())
            .try_get_matches_from(args)
            .unwrap()
    }

    #[test]
    fn test_parse_list_default_range() {
        let matches = parse(&["test", "list"]);
        let parsed = CmdFileList::from(matches.subcommand_matches("list").unwrap()).unwrap();
        assert_eq!(parsed.range, FileRangeRole::Private);
    }

    #[test]
    fn test_parse_list_range() {
        let matches = parse(&["test", "list", "public", "--output-format", "json"]);
        let parsed = CmdFileList::from(matches.subcommand_matches("list").unwrap()).unwrap();
        assert_eq!(parsed.range, FileRangeRole::Public);
        assert_eq!(parsed.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_list_invalid_range() {
        let res = Command::new("test")
            .subcommand(CmdFileList::command())
            .try_get_matches_from(["test", "list", "everything"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_parse_search() {
        let matches = parse(&["test", "search", "report", "--public", "--skip", "10"]);
        let parsed = CmdFileSearch::from(matches.subcommand_matches("search").unwrap());
        assert_eq!(parsed.search.q, "report");
        assert!(parsed.search.public_only);
        assert!(!parsed.search.global_search);
        assert_eq!(parsed.search.skip, 10);
        assert_eq!(parsed.search.limit, 10);
    }

    #[test]
    fn test_parse_upload() {
        let matches = parse(&["test", "upload", "a.txt", "b.txt", "--public", "--chunk-size", "1024"]);
        let parsed = CmdFileUpload::from(matches.subcommand_matches("upload").unwrap());
        assert_eq!(parsed.paths, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert!(parsed.public);
        assert_eq!(parsed.chunk_size, Some(1024));
    }

    #[test]
    fn test_parse_download() {
        let matches = parse(&["test", "download", "f1", "-o", "out.bin", "--range", "0-99"]);
        let parsed = CmdFileDownload::from(matches.subcommand_matches("download").unwrap()).unwrap();
        assert_eq!(parsed.id, "f1");
        assert_eq!(parsed.output, Some(PathBuf::from("out.bin")));
        assert_eq!(parsed.range, Some(ByteRange { start: 0, end: Some(99) }));
    }

    #[test]
    fn test_parse_delete_force() {
        let matches = parse(&["test", "delete", "f1", "--force", "--yes"]);
        let parsed = CmdFileDelete::from(matches.subcommand_matches("delete").unwrap());
        assert_eq!(parsed.ids, vec!["f1".to_string()]);
        assert!(parsed.force);
        assert!(parsed.yes);
    }

    #[test]
    fn test_delete_force_help() {
        let cmd = CmdFileDelete::command();
        let force = cmd
            .get_arguments()
            .find(|a| a.get_id() == "force")
            .unwrap();
        let help = force.get_help().unwrap().to_string();
        assert!(help.contains("stored content is missing"));
    }

    #[test]
    fn test_local_name_strips_directories() {
        assert_eq!(local_name("report.pdf").unwrap(), PathBuf::from("report.pdf"));
        assert_eq!(local_name("../../.bashrc").unwrap(), PathBuf::from(".bashrc"));
        assert_eq!(
            local_name("/home/u/.ssh/authorized_keys").unwrap(),
            PathBuf::from("authorized_keys")
        );
    }

    #[test]
    fn test_local_name_rejects_bare_dots() {
        for name in ["", ".", "..", "a/..", "/"] {
            assert!(local_name(name).is_err(), "accepted {name:?}");
        }
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("1024-").unwrap(), ByteRange { start: 1024, end: None });
        assert_eq!(parse_range(" 5 - 9 ").unwrap(), ByteRange { start: 5, end: Some(9) });
        assert!(parse_range("9-5").is_err());
        assert!(parse_range("abc").is_err());
        assert!(parse_range("-5").is_err());
    }
}
