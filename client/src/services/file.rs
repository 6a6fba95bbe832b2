// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! File management endpoints: listing, transfer, chunked upload and cleanup.

use std::fmt;

use reqwest::Response;
use reqwest::header::{self, HeaderMap, RANGE};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::models::{FileDb, FileRangeRole, Page};
use crate::request::{ApiRequest, FilePart, MultipartForm};
use crate::services::{DEFAULT_LIMIT, DEFAULT_SKIP, id_list};

/// File operations, see [`crate::ApiClient::files`].
#[derive(Debug, Clone, Copy)]
pub struct Files<'a> {
    http: &'a HttpClient,
}

impl<'a> Files<'a> {
    pub(crate) const fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Lists files in the given range.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn list(
        &self,
        range: FileRangeRole,
        skip: u64,
        limit: u64,
    ) -> Result<Page<FileDb>, ApiError> {
        let req = ApiRequest::get("/file/list/{file_range}")
            .path("file_range", range)
            .query("skip", skip)
            .query("limit", limit);
        self.http.send(req).await
    }

    /// Searches files by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, search: &FileSearch) -> Result<Page<FileDb>, ApiError> {
        let req = ApiRequest::get("/file/search")
            .query("q", &search.q)
            .query("skip", search.skip)
            .query("limit", search.limit)
            .query("public_only", search.public_only)
            .query("global_search", search.global_search);
        self.http.send(req).await
    }

    /// File statistics of the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn stats(&self) -> Result<FileStats, ApiError> {
        self.http.send(ApiRequest::get("/file/stats")).await
    }

    /// Chunks received so far for a chunked upload.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn upload_status(&self, file_id: &str) -> Result<UploadStatus, ApiError> {
        let req = ApiRequest::get("/file/upload/status/{file_id}").path("file_id", file_id);
        self.http.send(req).await
    }

    /// Fetches the metadata of one file.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the file does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, file_id: &str) -> Result<FileDb, ApiError> {
        let req = ApiRequest::get("/file/{file_id}").path("file_id", file_id);
        self.http.send(req).await
    }

    /// Renames a file or changes its visibility.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn update_info(&self, file_id: &str, form: &UpdateFileInfo) -> Result<FileDb, ApiError> {
        let req = ApiRequest::patch("/file/{file_id}")
            .path("file_id", file_id)
            .form(form.fields());
        self.http.send(req).await
    }

    /// Downloads file content, optionally only the given byte range.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the range is not satisfiable.
    #[tracing::instrument(skip(self))]
    pub async fn download(
        &self,
        file_id: &str,
        range: Option<ByteRange>,
    ) -> Result<Vec<u8>, ApiError> {
        let mut req = ApiRequest::get("/file/{file_id}/download").path("file_id", file_id);
        if let Some(range) = range {
            req = req.header(RANGE, &range.to_string())?;
        }
        let resp = self.http.execute(req).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    /// Reads the download headers without fetching the content.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn download_info(&self, file_id: &str) -> Result<DownloadInfo, ApiError> {
        let req = ApiRequest::head("/file/{file_id}/download").path("file_id", file_id);
        let resp = self.http.execute(req).await?;
        Ok(DownloadInfo::from_headers(resp.headers()))
    }

    /// Opens the content for chunk-by-chunk reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn stream(&self, file_id: &str) -> Result<FileStream, ApiError> {
        let req = ApiRequest::get("/file/{file_id}/stream").path("file_id", file_id);
        let resp = self.http.execute(req).await?;
        Ok(FileStream { resp })
    }

    /// Uploads one or more files.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or every file was rejected.
    #[tracing::instrument(skip(self, form), fields(count = form.files.len()))]
    pub async fn upload(&self, form: UploadFiles) -> Result<UploadReport, ApiError> {
        let req = ApiRequest::post("/file/upload").multipart(form.into_multipart());
        self.http.send(req).await
    }

    /// Uploads a single chunk of a larger file.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self, form), fields(file_id = %form.file_id, chunk = form.chunk_index))]
    pub async fn upload_chunk(&self, form: UploadChunk) -> Result<ChunkReceipt, ApiError> {
        let req = ApiRequest::post("/file/upload/chunk").multipart(form.into_multipart());
        self.http.send(req).await
    }

    /// Splits `bytes` into chunks of `chunk_size` and uploads them in order
    /// under one fresh file id. Returns the receipt of the last chunk, which
    /// carries the stored file once the server has merged all parts.
    ///
    /// # Errors
    ///
    /// Returns an error if `chunk_size` is zero or any chunk fails; the
    /// remaining chunks are not sent.
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_chunked(
        &self,
        file_name: &str,
        bytes: &[u8],
        chunk_size: usize,
        is_public: bool,
    ) -> Result<ChunkReceipt, ApiError> {
        if chunk_size == 0 {
            return Err(ApiError::Config("Chunk size must be positive".to_string()));
        }

        let file_id = Uuid::new_v4().to_string();
        let total_chunks = bytes.len().div_ceil(chunk_size).max(1);
        let mut receipt = None;
        for index in 0..total_chunks {
            let start = index * chunk_size;
            let end = (start + chunk_size).min(bytes.len());
            let chunk = bytes.get(start..end).unwrap_or_default();
            let form = UploadChunk {
                file: FilePart::new(file_name, chunk.to_vec()),
                chunk_index: index,
                total_chunks,
                file_id: file_id.clone(),
                original_filename: file_name.to_string(),
                total_size: bytes.len() as u64,
                is_public,
            };
            tracing::debug!(index, total_chunks, "uploading chunk");
            receipt = Some(self.upload_chunk(form).await?);
        }

        receipt.ok_or_else(|| ApiError::Config("No chunk was uploaded".to_string()))
    }

    /// Replaces the content of a file, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self, form))]
    pub async fn replace(&self, file_id: &str, form: ReplaceFile) -> Result<FileDb, ApiError> {
        let req = ApiRequest::put("/file/{file_id}/replace")
            .path("file_id", file_id)
            .multipart(form.into_multipart());
        self.http.send(req).await
    }

    /// Deletes files by id; with `force` the records go even if the stored
    /// content is already missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn delete_batch<S: AsRef<str>>(
        &self,
        ids: &[S],
        force: bool,
    ) -> Result<serde_json::Value, ApiError> {
        let req = ApiRequest::delete("/file/batch")
            .query("force", force)
            .json(&id_list(ids))?;
        self.http.send(req).await
    }

    /// Removes stored content that no record refers to.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn cleanup_orphaned(
        &self,
        dry_run: bool,
        global_cleanup: bool,
    ) -> Result<serde_json::Value, ApiError> {
        let req = ApiRequest::post("/file/cleanup/orphaned")
            .query("dry_run", dry_run)
            .query("global_cleanup", global_cleanup);
        self.http.send(req).await
    }

    /// Removes leftover chunks of abandoned uploads.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn cleanup_temp(&self, cleanup: &TempCleanup) -> Result<serde_json::Value, ApiError> {
        let req = ApiRequest::post("/file/cleanup/temp")
            .query("max_age_hours", cleanup.max_age_hours)
            .query("dry_run", cleanup.dry_run)
            .query("global_cleanup", cleanup.global_cleanup);
        self.http.send(req).await
    }

    /// Storage usage of the current user, or of everyone with `global_usage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn storage_usage(&self, global_usage: bool) -> Result<serde_json::Value, ApiError> {
        let req = ApiRequest::get("/file/storage/usage").query("global_usage", global_usage);
        self.http.send(req).await
    }
}

/// Query of [`Files::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSearch {
    /// Keyword matched against file names.
    pub q: String,
    /// Records to skip.
    pub skip: u64,
    /// Page size.
    pub limit: u64,
    /// Only search public files.
    pub public_only: bool,
    /// Search every user's files; requires admin rights.
    pub global_search: bool,
}

impl FileSearch {
    /// Creates a search with default paging and no flags.
    #[must_use]
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
            public_only: false,
            global_search: false,
        }
    }
}

/// Form of [`Files::update_info`]. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateFileInfo {
    /// New file name.
    pub name: Option<String>,
    /// New visibility.
    pub is_public: Option<bool>,
}

impl UpdateFileInfo {
    fn fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        if let Some(name) = &self.name {
            fields.push(("name".to_string(), name.clone()));
        }
        if let Some(is_public) = self.is_public {
            fields.push(("is_public".to_string(), is_public.to_string()));
        }
        fields
    }
}

/// An inclusive byte range sent as an HTTP `Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte.
    pub start: u64,
    /// Last byte, or the end of the file when absent.
    pub end: Option<u64>,
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "bytes={}-{end}", self.start),
            None => write!(f, "bytes={}-", self.start),
        }
    }
}

/// Download headers as reported by [`Files::download_info`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadInfo {
    /// Size in bytes.
    pub content_length: Option<u64>,
    /// MIME type.
    pub content_type: Option<String>,
    /// Suggested file name, as sent.
    pub content_disposition: Option<String>,
    /// Quoted MD5 of the content.
    pub etag: Option<String>,
    /// HTTP date of the last change.
    pub last_modified: Option<String>,
    /// Whether the server honours `Range` requests.
    pub accepts_ranges: bool,
}

impl DownloadInfo {
    fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            content_length: get(header::CONTENT_LENGTH).and_then(|a| a.parse().ok()),
            content_type: get(header::CONTENT_TYPE),
            content_disposition: get(header::CONTENT_DISPOSITION),
            etag: get(header::ETAG),
            last_modified: get(header::LAST_MODIFIED),
            accepts_ranges: get(header::ACCEPT_RANGES).is_some_and(|a| a == "bytes"),
        }
    }
}

/// Streamed file content returned by [`Files::stream`].
#[derive(Debug)]
pub struct FileStream {
    resp: Response,
}

impl FileStream {
    /// Total size announced by the server.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.resp.content_length()
    }

    /// Reads the next chunk, or `None` at the end of the content.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails mid-transfer.
    pub async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, ApiError> {
        Ok(self.resp.chunk().await?.map(|a| a.to_vec()))
    }
}

/// Form of [`Files::upload`].
#[derive(Debug, Clone)]
pub struct UploadFiles {
    /// Files to upload.
    pub files: Vec<FilePart>,
    /// Make the files publicly accessible.
    pub is_public: bool,
    /// Let the server stream the content to disk, recommended for large files.
    pub use_streaming: bool,
}

impl UploadFiles {
    /// Creates a private, streamed upload of `files`.
    #[must_use]
    pub fn new(files: Vec<FilePart>) -> Self {
        Self {
            files,
            is_public: false,
            use_streaming: true,
        }
    }

    fn into_multipart(self) -> MultipartForm {
        let mut form = MultipartForm::new();
        for file in self.files {
            form = form.file("files", file);
        }
        form.text("is_public", self.is_public)
            .text("use_streaming", self.use_streaming)
    }
}

/// Form of [`Files::upload_chunk`].
#[derive(Debug, Clone)]
pub struct UploadChunk {
    /// Content of this chunk.
    pub file: FilePart,
    /// Index of this chunk, starting at 0.
    pub chunk_index: usize,
    /// Number of chunks of the whole file.
    pub total_chunks: usize,
    /// Identifier shared by all chunks of one file.
    pub file_id: String,
    /// Name of the assembled file.
    pub original_filename: String,
    /// Size of the whole file in bytes.
    pub total_size: u64,
    /// Make the file publicly accessible.
    pub is_public: bool,
}

impl UploadChunk {
    fn into_multipart(self) -> MultipartForm {
        MultipartForm::new()
            .file("file", self.file)
            .text("chunk_index", self.chunk_index)
            .text("total_chunks", self.total_chunks)
            .text("file_id", self.file_id)
            .text("original_filename", self.original_filename)
            .text("total_size", self.total_size)
            .text("is_public", self.is_public)
    }
}

/// Form of [`Files::replace`].
#[derive(Debug, Clone)]
pub struct ReplaceFile {
    /// New content.
    pub new_file: FilePart,
    /// Let the server stream the content to disk.
    pub use_streaming: bool,
}

impl ReplaceFile {
    fn into_multipart(self) -> MultipartForm {
        MultipartForm::new()
            .file("new_file", self.new_file)
            .text("use_streaming", self.use_streaming)
    }
}

/// Options of [`Files::cleanup_temp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempCleanup {
    /// Only temporary files older than this are removed.
    pub max_age_hours: u32,
    /// Report what would be removed without removing anything.
    pub dry_run: bool,
    /// Clean up every user's files; requires admin rights.
    pub global_cleanup: bool,
}

impl Default for TempCleanup {
    fn default() -> Self {
        Self {
            max_age_hours: 24,
            dry_run: true,
            global_cleanup: false,
        }
    }
}

/// File statistics of the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStats {
    /// Number of files.
    pub total_files: u64,
    /// Number of public files.
    pub public_files: u64,
    /// Number of private files.
    pub private_files: u64,
    /// Combined size in bytes.
    pub total_size_bytes: u64,
    /// Combined size in MiB.
    pub total_size_mb: f64,
}

/// Progress of a chunked upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStatus {
    /// Identifier shared by the chunks.
    pub file_id: String,
    /// Indices of the chunks received so far, ascending.
    pub uploaded_chunks: Vec<usize>,
    /// Number of chunks received.
    pub total_uploaded: usize,
}

/// Result of [`Files::upload`]; files are accepted or rejected one by one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReport {
    /// Counters.
    pub summary: UploadSummary,
    /// Files stored.
    pub uploaded_files: Vec<FileDb>,
    /// Rejected files with the reason, as sent by the server.
    #[serde(default)]
    pub failed_files: Vec<serde_json::Value>,
    /// Files skipped as duplicates, as sent by the server.
    #[serde(default)]
    pub skipped_files: Vec<serde_json::Value>,
}

/// Counters of an [`UploadReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    /// Files sent.
    pub total_files: u64,
    /// Files stored.
    pub uploaded_count: u64,
    /// Files rejected.
    pub failed_count: u64,
    /// Files skipped.
    pub skipped_count: u64,
}

/// Server answer to one uploaded chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkReceipt {
    /// Index of the chunk received.
    pub chunk_index: usize,
    /// Whether the chunk was stored.
    pub uploaded: bool,
    /// Number of chunks received so far.
    pub uploaded_chunks: usize,
    /// Number of chunks of the whole file.
    pub total_chunks: usize,
    /// Whether all chunks arrived and the file was assembled.
    pub is_complete: bool,
    /// The stored file, once complete.
    #[serde(default)]
    pub file_info: Option<FileDb>,
    /// Server remark.
    #[serde(default)]
    pub message: Option<String>,
}
