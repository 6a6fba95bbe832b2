// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request descriptions for isyourday API operations.

use std::fmt;
use std::path::Path;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;

use crate::error::ApiError;

/// A single API call: method, URL template and parameter placement.
///
/// The URL template uses `{name}` placeholders that are filled from the path
/// parameters, e.g. `/isyourday/user/{user_id}`.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: &'static str,
    path: Vec<(&'static str, String)>,
    query: Vec<(&'static str, String)>,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Body,
}

/// Request body and its media type.
#[derive(Debug, Clone, Default)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// `application/json`.
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    /// `multipart/form-data`.
    Multipart(MultipartForm),
}

impl Body {
    /// Returns the media type the body is sent with.
    #[must_use]
    pub const fn media_type(&self) -> &'static str {
        match self {
            Self::Empty | Self::Json(_) => "application/json",
            Self::Form(_) => "application/x-www-form-urlencoded",
            Self::Multipart(_) => "multipart/form-data",
        }
    }
}

impl ApiRequest {
    /// Creates a request for `method` on the URL template `url`.
    #[must_use]
    pub fn new(method: Method, url: &'static str) -> Self {
        Self {
            method,
            url,
            path: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: &'static str) -> Self {
        Self::new(Method::GET, url)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(url: &'static str) -> Self {
        Self::new(Method::POST, url)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(url: &'static str) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(url: &'static str) -> Self {
        Self::new(Method::PUT, url)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(url: &'static str) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Creates a HEAD request.
    #[must_use]
    pub fn head(url: &'static str) -> Self {
        Self::new(Method::HEAD, url)
    }

    /// Sets a path parameter.
    #[must_use]
    pub fn path(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.path.push((name, value.to_string()));
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    /// Appends a query parameter when `value` is present.
    #[must_use]
    pub fn query_opt(self, name: &'static str, value: Option<impl fmt::Display>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Adds an extra header.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a valid header value.
    pub fn header(mut self, name: HeaderName, value: &str) -> Result<Self, ApiError> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::Config(format!("Invalid header {name}: {e}")))?;
        self.headers.push((name, value));
        Ok(self)
    }

    /// Sets a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self, ApiError> {
        self.body = Body::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Sets a url-encoded form body.
    #[must_use]
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Body::Form(fields);
        self
    }

    /// Sets a multipart body.
    #[must_use]
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = Body::Multipart(form);
        self
    }

    /// The HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The query pairs in insertion order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(&'static str, String)] {
        &self.query
    }

    /// Extra headers.
    #[must_use]
    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    /// The request body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Splits the request into the parts needed to dispatch it.
    pub(crate) fn into_parts(self) -> (Method, Vec<(HeaderName, HeaderValue)>, Body) {
        (self.method, self.headers, self.body)
    }

    /// Substitutes path parameters into the URL template.
    ///
    /// Values are not encoded here; see [`ApiRequest::url`].
    ///
    /// # Errors
    ///
    /// Returns an error if a placeholder has no matching path parameter.
    pub fn resolve_path(&self) -> Result<String, ApiError> {
        self.segments().map(|segments| format!("/{}", segments.join("/")))
    }

    /// Builds the absolute URL below `base`, percent-encoding each segment.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` cannot carry a path or a placeholder has no
    /// matching path parameter.
    pub fn url(&self, base: &Url) -> Result<Url, ApiError> {
        let segments = self.segments()?;
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::Config(format!("Invalid base URL: {base}")))?;
            path.pop_if_empty();
            path.extend(&segments);
        }

        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }

    fn segments(&self) -> Result<Vec<String>, ApiError> {
        self.url
            .split('/')
            .filter(|a| !a.is_empty())
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|a| a.strip_suffix('}'))
                {
                    Some(name) => self
                        .path
                        .iter()
                        .find(|(k, _)| *k == name)
                        .map(|(_, v)| v.clone())
                        .ok_or_else(|| {
                            ApiError::Config(format!(
                                "Missing path parameter `{name}` for {}",
                                self.url
                            ))
                        }),
                    None => Ok(segment.to_string()),
                }
            })
            .collect()
    }
}

/// A `multipart/form-data` body.
///
/// Kept as plain data so that requests can be inspected before dispatch.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: Vec<(String, MultipartValue)>,
}

#[derive(Debug, Clone)]
enum MultipartValue {
    Text(String),
    File(FilePart),
}

impl MultipartForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.fields
            .push((name.into(), MultipartValue::Text(value.to_string())));
        self
    }

    /// Appends a file field.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.fields.push((name.into(), MultipartValue::File(file)));
        self
    }

    /// Returns the value of the first text field called `name`.
    #[must_use]
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|(k, v)| match v {
            MultipartValue::Text(text) if k == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns every text value sent under `name`, in order.
    #[must_use]
    pub fn text_values(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter_map(|(k, v)| match v {
                MultipartValue::Text(text) if k == name => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns the file names attached under `name`.
    #[must_use]
    pub fn file_names(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter_map(|(k, v)| match v {
                MultipartValue::File(file) if k == name => Some(file.file_name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Converts into a reqwest multipart form.
    pub(crate) fn into_reqwest(self) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = match value {
                MultipartValue::Text(text) => form.text(name, text),
                MultipartValue::File(file) => {
                    let part = reqwest::multipart::Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.mime)
                        .map_err(|e| ApiError::Config(format!("Invalid mime type: {e}")))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

/// In-memory file content sent in a multipart body.
#[derive(Clone)]
pub struct FilePart {
    /// File name announced to the server.
    pub file_name: String,
    /// Media type.
    pub mime: String,
    /// Content.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FilePart {
    /// Creates a part with the generic `application/octet-stream` type.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: "application/octet-stream".to_string(),
            bytes,
        }
    }

    /// Sets the media type.
    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    /// Reads a file from disk, naming the part after the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Config(format!("Failed to read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .and_then(|a| a.to_str())
            .unwrap_or("file")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }
}
