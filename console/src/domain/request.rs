//! Outgoing request description used by [`super::ApiClient`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// HTTP methods the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Upper-case method name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Parse a method name case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        let method = match raw.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            _ => return None,
        };
        Some(method)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartPart {
    /// Plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File field.
    File {
        /// Field name.
        name: String,
        /// Original file name.
        file_name: String,
        /// MIME type, when known.
        content_type: Option<String>,
        /// File contents.
        bytes: Vec<u8>,
    },
}

impl MultipartPart {
    /// Field name of this part.
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// Multipart form body for uploads.
///
/// # Examples
/// ```
/// use pawstay_console::domain::MultipartForm;
///
/// let form = MultipartForm::new()
///     .text("kind", "business_registration")
///     .file("file", "reg.pdf", Some("application/pdf"), b"%PDF".to_vec());
/// assert_eq!(form.field_names(), ["kind", "file"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<MultipartPart>,
}

impl MultipartForm {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(MultipartPart::File {
            name: name.into(),
            file_name: file_name.into(),
            content_type: content_type.map(str::to_owned),
            bytes,
        });
        self
    }

    /// Parts in insertion order.
    pub fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }

    /// Consume the form, yielding its parts.
    pub fn into_parts(self) -> Vec<MultipartPart> {
        self.parts
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> Vec<&str> {
        self.parts.iter().map(MultipartPart::name).collect()
    }
}

/// Request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document.
    Json(Value),
    /// Multipart form; the transport chooses the boundary.
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Whether this is a multipart body.
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// A request issued through [`super::ApiClient`].
///
/// `path` is either origin-relative (`/api/admin/promotions?page=1`) or an
/// absolute URL. Header names are stored lower-case.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Method.
    pub method: HttpMethod,
    /// Origin-relative path or absolute URL.
    pub path: String,
    /// Body.
    pub body: RequestBody,
    /// Caller-supplied headers.
    pub headers: BTreeMap<String, String>,
    /// Cancels the request when triggered.
    pub cancellation: Option<CancellationToken>,
    /// Skip session handling: no stored token is attached and a 401 is an
    /// ordinary failure. Used by the login call.
    pub anonymous: bool,
}

impl ApiRequest {
    /// New request without body or headers.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            headers: BTreeMap::new(),
            cancellation: None,
            anonymous: false,
        }
    }

    /// `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Attach a multipart body.
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Add a header; the name is lower-cased.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Abort the request when `token` is cancelled.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Send without session handling.
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

/// Return `id` when it is safe to splice into a URL path.
///
/// Identifiers are restricted to ASCII alphanumerics, `-` and `_`.
pub fn path_segment(id: &str) -> Option<&str> {
    let valid = !id.is_empty()
        && id
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_');
    valid.then_some(id)
}
