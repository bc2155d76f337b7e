//! Request/response descriptors and the transport capability
//!
//! Everything above the network speaks [`HttpClient`]: the reqwest adapter,
//! the authenticating client and test doubles are interchangeable.

mod http;

pub use self::http::ReqwestTransport;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

/// HTTP method of a [`HttpRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case method name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound request descriptor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpRequest {
    /// Relative path or absolute URL
    pub url: String,
    /// HTTP method (defaults to GET)
    pub method: Method,
    /// JSON body
    pub data: Option<Value>,
    /// Resource identifier appended by the repository
    pub id: Option<String>,
    /// Name of the response header carrying the pagination cursor
    pub cursor_param: Option<String>,
    /// Extra request headers
    pub headers: HashMap<String, String>,
}

impl HttpRequest {
    /// Create a request with the given method
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            ..Default::default()
        }
    }

    /// GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Attach a JSON body
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Target a single resource
    #[must_use]
    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Enable pagination on the named response header
    #[must_use]
    pub fn with_cursor(mut self, header: impl Into<String>) -> Self {
        self.cursor_param = Some(header.into());
        self
    }

    /// Add a request header, replacing any existing value with the same name
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Insert a header in place, matching existing names case-insensitively
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }
}

/// Response descriptor returned by every [`HttpClient`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Reason phrase
    pub status_text: String,
    /// Decoded JSON body (`null` when empty)
    pub data: Value,
    /// Response headers, names lower-cased by the reqwest adapter
    pub headers: HashMap<String, String>,
}

impl HttpResponse {
    /// 200 response with the given body and no headers
    pub fn ok(data: Value) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            data,
            headers: HashMap::new(),
        }
    }

    /// True for 2xx statuses
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Anything that can perform a request and hand back a response
///
/// Transport adapters fail only when the call itself fails; status handling
/// is left to the layer above.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform the request
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request).await
    }
}
