//! Generic resource repository
//!
//! CRUD dispatch and cursor-pagination aggregation on top of any
//! [`HttpClient`]. The repository is a fail-soft boundary: every failure
//! beneath it is logged and turned into `None`, while a successful response
//! is always `Some`, even when its body is empty.

use serde_json::Value;
use tracing::{debug, warn};

use crate::transport::{HttpClient, HttpRequest, HttpResponse, Method};
use crate::{Error, Result};

/// Upper bound on pages fetched by a single [`HttpRepository::query`]
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Query parameter carrying the cursor on follow-up page requests
pub const CURSOR_QUERY_PARAM: &str = "cursor";

/// CRUD and list operations over REST resources
#[derive(Debug, Clone)]
pub struct HttpRepository<C> {
    client: C,
    max_pages: usize,
}

impl<C: HttpClient> HttpRepository<C> {
    /// Create a repository on top of a client
    pub fn new(client: C) -> Self {
        Self {
            client,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Bound the number of pages a query may fetch (at least one)
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// List a collection, following the cursor header named by
    /// `request.cursor_param` until it disappears
    ///
    /// A first response without the cursor header is returned untouched.
    /// Otherwise the result's `data` is every page's items, in page order; its
    /// status and headers are those of the last page.
    pub async fn query(&self, request: HttpRequest) -> Option<HttpResponse> {
        let url = request.url.clone();
        fail_soft("query", Method::Get, &url, self.try_query(request).await)
    }

    /// Fetch a single resource
    pub async fn read_resource(&self, request: HttpRequest) -> Option<HttpResponse> {
        let url = resource_url(&request.url, resolve_id(&request).as_deref());
        let read = HttpRequest {
            url: url.clone(),
            method: Method::Get,
            headers: request.headers,
            ..Default::default()
        };
        fail_soft("read", Method::Get, &url, self.send(read).await)
    }

    /// Create a resource, or update it when an identifier is present
    ///
    /// The identifier comes from `request.id` or the `id` field of
    /// `request.data`. Updates are `PUT url/{id}`, creates are `POST url`.
    pub async fn write_resource(&self, request: HttpRequest) -> Option<HttpResponse> {
        let id = resolve_id(&request);
        let method = if id.is_some() { Method::Put } else { Method::Post };
        let url = resource_url(&request.url, id.as_deref());
        let write = HttpRequest {
            url: url.clone(),
            method,
            data: request.data,
            headers: request.headers,
            ..Default::default()
        };
        fail_soft("write", method, &url, self.send(write).await)
    }

    /// Delete a resource
    pub async fn destroy_resource(&self, request: HttpRequest) -> Option<HttpResponse> {
        let url = resource_url(&request.url, resolve_id(&request).as_deref());
        let destroy = HttpRequest {
            url: url.clone(),
            method: Method::Delete,
            headers: request.headers,
            ..Default::default()
        };
        fail_soft("destroy", Method::Delete, &url, self.send(destroy).await)
    }

    async fn try_query(&self, request: HttpRequest) -> Result<HttpResponse> {
        let first = self.send(page_request(&request, request.url.clone())).await?;

        let Some(cursor_param) = request.cursor_param.as_deref() else {
            return Ok(first);
        };
        let Some(mut cursor) = cursor_of(&first, cursor_param) else {
            return Ok(first);
        };

        let mut items = Vec::new();
        let mut last = first;
        append_page(&mut items, std::mem::take(&mut last.data));
        let mut pages = 1;

        loop {
            if pages >= self.max_pages {
                warn!(url = %request.url, pages, "Page limit reached, returning partial results");
                break;
            }

            let url = with_cursor(&request.url, &cursor);
            let mut response = self.send(page_request(&request, url)).await?;
            pages += 1;

            let next_cursor = cursor_of(&response, cursor_param);
            append_page(&mut items, std::mem::take(&mut response.data));
            last = response;

            match next_cursor {
                None => break,
                Some(next) if next == cursor => {
                    warn!(url = %request.url, pages, "Cursor did not advance, stopping pagination");
                    break;
                }
                Some(next) => cursor = next,
            }
        }

        debug!(url = %request.url, pages, items = items.len(), "Aggregated paginated results");

        Ok(HttpResponse {
            data: Value::Array(items),
            ..last
        })
    }

    /// Send a request, treating any non-2xx answer as a failure
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = self.client.execute(request).await?;
        if !response.is_success() {
            return Err(Error::request(
                response.status,
                response.status_text,
                response.data,
            ));
        }
        Ok(response)
    }
}

fn fail_soft(
    operation: &'static str,
    method: Method,
    url: &str,
    result: Result<HttpResponse>,
) -> Option<HttpResponse> {
    match result {
        Ok(response) => Some(response),
        Err(e) => {
            warn!(operation, %method, url = %url, error = %e, "Request failed, returning no result");
            None
        }
    }
}

fn page_request(request: &HttpRequest, url: String) -> HttpRequest {
    HttpRequest {
        url,
        method: Method::Get,
        headers: request.headers.clone(),
        ..Default::default()
    }
}

fn cursor_of(response: &HttpResponse, cursor_param: &str) -> Option<String> {
    response
        .header(cursor_param)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
}

/// Arrays are spliced in, single values appended, `null` skipped
fn append_page(items: &mut Vec<Value>, data: Value) {
    match data {
        Value::Array(page) => items.extend(page),
        Value::Null => {}
        other => items.push(other),
    }
}

fn with_cursor(url: &str, cursor: &str) -> String {
    let pair = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(CURSOR_QUERY_PARAM, cursor)
        .finish();
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{pair}")
}

fn resolve_id(request: &HttpRequest) -> Option<String> {
    if let Some(id) = request.id.as_deref().filter(|id| !id.is_empty()) {
        return Some(id.to_string());
    }
    match request.data.as_ref()?.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Append `/{id}` to the path unless it already ends with it, keeping any
/// query string after the path
fn resource_url(url: &str, id: Option<&str>) -> String {
    let Some(id) = id else {
        return url.to_string();
    };
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };
    let base = path.trim_end_matches('/');
    let path = if base.ends_with(&format!("/{id}")) {
        base.to_string()
    } else {
        format!("{base}/{id}")
    };
    match query {
        Some(query) => format!("{path}?{query}"),
        None => path,
    }
}
