//! reqwest-backed transport adapter

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{HttpClient, HttpRequest, HttpResponse, Method};
use crate::{Error, Result};

/// Transport adapter performing real network calls with reqwest
///
/// Non-2xx statuses come back as ordinary responses; only failures to
/// complete the call surface, as [`Error::Http`] from reqwest or
/// [`Error::Transport`] for requests that cannot be built.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport whose calls are bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("onelogin-sdk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = Url::parse(&request.url)
            .map_err(|e| Error::Transport(format!("Invalid URL '{}': {e}", request.url)))?;
        let method = request.method;

        let mut builder = self
            .client
            .request(to_reqwest_method(method), url.clone())
            .headers(build_headers(&request.headers)?);

        if let Some(ref body) = request.data {
            builder = builder.json(body);
        }

        debug!(%method, url = %url.path(), "sending HTTP request");

        let response = builder.send().await.inspect_err(|e| {
            debug!(%method, url = %url.path(), error = %e, "HTTP request failed");
        })?;

        let status = response.status();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await?;

        debug!(%method, url = %url.path(), status = status.as_u16(), "received HTTP response");

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            data: decode_body(&body),
            headers,
        })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn build_headers(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = key
            .parse::<HeaderName>()
            .map_err(|e| Error::Transport(format!("Invalid header name '{key}': {e}")))?;
        // Never echo header values, they may be credentials
        let value = value
            .parse::<HeaderValue>()
            .map_err(|_| Error::Transport(format!("Invalid value for header '{key}'")))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Flatten a header map, joining repeated headers with ", "
fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut out: HashMap<String, String> = HashMap::with_capacity(headers.len());
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        out.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    out
}

/// Decode a body as JSON; empty is `null`, anything unparsable is a string
fn decode_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}
