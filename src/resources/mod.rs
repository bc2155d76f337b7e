//! Domain repositories
//!
//! Thin facades binding [`HttpRepository`] to fixed OneLogin API v2 paths.
//! They inherit the repository's fail-soft contract: `None` means the call
//! failed.

mod apps;
mod users;

pub use apps::AppsRepository;
pub use users::UsersRepository;

use std::sync::Arc;

use serde_json::Value;

use crate::repository::HttpRepository;
use crate::transport::{HttpClient, HttpRequest, HttpResponse};

/// Response header carrying the next-page cursor on v2 list endpoints
pub const AFTER_CURSOR_HEADER: &str = "After-Cursor";

/// A REST collection rooted at a fixed path
#[derive(Debug)]
struct Collection<C> {
    repository: Arc<HttpRepository<C>>,
    path: &'static str,
}

impl<C> Clone for Collection<C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            path: self.path,
        }
    }
}

impl<C: HttpClient> Collection<C> {
    fn new(repository: Arc<HttpRepository<C>>, path: &'static str) -> Self {
        Self { repository, path }
    }

    async fn list(&self) -> Option<HttpResponse> {
        self.repository
            .query(HttpRequest::get(self.path).with_cursor(AFTER_CURSOR_HEADER))
            .await
    }

    async fn get(&self, id: &str) -> Option<HttpResponse> {
        self.repository
            .read_resource(HttpRequest::get(self.path).with_id(id))
            .await
    }

    async fn create(&self, data: Value) -> Option<HttpResponse> {
        self.repository
            .write_resource(HttpRequest::post(self.path).with_data(data))
            .await
    }

    async fn update(&self, id: &str, data: Value) -> Option<HttpResponse> {
        self.repository
            .write_resource(HttpRequest::post(self.path).with_id(id).with_data(data))
            .await
    }

    async fn delete(&self, id: &str) -> Option<HttpResponse> {
        self.repository
            .destroy_resource(HttpRequest::get(self.path).with_id(id))
            .await
    }
}
