//! Applications (`/api/2/apps`)

use std::sync::Arc;

use serde_json::Value;

use super::Collection;
use crate::repository::HttpRepository;
use crate::transport::{HttpClient, HttpResponse};

/// Applications endpoint
pub const APPS_PATH: &str = "/api/2/apps";

/// Application management
#[derive(Debug, Clone)]
pub struct AppsRepository<C> {
    apps: Collection<C>,
}

impl<C: HttpClient> AppsRepository<C> {
    /// Bind to a shared resource repository
    pub fn new(repository: Arc<HttpRepository<C>>) -> Self {
        Self {
            apps: Collection::new(repository, APPS_PATH),
        }
    }

    /// Every application in the account, across all pages
    pub async fn list_apps(&self) -> Option<HttpResponse> {
        self.apps.list().await
    }

    /// A single application
    pub async fn get_app(&self, id: &str) -> Option<HttpResponse> {
        self.apps.get(id).await
    }

    /// Create an application
    pub async fn create_app(&self, data: Value) -> Option<HttpResponse> {
        self.apps.create(data).await
    }

    /// Replace an application's attributes
    pub async fn update_app(&self, id: &str, data: Value) -> Option<HttpResponse> {
        self.apps.update(id, data).await
    }

    /// Delete an application
    pub async fn delete_app(&self, id: &str) -> Option<HttpResponse> {
        self.apps.delete(id).await
    }
}
