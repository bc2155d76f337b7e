//! Users (`/api/2/users`)

use std::sync::Arc;

use serde_json::Value;

use super::Collection;
use crate::repository::HttpRepository;
use crate::transport::{HttpClient, HttpResponse};

/// Users endpoint
pub const USERS_PATH: &str = "/api/2/users";

/// User management
#[derive(Debug, Clone)]
pub struct UsersRepository<C> {
    users: Collection<C>,
}

impl<C: HttpClient> UsersRepository<C> {
    /// Bind to a shared resource repository
    pub fn new(repository: Arc<HttpRepository<C>>) -> Self {
        Self {
            users: Collection::new(repository, USERS_PATH),
        }
    }

    /// Every user in the account, across all pages
    pub async fn list_users(&self) -> Option<HttpResponse> {
        self.users.list().await
    }

    /// A single user
    pub async fn get_user(&self, id: &str) -> Option<HttpResponse> {
        self.users.get(id).await
    }

    /// Create a user
    pub async fn create_user(&self, data: Value) -> Option<HttpResponse> {
        self.users.create(data).await
    }

    /// Update a user
    pub async fn update_user(&self, id: &str, data: Value) -> Option<HttpResponse> {
        self.users.update(id, data).await
    }

    /// Delete a user
    pub async fn delete_user(&self, id: &str) -> Option<HttpResponse> {
        self.users.delete(id).await
    }
}
