//! Top-level OneLogin client

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::oauth::OneLoginClient;
use crate::repository::HttpRepository;
use crate::resources::{AppsRepository, UsersRepository};
use crate::transport::{HttpClient, ReqwestTransport};
use crate::Result;

/// Bundles the authenticating client with the resource repositories built on it
///
/// All repositories share one client and therefore one cached token.
pub struct Client<T = ReqwestTransport> {
    http: Arc<OneLoginClient<T>>,
    resources: Arc<HttpRepository<Arc<OneLoginClient<T>>>>,
    apps: AppsRepository<Arc<OneLoginClient<T>>>,
    users: UsersRepository<Arc<OneLoginClient<T>>>,
}

impl Client<ReqwestTransport> {
    /// Connect to OneLogin over reqwest
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_http(OneLoginClient::new(config)?))
    }
}

impl<T: HttpClient> Client<T> {
    /// Build on top of an existing authenticating client
    pub fn from_http(http: OneLoginClient<T>) -> Self {
        let http = Arc::new(http);
        let resources = Arc::new(HttpRepository::new(Arc::clone(&http)));

        Self {
            apps: AppsRepository::new(Arc::clone(&resources)),
            users: UsersRepository::new(Arc::clone(&resources)),
            http,
            resources,
        }
    }

    /// Authenticating client, for raw requests that should fail loudly
    pub fn http(&self) -> &OneLoginClient<T> {
        &self.http
    }

    /// Generic fail-soft resource repository
    pub fn resources(&self) -> &HttpRepository<Arc<OneLoginClient<T>>> {
        &self.resources
    }

    /// Applications
    pub fn apps(&self) -> &AppsRepository<Arc<OneLoginClient<T>>> {
        &self.apps
    }

    /// Users
    pub fn users(&self) -> &UsersRepository<Arc<OneLoginClient<T>>> {
        &self.users
    }
}
