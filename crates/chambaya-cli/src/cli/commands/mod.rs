//! CLI command handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use chambaya_core::api::ApiClient;
use chambaya_core::config::Config;
use chambaya_core::notifications::NotificationCenter;
use chambaya_core::session::SessionStore;
use chambaya_types::User;

pub mod auth;
pub mod config;
pub mod notifications;
pub mod ratings;
pub mod works;

/// Shared state for commands that talk to the API.
pub struct App {
    pub config: Config,
    pub client: ApiClient,
}

impl App {
    /// Rehydrates the stored session and builds the API client.
    ///
    /// # Errors
    /// Returns an error if the API base URL is invalid.
    pub fn open(config: Config) -> Result<Self> {
        let session = Arc::new(SessionStore::open_default());
        session.rehydrate();
        let client = ApiClient::from_config(&config.api, session).context("create API client")?;
        tracing::debug!(base_url = client.base_url(), "api client ready");
        Ok(Self { config, client })
    }

    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }

    pub fn notifications(&self) -> NotificationCenter {
        let settings = &self.config.notifications;
        NotificationCenter::new(self.client.clone(), settings.stale_time())
            .with_stats_stale_time(settings.stats_stale_time())
    }

    /// The logged-in user, or an error telling how to log in.
    pub fn require_user(&self) -> Result<User> {
        let snapshot = self.session().snapshot();
        match (snapshot.token, snapshot.user) {
            (Some(_), Some(user)) => Ok(user),
            _ => anyhow::bail!("Not logged in. Run `chambaya login` first."),
        }
    }
}
