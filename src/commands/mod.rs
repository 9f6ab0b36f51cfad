/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `auth`: signup, login, logout, whoami, quota
- `generate`: schema and data generation, export
- `wizard`: interactive guided flow
- `display`: table and notification rendering shared by the above

Handlers are small: they build an [`AppContext`] from the configuration
and call into the library (`api`, `workflow`, `quota`, `export`).
*/

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::quota::QuotaTracker;
use crate::session::CredentialStore;
use crate::storage::{KeyValueStore, SqliteStore};
use std::sync::Arc;

pub mod display;
pub mod generate;
pub mod wizard;

/// Everything a command needs: config, client state, gateway, quota
pub struct AppContext {
    pub config: Config,
    pub client: ApiClient,
    pub tracker: QuotaTracker,
}

impl AppContext {
    /// Open the configured client store and build the gateway over it
    pub fn from_config(config: Config) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.storage.path {
            Some(path) => Arc::new(SqliteStore::new_with_path(path)?),
            None => Arc::new(SqliteStore::new()?),
        };
        Self::with_store(config, store)
    }

    /// Build a context over an already opened store
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let client = ApiClient::new(&config.api, CredentialStore::new(store.clone()))?;
        let tracker = QuotaTracker::new(store);
        Ok(Self {
            config,
            client,
            tracker,
        })
    }

    pub fn credentials(&self) -> &CredentialStore {
        self.client.credentials()
    }
}

pub mod auth {
    //! Account and session commands.

    use super::*;
    use crate::commands::display;
    use crate::error::SynthError;
    use crate::quota::DAILY_LIMIT;
    use colored::Colorize;

    /// Create an account on the backend
    pub async fn signup(
        ctx: &AppContext,
        name: &str,
        email: &str,
        password: &str,
        accept_terms: bool,
    ) -> Result<()> {
        if !accept_terms {
            return Err(SynthError::Validation(
                "Please accept the terms and conditions".to_string(),
            )
            .into());
        }

        ctx.client.signup(name, email, password).await?;
        println!(
            "{}",
            "Account created successfully! Please log in to continue.".green()
        );
        Ok(())
    }

    /// Sign in and persist the session
    pub async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
        ctx.client.login(email, password).await?;
        println!("{} {}", "Logged in as".green(), email.bold());
        print_remaining(ctx);
        Ok(())
    }

    /// End the session on the backend and clear local state
    pub async fn logout(ctx: &AppContext) -> Result<()> {
        ctx.client.logout().await;
        println!("Logged out.");
        Ok(())
    }

    /// Dashboard: session metadata and remaining requests
    pub fn whoami(ctx: &AppContext) -> Result<()> {
        let credentials = ctx.credentials();
        if !credentials.is_authenticated() {
            return Err(SynthError::NotAuthenticated.into());
        }

        match credentials.session() {
            Some(session) => {
                println!("\nAccount Information\n");
                display::session_table(&session).printstd();
                println!();
            }
            None => println!("Signed in (no session details stored)."),
        }
        print_remaining(ctx);
        Ok(())
    }

    /// Print today's remaining request count
    pub fn quota(ctx: &AppContext) -> Result<()> {
        print_remaining(ctx);
        Ok(())
    }

    fn print_remaining(ctx: &AppContext) {
        let remaining = ctx.tracker.remaining_requests();
        println!(
            "{} requests remaining today (daily limit {})",
            display::remaining_badge(remaining),
            DAILY_LIMIT
        );
    }

}
