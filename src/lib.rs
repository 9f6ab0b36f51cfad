//! synthdata - client library for AI-assisted synthetic data generation
//!
//! A user describes a dataset in plain language, the backend proposes a
//! schema, the user optionally edits it, and the backend then synthesizes
//! rows matching it. All inference happens on the backend; this crate owns
//! the client side of that exchange.
//!
//! # Architecture
//!
//! - `storage`: injectable key-value store for client state (SQLite or in-memory)
//! - `quota`: client-side daily request counter with warnings
//! - `session`: bearer credential and session metadata
//! - `api`: authenticated request gateway to the backend
//! - `workflow`: form validation, generation steps, and the wizard state machine
//! - `export`: JSON and CSV export of generated rows
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli` / `commands`: command-line interface and handlers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use synthdata::api::{ApiClient, ModelType};
//! use synthdata::quota::QuotaTracker;
//! use synthdata::session::CredentialStore;
//! use synthdata::storage::SqliteStore;
//! use synthdata::workflow::{run_schema_step, SchemaForm};
//! use synthdata::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let store = Arc::new(SqliteStore::new()?);
//!     let client = ApiClient::new(&config.api, CredentialStore::new(store.clone()))?;
//!     let tracker = QuotaTracker::new(store);
//!
//!     let form = SchemaForm {
//!         description: "patients of a dental clinic".to_string(),
//!         model: Some(ModelType::Claude),
//!         column_count: 6,
//!     };
//!     let outcome = run_schema_step(&client, &tracker, &form).await?;
//!     println!("{:?}", outcome.response.schema);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod quota;
pub mod session;
pub mod storage;
pub mod workflow;

// Re-export commonly used types
pub use api::{ApiClient, GenerationBackend};
pub use config::Config;
pub use error::{Result, SynthError};
pub use quota::QuotaTracker;
pub use storage::KeyValueStore;
