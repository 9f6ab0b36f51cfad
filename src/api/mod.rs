//! Authenticated request gateway
//!
//! [`ApiClient`] mediates every call to the generation backend. Generation
//! endpoints require the stored bearer credential; the auth endpoints do
//! not.
//!
//! # Status handling for authenticated requests
//!
//! - no stored credential: fails with [`SynthError::NotAuthenticated`]
//!   before any network I/O
//! - `401`: clears the credential and session metadata, fails with
//!   [`SynthError::SessionExpired`] (the body is never read)
//! - `429`: fails with [`SynthError::RateLimited`] carrying the server's
//!   `error` message
//! - other non-2xx: fails with [`SynthError::RequestFailed`] carrying the
//!   server's `error` message, or `"Request failed"`
//! - `2xx`: the JSON body is decoded into the expected response type
//!
//! Transport failures surface as [`SynthError::Network`]. Nothing is
//! retried here; retry policy belongs to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::{Result, SynthError};
use crate::session::{CredentialStore, Session, User};

pub mod types;
pub use types::{
    ApiErrorBody, DataRequest, DataResponse, ModelType, Row, SchemaField, SchemaRequest,
    SchemaResponse,
};
use types::{LoginRequest, LogoutRequest, SignupRequest};

/// Backend endpoint paths
pub mod endpoints {
    pub const LOGIN: &str = "/api/auth/login";
    pub const SIGNUP: &str = "/api/auth/signup";
    pub const LOGOUT: &str = "/api/auth/logout";
    pub const GENERATE_SCHEMA: &str = "/api/generate-schema";
    pub const GENERATE_DATA: &str = "/api/generate-data";
}

/// The two generation calls the wizard steps depend on.
///
/// [`ApiClient`] is the real implementation; tests substitute a fake.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Ask the backend to infer a schema from a description
    async fn generate_schema(&self, request: &SchemaRequest) -> Result<SchemaResponse>;

    /// Ask the backend to synthesize rows matching a schema
    async fn generate_data(&self, request: &DataRequest) -> Result<DataResponse>;
}

/// HTTP client for the generation backend
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use synthdata::api::{ApiClient, GenerationBackend, ModelType, SchemaRequest};
/// use synthdata::session::CredentialStore;
/// use synthdata::storage::MemoryStore;
///
/// # async fn example() -> synthdata::error::Result<()> {
/// let credentials = CredentialStore::new(Arc::new(MemoryStore::new()));
/// let client = ApiClient::with_base_url("http://localhost:5000", Duration::from_secs(30), credentials)?;
/// client.login("me@example.com", "hunter2").await?;
/// let schema = client
///     .generate_schema(&SchemaRequest {
///         description: "online store customers".to_string(),
///         model_type: ModelType::Claude,
///         column_count: 5,
///     })
///     .await?;
/// println!("{} columns", schema.column_count);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialStore,
}

impl ApiClient {
    /// Build a client from the `api` config section
    pub fn new(config: &ApiConfig, credentials: CredentialStore) -> Result<Self> {
        Self::with_base_url(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
            credentials,
        )
    }

    /// Build a client for an explicit backend URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
        credentials: CredentialStore,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SynthError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Credential store this client reads and clears
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// POST `payload` to `endpoint` with the stored bearer credential and
    /// decode the JSON response.
    pub async fn send<P, T>(&self, endpoint: &str, payload: &P) -> Result<T>
    where
        P: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let token = match self.credentials.token() {
            Some(token) if !token.is_empty() => token,
            _ => return Err(SynthError::NotAuthenticated.into()),
        };

        tracing::debug!("POST {}", endpoint);
        let response = self
            .http
            .post(self.url(endpoint))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(|e| SynthError::Network(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Backend rejected credential for {}; clearing session", endpoint);
            self.credentials.clear_session();
            return Err(SynthError::SessionExpired.into());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = read_error_body(response).await;
            return Err(SynthError::RateLimited {
                message: body.message_or("Too many requests"),
                reset_time: body.reset_time,
            }
            .into());
        }

        if !status.is_success() {
            let body = read_error_body(response).await;
            tracing::debug!("{} returned {}", endpoint, status);
            return Err(SynthError::RequestFailed(body.message_or("Request failed")).into());
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SynthError::InvalidResponse(e.to_string()).into())
    }

    /// Exchange email and password for a session and store it.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        if email.is_empty() || password.is_empty() {
            return Err(SynthError::Validation("Both fields are required".to_string()).into());
        }

        let response = self
            .http
            .post(self.url(endpoints::LOGIN))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| SynthError::Network(e.to_string()))?;

        let status = response.status();
        let body = read_json_value(response).await;

        let session = body
            .get("session")
            .filter(|_| status.is_success())
            .and_then(|s| serde_json::from_value::<Session>(s.clone()).ok());

        match session {
            Some(session) => {
                self.credentials.save_session(&session)?;
                tracing::info!("Logged in as {}", email);
                Ok(session)
            }
            None => {
                let err = ApiErrorBody::from_value(&body);
                Err(SynthError::RequestFailed(err.message_or("Login failed")).into())
            }
        }
    }

    /// Create an account. The user still has to log in afterwards.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User> {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(SynthError::Validation("All fields are required".to_string()).into());
        }

        let response = self
            .http
            .post(self.url(endpoints::SIGNUP))
            .json(&SignupRequest {
                name,
                email,
                password,
            })
            .send()
            .await
            .map_err(|e| SynthError::Network(e.to_string()))?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        if !is_json {
            let text = response.text().await.unwrap_or_default();
            tracing::error!("Non-JSON signup response: {}", text);
            return Err(SynthError::InvalidResponse("Server didn't return JSON".to_string()).into());
        }

        let body = read_json_value(response).await;
        let user = body
            .get("user")
            .filter(|_| status.is_success())
            .and_then(|u| serde_json::from_value::<User>(u.clone()).ok());

        match user {
            Some(user) => {
                tracing::info!("Created account for {}", email);
                Ok(user)
            }
            None => {
                let err = ApiErrorBody::from_value(&body);
                Err(SynthError::RequestFailed(err.message_or("Signup failed")).into())
            }
        }
    }

    /// End the session on the backend (best effort) and wipe local state.
    ///
    /// Credential, session metadata, and the daily usage counter are
    /// removed whether or not the backend call succeeds.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// use synthdata::api::ApiClient;
    /// use synthdata::session::CredentialStore;
    /// use synthdata::storage::{keys, KeyValueStore, MemoryStore};
    ///
    /// # tokio_test::block_on(async {
    /// let store = Arc::new(MemoryStore::new());
    /// store.set(keys::DAILY_REQUEST_COUNT, "3").unwrap();
    /// let credentials = CredentialStore::new(store.clone());
    /// let client =
    ///     ApiClient::with_base_url("http://localhost:5000", Duration::from_secs(5), credentials)
    ///         .unwrap();
    ///
    /// // Without a credential there is no backend session to end.
    /// client.logout().await;
    /// assert!(store.is_empty());
    /// # });
    /// ```
    pub async fn logout(&self) {
        if let Some(token) = self.credentials.token().filter(|t| !t.is_empty()) {
            let result = self
                .http
                .post(self.url(endpoints::LOGOUT))
                .json(&LogoutRequest { session_id: &token })
                .send()
                .await;

            match result {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!("Logout returned {}", response.status());
                }
                Ok(_) => tracing::debug!("Backend session terminated"),
                Err(e) => tracing::warn!("Logout error: {}", e),
            }
        }

        self.credentials.clear_all();
    }
}

#[async_trait]
impl GenerationBackend for ApiClient {
    async fn generate_schema(&self, request: &SchemaRequest) -> Result<SchemaResponse> {
        self.send(endpoints::GENERATE_SCHEMA, request).await
    }

    async fn generate_data(&self, request: &DataRequest) -> Result<DataResponse> {
        self.send(endpoints::GENERATE_DATA, request).await
    }
}

async fn read_error_body(response: reqwest::Response) -> ApiErrorBody {
    ApiErrorBody::from_value(&read_json_value(response).await)
}

async fn read_json_value(response: reqwest::Response) -> serde_json::Value {
    response
        .json::<serde_json::Value>()
        .await
        .unwrap_or(serde_json::Value::Null)
}
