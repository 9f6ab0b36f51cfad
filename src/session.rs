//! Credential and session persistence
//!
//! The bearer credential is an opaque token issued by the backend at login.
//! Its presence (and non-empty length) is the only authentication signal the
//! client uses; no local expiry check is performed. The backend decides
//! when it has expired by answering 401.

use crate::error::Result;
use crate::storage::{keys, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session object returned by `/api/auth/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer secret sent on authenticated requests
    pub secret: String,

    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Server-side expiry, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(rename = "providerUid", default, skip_serializing_if = "Option::is_none")]
    pub provider_uid: Option<String>,

    #[serde(rename = "$createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "$updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Session {
    /// Session carrying only a secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            id: None,
            user_id: None,
            expire: None,
            provider: None,
            provider_uid: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Account returned by `/api/auth/signup`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "$id", default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "$createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "$updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Accessor for the credential and session metadata in the client store
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The underlying key-value store
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// The stored bearer token. Storage errors read as "no token".
    pub fn token(&self) -> Option<String> {
        match self.store.get(keys::SESSION_TOKEN) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!("Error accessing client store: {}", e);
                None
            }
        }
    }

    /// `true` if a non-empty token is stored
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }

    /// Persist a freshly issued session
    pub fn save_session(&self, session: &Session) -> Result<()> {
        self.store.set(keys::SESSION_TOKEN, &session.secret)?;
        self.store
            .set(keys::USER_SESSION, &serde_json::to_string(session)?)?;
        Ok(())
    }

    /// The stored session metadata, if present and parseable
    pub fn session(&self) -> Option<Session> {
        let raw = match self.store.get(keys::USER_SESSION) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Error reading session metadata: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Ignoring unparseable session metadata: {}", e);
                None
            }
        }
    }

    /// Forget the credential and session metadata
    pub fn clear_session(&self) {
        self.remove_all(&[keys::SESSION_TOKEN, keys::USER_SESSION]);
    }

    /// Forget the credential, session metadata, and the daily usage counter
    pub fn clear_all(&self) {
        self.remove_all(&[
            keys::SESSION_TOKEN,
            keys::USER_SESSION,
            keys::DAILY_REQUEST_COUNT,
            keys::LAST_REQUEST_DATE,
        ]);
    }

    fn remove_all(&self, keys: &[&str]) {
        for key in keys {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!("Failed to remove {} from client store: {}", key, e);
            }
        }
    }
}
