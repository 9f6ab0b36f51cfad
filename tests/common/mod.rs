use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::TempDir;

use synthdata::api::ApiClient;
use synthdata::session::CredentialStore;
use synthdata::storage::{keys, KeyValueStore, MemoryStore};

/// Client pointed at `base_url` over a fresh in-memory store.
#[allow(dead_code)]
pub fn client_with_store(base_url: &str) -> (ApiClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let client = ApiClient::with_base_url(
        base_url,
        Duration::from_secs(5),
        CredentialStore::new(store.clone()),
    )
    .expect("client builds");
    (client, store)
}

/// Same as `client_with_store`, already signed in with `token`.
#[allow(dead_code)]
pub fn signed_in_client(base_url: &str, token: &str) -> (ApiClient, Arc<MemoryStore>) {
    let (client, store) = client_with_store(base_url);
    store.set(keys::SESSION_TOKEN, token).unwrap();
    store
        .set(keys::USER_SESSION, &json!({"secret": token}).to_string())
        .unwrap();
    (client, store)
}

#[allow(dead_code)]
pub fn schema_body() -> Value {
    json!({
        "column_count": 3,
        "model_used": "claude",
        "schema": [
            {"name": "id", "type": "integer"},
            {"name": "name", "type": "string"},
            {"name": "tier", "type": "enum", "values": ["gold", "silver"]}
        ]
    })
}

#[allow(dead_code)]
pub fn data_body() -> Value {
    json!({
        "count": 2,
        "data": [
            {"id": 1, "name": "Doe, Jane", "tier": "gold"},
            {"id": 2, "name": "Roe", "tier": "silver"}
        ]
    })
}

#[allow(dead_code)]
pub fn temp_file(contents: &str, name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let path = temp_dir.path().join(name);
    fs::write(&path, contents).expect("failed to write file");
    (temp_dir, path)
}
