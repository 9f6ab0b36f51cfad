//! Wire types exchanged with the generation backend

use crate::error::SynthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One generated row: column name to value, in the order the backend sent
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Model family the backend should use for a generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Mistral,
    Claude,
    Llama,
}

impl ModelType {
    /// All selectable models, in menu order
    pub const ALL: [ModelType; 3] = [ModelType::Mistral, ModelType::Claude, ModelType::Llama];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Mistral => "mistral",
            ModelType::Claude => "claude",
            ModelType::Llama => "llama",
        }
    }

    /// Human-facing label
    pub fn label(&self) -> &'static str {
        match self {
            ModelType::Mistral => "🚀 Mistral",
            ModelType::Claude => "🧠 Claude",
            ModelType::Llama => "🦙 Llama",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mistral" => Ok(ModelType::Mistral),
            "claude" => Ok(ModelType::Claude),
            "llama" => Ok(ModelType::Llama),
            other => Err(SynthError::Validation(format!(
                "Unknown model type: {}. Must be one of: mistral, claude, llama",
                other
            ))),
        }
    }
}

/// One column of a generated schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    /// Allowed values for enumerated columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

/// Body of a successful `/api/generate-schema` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub column_count: u32,
    pub model_used: String,
    pub schema: Vec<SchemaField>,
}

/// Body of a successful `/api/generate-data` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse {
    pub count: u64,
    pub data: Vec<Row>,
}

/// Payload for `/api/generate-schema`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaRequest {
    pub description: String,
    pub model_type: ModelType,
    pub column_count: u32,
}

/// Payload for `/api/generate-data`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRequest {
    pub schema: Vec<SchemaField>,
    pub count: u32,
    pub model_type: ModelType,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SignupRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LogoutRequest<'a> {
    pub session_id: &'a str,
}

/// Error body the backend sends with non-2xx responses
///
/// Built field by field from whatever JSON came back, so an unexpected
/// sibling field never hides the server's message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
    pub reset_time: Option<String>,
    pub raw: Option<String>,
}

impl ApiErrorBody {
    /// Pull the known fields out of an arbitrary JSON body
    pub fn from_value(body: &serde_json::Value) -> Self {
        Self {
            error: string_field(body, "error"),
            message: string_field(body, "message"),
            reset_time: text_field(body, "reset_time"),
            raw: text_field(body, "raw"),
        }
    }

    /// `error`, then `message`, then `fallback`. Empty strings are skipped.
    pub fn message_or(&self, fallback: &str) -> String {
        self.error
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.message.as_deref().filter(|m| !m.is_empty()))
            .unwrap_or(fallback)
            .to_string()
    }
}

fn string_field(body: &serde_json::Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

/// Strings as-is, any other non-null value as its JSON text
fn text_field(body: &serde_json::Value, key: &str) -> Option<String> {
    match body.get(key)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_type_parse() {
        assert_eq!("claude".parse::<ModelType>().unwrap(), ModelType::Claude);
        assert_eq!(" Llama ".parse::<ModelType>().unwrap(), ModelType::Llama);
        assert!("gpt".parse::<ModelType>().is_err());
    }

    #[test]
    fn test_model_type_serializes_lowercase() {
        let value = serde_json::to_value(ModelType::Mistral).unwrap();
        assert_eq!(value, json!("mistral"));
    }

    #[test]
    fn test_schema_request_wire_shape() {
        let req = SchemaRequest {
            description: "customers".to_string(),
            model_type: ModelType::Claude,
            column_count: 5,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"description": "customers", "model_type": "claude", "column_count": 5})
        );
    }

    #[test]
    fn test_schema_field_type_rename_and_optional_values() {
        let field: SchemaField =
            serde_json::from_value(json!({"name": "tier", "type": "enum", "values": ["a", "b"]}))
                .unwrap();
        assert_eq!(field.field_type, "enum");
        assert_eq!(field.values, Some(vec!["a".to_string(), "b".to_string()]));

        let plain = SchemaField {
            name: "id".to_string(),
            field_type: "integer".to_string(),
            values: None,
        };
        assert_eq!(
            serde_json::to_value(&plain).unwrap(),
            json!({"name": "id", "type": "integer"})
        );
    }

    #[test]
    fn test_data_response_preserves_column_order() {
        let body = r#"{"count": 1, "data": [{"zeta": 1, "alpha": 2, "mid": 3}]}"#;
        let resp: DataResponse = serde_json::from_str(body).unwrap();
        let keys: Vec<&str> = resp.data[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_error_body_message_precedence() {
        let body = ApiErrorBody {
            error: Some("bad".into()),
            message: Some("worse".into()),
            ..Default::default()
        };
        assert_eq!(body.message_or("fallback"), "bad");

        let body = ApiErrorBody {
            message: Some("worse".into()),
            ..Default::default()
        };
        assert_eq!(body.message_or("fallback"), "worse");

        assert_eq!(ApiErrorBody::default().message_or("fallback"), "fallback");

        let body = ApiErrorBody {
            error: Some(String::new()),
            message: Some("Invalid credentials".into()),
            ..Default::default()
        };
        assert_eq!(body.message_or("Login failed"), "Invalid credentials");

        let body = ApiErrorBody {
            error: Some(String::new()),
            message: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(body.message_or("Login failed"), "Login failed");
    }

    #[test]
    fn test_error_body_tolerates_unexpected_field_types() {
        let body = ApiErrorBody::from_value(&json!({
            "error": "Daily generation limit reached",
            "reset_time": 1760832000,
            "raw": {"detail": "x"}
        }));
        assert_eq!(body.message_or("Too many requests"), "Daily generation limit reached");
        assert_eq!(body.reset_time.as_deref(), Some("1760832000"));
        assert_eq!(body.raw.as_deref(), Some(r#"{"detail":"x"}"#));

        let body = ApiErrorBody::from_value(&json!({"error": 42, "message": "fine"}));
        assert_eq!(body.message_or("fallback"), "fine");

        assert_eq!(
            ApiErrorBody::from_value(&serde_json::Value::Null),
            ApiErrorBody::default()
        );
    }
}
