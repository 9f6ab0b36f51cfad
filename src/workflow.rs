//! Guided generation flow
//!
//! The client walks the user through four stages: sign in, describe the
//! dataset and get a schema back, optionally hand-edit that schema as JSON,
//! then request rows matching it and export them. This module holds the
//! non-interactive parts of that flow: form validation, the two generation
//! steps (which record quota usage on success), schema edit validation, and
//! the [`Wizard`] step state machine. The interactive driver lives in
//! `commands::wizard`.

use crate::api::{
    DataRequest, DataResponse, GenerationBackend, ModelType, SchemaRequest, SchemaResponse,
};
use crate::error::{Result, SynthError};
use crate::quota::QuotaTracker;

/// Fewest columns a schema may be asked for
pub const MIN_COLUMN_COUNT: u32 = 1;

/// Most columns a schema may be asked for
pub const MAX_COLUMN_COUNT: u32 = 15;

/// Largest data request accepted
pub const MAX_ROW_COUNT: u32 = 500;

/// Row counts offered by the interactive wizard
pub const ROW_COUNT_OPTIONS: [u32; 8] = [10, 20, 50, 100, 200, 300, 400, 500];

/// Clamp a requested column count into the accepted range
pub fn clamp_column_count(count: u32) -> u32 {
    count.clamp(MIN_COLUMN_COUNT, MAX_COLUMN_COUNT)
}

/// Severity of a message shown after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

/// Inline message shown to the user after a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Result of a successful step plus what to tell the user about it
#[derive(Debug, Clone)]
pub struct StepOutcome<T> {
    pub response: T,
    pub notifications: Vec<Notification>,
}

/// Inputs of the schema step
#[derive(Debug, Clone)]
pub struct SchemaForm {
    pub description: String,
    pub model: Option<ModelType>,
    pub column_count: u32,
}

impl SchemaForm {
    /// Validate and turn the form into a request. Column count is clamped.
    pub fn to_request(&self) -> Result<SchemaRequest> {
        let description = self.description.trim();
        match self.model {
            Some(model_type) if !description.is_empty() => Ok(SchemaRequest {
                description: description.to_string(),
                model_type,
                column_count: clamp_column_count(self.column_count),
            }),
            _ => Err(SynthError::Validation(
                "Please provide a description and select a model type.".to_string(),
            )
            .into()),
        }
    }
}

/// Inputs of the data step
#[derive(Debug, Clone)]
pub struct DataForm {
    pub model: Option<ModelType>,
    pub row_count: u32,
}

impl DataForm {
    /// Validate and turn the form into a request for `schema`
    pub fn to_request(&self, schema: &SchemaResponse) -> Result<DataRequest> {
        let model_type = self.model.ok_or_else(|| {
            SynthError::Validation("Please select a model type for data generation.".to_string())
        })?;

        if self.row_count == 0 || self.row_count > MAX_ROW_COUNT {
            return Err(SynthError::Validation(format!(
                "Row count must be between 1 and {}.",
                MAX_ROW_COUNT
            ))
            .into());
        }

        Ok(DataRequest {
            schema: schema.schema.clone(),
            count: self.row_count,
            model_type,
        })
    }
}

/// Generate a schema and count the request against today's quota.
pub async fn run_schema_step(
    backend: &dyn GenerationBackend,
    tracker: &QuotaTracker,
    form: &SchemaForm,
) -> Result<StepOutcome<SchemaResponse>> {
    let request = form.to_request()?;
    tracing::info!(
        model = %request.model_type,
        columns = request.column_count,
        "Generating schema"
    );

    let response = backend.generate_schema(&request).await?;

    let mut notifications = vec![Notification::success(format!(
        "Successfully generated schema with {} columns using {}.",
        response.column_count, response.model_used
    ))];
    if let Some(warning) = tracker.record_usage() {
        notifications.push(Notification::warning(warning));
    }

    Ok(StepOutcome {
        response,
        notifications,
    })
}

/// Generate rows for `schema` and count the request against today's quota.
pub async fn run_data_step(
    backend: &dyn GenerationBackend,
    tracker: &QuotaTracker,
    schema: &SchemaResponse,
    form: &DataForm,
) -> Result<StepOutcome<DataResponse>> {
    let request = form.to_request(schema)?;
    tracing::info!(
        model = %request.model_type,
        rows = request.count,
        "Generating data"
    );

    let response = backend.generate_data(&request).await?;

    let mut notifications = vec![Notification::success(format!(
        "Successfully generated {} rows of synthetic data.",
        response.count
    ))];
    if let Some(warning) = tracker.record_usage() {
        notifications.push(Notification::warning(warning));
    }

    Ok(StepOutcome {
        response,
        notifications,
    })
}

/// Parse a hand-edited schema document.
///
/// The document must be valid JSON with a `schema` array, a non-zero
/// `column_count`, and a non-empty `model_used`.
///
/// # Examples
///
/// ```
/// use synthdata::workflow::apply_schema_edit;
///
/// let edited = r#"{"column_count": 1, "model_used": "claude",
///                  "schema": [{"name": "id", "type": "integer"}]}"#;
/// let schema = apply_schema_edit(edited).unwrap();
/// assert_eq!(schema.schema[0].name, "id");
///
/// assert!(apply_schema_edit("{").is_err());
/// ```
pub fn apply_schema_edit(text: &str) -> Result<SchemaResponse> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|_| SynthError::Validation("Invalid JSON format".to_string()))?;

    let invalid = || SynthError::Validation("Invalid schema structure".to_string());

    let has_schema = value.get("schema").is_some_and(|s| s.is_array());
    let has_count = value
        .get("column_count")
        .and_then(|c| c.as_u64())
        .is_some_and(|c| c > 0);
    let has_model = value
        .get("model_used")
        .and_then(|m| m.as_str())
        .is_some_and(|m| !m.is_empty());

    if !(has_schema && has_count && has_model) {
        return Err(invalid().into());
    }

    serde_json::from_value(value).map_err(|_| invalid().into())
}

/// Stage of the guided flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Landing,
    Auth,
    Schema,
    Data,
    Export,
}

/// State of the guided flow
///
/// # Examples
///
/// ```
/// use synthdata::workflow::{Wizard, WizardStep};
///
/// let mut wizard = Wizard::new();
/// wizard.start(false);
/// assert_eq!(wizard.step(), WizardStep::Auth);
/// wizard.authenticated();
/// assert_eq!(wizard.step(), WizardStep::Schema);
/// ```
#[derive(Debug, Clone)]
pub struct Wizard {
    step: WizardStep,
    schema: Option<SchemaResponse>,
    data: Option<DataResponse>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Landing,
            schema: None,
            data: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Schema carried into the data step
    pub fn schema(&self) -> Option<&SchemaResponse> {
        self.schema.as_ref()
    }

    /// Rows carried into the export step
    pub fn data(&self) -> Option<&DataResponse> {
        self.data.as_ref()
    }

    /// Leave the landing stage. A stored credential skips sign-in.
    pub fn start(&mut self, has_credential: bool) {
        if self.step == WizardStep::Landing {
            self.step = if has_credential {
                WizardStep::Schema
            } else {
                WizardStep::Auth
            };
        }
    }

    /// Sign-in finished
    pub fn authenticated(&mut self) {
        if self.step == WizardStep::Auth {
            self.step = WizardStep::Schema;
        }
    }

    /// A schema was generated or edited; move to the data stage.
    pub fn schema_ready(&mut self, schema: SchemaResponse) {
        self.schema = Some(schema);
        self.data = None;
        self.step = WizardStep::Data;
    }

    /// Replace the schema in place without leaving the current stage
    pub fn update_schema(&mut self, schema: SchemaResponse) {
        self.schema = Some(schema);
    }

    /// Rows were generated; move to the export stage.
    pub fn data_ready(&mut self, data: DataResponse) {
        if self.schema.is_some() {
            self.data = Some(data);
            self.step = WizardStep::Export;
        }
    }

    /// Go back one stage. Never returns to sign-in or landing.
    pub fn back(&mut self) {
        self.step = match self.step {
            WizardStep::Export => WizardStep::Data,
            WizardStep::Data => WizardStep::Schema,
            other => other,
        };
    }

    /// The backend rejected the credential: sign in again, start over.
    pub fn session_expired(&mut self) {
        self.schema = None;
        self.data = None;
        self.step = WizardStep::Auth;
    }

    /// React to a failed step. Returns `true` if the flow was reset to sign-in.
    pub fn handle_error(&mut self, err: &anyhow::Error) -> bool {
        match err.downcast_ref::<SynthError>() {
            Some(e) if e.requires_login() => {
                self.session_expired();
                true
            }
            _ => false,
        }
    }
}
