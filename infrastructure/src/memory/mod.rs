//! In-memory widget configuration gateway
//!
//! Backs `--offline` sessions and integration tests. It enforces the same
//! rules the remote service does: document validation (422) and unique
//! widget names (409).

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::debug;
use widgetdesk_application::{
    ConfigId, FieldErrors, GatewayError, StoredConfig, TestReport, ValidationReport,
    WidgetConfigGateway, WidgetConfigPayload,
};
use widgetdesk_domain::{Field, ModelReference, validate_document};

const NAME_TAKEN: &str = "has already been taken";

#[derive(Default)]
struct Records {
    entries: BTreeMap<u64, WidgetConfigPayload>,
    next_id: u64,
}

impl Records {
    fn name_taken(&self, name: &str, except: Option<u64>) -> bool {
        let name = name.trim().to_lowercase();
        self.entries
            .iter()
            .any(|(id, p)| Some(*id) != except && p.widget_name.trim().to_lowercase() == name)
    }

    fn insert(&mut self, payload: WidgetConfigPayload) -> u64 {
        self.next_id += 1;
        self.entries.insert(self.next_id, payload);
        self.next_id
    }
}

/// Gateway that keeps every record in process memory
#[derive(Default)]
pub struct InMemoryWidgetConfigGateway {
    records: Mutex<Records>,
}

impl InMemoryWidgetConfigGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record, returning its identifier
    pub async fn seed(&self, payload: WidgetConfigPayload) -> ConfigId {
        ConfigId::from(self.records.lock().await.insert(payload))
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Canonical form of `payload`, or the field errors that reject it
    fn canonicalize(payload: &WidgetConfigPayload) -> Result<WidgetConfigPayload, FieldErrors> {
        let document = payload.clone().into_config();
        let errors = validate_document(&document);
        if errors.is_empty() {
            return Ok(WidgetConfigPayload::from(&document));
        }
        Err(errors
            .ordered()
            .into_iter()
            .map(|(path, message)| {
                let key = Field::from_path(path).map_or(path, |f| f.storage_key());
                (key.to_string(), vec![message.to_string()])
            })
            .collect())
    }

    fn name_conflict() -> GatewayError {
        let mut errors = FieldErrors::new();
        errors.insert(
            Field::WidgetName.storage_key().to_string(),
            vec![NAME_TAKEN.to_string()],
        );
        GatewayError::Conflict {
            message: "A widget with this name already exists".to_string(),
            errors,
        }
    }

    fn invalid(errors: FieldErrors) -> GatewayError {
        GatewayError::Validation {
            message: "The given data was invalid.".to_string(),
            errors,
        }
    }

    fn parse_id(id: &ConfigId) -> Result<u64, GatewayError> {
        id.as_str()
            .parse()
            .map_err(|_| GatewayError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl WidgetConfigGateway for InMemoryWidgetConfigGateway {
    async fn get(&self, id: &ConfigId) -> Result<WidgetConfigPayload, GatewayError> {
        let key = Self::parse_id(id)?;
        self.records
            .lock()
            .await
            .entries
            .get(&key)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn create(&self, payload: &WidgetConfigPayload) -> Result<StoredConfig, GatewayError> {
        let canonical = Self::canonicalize(payload).map_err(Self::invalid)?;
        let mut records = self.records.lock().await;
        if records.name_taken(&canonical.widget_name, None) {
            return Err(Self::name_conflict());
        }
        let id = records.insert(canonical.clone());
        debug!("Created in-memory widget config {}", id);
        Ok(StoredConfig {
            id: ConfigId::from(id),
            config: canonical,
        })
    }

    async fn update(
        &self,
        id: &ConfigId,
        payload: &WidgetConfigPayload,
    ) -> Result<WidgetConfigPayload, GatewayError> {
        let key = Self::parse_id(id)?;
        let canonical = Self::canonicalize(payload).map_err(Self::invalid)?;
        let mut records = self.records.lock().await;
        if !records.entries.contains_key(&key) {
            return Err(GatewayError::NotFound(id.to_string()));
        }
        if records.name_taken(&canonical.widget_name, Some(key)) {
            return Err(Self::name_conflict());
        }
        records.entries.insert(key, canonical.clone());
        debug!("Updated in-memory widget config {}", id);
        Ok(canonical)
    }

    async fn duplicate(&self, id: &ConfigId, new_name: &str) -> Result<StoredConfig, GatewayError> {
        let key = Self::parse_id(id)?;
        let mut records = self.records.lock().await;
        let mut copy = records
            .entries
            .get(&key)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;
        copy.widget_name = new_name.trim().to_string();
        let copy = Self::canonicalize(&copy).map_err(Self::invalid)?;
        if records.name_taken(&copy.widget_name, None) {
            return Err(Self::name_conflict());
        }
        let new_id = records.insert(copy.clone());
        debug!("Duplicated in-memory widget config {} as {}", id, new_id);
        Ok(StoredConfig {
            id: ConfigId::from(new_id),
            config: copy,
        })
    }

    async fn validate(&self, payload: &WidgetConfigPayload) -> Result<ValidationReport, GatewayError> {
        Ok(match Self::canonicalize(payload) {
            Ok(_) => ValidationReport {
                is_valid: true,
                errors: FieldErrors::new(),
            },
            Err(errors) => ValidationReport {
                is_valid: false,
                errors,
            },
        })
    }

    async fn test(&self, payload: &WidgetConfigPayload) -> Result<TestReport, GatewayError> {
        let model = payload.ai_model.as_deref().unwrap_or_default();
        Ok(match ModelReference::classify(model) {
            ModelReference::Recognized(id) => TestReport {
                success: true,
                message: format!("Widget test passed using {id} (offline)"),
            },
            ModelReference::Absent => TestReport {
                success: false,
                message: "No AI model configured".to_string(),
            },
            ModelReference::Unrecognized(id) => TestReport {
                success: false,
                message: format!("Unknown AI model: {id}"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use widgetdesk_domain::WidgetConfig;

    fn payload(name: &str) -> WidgetConfigPayload {
        WidgetConfigPayload::from(&WidgetConfig {
            widget_name: name.to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let gateway = InMemoryWidgetConfigGateway::new();
        let stored = gateway.create(&payload("Support Bot")).await.unwrap();
        assert_eq!(stored.id, ConfigId::from(1));
        let fetched = gateway.get(&stored.id).await.unwrap();
        assert_eq!(fetched.widget_name, "Support Bot");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_document() {
        let gateway = InMemoryWidgetConfigGateway::new();
        let mut invalid = payload("Support Bot");
        invalid.width = 100;
        invalid.auto_trigger.enabled = true;
        invalid.auto_trigger.delay = 0;

        let error = gateway.create(&invalid).await.unwrap_err();
        let GatewayError::Validation { errors, .. } = error else {
            panic!("expected validation error");
        };
        assert!(errors.contains_key("width"));
        assert!(errors.contains_key("auto_trigger.delay"));
        assert!(gateway.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_names_conflict() {
        let gateway = InMemoryWidgetConfigGateway::new();
        gateway.create(&payload("Support Bot")).await.unwrap();
        let error = gateway.create(&payload("support bot ")).await.unwrap_err();
        assert_eq!(error.status(), Some(409));
        assert!(error.field_errors().unwrap().contains_key("widget_name"));
    }

    #[tokio::test]
    async fn test_update_keeps_own_name_and_checks_others() {
        let gateway = InMemoryWidgetConfigGateway::new();
        let first = gateway.create(&payload("First Bot")).await.unwrap();
        gateway.create(&payload("Second Bot")).await.unwrap();

        let mut changed = payload("First Bot");
        changed.width = 420;
        assert_eq!(gateway.update(&first.id, &changed).await.unwrap().width, 420);

        let error = gateway
            .update(&first.id, &payload("Second Bot"))
            .await
            .unwrap_err();
        assert!(matches!(error, GatewayError::Conflict { .. }));

        let error = gateway
            .update(&ConfigId::from(99), &payload("Third Bot"))
            .await
            .unwrap_err();
        assert!(matches!(error, GatewayError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_copies_record() {
        let gateway = InMemoryWidgetConfigGateway::new();
        let id = gateway.seed(payload("Support Bot")).await;
        let copy = gateway.duplicate(&id, "Support Bot Copy").await.unwrap();
        assert_ne!(copy.id, id);
        assert_eq!(copy.config.widget_name, "Support Bot Copy");
        assert_eq!(gateway.len().await, 2);
        assert!(gateway.duplicate(&id, "Support Bot Copy").await.is_err());
    }

    #[tokio::test]
    async fn test_validate_reports_snake_case_keys() {
        let gateway = InMemoryWidgetConfigGateway::new();
        let mut invalid = payload("Support Bot");
        invalid.primary_color = "blue".to_string();
        let report = gateway.validate(&invalid).await.unwrap();
        assert!(!report.is_valid);
        assert!(report.errors.contains_key("primary_color"));

        let report = gateway.validate(&payload("Support Bot")).await.unwrap();
        assert!(report.is_valid);
    }

    #[tokio::test]
    async fn test_model_test_outcomes() {
        let gateway = InMemoryWidgetConfigGateway::new();
        let mut with_model = payload("Support Bot");
        with_model.ai_model = Some("claude-3-5-sonnet-latest".to_string());
        assert!(gateway.test(&with_model).await.unwrap().success);
        assert!(!gateway.test(&payload("Support Bot")).await.unwrap().success);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found() {
        let gateway = InMemoryWidgetConfigGateway::new();
        let error = gateway.get(&ConfigId::from("abc")).await.unwrap_err();
        assert!(matches!(error, GatewayError::NotFound(_)));
    }
}
