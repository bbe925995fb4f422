//! EditWidget use case
//!
//! [`EditorSession`] is the synchronization controller of one editing
//! session. It owns the [`ConfigStore`], talks to the remote service through
//! the [`WidgetConfigGateway`] port, and absorbs every failure into
//! (1) an error map update, (2) a focused section and (3) exactly one
//! notice for the operator.
//!
//! # Concurrency
//!
//! Local commands (`update`, `undo`, `redo`, `reset`, `validate`) are
//! synchronous and atomic. Network commands suspend only their own call
//! path; the store lock is never held across an `.await`, so the operator
//! can keep editing while a save is in flight.
//!
//! - Saves are single-flight: an overlapping `save` is rejected with
//!   [`EditorError::SaveInProgress`]
//! - Busy and in-flight flags are released by guards on every exit path
//! - After [`EditorSession::close`], results that arrive late are dropped

mod failures;
mod types;

pub use failures::{SaveFailure, SaveFailureKind};
pub use types::{EditorError, EditorSnapshot, SaveReport, SyncState, TestOutcome};

use crate::config::EditorBehavior;
use crate::ports::config_gateway::{
    ConfigId, GatewayError, WidgetConfigGateway, WidgetConfigPayload,
};
use crate::ports::edit_journal::{EditJournal, JournalEvent, NoEditJournal};
use crate::ports::notifier::{EditorNotifier, NoNotifier, Notice};
use crate::shortcuts::{CommandDispatcher, ShortcutRegistration};
use crate::store::{ConfigStore, UpdateOutcome};
use serde_json::json;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use widgetdesk_domain::{
    EditorCommand, ErrorMap, Field, ModelReference, Section, WidgetConfig, WidgetConfigPatch,
};

const FALLBACK_MODE_MESSAGE: &str = "No AI model configured. The widget will run in fallback mode.";
const LOAD_FAILED_MESSAGE: &str = "Failed to load widget configuration";
const TEST_FAILED_MESSAGE: &str = "Failed to test widget configuration";
const VALIDATE_FAILED_MESSAGE: &str = "Failed to validate widget configuration";
const DUPLICATE_FAILED_MESSAGE: &str = "Failed to duplicate widget configuration";
const INVALID_DOCUMENT_MESSAGE: &str = "Some fields are invalid. Review the highlighted fields.";

/// Mutable session state guarded by one lock
struct SessionState {
    store: ConfigStore,
    identity: Option<ConfigId>,
    active_section: Section,
    sync: SyncState,
}

/// Marks a save as in flight until dropped
struct SingleFlight<'a>(&'a AtomicBool);

impl<'a> SingleFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SingleFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Counts an outstanding network command until dropped
struct BusyGuard<'a>(&'a AtomicUsize);

impl<'a> BusyGuard<'a> {
    fn enter(pending: &'a AtomicUsize) -> Self {
        pending.fetch_add(1, Ordering::AcqRel);
        Self(pending)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// One widget configuration editing session
pub struct EditorSession<G: WidgetConfigGateway + 'static> {
    gateway: Arc<G>,
    state: Mutex<SessionState>,
    notifier: Arc<dyn EditorNotifier>,
    journal: Arc<dyn EditJournal>,
    behavior: EditorBehavior,
    save_in_flight: AtomicBool,
    pending: AtomicUsize,
    cancel: CancellationToken,
}

impl<G: WidgetConfigGateway + 'static> EditorSession<G> {
    /// Start a session on the default document
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            state: Mutex::new(SessionState {
                store: ConfigStore::new(),
                identity: None,
                active_section: Section::default(),
                sync: SyncState::Idle,
            }),
            notifier: Arc::new(NoNotifier),
            journal: Arc::new(NoEditJournal),
            behavior: EditorBehavior::default(),
            save_in_flight: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn EditorNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_journal(mut self, journal: Arc<dyn EditJournal>) -> Self {
        self.journal = journal;
        self
    }

    pub fn with_behavior(mut self, behavior: EditorBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    // ==================== Read access ====================

    pub fn snapshot(&self) -> EditorSnapshot {
        let state = self.lock();
        EditorSnapshot {
            document: state.store.document().clone(),
            dirty: state.store.is_dirty(),
            errors: state.store.errors().clone(),
            active_section: state.active_section,
            can_undo: state.store.can_undo(),
            can_redo: state.store.can_redo(),
            identity: state.identity.clone(),
            state: state.sync,
            busy: self.is_busy(),
        }
    }

    /// Run `f` against the store
    pub fn with_store<R>(&self, f: impl FnOnce(&ConfigStore) -> R) -> R {
        f(&self.lock().store)
    }

    pub fn document(&self) -> WidgetConfig {
        self.lock().store.document().clone()
    }

    pub fn errors(&self) -> ErrorMap {
        self.lock().store.errors().clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().store.is_dirty()
    }

    pub fn can_undo(&self) -> bool {
        self.lock().store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.lock().store.can_redo()
    }

    pub fn identity(&self) -> Option<ConfigId> {
        self.lock().identity.clone()
    }

    pub fn active_section(&self) -> Section {
        self.lock().active_section
    }

    pub fn set_active_section(&self, section: Section) {
        self.lock().active_section = section;
    }

    pub fn sync_state(&self) -> SyncState {
        self.lock().sync
    }

    /// Whether a network command is outstanding
    pub fn is_busy(&self) -> bool {
        self.pending.load(Ordering::Acquire) > 0
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// End the session. Commands still in flight discard their results.
    pub fn close(&self) {
        info!("Closing editor session");
        self.cancel.cancel();
    }

    // ==================== Local commands ====================

    /// Apply a partial change and run the field-level pass on what changed
    pub fn update(&self, patch: &WidgetConfigPatch) -> UpdateOutcome {
        let outcome = self.lock().store.update(patch);
        if self.behavior.notify_field_errors
            && let Some((_, message)) = outcome.field_errors.first()
        {
            self.notifier.notify(Notice::error(message.clone()));
        }
        outcome
    }

    /// Set one field from operator text input
    pub fn update_field(&self, field: Field, raw: &str) -> Result<UpdateOutcome, EditorError> {
        match WidgetConfigPatch::from_input(field, raw) {
            Ok(patch) => Ok(self.update(&patch)),
            Err(error) => {
                self.lock()
                    .store
                    .set_field_error(field.path(), error.to_string());
                self.notifier.notify(Notice::error(error.to_string()));
                Err(error.into())
            }
        }
    }

    pub fn undo(&self) -> Result<(), EditorError> {
        let result = self.lock().store.undo().map(|_| ());
        self.report_history(result)
    }

    pub fn redo(&self) -> Result<(), EditorError> {
        let result = self.lock().store.redo().map(|_| ());
        self.report_history(result)
    }

    /// Replace the document with defaults and collapse history
    pub fn reset(&self) {
        self.lock().store.reset_to_defaults();
        info!("Configuration reset to defaults");
        self.notifier
            .notify(Notice::info("Configuration reset to defaults"));
        self.journal.record(JournalEvent::new("reset", json!({})));
    }

    /// Run the document-level pass without touching the network
    pub fn validate(&self) -> Result<(), EditorError> {
        let failure = {
            let mut state = self.lock();
            if state.store.validate_all().is_empty() {
                None
            } else {
                Some(Self::focus_first_error(&mut state))
            }
        };
        match failure {
            None => {
                self.notifier.notify(Notice::success("Configuration is valid"));
                Ok(())
            }
            Some(error) => Err(self.report_validation(error)),
        }
    }

    /// Dispatch a keyboard-surface command
    pub async fn dispatch(&self, command: EditorCommand) -> Result<(), EditorError> {
        debug!("Dispatching {} command", command);
        match command {
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::Save => self.save().await.map(|_| ()),
        }
    }

    // ==================== Network commands ====================

    /// Fetch `id` and make it the current document
    pub async fn load(&self, id: ConfigId) -> Result<WidgetConfig, EditorError> {
        self.ensure_open()?;
        let _busy = BusyGuard::enter(&self.pending);
        self.lock().sync = SyncState::Loading;
        info!("Loading widget configuration {}", id);

        let result = self.call(self.gateway.get(&id)).await;
        self.ensure_open()?;

        match result {
            Ok(payload) => {
                let document = payload.into_config();
                {
                    let mut state = self.lock();
                    state.store.adopt_loaded(document.clone());
                    state.identity = Some(id.clone());
                    state.sync = SyncState::Loaded;
                }
                info!("Loaded widget \"{}\" ({})", document.widget_name, id);
                self.journal.record(JournalEvent::new(
                    "loaded",
                    json!({ "id": id, "widget_name": document.widget_name }),
                ));
                Ok(document)
            }
            Err(error) => {
                self.lock().sync = SyncState::LoadFailed;
                warn!("Failed to load widget configuration {}: {}", id, error);
                self.notifier.notify(Notice::error(LOAD_FAILED_MESSAGE));
                self.journal.record(JournalEvent::new(
                    "load_failed",
                    json!({ "id": id, "error": error.to_string() }),
                ));
                Err(error.into())
            }
        }
    }

    /// Validate, then create or update the remote record.
    ///
    /// A local validation failure aborts before any network call. On
    /// success the service's canonical document is adopted.
    pub async fn save(&self) -> Result<SaveReport, EditorError> {
        self.ensure_open()?;
        let Some(_flight) = SingleFlight::acquire(&self.save_in_flight) else {
            self.notifier
                .notify(Notice::warning(EditorError::SaveInProgress.to_string()));
            return Err(EditorError::SaveInProgress);
        };
        let _busy = BusyGuard::enter(&self.pending);

        let (sent, identity) = {
            let mut state = self.lock();
            state.sync = SyncState::Validating;
            if !state.store.validate_all().is_empty() {
                let error = Self::focus_first_error(&mut state);
                state.sync = SyncState::ValidationFailed;
                drop(state);
                return Err(self.report_validation(error));
            }
            (state.store.document().clone(), state.identity.clone())
        };
        let payload = WidgetConfigPayload::from(&sent);

        if self.behavior.remote_validation
            && let Err(error) = self.remote_check(&payload).await
        {
            if matches!(error, EditorError::ValidationFailed { .. }) {
                self.lock().sync = SyncState::ValidationFailed;
            } else if !error.is_session_closed() {
                self.lock().sync = SyncState::SaveFailed;
            }
            return Err(error);
        }

        self.lock().sync = SyncState::SaveInFlight;
        let result = match &identity {
            None => {
                info!("Creating widget configuration \"{}\"", sent.widget_name);
                self.call(self.gateway.create(&payload))
                    .await
                    .map(|stored| (stored.id, stored.config, true))
            }
            Some(id) => {
                info!("Updating widget configuration {}", id);
                self.call(self.gateway.update(id, &payload))
                    .await
                    .map(|config| (id.clone(), config, false))
            }
        };
        self.ensure_open()?;

        match result {
            Ok((id, canonical, created)) => {
                let document = canonical.into_config();
                {
                    let mut state = self.lock();
                    state.store.adopt_saved(document.clone(), &sent);
                    state.identity = Some(id.clone());
                    state.sync = SyncState::Saved;
                }
                self.notifier.notify(Notice::success(format!(
                    "Widget \"{}\" saved successfully",
                    document.widget_name
                )));
                self.journal.record(JournalEvent::new(
                    "saved",
                    json!({ "id": id, "created": created, "widget_name": document.widget_name }),
                ));
                Ok(SaveReport {
                    id,
                    created,
                    document,
                })
            }
            Err(error) => {
                let failure = SaveFailure::classify(&error, &sent.widget_name);
                warn!("Save failed ({:?}): {}", failure.kind, error);
                {
                    let mut state = self.lock();
                    if let Some(section) = failure
                        .errors
                        .first_field()
                        .and_then(Field::from_path)
                        .map(|f| f.section())
                    {
                        state.active_section = section;
                    }
                    state.store.merge_errors(failure.errors.clone());
                    state.sync = SyncState::SaveFailed;
                }
                self.notifier.notify(Notice::error(failure.message.clone()));
                self.journal.record(JournalEvent::new(
                    "save_failed",
                    json!({
                        "kind": format!("{:?}", failure.kind),
                        "status": error.status(),
                        "fields": failure.errors.ordered().iter().map(|(p, _)| *p).collect::<Vec<_>>(),
                    }),
                ));
                Err(match failure.kind {
                    SaveFailureKind::Other => EditorError::Gateway(error),
                    _ => EditorError::Rejected {
                        message: failure.message,
                        source: error,
                    },
                })
            }
        }
    }

    /// Ask the service to validate the current document
    pub async fn validate_remote(&self) -> Result<(), EditorError> {
        self.ensure_open()?;
        let _busy = BusyGuard::enter(&self.pending);
        let payload = WidgetConfigPayload::from(&self.document());
        self.remote_check(&payload).await?;
        self.notifier.notify(Notice::success("Configuration is valid"));
        Ok(())
    }

    /// Validate the document, then check the AI model reference.
    ///
    /// Only a recognized model reaches the service's test endpoint.
    pub async fn test(&self) -> Result<TestOutcome, EditorError> {
        self.ensure_open()?;
        let _busy = BusyGuard::enter(&self.pending);

        let document = {
            let mut state = self.lock();
            if !state.store.validate_all().is_empty() {
                let error = Self::focus_first_error(&mut state);
                drop(state);
                return Err(self.report_validation(error));
            }
            state.store.document().clone()
        };

        let outcome = match ModelReference::classify(&document.ai_model) {
            ModelReference::Absent => {
                self.notifier.notify(Notice::warning(FALLBACK_MODE_MESSAGE));
                TestOutcome::Fallback
            }
            ModelReference::Unrecognized(id) => {
                self.notifier
                    .notify(Notice::error(format!("Invalid AI model format: {id}")));
                TestOutcome::InvalidModel(id)
            }
            ModelReference::Recognized(id) => {
                info!("Testing widget with model {}", id);
                let result = self
                    .call(self.gateway.test(&WidgetConfigPayload::from(&document)))
                    .await;
                self.ensure_open()?;
                match result {
                    Ok(report) if report.success => {
                        self.notifier.notify(Notice::success(report.message.clone()));
                        TestOutcome::Passed(report.message)
                    }
                    Ok(report) => {
                        self.notifier.notify(Notice::error(report.message.clone()));
                        TestOutcome::Failed(report.message)
                    }
                    Err(error) => {
                        warn!("Widget test request failed: {}", error);
                        self.notifier.notify(Notice::error(TEST_FAILED_MESSAGE));
                        return Err(error.into());
                    }
                }
            }
        };
        self.journal.record(JournalEvent::new(
            "tested",
            json!({ "ai_model": document.ai_model, "outcome": format!("{:?}", outcome) }),
        ));
        Ok(outcome)
    }

    /// Copy the stored record into a new one named `new_name`.
    ///
    /// The open document, its dirty flag and identity are never touched.
    pub async fn duplicate(&self, new_name: &str) -> Result<ConfigId, EditorError> {
        self.ensure_open()?;
        let Some(id) = self.identity() else {
            self.notifier
                .notify(Notice::error(EditorError::NotSaved.to_string()));
            return Err(EditorError::NotSaved);
        };
        let _busy = BusyGuard::enter(&self.pending);
        let new_name = new_name.trim();
        info!("Duplicating widget configuration {} as \"{}\"", id, new_name);

        let result = self.call(self.gateway.duplicate(&id, new_name)).await;
        self.ensure_open()?;

        match result {
            Ok(stored) => {
                self.notifier.notify(Notice::success(format!(
                    "Widget duplicated as \"{}\"",
                    new_name
                )));
                self.journal.record(JournalEvent::new(
                    "duplicated",
                    json!({ "source": id, "copy": stored.id, "widget_name": new_name }),
                ));
                Ok(stored.id)
            }
            Err(error) => {
                warn!("Duplicate of {} failed: {}", id, error);
                let failure = SaveFailure::classify(&error, new_name);
                let message = match failure.kind {
                    SaveFailureKind::DuplicateName => failure.message,
                    _ => DUPLICATE_FAILED_MESSAGE.to_string(),
                };
                self.notifier.notify(Notice::error(message));
                Err(error.into())
            }
        }
    }

    /// Route shortcuts resolved by `dispatcher` to this session.
    ///
    /// Commands run on a background task until the returned registration
    /// is dropped or the session is closed.
    pub fn attach_shortcuts(self: &Arc<Self>, dispatcher: &CommandDispatcher) -> ShortcutRegistration {
        let (registration, mut commands) = dispatcher.register();
        let session = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(command) = commands.recv().await {
                if session.is_closed() {
                    break;
                }
                // Failures have already been surfaced through the notifier
                let _ = session.dispatch(command).await;
            }
            debug!("Shortcut listener stopped");
        });
        registration
    }

    // ==================== Helpers ====================

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_open(&self) -> Result<(), EditorError> {
        if self.cancel.is_cancelled() {
            debug!("Discarding command result: session closed");
            return Err(EditorError::SessionClosed);
        }
        Ok(())
    }

    /// Await a gateway call, applying the configured timeout
    async fn call<T>(
        &self,
        request: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, GatewayError> {
        match self.behavior.timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .unwrap_or(Err(GatewayError::Timeout)),
            None => request.await,
        }
    }

    async fn remote_check(&self, payload: &WidgetConfigPayload) -> Result<(), EditorError> {
        let report = self.call(self.gateway.validate(payload)).await;
        self.ensure_open()?;
        let report = match report {
            Ok(report) => report,
            Err(error) => {
                warn!("Remote validation failed: {}", error);
                self.notifier.notify(Notice::error(VALIDATE_FAILED_MESSAGE));
                return Err(error.into());
            }
        };
        if report.is_valid {
            return Ok(());
        }
        let error = {
            let mut state = self.lock();
            state.store.merge_errors(ErrorMap::from_remote(&report.errors));
            Self::focus_first_error(&mut state)
        };
        Err(self.report_validation(error))
    }

    /// Activate the section of the first failing field
    fn focus_first_error(state: &mut SessionState) -> EditorError {
        let errors = state.store.errors();
        let field = errors.first_field().map(str::to_string);
        let error = EditorError::ValidationFailed {
            count: errors.len(),
            message: errors
                .summary()
                .unwrap_or_else(|| INVALID_DOCUMENT_MESSAGE.to_string()),
            field: field.clone(),
        };
        if let Some(section) = field
            .as_deref()
            .and_then(Field::from_path)
            .map(|f| f.section())
        {
            state.active_section = section;
        }
        error
    }

    fn report_validation(&self, error: EditorError) -> EditorError {
        if let EditorError::ValidationFailed {
            count,
            field,
            message,
        } = &error
        {
            info!("Validation failed: {} error(s), first {:?}", count, field);
            self.notifier.notify(Notice::error(message.clone()));
            self.journal.record(JournalEvent::new(
                "validation_failed",
                json!({ "count": count, "field": field }),
            ));
        }
        error
    }

    fn report_history(
        &self,
        result: Result<(), crate::store::HistoryError>,
    ) -> Result<(), EditorError> {
        result.map_err(|error| {
            self.notifier.notify(Notice::warning(error.to_string()));
            error.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::config_gateway::{StoredConfig, TestReport, ValidationReport};
    use crate::ports::notifier::NoticeLevel;
    use async_trait::async_trait;
    use std::collections::{BTreeMap, HashMap};
    use std::time::Duration;
    use tokio::sync::Notify;
    use widgetdesk_domain::HISTORY_LIMIT;

    // ==================== Test Mocks ====================

    #[derive(Default)]
    struct MockGateway {
        records: Mutex<HashMap<String, WidgetConfigPayload>>,
        calls: Mutex<Vec<&'static str>>,
        fail_with: Mutex<Option<GatewayError>>,
        test_report: Mutex<Option<TestReport>>,
        validation: Mutex<Option<ValidationReport>>,
        gate: Option<Arc<Notify>>,
        never_respond: bool,
        uppercase_colors: bool,
    }

    impl MockGateway {
        fn with_record(id: &str, payload: WidgetConfigPayload) -> Self {
            let gateway = Self::default();
            gateway
                .records
                .lock()
                .unwrap()
                .insert(id.to_string(), payload);
            gateway
        }

        fn fail_next(&self, error: GatewayError) {
            *self.fail_with.lock().unwrap() = Some(error);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        async fn enter(&self, call: &'static str) -> Result<(), GatewayError> {
            self.calls.lock().unwrap().push(call);
            if self.never_respond {
                std::future::pending::<()>().await;
            }
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.fail_with.lock().unwrap().take() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }

        fn canonical(&self, payload: &WidgetConfigPayload) -> WidgetConfigPayload {
            let mut canonical = payload.clone();
            if self.uppercase_colors {
                canonical.primary_color = canonical.primary_color.to_uppercase();
            }
            canonical
        }
    }

    #[async_trait]
    impl WidgetConfigGateway for MockGateway {
        async fn get(&self, id: &ConfigId) -> Result<WidgetConfigPayload, GatewayError> {
            self.enter("get").await?;
            self.records
                .lock()
                .unwrap()
                .get(id.as_str())
                .cloned()
                .ok_or_else(|| GatewayError::NotFound(id.to_string()))
        }

        async fn create(
            &self,
            payload: &WidgetConfigPayload,
        ) -> Result<StoredConfig, GatewayError> {
            self.enter("create").await?;
            let mut records = self.records.lock().unwrap();
            let id = ConfigId::from(records.len() as u64 + 100);
            let config = self.canonical(payload);
            records.insert(id.to_string(), config.clone());
            Ok(StoredConfig { id, config })
        }

        async fn update(
            &self,
            id: &ConfigId,
            payload: &WidgetConfigPayload,
        ) -> Result<WidgetConfigPayload, GatewayError> {
            self.enter("update").await?;
            let config = self.canonical(payload);
            self.records
                .lock()
                .unwrap()
                .insert(id.to_string(), config.clone());
            Ok(config)
        }

        async fn duplicate(
            &self,
            id: &ConfigId,
            new_name: &str,
        ) -> Result<StoredConfig, GatewayError> {
            self.enter("duplicate").await?;
            let mut records = self.records.lock().unwrap();
            let mut config = records
                .get(id.as_str())
                .cloned()
                .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;
            config.widget_name = new_name.to_string();
            let copy = ConfigId::from(records.len() as u64 + 100);
            records.insert(copy.to_string(), config.clone());
            Ok(StoredConfig { id: copy, config })
        }

        async fn validate(
            &self,
            _payload: &WidgetConfigPayload,
        ) -> Result<ValidationReport, GatewayError> {
            self.enter("validate").await?;
            Ok(self
                .validation
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(ValidationReport {
                    is_valid: true,
                    errors: BTreeMap::new(),
                }))
        }

        async fn test(&self, _payload: &WidgetConfigPayload) -> Result<TestReport, GatewayError> {
            self.enter("test").await?;
            Ok(self.test_report.lock().unwrap().clone().unwrap_or(TestReport {
                success: true,
                message: "Widget responded in 412ms".to_string(),
            }))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<Notice>>,
    }

    impl RecordingNotifier {
        fn all(&self) -> Vec<Notice> {
            self.notices.lock().unwrap().clone()
        }

        fn last(&self) -> Option<Notice> {
            self.notices.lock().unwrap().last().cloned()
        }
    }

    impl EditorNotifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }

    fn session_with(
        gateway: MockGateway,
    ) -> (
        Arc<EditorSession<MockGateway>>,
        Arc<MockGateway>,
        Arc<RecordingNotifier>,
    ) {
        let gateway = Arc::new(gateway);
        let notifier = Arc::new(RecordingNotifier::default());
        let session = EditorSession::new(Arc::clone(&gateway)).with_notifier(notifier.clone());
        (Arc::new(session), gateway, notifier)
    }

    fn support_bot() -> WidgetConfigPayload {
        WidgetConfigPayload::from(&WidgetConfig {
            widget_name: "Support Bot".to_string(),
            ..Default::default()
        })
    }

    // ==================== Field-level validation ====================

    #[test]
    fn test_widget_name_required_then_cleared() {
        let (session, _, notifier) = session_with(MockGateway::default());

        session.update(&WidgetConfigPatch::new().widget_name(""));
        assert_eq!(
            session.errors().get("widgetName"),
            Some("Widget name is required")
        );
        assert_eq!(
            notifier.last(),
            Some(Notice::error("Widget name is required"))
        );

        session.update(&WidgetConfigPatch::new().widget_name("My Bot"));
        assert!(!session.errors().contains("widgetName"));
    }

    #[test]
    fn test_hex_color_rejected_then_accepted() {
        let (session, _, _) = session_with(MockGateway::default());
        session.update(&WidgetConfigPatch::new().primary_color("blue"));
        assert!(session.errors().contains("primaryColor"));
        // The invalid value is kept while editing
        assert_eq!(session.document().primary_color, "blue");

        session.update(&WidgetConfigPatch::new().primary_color("#4F46E5"));
        assert!(!session.errors().contains("primaryColor"));
    }

    #[test]
    fn test_unparseable_input_is_reported_without_mutation() {
        let (session, _, notifier) = session_with(MockGateway::default());
        let result = session.update_field(Field::Width, "wide");
        assert!(matches!(result, Err(EditorError::InvalidInput(_))));
        assert_eq!(session.errors().get("width"), Some("Width must be a whole number"));
        assert!(!session.is_dirty());
        assert_eq!(notifier.all().len(), 1);
    }

    #[test]
    fn test_field_notifications_can_be_disabled() {
        let (session, gateway, _) = session_with(MockGateway::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let session = EditorSession::new(gateway)
            .with_notifier(notifier.clone())
            .with_behavior(EditorBehavior::default().with_field_notifications(false));
        session.update(&WidgetConfigPatch::new().widget_name(""));
        assert!(session.errors().contains("widgetName"));
        assert!(notifier.all().is_empty());
    }

    // ==================== Undo / redo ====================

    #[test]
    fn test_undo_redo_and_boundaries() {
        let (session, _, notifier) = session_with(MockGateway::default());
        assert!(matches!(
            session.undo(),
            Err(EditorError::History(crate::store::HistoryError::NothingToUndo))
        ));
        assert_eq!(notifier.last(), Some(Notice::warning("Nothing to undo")));

        session.update(&WidgetConfigPatch::new().widget_name("First Bot"));
        assert!(session.can_undo());
        session.undo().unwrap();
        assert_eq!(session.document(), WidgetConfig::default());
        assert!(!session.is_dirty());
        assert!(session.can_redo());
        session.redo().unwrap();
        assert_eq!(session.document().widget_name, "First Bot");
        assert!(session.is_dirty());
        assert!(session.redo().is_err());
    }

    #[test]
    fn test_history_is_capped() {
        let (session, _, _) = session_with(MockGateway::default());
        for i in 0..40 {
            session.update(&WidgetConfigPatch::new().widget_name(format!("Bot {i}")));
        }
        session.with_store(|store| {
            assert_eq!(store.history().len(), HISTORY_LIMIT);
            assert_eq!(store.history().cursor(), HISTORY_LIMIT - 1);
        });
    }

    #[test]
    fn test_reset_to_defaults() {
        let (session, _, _) = session_with(MockGateway::default());
        session.update(&WidgetConfigPatch::new().widget_name(""));
        session.reset();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.document, WidgetConfig::default());
        assert!(snapshot.errors.is_empty());
        assert!(!snapshot.dirty);
        assert!(!snapshot.can_undo);
        assert!(!snapshot.can_redo);
    }

    // ==================== Load ====================

    #[tokio::test]
    async fn test_load_adopts_server_document() {
        let (session, _, _) = session_with(MockGateway::with_record("42", support_bot()));

        let loaded = session.load(ConfigId::from(42)).await.unwrap();
        assert_eq!(loaded.widget_name, "Support Bot");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.document.widget_name, "Support Bot");
        assert!(!snapshot.dirty);
        assert_eq!(snapshot.identity, Some(ConfigId::from(42)));
        assert_eq!(snapshot.state, SyncState::Loaded);
        assert!(!snapshot.busy);
        session.with_store(|store| {
            assert_eq!(store.history().len(), 2);
            assert_eq!(store.history().last().widget_name, "Support Bot");
        });
    }

    #[tokio::test]
    async fn test_load_failure_leaves_document_untouched() {
        let (session, _, notifier) = session_with(MockGateway::default());
        session.update(&WidgetConfigPatch::new().widget_name("Draft Bot"));

        let result = session.load(ConfigId::from(7)).await;
        assert!(matches!(
            result,
            Err(EditorError::Gateway(GatewayError::NotFound(_)))
        ));
        assert_eq!(session.document().widget_name, "Draft Bot");
        assert!(session.identity().is_none());
        assert_eq!(session.sync_state(), SyncState::LoadFailed);
        assert!(!session.is_busy());
        assert_eq!(
            notifier.last(),
            Some(Notice::error("Failed to load widget configuration"))
        );
    }

    // ==================== Save ====================

    #[tokio::test]
    async fn test_save_blocked_by_local_validation() {
        let (session, gateway, notifier) = session_with(MockGateway::default());
        session.update(&WidgetConfigPatch::new().welcome_message("Hi"));

        let result = session.save().await;
        assert!(matches!(
            result,
            Err(EditorError::ValidationFailed { count: 1, .. })
        ));
        assert!(gateway.calls().is_empty());
        assert!(session.errors().contains("welcomeMessage"));
        assert_eq!(session.active_section(), Section::Behavior);
        assert_eq!(session.sync_state(), SyncState::ValidationFailed);
        assert_eq!(
            notifier.last().map(|n| n.message),
            Some("Welcome message must be at least 5 characters".to_string())
        );
    }

    #[tokio::test]
    async fn test_save_with_many_errors_summarizes_and_focuses_first() {
        let (session, _, notifier) = session_with(MockGateway::default());
        session.update(
            &WidgetConfigPatch::new()
                .welcome_message("Hi")
                .primary_color("blue")
                .dimensions(100, 100),
        );
        let err = session.save().await.unwrap_err();
        assert_eq!(
            err,
            EditorError::ValidationFailed {
                count: 4,
                field: Some("primaryColor".to_string()),
                message: "Please fix 4 validation errors before saving".to_string(),
            }
        );
        assert_eq!(session.active_section(), Section::Design);
        assert_eq!(
            notifier.last(),
            Some(Notice::error("Please fix 4 validation errors before saving"))
        );
    }

    #[tokio::test]
    async fn test_first_save_creates_then_updates() {
        let (session, gateway, notifier) = session_with(MockGateway::default());
        session.update(&WidgetConfigPatch::new().widget_name("Sales Bot"));

        let report = session.save().await.unwrap();
        assert!(report.created);
        assert_eq!(session.identity(), Some(report.id.clone()));
        assert!(!session.is_dirty());
        assert!(session.errors().is_empty());
        assert_eq!(session.sync_state(), SyncState::Saved);
        assert_eq!(
            notifier.last(),
            Some(Notice::success("Widget \"Sales Bot\" saved successfully"))
        );

        session.update(&WidgetConfigPatch::new().widget_name("Sales Bot 2"));
        let second = session.save().await.unwrap();
        assert!(!second.created);
        assert_eq!(second.id, report.id);
        assert_eq!(gateway.calls(), vec!["create", "update"]);
    }

    #[tokio::test]
    async fn test_save_adopts_canonical_document() {
        let (session, _, _) = session_with(MockGateway {
            uppercase_colors: true,
            ..Default::default()
        });
        session.update(&WidgetConfigPatch::new().primary_color("#abcdef"));
        session.save().await.unwrap();
        assert_eq!(session.document().primary_color, "#ABCDEF");
        assert!(!session.is_dirty());
        session.with_store(|store| {
            assert_eq!(store.history().current().primary_color, "#ABCDEF");
        });
    }

    #[tokio::test]
    async fn test_save_conflict_on_name() {
        let (session, gateway, notifier) =
            session_with(MockGateway::with_record("42", support_bot()));
        session.load(ConfigId::from(42)).await.unwrap();
        session.update(&WidgetConfigPatch::new().widget_name("Taken Name"));
        let before = session.document();

        let mut errors = BTreeMap::new();
        errors.insert(
            "widget_name".to_string(),
            vec!["has already been taken".to_string()],
        );
        gateway.fail_next(GatewayError::Conflict {
            message: "Conflict".to_string(),
            errors,
        });

        let result = session.save().await;
        assert!(matches!(result, Err(EditorError::Rejected { .. })));
        assert!(session.is_dirty());
        assert_eq!(session.document(), before);
        assert!(session.errors().contains("widgetName"));
        assert_eq!(session.active_section(), Section::Templates);
        assert_eq!(session.sync_state(), SyncState::SaveFailed);
        let notice = notifier.last().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("already exists"));
        assert!(!notice.message.contains("Failed to save"));
    }

    #[tokio::test]
    async fn test_repeated_failed_saves_never_mutate_document() {
        let (session, gateway, notifier) = session_with(MockGateway::default());
        session.update(&WidgetConfigPatch::new().widget_name("Retry Bot"));
        let before = session.document();
        for _ in 0..3 {
            gateway.fail_next(GatewayError::Status {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
            let result = session.save().await;
            assert!(matches!(result, Err(EditorError::Gateway(_))));
            assert_eq!(session.document(), before);
            assert!(session.identity().is_none());
            assert!(!session.is_busy());
        }
        assert_eq!(
            notifier.last(),
            Some(Notice::error("Failed to save widget configuration"))
        );
        // The single-flight guard was released each time
        assert!(session.save().await.is_ok());
    }

    #[tokio::test]
    async fn test_overlapping_save_is_rejected() {
        let gate = Arc::new(Notify::new());
        let (session, gateway, _) = session_with(MockGateway {
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.save().await })
        };
        while gateway.calls().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(session.is_busy());
        assert_eq!(session.sync_state(), SyncState::SaveInFlight);

        let second = session.save().await;
        assert_eq!(second, Err(EditorError::SaveInProgress));

        gate.notify_one();
        assert!(first.await.unwrap().is_ok());
        assert!(!session.is_busy());
        assert_eq!(gateway.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn test_edits_during_save_are_kept() {
        let gate = Arc::new(Notify::new());
        let (session, gateway, _) = session_with(MockGateway {
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });
        session.update(&WidgetConfigPatch::new().widget_name("Sent Bot"));

        let save = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.save().await })
        };
        while gateway.calls().is_empty() {
            tokio::task::yield_now().await;
        }
        session.update(&WidgetConfigPatch::new().widget_name("Newer Bot"));
        gate.notify_one();
        save.await.unwrap().unwrap();

        assert_eq!(session.document().widget_name, "Newer Bot");
        assert!(session.is_dirty());
        assert!(session.identity().is_some());
    }

    #[tokio::test]
    async fn test_remote_validation_errors_block_save() {
        let mut errors = BTreeMap::new();
        errors.insert(
            "knowledge_base".to_string(),
            vec!["Source is unreachable".to_string()],
        );
        let gateway = MockGateway::default();
        *gateway.validation.lock().unwrap() = Some(ValidationReport {
            is_valid: false,
            errors,
        });
        let gateway = Arc::new(gateway);
        let notifier = Arc::new(RecordingNotifier::default());
        let session = EditorSession::new(Arc::clone(&gateway))
            .with_notifier(notifier.clone())
            .with_behavior(EditorBehavior::default().with_remote_validation(true));

        let result = session.save().await;
        assert!(matches!(result, Err(EditorError::ValidationFailed { .. })));
        assert_eq!(gateway.calls(), vec!["validate"]);
        assert_eq!(
            session.errors().get("knowledgeBase"),
            Some("Source is unreachable")
        );
        assert_eq!(session.active_section(), Section::Behavior);
        assert_eq!(
            notifier.last(),
            Some(Notice::error("Source is unreachable"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_gateway_timeout() {
        let gateway = Arc::new(MockGateway {
            never_respond: true,
            ..Default::default()
        });
        let session = EditorSession::new(gateway).with_behavior(EditorBehavior {
            timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        });
        let result = session.load(ConfigId::from(1)).await;
        assert_eq!(result, Err(EditorError::Gateway(GatewayError::Timeout)));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_result_discarded_after_close() {
        let gate = Arc::new(Notify::new());
        let gateway = MockGateway {
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        };
        gateway
            .records
            .lock()
            .unwrap()
            .insert("42".to_string(), support_bot());
        let (session, gateway, _) = session_with(gateway);

        let load = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.load(ConfigId::from(42)).await })
        };
        while gateway.calls().is_empty() {
            tokio::task::yield_now().await;
        }
        session.close();
        gate.notify_one();

        assert_eq!(load.await.unwrap(), Err(EditorError::SessionClosed));
        assert_eq!(session.document(), WidgetConfig::default());
        assert!(session.identity().is_none());
        assert!(!session.is_busy());
    }

    // ==================== Test ====================

    #[tokio::test]
    async fn test_missing_model_warns_without_calling_gateway() {
        let (session, gateway, notifier) = session_with(MockGateway::default());
        let outcome = session.test().await.unwrap();
        assert_eq!(outcome, TestOutcome::Fallback);
        assert!(gateway.calls().is_empty());
        assert_eq!(notifier.last().map(|n| n.level), Some(NoticeLevel::Warning));
    }

    #[tokio::test]
    async fn test_unrecognized_model_is_error_without_calling_gateway() {
        let (session, gateway, notifier) = session_with(MockGateway::default());
        session.update(&WidgetConfigPatch::new().ai_model("gpt-4-extra"));
        let outcome = session.test().await.unwrap();
        assert_eq!(outcome, TestOutcome::InvalidModel("gpt-4-extra".to_string()));
        assert!(gateway.calls().is_empty());
        assert_eq!(
            notifier.last(),
            Some(Notice::error("Invalid AI model format: gpt-4-extra"))
        );
    }

    #[tokio::test]
    async fn test_recognized_model_reports_gateway_verdict() {
        let (session, gateway, notifier) = session_with(MockGateway::default());
        session.update(&WidgetConfigPatch::new().ai_model("gpt-4o"));
        let outcome = session.test().await.unwrap();
        assert_eq!(
            outcome,
            TestOutcome::Passed("Widget responded in 412ms".to_string())
        );
        assert_eq!(gateway.calls(), vec!["test"]);
        assert_eq!(
            notifier.last(),
            Some(Notice::success("Widget responded in 412ms"))
        );

        *gateway.test_report.lock().unwrap() = Some(TestReport {
            success: false,
            message: "Model quota exceeded".to_string(),
        });
        let outcome = session.test().await.unwrap();
        assert_eq!(outcome, TestOutcome::Failed("Model quota exceeded".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_document_blocks_test() {
        let (session, gateway, _) = session_with(MockGateway::default());
        session.update(&WidgetConfigPatch::new().ai_model("gpt-4o").widget_name(""));
        let result = session.test().await;
        assert!(matches!(result, Err(EditorError::ValidationFailed { .. })));
        assert!(gateway.calls().is_empty());
        assert_eq!(session.active_section(), Section::Templates);
    }

    // ==================== Duplicate ====================

    #[tokio::test]
    async fn test_duplicate_requires_identity() {
        let (session, gateway, notifier) = session_with(MockGateway::default());
        assert_eq!(
            session.duplicate("Copy").await,
            Err(EditorError::NotSaved)
        );
        assert!(gateway.calls().is_empty());
        assert_eq!(
            notifier.last(),
            Some(Notice::error("Save the widget before duplicating it"))
        );
    }

    #[tokio::test]
    async fn test_duplicate_leaves_session_untouched() {
        let (session, gateway, _) = session_with(MockGateway::with_record("42", support_bot()));
        session.load(ConfigId::from(42)).await.unwrap();
        session.update(&WidgetConfigPatch::new().theme(widgetdesk_domain::Theme::Dark));
        let before = session.snapshot();

        let copy = session.duplicate("Support Bot Copy").await.unwrap();
        assert_ne!(copy, ConfigId::from(42));

        let after = session.snapshot();
        assert_eq!(after.document, before.document);
        assert_eq!(after.dirty, before.dirty);
        assert_eq!(after.identity, Some(ConfigId::from(42)));
        assert_eq!(gateway.calls(), vec!["get", "duplicate"]);
    }

    // ==================== Shortcuts ====================

    #[tokio::test]
    async fn test_dispatch_routes_commands() {
        let (session, gateway, _) = session_with(MockGateway::default());
        session.update(&WidgetConfigPatch::new().widget_name("Keyboard Bot"));
        session.dispatch(EditorCommand::Undo).await.unwrap();
        assert_eq!(session.document(), WidgetConfig::default());
        session.dispatch(EditorCommand::Redo).await.unwrap();
        session.dispatch(EditorCommand::Save).await.unwrap();
        assert_eq!(gateway.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn test_attached_shortcuts_reach_session() {
        let (session, gateway, _) = session_with(MockGateway::default());
        let dispatcher = CommandDispatcher::new();
        let registration = session.attach_shortcuts(&dispatcher);

        assert_eq!(
            dispatcher.dispatch_key(widgetdesk_domain::KeyChord::ctrl('s')),
            Some(EditorCommand::Save)
        );
        for _ in 0..100 {
            if !gateway.calls().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(gateway.calls(), vec!["create"]);

        drop(registration);
        assert_eq!(
            dispatcher.dispatch_key(widgetdesk_domain::KeyChord::ctrl('z')),
            None
        );
    }
}
