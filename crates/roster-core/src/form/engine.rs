//! Form state, debounced validation and submission.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde_json::{Number, Value};
use tracing::{debug, info, instrument, warn};

use super::schema::parse_bool;
use super::{FormSchema, InputKind};
use crate::actions::RefreshPolicy;
use crate::cancel::CancelToken;
use crate::error::{Error, InvalidInputError};
use crate::notice::{Notice, Notifier};
use crate::record::{Record, field_text};
use crate::store::StoreUpdate;
use crate::traits::Session;
use crate::types::{RecordId, Resource};

/// Quiet period after the last edit of a field before it is validated.
pub const VALIDATION_DEBOUNCE: Duration = Duration::from_millis(500);

/// Whether the form creates a new record or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(RecordId),
}

/// Result of [`FormEngine::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; no request was sent.
    Invalid { errors: BTreeMap<String, String> },
    /// Another submission of this form is still waiting for the server.
    InFlight,
    /// This create form already saved its record; call
    /// [`FormEngine::reset`] to create another.
    AlreadySubmitted,
    /// The server accepted the write.
    Saved { update: StoreUpdate },
    /// The server rejected the write; `notice` was shown.
    Failed { notice: Notice },
    /// Cancelled before the server answered.
    Cancelled,
}

#[derive(Debug, Default)]
struct FormState {
    values: BTreeMap<String, String>,
    /// Values as the record held them when an update form was prefilled.
    originals: BTreeMap<String, Value>,
    errors: BTreeMap<String, String>,
    generations: HashMap<String, u64>,
    completed: bool,
}

/// A create or update form for one resource.
///
/// The engine is shared by reference: edits and submissions may run
/// concurrently, and at most one submission is in flight at a time.
#[derive(Debug)]
pub struct FormEngine {
    resource: Resource,
    schema: FormSchema,
    mode: FormMode,
    debounce: Duration,
    state: Mutex<FormState>,
    submitting: AtomicBool,
}

/// Clears the in-flight flag when a submission ends, however it ends.
struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl FormEngine {
    /// An empty form.
    pub fn new(resource: Resource, schema: FormSchema, mode: FormMode) -> Self {
        Self {
            resource,
            schema,
            mode,
            debounce: VALIDATION_DEBOUNCE,
            state: Mutex::new(FormState::default()),
            submitting: AtomicBool::new(false),
        }
    }

    /// An update form prefilled from an existing record.
    ///
    /// Reference fields are prefilled with the referenced id whether the
    /// record holds a bare id or a populated object.
    pub fn for_record(resource: Resource, schema: FormSchema, record: &Record) -> Result<Self, Error> {
        let id = record.id().ok_or_else(|| InvalidInputError::Record {
            reason: "record has no id".to_string(),
        })?;

        let mut values = BTreeMap::new();
        let mut originals = BTreeMap::new();
        for field in schema.fields() {
            let Some(original) = record.get(&field.name) else {
                continue;
            };
            let text = match field.kind {
                InputKind::Reference => match record.reference(&field.name) {
                    Some(reference) => reference.id().to_string(),
                    None => field_text(original).into_owned(),
                },
                _ => field_text(original).into_owned(),
            };
            values.insert(field.name.clone(), text);
            originals.insert(field.name.clone(), original.clone());
        }

        let form = Self::new(resource, schema, FormMode::Update(id));
        {
            let mut state = form.lock();
            state.values = values;
            state.originals = originals;
        }
        Ok(form)
    }

    /// Override the validation debounce.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.lock().values.get(name).cloned()
    }

    pub fn values(&self) -> BTreeMap<String, String> {
        self.lock().values.clone()
    }

    /// Field errors from the latest validations.
    pub fn errors(&self) -> BTreeMap<String, String> {
        self.lock().errors.clone()
    }

    /// Set a field without validating it.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let mut state = self.lock();
        *state.generations.entry(name.clone()).or_insert(0) += 1;
        state.values.insert(name, value.into());
    }

    /// Set a field and validate it once edits to it go quiet.
    ///
    /// Returns `None` if a later edit of the same field superseded this one
    /// before the debounce elapsed.
    pub async fn edit(&self, name: &str, value: impl Into<String>) -> Option<Result<(), String>> {
        let generation = {
            let mut state = self.lock();
            state.values.insert(name.to_string(), value.into());
            let generation = state.generations.entry(name.to_string()).or_insert(0);
            *generation += 1;
            *generation
        };

        tokio::time::sleep(self.debounce).await;

        let mut state = self.lock();
        if state.generations.get(name) != Some(&generation) {
            return None;
        }

        let value = state.values.get(name).cloned().unwrap_or_default();
        let result = self.schema.check(name, &value);
        match &result {
            Ok(()) => {
                state.errors.remove(name);
            }
            Err(message) => {
                state.errors.insert(name.to_string(), message.clone());
            }
        }
        Some(result)
    }

    /// Check every field: required fields first, then rules.
    pub fn validate_all(&self) -> BTreeMap<String, String> {
        let values = self.values();
        let mut errors = BTreeMap::new();

        for field in self.schema.fields() {
            let value = values.get(&field.name).map(String::as_str).unwrap_or("");
            if field.required && value.trim().is_empty() {
                errors.insert(
                    field.name.clone(),
                    format!("{} is required", field.display_label()),
                );
                continue;
            }
            if let Err(message) = self.schema.check(&field.name, value) {
                errors.insert(field.name.clone(), message);
            }
        }

        self.lock().errors = errors.clone();
        errors
    }

    /// Assemble the request body from the current values.
    ///
    /// Number and boolean fields are sent as JSON numbers and booleans;
    /// everything else, including fields unknown to the schema, as strings.
    ///
    /// A create form leaves empty values out. An update form sends them so
    /// a field can be cleared: as `""` where the record held a string and
    /// as `null` otherwise.
    pub fn payload(&self) -> Record {
        let state = self.lock();
        let updating = matches!(self.mode, FormMode::Update(_));
        let mut record = Record::default();

        for (name, raw) in &state.values {
            let value = raw.trim();
            let json = if value.is_empty() {
                if !updating {
                    continue;
                }
                match state.originals.get(name) {
                    Some(Value::String(_)) => Value::String(String::new()),
                    _ => Value::Null,
                }
            } else {
                let kind = self.schema.field(name).map(|f| f.kind).unwrap_or_default();
                match kind {
                    InputKind::Number => number_value(value),
                    InputKind::Boolean => parse_bool(value)
                        .map(Value::Bool)
                        .unwrap_or_else(|| Value::String(value.to_string())),
                    _ => Value::String(value.to_string()),
                }
            };
            record.insert(name.clone(), json);
        }
        record
    }

    /// Clear values, errors and the saved flag.
    pub fn reset(&self) {
        let mut state = self.lock();
        *state = FormState::default();
    }

    /// Validate and send the form.
    ///
    /// A create form saves at most once: concurrent submissions are
    /// rejected while one is in flight, and a form whose record was saved
    /// refuses further submissions until [`reset`](Self::reset).
    #[instrument(skip_all, fields(resource = %self.resource, mode = ?self.mode))]
    pub async fn submit<S: Session>(
        &self,
        session: &S,
        notifier: &dyn Notifier,
        policy: RefreshPolicy,
        cancel: &CancelToken,
    ) -> SubmitOutcome {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            debug!("Submission already in flight");
            return SubmitOutcome::InFlight;
        }
        let _guard = SubmitGuard(&self.submitting);

        // Only read while holding the in-flight flag.
        if self.is_completed() {
            debug!("Form already saved");
            return SubmitOutcome::AlreadySubmitted;
        }

        let errors = self.validate_all();
        if !errors.is_empty() {
            notifier.notify(Notice::error("Please correct the highlighted fields"));
            return SubmitOutcome::Invalid { errors };
        }

        let payload = self.payload();
        let label = self.resource.label();

        let result = match &self.mode {
            FormMode::Create => {
                cancel
                    .run(session.create(self.resource, &payload))
                    .await
            }
            FormMode::Update(id) => {
                cancel
                    .run(session.update(self.resource, id, &payload))
                    .await
            }
        };

        match result {
            Ok(Ok(saved)) => {
                let (verb, targeted) = match &self.mode {
                    FormMode::Create => {
                        self.lock().completed = true;
                        ("created", saved.map(StoreUpdate::Inserted))
                    }
                    FormMode::Update(_) => ("updated", saved.map(StoreUpdate::Patched)),
                };
                info!(verb, "Record saved");
                notifier.notify(Notice::success(format!("The {label} was {verb}")));
                SubmitOutcome::Saved {
                    update: policy.update(targeted),
                }
            }
            Err(Error::Cancelled) | Ok(Err(Error::Cancelled)) => SubmitOutcome::Cancelled,
            Err(e) | Ok(Err(e)) => {
                warn!(error = %e, "Submission failed");
                let notice = Notice::from_error(label, &e);
                notifier.notify(notice.clone());
                SubmitOutcome::Failed { notice }
            }
        }
    }

    fn is_completed(&self) -> bool {
        self.lock().completed
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Integers stay integers; anything else numeric becomes a float.
fn number_value(s: &str) -> Value {
    if let Ok(i) = s.parse::<i64>() {
        return Value::Number(i.into());
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldSchema, Rule};
    use crate::notice::{NoticeLevel, NoticeLog};
    use crate::testing::MockSession;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn vehicle_schema() -> FormSchema {
        FormSchema::new(vec![
            FieldSchema::new("plate").required(),
            FieldSchema::new("year")
                .kind(InputKind::Number)
                .rule(Rule::Numeric),
            FieldSchema::new("brand").kind(InputKind::Reference),
            FieldSchema::new("fuel").rule(Rule::OneOf {
                values: vec!["Petrol".into(), "Diesel".into()],
            }),
        ])
        .unwrap()
    }

    fn create_form() -> FormEngine {
        FormEngine::new(Resource::Vehicles, vehicle_schema(), FormMode::Create)
    }

    #[tokio::test(start_paused = true)]
    async fn edit_validates_after_debounce() {
        let form = create_form();
        let result = form.edit("year", "twenty").await;
        assert_eq!(result, Some(Err("Year must be a number".into())));
        assert!(form.errors().contains_key("year"));

        let result = form.edit("year", "2021").await;
        assert_eq!(result, Some(Ok(())));
        assert!(form.errors().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn later_edit_supersedes_pending_validation() {
        let form = create_form();
        let first = form.edit("year", "x");
        let second = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            form.edit("year", "2020").await
        };

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first, None);
        assert_eq!(second, Some(Ok(())));
        assert_eq!(form.value("year").as_deref(), Some("2020"));
    }

    #[tokio::test]
    async fn missing_required_field_sends_nothing() {
        let form = create_form();
        form.set("year", "2019");
        let session = MockSession::new(json!([]));
        let log = NoticeLog::new();

        let outcome = form
            .submit(&session, &log, RefreshPolicy::Targeted, &CancelToken::never())
            .await;

        match outcome {
            SubmitOutcome::Invalid { errors } => {
                assert_eq!(errors.get("plate").unwrap(), "Plate is required")
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(session.creates.load(Ordering::SeqCst), 0);
        assert_eq!(log.notices()[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn create_sends_typed_payload() {
        let form = create_form();
        form.set("plate", "GR-1020-21");
        form.set("year", "2021");
        form.set("fuel", "Diesel");
        form.set("notes", "");
        let session = MockSession::new(json!([]));
        let log = NoticeLog::new();

        let outcome = form
            .submit(&session, &log, RefreshPolicy::Targeted, &CancelToken::never())
            .await;

        let SubmitOutcome::Saved {
            update: StoreUpdate::Inserted(record),
        } = outcome
        else {
            panic!("expected an insert, got {:?}", outcome);
        };
        assert_eq!(record.id().unwrap().as_str(), "new0");
        assert_eq!(
            session.bodies.lock().unwrap()[0],
            json!({"plate": "GR-1020-21", "year": 2021, "fuel": "Diesel"})
        );
        assert_eq!(log.notices()[0].message, "The vehicle was created");
    }

    #[tokio::test(start_paused = true)]
    async fn double_submit_creates_at_most_once() {
        let form = create_form();
        form.set("plate", "GR-1020-21");
        let session = MockSession::new(json!([])).with_delay(Duration::from_millis(300));
        let log = NoticeLog::new();
        let never = CancelToken::never();

        let (a, b) = tokio::join!(
            form.submit(&session, &log, RefreshPolicy::Targeted, &never),
            form.submit(&session, &log, RefreshPolicy::Targeted, &never),
        );

        assert!(matches!(a, SubmitOutcome::Saved { .. }));
        assert_eq!(b, SubmitOutcome::InFlight);

        let again = form
            .submit(&session, &log, RefreshPolicy::Targeted, &never)
            .await;
        assert_eq!(again, SubmitOutcome::AlreadySubmitted);
        assert_eq!(session.creates.load(Ordering::SeqCst), 1);

        form.reset();
        form.set("plate", "GR-2-22");
        let after_reset = form
            .submit(&session, &log, RefreshPolicy::Targeted, &never)
            .await;
        assert!(matches!(after_reset, SubmitOutcome::Saved { .. }));
        assert_eq!(session.creates.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn conflict_is_reported_and_form_stays_open() {
        let form = create_form();
        form.set("plate", "GR-1020-21");
        let session = MockSession::new(json!([]));
        session.fail_with(409);
        let log = NoticeLog::new();
        let never = CancelToken::never();

        let outcome = form
            .submit(&session, &log, RefreshPolicy::Targeted, &never)
            .await;
        let SubmitOutcome::Failed { notice } = outcome else {
            panic!("expected failure, got {:?}", outcome);
        };
        assert!(notice.message.contains("already exists"));

        // The failed attempt neither completed the form nor left it locked.
        *session.fail_status.lock().unwrap() = None;
        let retry = form
            .submit(&session, &log, RefreshPolicy::Targeted, &never)
            .await;
        assert!(matches!(retry, SubmitOutcome::Saved { .. }));
    }

    #[tokio::test]
    async fn update_prefills_and_patches() {
        let record = Record::from_value(json!({
            "_id": "v7",
            "plate": "AS-551-19",
            "year": 2019,
            "brand": {"_id": "b2", "name": "Toyota"}
        }))
        .unwrap();
        let form = FormEngine::for_record(Resource::Vehicles, vehicle_schema(), &record).unwrap();
        assert_eq!(form.value("brand").as_deref(), Some("b2"));
        assert_eq!(form.value("year").as_deref(), Some("2019"));

        form.set("plate", "AS-552-19");
        let session = MockSession::new(json!([]));
        let log = NoticeLog::new();
        let outcome = form
            .submit(&session, &log, RefreshPolicy::Targeted, &CancelToken::never())
            .await;

        let SubmitOutcome::Saved {
            update: StoreUpdate::Patched(saved),
        } = outcome
        else {
            panic!("expected a patch, got {:?}", outcome);
        };
        assert_eq!(saved.id().unwrap().as_str(), "v7");
        assert_eq!(session.updates.load(Ordering::SeqCst), 1);
        assert_eq!(log.notices()[0].message, "The vehicle was updated");
    }

    #[tokio::test]
    async fn inferred_update_keeps_record_types() {
        let record = Record::from_value(json!({
            "_id": "v1",
            "plate": "X",
            "active": true,
            "notes": null,
            "nick": ""
        }))
        .unwrap();
        let form =
            FormEngine::for_record(Resource::Vehicles, FormSchema::infer(&record), &record).unwrap();
        form.set("plate", "Y");
        let session = MockSession::new(json!([]));
        let log = NoticeLog::new();

        let outcome = form
            .submit(&session, &log, RefreshPolicy::Targeted, &CancelToken::never())
            .await;

        assert!(matches!(outcome, SubmitOutcome::Saved { .. }));
        assert_eq!(
            session.bodies.lock().unwrap()[0],
            json!({"plate": "Y", "active": true, "notes": null, "nick": ""})
        );
    }

    #[tokio::test]
    async fn update_can_clear_a_field() {
        let record = Record::from_value(json!({
            "_id": "v1",
            "plate": "X",
            "notes": "old",
            "year": 2019
        }))
        .unwrap();
        let form =
            FormEngine::for_record(Resource::Vehicles, FormSchema::infer(&record), &record).unwrap();
        form.set("notes", "");
        form.set("year", " ");
        let session = MockSession::new(json!([]));
        let log = NoticeLog::new();

        form.submit(&session, &log, RefreshPolicy::Targeted, &CancelToken::never())
            .await;

        assert_eq!(
            session.bodies.lock().unwrap()[0],
            json!({"plate": "X", "notes": "", "year": null})
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submits_across_threads_create_once() {
        let form = Arc::new(create_form());
        form.set("plate", "GR-1020-21");
        let session = Arc::new(MockSession::new(json!([])));
        let log = Arc::new(NoticeLog::new());

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let form = Arc::clone(&form);
                let session = Arc::clone(&session);
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    form.submit(&*session, &*log, RefreshPolicy::Targeted, &CancelToken::never())
                        .await
                })
            })
            .collect();

        let mut saved = 0;
        for task in tasks {
            match task.await.unwrap() {
                SubmitOutcome::Saved { .. } => saved += 1,
                SubmitOutcome::InFlight | SubmitOutcome::AlreadySubmitted => {}
                other => panic!("unexpected outcome: {:?}", other),
            }
        }
        assert_eq!(saved, 1);
        assert_eq!(session.creates.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn boolean_values_are_sent_as_booleans() {
        let form = FormEngine::new(
            Resource::Vehicles,
            FormSchema::new(vec![FieldSchema::new("active").kind(InputKind::Boolean)]).unwrap(),
            FormMode::Create,
        );
        form.set("active", "False");
        assert_eq!(form.payload().into_value(), json!({"active": false}));
    }

    #[tokio::test]
    async fn reload_policy_overrides_targeted_update() {
        let form = create_form();
        form.set("plate", "GR-1020-21");
        let session = MockSession::new(json!([]));
        let log = NoticeLog::new();
        let outcome = form
            .submit(&session, &log, RefreshPolicy::Reload, &CancelToken::never())
            .await;
        assert_eq!(
            outcome,
            SubmitOutcome::Saved {
                update: StoreUpdate::Reload
            }
        );
    }

    #[test]
    fn record_without_id_cannot_be_edited() {
        let record = Record::from_value(json!({"plate": "X"})).unwrap();
        assert!(FormEngine::for_record(Resource::Vehicles, vehicle_schema(), &record).is_err());
    }

    #[test]
    fn number_values() {
        assert_eq!(number_value("42"), json!(42));
        assert_eq!(number_value("2.5"), json!(2.5));
        assert_eq!(number_value("abc"), json!("abc"));
    }
}
