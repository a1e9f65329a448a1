//! Questionnaire submission workflow.
//!
//! Collects the ten survey answers, validates them, asks the prediction
//! service for a daily usage estimate, forwards that estimate to the backend
//! and records it in client storage before moving on to the dashboard.

use crate::adapters::AdapterRegistry;
use crate::adapters::http::{PredictionRequest, StoredPrediction};
use crate::adapters::store::keys;
use crate::error::{AquaError, Result, SubmissionFailure};
use crate::form::{FormField, FormState, ValidationErrors, validate};
use crate::navigation::Route;
use crate::state::SubmissionPhase;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Alert shown when no user record is stored.
pub const MISSING_USER_MESSAGE: &str = "User ID not found. Please login again.";

/// Alert shown when the prediction round trip fails.
pub const PREDICTION_ERROR_MESSAGE: &str = "Error generating prediction. Try again.";

/// Result of one submit attempt.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Some answers are invalid; nothing was stored or sent.
    ValidationFailed(ValidationErrors),

    /// No stored user; the login view was shown and nothing was sent.
    AbortedNoUser,

    /// The prediction round trip failed; the dashboard was shown anyway.
    Failed(SubmissionFailure),

    /// The prediction was stored remotely and locally.
    Submitted {
        /// Estimated daily usage in litres.
        predicted_usage: f64,
    },
}

impl SubmissionOutcome {
    /// Phase the workflow is left in after this outcome.
    pub fn phase(&self) -> SubmissionPhase {
        match self {
            SubmissionOutcome::ValidationFailed(_) => SubmissionPhase::Editing,
            SubmissionOutcome::AbortedNoUser => SubmissionPhase::AbortedNoUser,
            SubmissionOutcome::Failed(_) => SubmissionPhase::SubmitError,
            SubmissionOutcome::Submitted { .. } => SubmissionPhase::Success,
        }
    }

    /// View the user was sent to, if the form was left.
    pub fn route(&self) -> Option<Route> {
        match self {
            SubmissionOutcome::ValidationFailed(_) => None,
            SubmissionOutcome::AbortedNoUser => Some(Route::Login),
            SubmissionOutcome::Failed(_) | SubmissionOutcome::Submitted { .. } => {
                Some(Route::Dashboard)
            }
        }
    }
}

#[derive(Debug)]
struct Inner {
    form: FormState,
    errors: ValidationErrors,
    phase: SubmissionPhase,
}

/// The questionnaire workflow.
///
/// State lives behind a mutex that is never held across an `.await`, so a
/// workflow can be shared between tasks. While a submission is in flight,
/// further submits are rejected with `AquaError::SubmissionInProgress`.
///
/// # Examples
///
/// ```
/// use aquasense_core::adapters::AdapterRegistry;
/// use aquasense_core::adapters::http_mock::MockPredictionApi;
/// use aquasense_core::adapters::store_mock::MemoryStore;
/// use aquasense_core::adapters::ui::SessionUi;
/// use aquasense_core::workflows::QuestionnaireWorkflow;
/// use std::sync::Arc;
///
/// let adapters = AdapterRegistry::with_session(
///     Arc::new(MemoryStore::new()),
///     Arc::new(MockPredictionApi::new()),
///     SessionUi::new(),
/// );
/// let workflow = QuestionnaireWorkflow::new(adapters);
/// workflow.set_field("people", "4").unwrap();
/// assert_eq!(workflow.validate().len(), 9);
/// ```
#[derive(Debug)]
pub struct QuestionnaireWorkflow {
    adapters: AdapterRegistry,
    inner: Mutex<Inner>,
}

impl QuestionnaireWorkflow {
    /// Creates a workflow with an empty form.
    pub fn new(adapters: AdapterRegistry) -> Self {
        Self::with_form(adapters, FormState::new())
    }

    /// Creates a workflow starting from existing answers.
    pub fn with_form(adapters: AdapterRegistry, form: FormState) -> Self {
        Self {
            adapters,
            inner: Mutex::new(Inner {
                form,
                errors: ValidationErrors::default(),
                phase: SubmissionPhase::Editing,
            }),
        }
    }

    /// Updates the field named `name`.
    ///
    /// # Errors
    ///
    /// Returns `AquaError::UnknownField` if `name` is not a questionnaire field.
    pub fn set_field(&self, name: &str, value: impl Into<String>) -> Result<()> {
        self.lock().form.set_field(name, value)
    }

    /// Updates a single field.
    pub fn set(&self, field: FormField, value: impl Into<String>) {
        self.lock().form.set(field, value);
    }

    /// Snapshot of the current answers.
    pub fn form(&self) -> FormState {
        self.lock().form.clone()
    }

    /// Errors from the most recent validation.
    pub fn errors(&self) -> ValidationErrors {
        self.lock().errors.clone()
    }

    /// Current phase.
    pub fn phase(&self) -> SubmissionPhase {
        self.lock().phase
    }

    /// Validates the current answers and replaces the stored errors.
    pub fn validate(&self) -> ValidationErrors {
        let mut inner = self.lock();
        inner.errors = validate(&inner.form);
        inner.errors.clone()
    }

    /// Submits the questionnaire.
    ///
    /// This workflow:
    /// 1. Validates every answer; invalid answers end the attempt
    /// 2. Stores the raw answers under `questionnaireData`
    /// 3. Reads the stored user; without an id, alerts and shows `/login`
    /// 4. Requests a prediction for the six household numbers
    /// 5. Sends the prediction to the backend with the stored token
    /// 6. Stores the prediction under `predictedUsage`
    /// 7. Shows the dashboard, whether or not steps 3-6 succeeded
    ///
    /// A user record that cannot be read or parsed, and failures in steps
    /// 4-6, are logged, alerted with a generic message and returned as
    /// `SubmissionOutcome::Failed`.
    ///
    /// Dropping the returned future before it completes puts the workflow
    /// back in `Editing`.
    ///
    /// # Errors
    ///
    /// Returns `AquaError::SubmissionInProgress` if another submit has not
    /// finished, or a storage error if step 2 fails.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&self) -> Result<SubmissionOutcome> {
        let (form, guard) = match self.begin()? {
            Ok(claimed) => claimed,
            Err(errors) => {
                tracing::debug!(invalid = errors.len(), "questionnaire has invalid answers");
                return Ok(SubmissionOutcome::ValidationFailed(errors));
            }
        };

        let result = self.run(&form).await;
        if let Ok(outcome) = &result {
            guard.finish(outcome.phase());
        }

        result
    }

    /// Validates under the lock and claims the `Submitting` phase.
    fn begin(&self) -> Result<std::result::Result<(FormState, SubmitGuard<'_>), ValidationErrors>> {
        let mut inner = self.lock();
        if !inner.phase.accepts_submit() {
            tracing::warn!(phase = %inner.phase, "submit ignored while another is in flight");
            return Err(AquaError::SubmissionInProgress);
        }

        inner.phase = SubmissionPhase::Validating;
        inner.errors = validate(&inner.form);
        if !inner.errors.is_empty() {
            inner.phase = SubmissionPhase::Editing;
            return Ok(Err(inner.errors.clone()));
        }

        inner.phase = SubmissionPhase::Submitting;
        let form = inner.form.clone();
        drop(inner);

        Ok(Ok((
            form,
            SubmitGuard {
                workflow: self,
                phase: SubmissionPhase::Editing,
            },
        )))
    }

    async fn run(&self, form: &FormState) -> Result<SubmissionOutcome> {
        let adapters = &self.adapters;

        let serialized = serde_json::to_string(form)?;
        adapters.store.set(keys::QUESTIONNAIRE_DATA, &serialized)?;

        let result = match self.stored_user_id() {
            Ok(user_id) => self
                .predict_and_store(&user_id, form)
                .await
                .map(|predicted_usage| (user_id, predicted_usage)),
            Err(AquaError::MissingUser) => {
                tracing::warn!("no stored user id, redirecting to login");
                adapters.notifier.alert(MISSING_USER_MESSAGE);
                adapters.navigator.navigate(Route::Login);
                return Ok(SubmissionOutcome::AbortedNoUser);
            }
            Err(e) => Err(SubmissionFailure::UserRecord(e)),
        };

        let outcome = match result {
            Ok((user_id, predicted_usage)) => {
                tracing::info!(user_id = %user_id, predicted_usage, "prediction stored");
                SubmissionOutcome::Submitted { predicted_usage }
            }
            Err(failure) => {
                tracing::error!(
                    stage = failure.stage(),
                    error = %failure.error(),
                    "prediction saving error"
                );
                adapters.notifier.alert(PREDICTION_ERROR_MESSAGE);
                SubmissionOutcome::Failed(failure)
            }
        };

        adapters.navigator.navigate(Route::Dashboard);
        Ok(outcome)
    }

    async fn predict_and_store(
        &self,
        user_id: &Value,
        form: &FormState,
    ) -> std::result::Result<f64, SubmissionFailure> {
        let adapters = &self.adapters;

        let request = prediction_request(user_id, form).map_err(SubmissionFailure::Prediction)?;
        let response = adapters
            .api
            .predict(&request)
            .await
            .map_err(SubmissionFailure::Prediction)?;
        let predicted_usage = response.predicted_usage;
        tracing::debug!(predicted_usage, "prediction received");

        let token = adapters
            .store
            .get(keys::TOKEN)
            .and_then(|token| token.ok_or(AquaError::MissingToken))
            .map_err(SubmissionFailure::RemoteStorage)?;
        adapters
            .api
            .store_prediction(&token, &StoredPrediction { predicted_usage })
            .await
            .map_err(SubmissionFailure::RemoteStorage)?;

        adapters
            .store
            .set(keys::PREDICTED_USAGE, &predicted_usage.to_string())
            .map_err(SubmissionFailure::LocalStorage)?;

        Ok(predicted_usage)
    }

    fn stored_user_id(&self) -> Result<Value> {
        match self.adapters.store.get(keys::USER)? {
            Some(record) => user_id_from_record(&record),
            None => Err(AquaError::MissingUser),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Leaves the workflow in `phase` when dropped.
///
/// Starts out as `Editing`, so a submit future dropped mid-flight does not
/// keep the workflow locked in `Submitting`.
struct SubmitGuard<'a> {
    workflow: &'a QuestionnaireWorkflow,
    phase: SubmissionPhase,
}

impl SubmitGuard<'_> {
    fn finish(mut self, phase: SubmissionPhase) {
        self.phase = phase;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.workflow.lock().phase = self.phase;
    }
}

/// Extracts the `id` of a serialized user record, keeping its JSON type.
///
/// # Errors
///
/// Returns `AquaError::Json` if the record is not valid JSON, or
/// `AquaError::MissingUser` if the id is missing, `null`, `false`, `0` or
/// an empty string.
pub fn user_id_from_record(record: &str) -> Result<Value> {
    let user: Value = serde_json::from_str(record)?;
    match user.get("id") {
        Some(id) if !is_blank_id(id) => Ok(id.clone()),
        _ => Err(AquaError::MissingUser),
    }
}

fn is_blank_id(id: &Value) -> bool {
    match id {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Builds the prediction request from validated answers.
///
/// # Errors
///
/// Returns `AquaError::InvalidNumber` if one of the six numeric fields sent
/// to the service does not hold a number.
pub fn prediction_request(user_id: &Value, form: &FormState) -> Result<PredictionRequest> {
    let number = |field: FormField| {
        form.numeric(field)
            .ok_or_else(|| AquaError::InvalidNumber(field.to_string()))
    };

    Ok(PredictionRequest {
        user_id: user_id.clone(),
        people: number(FormField::People)?,
        children: number(FormField::Children)?,
        temperature: number(FormField::Temperature)?,
        showers_per_day: number(FormField::ShowersPerDay)?,
        time_per_shower: number(FormField::TimePerShower)?,
        washing_per_week: number(FormField::WashingPerWeek)?,
    })
}
