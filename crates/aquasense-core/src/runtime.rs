//! Runtime for the AquaSense client.
//!
//! This module provides `AquaRuntime`, which owns the configuration, the
//! shared adapters and the view manager, and hands out questionnaire
//! workflows bound to them.

use crate::adapters::AdapterRegistry;
use crate::adapters::http::PredictionApi;
use crate::adapters::http_impl::HttpPredictionApi;
use crate::adapters::store::{KeyValueStore, keys};
use crate::adapters::store_impl::FileStore;
use crate::adapters::ui::SessionUi;
use crate::alerts::{AlertLevel, UsageAlert};
use crate::config::AquaConfig;
use crate::error::Result;
use crate::form::{FormField, FormState};
use crate::navigation::Route;
use crate::workflows::questionnaire::{QuestionnaireWorkflow, SubmissionOutcome, user_id_from_record};
use aquasense_views::{
    AlertView, AnswerView, DashboardView, IssueView, NavItemView, OutcomeView, SidebarView,
    ViewEngine, ViewManager,
};
use serde_json::Value;
use std::sync::Arc;

/// AquaSense client runtime.
///
/// # Examples
///
/// ```no_run
/// use aquasense_core::{AquaConfig, AquaRuntime};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let runtime = AquaRuntime::new(AquaConfig::new(PathBuf::from(".aquasense")))?;
/// runtime.login("u1", "token")?;
///
/// let workflow = runtime.questionnaire();
/// workflow.set_field("people", "4")?;
/// let outcome = workflow.submit().await?;
/// println!("{}", runtime.render_outcome(&outcome)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AquaRuntime {
    /// Client configuration.
    pub config: AquaConfig,

    /// Template renderer for terminal views.
    pub views: ViewManager,

    /// Navigation and alerts raised by workflows.
    pub session: SessionUi,

    adapters: AdapterRegistry,
}

impl AquaRuntime {
    /// Creates a runtime using file storage and the real HTTP endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the view manager cannot be
    /// created.
    pub fn new(config: AquaConfig) -> Result<Self> {
        let store = Arc::new(FileStore::new(config.storage_file.clone()));
        let api = Arc::new(HttpPredictionApi::new(&config.endpoints, &config.http)?);
        Self::with_adapters(config, store, api)
    }

    /// Creates a runtime over the given storage and prediction API.
    ///
    /// # Errors
    ///
    /// Returns an error if the view manager cannot be created.
    pub fn with_adapters(
        config: AquaConfig,
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn PredictionApi>,
    ) -> Result<Self> {
        let views = Self::init_views(&config)?;
        let session = SessionUi::new();
        let adapters = AdapterRegistry::with_session(store, api, session.clone());

        Ok(Self {
            config,
            views,
            session,
            adapters,
        })
    }

    /// Uses the configured template directory when it exists, otherwise
    /// the built-in templates.
    fn init_views(config: &AquaConfig) -> Result<ViewManager> {
        if let Some(dir) = &config.views_dir {
            if dir.is_dir() {
                return Ok(ViewManager::new(dir.clone())?);
            }
            tracing::warn!(dir = %dir.display(), "view directory not found, using built-in views");
        }
        Ok(ViewManager::builtin()?)
    }

    /// Shared adapters.
    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    /// Starts a questionnaire with an empty form.
    pub fn questionnaire(&self) -> QuestionnaireWorkflow {
        QuestionnaireWorkflow::new(self.adapters.clone())
    }

    /// Stores the user record and token a login view would leave behind.
    ///
    /// # Errors
    ///
    /// Returns a storage error if either record cannot be written.
    #[tracing::instrument(skip(self, token))]
    pub fn login(&self, user_id: &str, token: &str) -> Result<()> {
        let record = serde_json::json!({ "id": user_id }).to_string();
        self.adapters.store.set(keys::USER, &record)?;
        self.adapters.store.set(keys::TOKEN, token)?;
        tracing::info!("session stored");
        Ok(())
    }

    /// Removes the stored user record and token.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a record cannot be removed.
    pub fn logout(&self) -> Result<()> {
        self.adapters.store.remove(keys::USER)?;
        self.adapters.store.remove(keys::TOKEN)?;
        Ok(())
    }

    /// Id of the stored user, if any.
    ///
    /// A record without a usable id, or one that is not JSON, reads as no
    /// user.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be read.
    pub fn session(&self) -> Result<Option<String>> {
        let Some(record) = self.adapters.store.get(keys::USER)? else {
            return Ok(None);
        };

        match user_id_from_record(&record) {
            Ok(Value::String(id)) => Ok(Some(id)),
            Ok(id) => Ok(Some(id.to_string())),
            Err(e) => {
                tracing::debug!(error = %e, "stored user record has no usable id");
                Ok(None)
            }
        }
    }

    /// Evaluates the usage alert, falling back to configured values.
    ///
    /// # Errors
    ///
    /// Returns `AquaError::InvalidQuota` if the quota is not positive.
    pub fn usage_alert(&self, used_today: Option<f64>, daily_quota: Option<f64>) -> Result<UsageAlert> {
        UsageAlert::evaluate(
            used_today.unwrap_or(self.config.alerts.used_today),
            daily_quota.unwrap_or(self.config.alerts.daily_quota),
        )
    }

    /// Renders the usage alert widget.
    ///
    /// # Errors
    ///
    /// Returns a view error if rendering fails.
    pub fn render_alert(&self, alert: &UsageAlert) -> Result<String> {
        Ok(self.views.render("alert", &alert_view(alert))?)
    }

    /// Renders the sidebar with the entry matching `current_path` highlighted.
    ///
    /// # Errors
    ///
    /// Returns a view error if rendering fails.
    pub fn render_sidebar(&self, current_path: &str) -> Result<String> {
        let items = Route::SIDEBAR
            .into_iter()
            .map(|route| NavItemView {
                path: route.path().to_string(),
                label: route.label().to_string(),
                active: route.is_active(current_path),
            })
            .collect();

        Ok(self.views.render("sidebar", &SidebarView { items })?)
    }

    /// Renders a submission outcome, draining the alerts and navigations
    /// raised by the workflow.
    ///
    /// # Errors
    ///
    /// Returns a view error if rendering fails.
    pub fn render_outcome(&self, outcome: &SubmissionOutcome) -> Result<String> {
        let issues = match outcome {
            SubmissionOutcome::ValidationFailed(errors) => errors
                .iter()
                .map(|(field, message)| IssueView {
                    field: field.as_str().to_string(),
                    label: field.label().to_string(),
                    message: message.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };
        let predicted_usage = match outcome {
            SubmissionOutcome::Submitted { predicted_usage } => Some(predicted_usage.to_string()),
            _ => None,
        };

        let ctx = OutcomeView {
            status: outcome.phase().to_string(),
            predicted_usage,
            route: outcome.route().map(|route| route.path().to_string()),
            alerts: self.session.take_alerts(),
            issues,
        };
        let routes = self.session.take_routes();
        tracing::debug!(navigations = routes.len(), "session navigations drained");

        Ok(self.views.render("outcome", &ctx)?)
    }

    /// Builds the dashboard summary from client storage.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be read, or
    /// `AquaError::InvalidQuota` if the configured quota is invalid.
    pub fn dashboard(&self) -> Result<DashboardView> {
        let store = &self.adapters.store;
        let predicted_usage = store.get(keys::PREDICTED_USAGE)?;

        let answers = match store.get(keys::QUESTIONNAIRE_DATA)? {
            Some(raw) => match serde_json::from_str::<FormState>(&raw) {
                Ok(form) => answer_views(&form),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring unreadable questionnaire data");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(DashboardView {
            user_id: self.session()?,
            predicted_usage,
            answers,
            alert: alert_view(&self.usage_alert(None, None)?),
        })
    }

    /// Renders the dashboard summary.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`AquaRuntime::dashboard`] or a view error.
    pub fn render_dashboard(&self) -> Result<String> {
        Ok(self.views.render("dashboard", &self.dashboard()?)?)
    }
}

fn alert_view(alert: &UsageAlert) -> AlertView {
    let icon = match alert.level {
        AlertLevel::Safe => "✅",
        AlertLevel::Warning => "⚠️",
        AlertLevel::Exceeded => "🚨",
    };

    AlertView {
        level: alert.level.to_string(),
        icon: icon.to_string(),
        message: alert.level.message().to_string(),
        used: alert.used_today.to_string(),
        quota: alert.daily_quota.to_string(),
        percentage: alert.percentage_display(),
    }
}

fn answer_views(form: &FormState) -> Vec<AnswerView> {
    FormField::ALL
        .into_iter()
        .filter(|field| !form.get(*field).is_empty())
        .map(|field| AnswerView {
            label: field.label().to_string(),
            value: form.get(field).to_string(),
        })
        .collect()
}
