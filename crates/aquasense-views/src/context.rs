//! Context structures for view rendering.
//!
//! Numbers arrive pre-formatted as strings so every template shows them the
//! same way.

use serde::Serialize;

/// Daily usage alert widget.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AlertView {
    /// `safe`, `warning` or `exceeded`.
    pub level: String,
    pub icon: String,
    pub message: String,
    /// Litres used today.
    pub used: String,
    /// Daily quota in litres.
    pub quota: String,
    /// Share of the quota used, one decimal.
    pub percentage: String,
}

/// One sidebar entry.
#[derive(Debug, Clone, Serialize)]
pub struct NavItemView {
    pub path: String,
    pub label: String,
    pub active: bool,
}

/// Sidebar navigation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SidebarView {
    pub items: Vec<NavItemView>,
}

/// One invalid questionnaire answer.
#[derive(Debug, Clone, Serialize)]
pub struct IssueView {
    pub field: String,
    pub label: String,
    pub message: String,
}

/// Result of a questionnaire submission.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutcomeView {
    /// Workflow phase after the attempt.
    pub status: String,
    /// Predicted usage in litres, when one was stored.
    pub predicted_usage: Option<String>,
    /// Path of the view the user was sent to.
    pub route: Option<String>,
    /// Alerts raised during the attempt.
    pub alerts: Vec<String>,
    /// Invalid answers, when validation failed.
    pub issues: Vec<IssueView>,
}

/// One stored questionnaire answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerView {
    pub label: String,
    pub value: String,
}

/// Dashboard summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    /// Logged-in user id, if a session is stored.
    pub user_id: Option<String>,
    /// Latest stored prediction in litres.
    pub predicted_usage: Option<String>,
    /// Last submitted answers.
    pub answers: Vec<AnswerView>,
    /// Today's usage alert.
    pub alert: AlertView,
}
