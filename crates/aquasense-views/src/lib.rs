//! Text views for the AquaSense terminal frontend.
//!
//! This crate renders the dashboard widgets, the sidebar and questionnaire
//! results with minijinja. Built-in templates are compiled into the crate;
//! a directory of `.j2` files can replace them.
//!
//! # Examples
//!
//! ```
//! use aquasense_views::{AlertView, ViewEngine, ViewManager};
//!
//! let views = ViewManager::builtin()?;
//! let alert = AlertView {
//!     level: "warning".into(),
//!     icon: "⚠️".into(),
//!     message: "Approaching your daily water limit.".into(),
//!     used: "120".into(),
//!     quota: "150".into(),
//!     percentage: "80.0".into(),
//! };
//! let text = views.render("alert", &alert)?;
//! assert!(text.contains("80.0% used"));
//! # Ok::<(), aquasense_views::ViewError>(())
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod manager;

pub use context::{
    AlertView, AnswerView, DashboardView, IssueView, NavItemView, OutcomeView, SidebarView,
};
pub use engine::ViewEngine;
pub use error::{Result, ViewError};
pub use manager::ViewManager;
