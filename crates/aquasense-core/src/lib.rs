//! AquaSense Core - household water-usage questionnaire engine.
//!
//! This crate collects the ten-question usage survey, validates it, asks a
//! remote prediction service for a daily usage estimate and records the
//! result both on the backend and in client storage.
//!
//! # Architecture
//!
//! - [`form`]: questionnaire fields, form state and validation
//! - [`state`]: submission phases
//! - [`workflows`]: the questionnaire submission workflow
//! - [`adapters`]: client storage, prediction HTTP API, navigation and alerts
//! - [`alerts`]: daily usage alert widget
//! - [`navigation`]: sidebar routes
//! - [`config`]: configuration file and environment overrides
//! - [`runtime`]: wires everything together
//!
//! # Example
//!
//! ```rust,ignore
//! use aquasense_core::{AquaConfig, AquaRuntime, SubmissionOutcome};
//! use std::path::PathBuf;
//!
//! let config = AquaConfig::load(PathBuf::from(".aquasense"))?
//!     .with_env_overrides(|key| std::env::var(key).ok());
//! let runtime = AquaRuntime::new(config)?;
//!
//! let workflow = runtime.questionnaire();
//! workflow.set_field("people", "4")?;
//! match workflow.submit().await? {
//!     SubmissionOutcome::ValidationFailed(errors) => println!("{} errors", errors.len()),
//!     outcome => println!("{}", runtime.render_outcome(&outcome)?),
//! }
//! ```

pub mod adapters;
pub mod alerts;
pub mod config;
pub mod error;
pub mod form;
pub mod navigation;
pub mod runtime;
pub mod state;
pub mod workflows;

// Re-export core types for convenience
pub use adapters::AdapterRegistry;
pub use alerts::{AlertLevel, UsageAlert};
pub use config::{AlertConfig, AquaConfig, EndpointConfig, HttpConfig};
pub use error::{AquaError, Result, SubmissionFailure};
pub use form::{FieldKind, FormField, FormState, ValidationErrors, validate};
pub use navigation::Route;
pub use runtime::AquaRuntime;
pub use state::SubmissionPhase;
pub use workflows::{QuestionnaireWorkflow, SubmissionOutcome};
