//! Workflow modules for AquaSense.
//!
//! - `questionnaire`: collect survey answers and request a usage prediction

pub mod questionnaire;

pub use questionnaire::{
    MISSING_USER_MESSAGE, PREDICTION_ERROR_MESSAGE, QuestionnaireWorkflow, SubmissionOutcome,
};
