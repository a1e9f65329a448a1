//! Prediction API adapter trait and wire types.
//!
//! The questionnaire talks to two endpoints: the prediction service
//! (`POST /predict`) and the backend that keeps predictions per user
//! (`POST /api/predictions`). Both sit behind `PredictionApi` so the
//! workflow can run against a scripted fake.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    /// Id from the stored user record, sent with its original JSON type.
    pub user_id: serde_json::Value,
    pub people: f64,
    pub children: f64,
    pub temperature: f64,
    pub showers_per_day: f64,
    pub time_per_shower: f64,
    pub washing_per_week: f64,
}

/// Response of `POST /predict`. Extra fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Estimated daily water usage in litres.
    pub predicted_usage: f64,
}

/// Body of `POST /api/predictions`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPrediction {
    pub predicted_usage: f64,
}

/// Remote prediction endpoints.
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// Requests a usage prediction for the given answers.
    ///
    /// # Errors
    ///
    /// Returns `AquaError::Request` on transport failure,
    /// `AquaError::UnexpectedStatus` on a non-success status, and
    /// `AquaError::MalformedResponse` if the body lacks `predicted_usage`.
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse>;

    /// Stores a prediction against the user owning `token`.
    ///
    /// # Errors
    ///
    /// Returns `AquaError::Request` or `AquaError::UnexpectedStatus` if the
    /// backend does not accept the prediction.
    async fn store_prediction(&self, token: &str, prediction: &StoredPrediction) -> Result<()>;
}
