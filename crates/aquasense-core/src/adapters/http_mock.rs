//! Scripted prediction API for testing.
//!
//! The mock answers with pre-programmed replies and records every call, so
//! tests can assert what was sent without a network.

use crate::adapters::http::{PredictionApi, PredictionRequest, PredictionResponse, StoredPrediction};
use crate::error::{AquaError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Pre-programmed reply for one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// 2xx with `{"predicted_usage": value}` (ignored by the storage endpoint).
    Usage(f64),

    /// 2xx with an empty body.
    Ok,

    /// Non-success status.
    Status(u16),

    /// 2xx with a body lacking `predicted_usage`.
    Malformed,

    /// Transport failure.
    NetworkError(String),
}

/// Mock prediction API.
///
/// Clones share replies and call history.
///
/// # Examples
///
/// ```
/// use aquasense_core::adapters::http_mock::{MockPredictionApi, MockReply};
///
/// let api = MockPredictionApi::new();
/// api.set_predict_reply(MockReply::Usage(342.0));
/// assert!(api.predict_calls().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MockPredictionApi {
    predict_reply: Arc<Mutex<MockReply>>,
    store_reply: Arc<Mutex<MockReply>>,
    predict_calls: Arc<Mutex<Vec<PredictionRequest>>>,
    store_calls: Arc<Mutex<Vec<(String, StoredPrediction)>>>,
}

impl MockPredictionApi {
    /// Creates a mock whose endpoints fail until replies are scripted.
    pub fn new() -> Self {
        Self {
            predict_reply: Arc::new(Mutex::new(MockReply::NetworkError(
                "no reply scripted".to_string(),
            ))),
            store_reply: Arc::new(Mutex::new(MockReply::Ok)),
            predict_calls: Arc::new(Mutex::new(Vec::new())),
            store_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a mock that predicts `usage` and accepts storage.
    pub fn predicting(usage: f64) -> Self {
        let api = Self::new();
        api.set_predict_reply(MockReply::Usage(usage));
        api
    }

    /// Sets the reply of `POST /predict`.
    pub fn set_predict_reply(&self, reply: MockReply) {
        *self.predict_reply.lock().unwrap() = reply;
    }

    /// Sets the reply of `POST /api/predictions`.
    pub fn set_store_reply(&self, reply: MockReply) {
        *self.store_reply.lock().unwrap() = reply;
    }

    /// Requests sent to the prediction endpoint.
    pub fn predict_calls(&self) -> Vec<PredictionRequest> {
        self.predict_calls.lock().unwrap().clone()
    }

    /// `(token, body)` pairs sent to the storage endpoint.
    pub fn store_calls(&self) -> Vec<(String, StoredPrediction)> {
        self.store_calls.lock().unwrap().clone()
    }

    /// Total number of requests sent to either endpoint.
    pub fn total_calls(&self) -> usize {
        self.predict_calls.lock().unwrap().len() + self.store_calls.lock().unwrap().len()
    }
}

impl Default for MockPredictionApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionApi for MockPredictionApi {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        self.predict_calls.lock().unwrap().push(request.clone());
        let reply = self.predict_reply.lock().unwrap().clone();

        // Suspend once like a real round trip would
        tokio::task::yield_now().await;

        match reply {
            MockReply::Usage(predicted_usage) => Ok(PredictionResponse { predicted_usage }),
            other => Err(reply_error("mock://predict", other)),
        }
    }

    async fn store_prediction(&self, token: &str, prediction: &StoredPrediction) -> Result<()> {
        self.store_calls
            .lock()
            .unwrap()
            .push((token.to_string(), *prediction));
        let reply = self.store_reply.lock().unwrap().clone();

        tokio::task::yield_now().await;

        match reply {
            MockReply::Ok | MockReply::Usage(_) => Ok(()),
            other => Err(reply_error("mock://api/predictions", other)),
        }
    }
}

fn reply_error(url: &str, reply: MockReply) -> AquaError {
    match reply {
        MockReply::Status(status) => AquaError::UnexpectedStatus {
            url: url.to_string(),
            status,
        },
        MockReply::NetworkError(message) => AquaError::Request {
            url: url.to_string(),
            message,
        },
        _ => AquaError::MalformedResponse {
            url: url.to_string(),
            message: "missing field `predicted_usage`".to_string(),
        },
    }
}
