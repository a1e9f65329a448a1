//! HTTP implementation of the prediction API using `reqwest`.

use crate::adapters::http::{PredictionApi, PredictionRequest, PredictionResponse, StoredPrediction};
use crate::config::{EndpointConfig, HttpConfig};
use crate::error::{AquaError, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use std::time::Duration;

/// Prediction API client talking to the real services.
#[derive(Debug, Clone)]
pub struct HttpPredictionApi {
    http: reqwest::Client,
    predict_url: String,
    store_url: String,
}

impl HttpPredictionApi {
    /// Creates a client for the configured endpoints.
    ///
    /// # Errors
    ///
    /// Returns `AquaError::HttpClientBuild` if the TLS backend cannot be
    /// initialised.
    pub fn new(endpoints: &EndpointConfig, settings: &HttpConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()
            .map_err(|e| AquaError::HttpClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            predict_url: format!("{}/predict", endpoints.prediction_url),
            store_url: format!("{}/predictions", endpoints.backend_url),
        })
    }

    /// Full URL of the prediction endpoint.
    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Full URL of the backend storage endpoint.
    pub fn store_url(&self) -> &str {
        &self.store_url
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionApi {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        let url = &self.predict_url;
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| request_error(url, e))?;
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), body = %body, "prediction request rejected");
            return Err(AquaError::UnexpectedStatus {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        parse_prediction(url, &body)
    }

    async fn store_prediction(&self, token: &str, prediction: &StoredPrediction) -> Result<()> {
        let url = &self.store_url;
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, token)
            .json(prediction)
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AquaError::UnexpectedStatus {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

fn request_error(url: &str, e: reqwest::Error) -> AquaError {
    AquaError::Request {
        url: url.to_string(),
        message: e.to_string(),
    }
}

fn parse_prediction(url: &str, body: &str) -> Result<PredictionResponse> {
    serde_json::from_str::<PredictionResponse>(body).map_err(|e| AquaError::MalformedResponse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_joined_to_bases() {
        let endpoints = EndpointConfig {
            prediction_url: "http://ml.local:8000".into(),
            backend_url: "http://api.local/api".into(),
        };
        let api = HttpPredictionApi::new(&endpoints, &HttpConfig::default()).unwrap();

        assert_eq!(api.predict_url(), "http://ml.local:8000/predict");
        assert_eq!(api.store_url(), "http://api.local/api/predictions");
    }

    #[test]
    fn test_parse_prediction_accepts_integer_usage() {
        let parsed = parse_prediction("u", r#"{"predicted_usage": 342}"#).unwrap();
        assert_eq!(parsed.predicted_usage, 342.0);
    }

    #[test]
    fn test_parse_prediction_rejects_html() {
        let result = parse_prediction("http://ml/predict", "<html>502</html>");
        assert!(matches!(result, Err(AquaError::MalformedResponse { url, .. }) if url == "http://ml/predict"));
    }

    #[test]
    fn test_parse_prediction_rejects_null_usage() {
        assert!(parse_prediction("u", r#"{"predicted_usage": null}"#).is_err());
    }
}
