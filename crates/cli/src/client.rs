//! API client for communicating with the House Price Predictor API

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// API client for the House Price Predictor API
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::decode(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::decode(response).await
    }

    /// Surface the server's `detail` message on non-2xx responses
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.detail)
                .unwrap_or(body);
            anyhow::bail!("API error ({}): {}", status, detail);
        }

        response.json().await.context("Failed to parse response")
    }

    pub async fn health(&self) -> Result<HealthReport> {
        self.get("health").await
    }

    pub async fn model_info(&self) -> Result<ModelInfo> {
        self.get("model/info").await
    }

    pub async fn predict(&self, house: &HouseAttributes) -> Result<Prediction> {
        self.post("predict", house).await
    }

    pub async fn example(&self) -> Result<ExamplePrediction> {
        self.get("predict/example").await
    }
}

// API request/response types

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// The twelve raw attributes accepted by `POST /predict`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseAttributes {
    pub area: f64,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub stories: u8,
    pub mainroad: u8,
    pub guestroom: u8,
    pub basement: u8,
    pub hotwaterheating: u8,
    pub airconditioning: u8,
    pub parking: u8,
    pub prefarea: u8,
    pub furnishingstatus: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub price: f64,
    pub formatted_price: String,
    pub price_per_sqft: f64,
    pub confidence: String,
    pub features_used: HouseAttributes,
    pub prediction_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamplePrediction {
    pub example_input: HouseAttributes,
    pub prediction: Prediction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub performance_metrics: Option<serde_json::Value>,
    pub feature_names: Vec<String>,
    pub training_date: String,
    pub model_version: String,
    #[serde(default)]
    pub artifact_file: String,
    #[serde(default)]
    pub artifact_checksum: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentReport {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub model_loaded: bool,
    pub timestamp: String,
    #[serde(default)]
    pub predictions_total: u64,
    #[serde(default)]
    pub prediction_errors_total: u64,
    #[serde(default)]
    pub components: BTreeMap<String, ComponentReport>,
}
