use async_trait::async_trait;
use dotenv::dotenv;
use reqwest::Client;
use std::env;
use std::error::Error;
use std::fmt;

use super::endpoints::{ApiErrorBody, MealRequest, RecipeResult, SaveFamilyRequest};
use crate::catalog::recency::UsageCounters;

const API_URL_ENV_VAR: &str = "MEALFLOW_API_URL";
const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Shown when a failure response carries no usable detail. Never empty.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to generate a meal. Please try again in a moment.";

#[derive(Debug)]
pub enum MealApiError {
    NetworkError(reqwest::Error),
    SerializationError(serde_json::Error),
    ApiError {
        status: reqwest::StatusCode,
        detail: Option<String>,
    },
}

impl fmt::Display for MealApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealApiError::NetworkError(err) => write!(f, "Network error: {}", err),
            MealApiError::SerializationError(err) => {
                write!(f, "Serialization error: {}", err)
            }
            MealApiError::ApiError { status, detail } => match detail {
                Some(detail) => write!(f, "API error {}: {}", status, detail),
                None => write!(f, "API error {}", status),
            },
        }
    }
}

impl Error for MealApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MealApiError::NetworkError(err) => Some(err),
            MealApiError::SerializationError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MealApiError {
    fn from(err: reqwest::Error) -> Self {
        MealApiError::NetworkError(err)
    }
}

impl From<serde_json::Error> for MealApiError {
    fn from(err: serde_json::Error) -> Self {
        MealApiError::SerializationError(err)
    }
}

impl MealApiError {
    /// Human-readable message for the inline error area. A failure body's
    /// `detail` is passed through verbatim; everything else falls back to a
    /// description of the underlying failure, never an empty string.
    pub fn user_message(&self) -> String {
        match self {
            MealApiError::ApiError {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            MealApiError::ApiError { .. } => GENERIC_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// The remote collaborators this client depends on: meal generation, family
/// persistence and usage counters. Object-safe so the orchestrator can run
/// against a test double.
#[async_trait]
pub trait MealApi: Send + Sync {
    async fn generate_meal(&self, request: &MealRequest) -> Result<RecipeResult, MealApiError>;
    async fn save_family(&self, request: &SaveFamilyRequest) -> Result<(), MealApiError>;
    async fn usage_counters(&self, email: &str) -> Result<UsageCounters, MealApiError>;
}

/// reqwest-backed implementation talking to the MealFlow backend.
pub struct HttpMealApi {
    base_url: String,
    client: Client,
}

impl HttpMealApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        HttpMealApi {
            base_url,
            client: Client::new(),
        }
    }

    /// Reads the backend URL from `MEALFLOW_API_URL` (via `.env` when
    /// present), defaulting to the local development server.
    pub fn from_env() -> Self {
        dotenv().ok();
        let base_url = env::var(API_URL_ENV_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        HttpMealApi::new(base_url)
    }

    async fn failure_from(response: reqwest::Response) -> MealApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail);
        MealApiError::ApiError { status, detail }
    }
}

#[async_trait]
impl MealApi for HttpMealApi {
    async fn generate_meal(&self, request: &MealRequest) -> Result<RecipeResult, MealApiError> {
        let url = format!("{}/generate_meal", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        if response.status().is_success() {
            let body = response.text().await?;
            // A 2xx with a body that does not match the recipe shape is a
            // malformed result, not a usable partial one.
            serde_json::from_str(&body).map_err(MealApiError::SerializationError)
        } else {
            Err(Self::failure_from(response).await)
        }
    }

    async fn save_family(&self, request: &SaveFamilyRequest) -> Result<(), MealApiError> {
        let url = format!("{}/save_family", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::failure_from(response).await)
        }
    }

    async fn usage_counters(&self, email: &str) -> Result<UsageCounters, MealApiError> {
        let url = format!("{}/usage_counters/{}", self.base_url, email);
        let response = self.client.get(&url).send().await?;

        // Absent or malformed counters are treated as all-zero; the ranking
        // degrades to the plain catalog rather than failing the view.
        if !response.status().is_success() {
            return Ok(UsageCounters::new());
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}
