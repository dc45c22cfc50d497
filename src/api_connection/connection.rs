use dotenv::dotenv;
use reqwest::Client;
use std::env;
use std::error::Error;
use std::fmt;

use super::endpoints::{
    MessagesRequest, MessagesResponse, ANTHROPIC_MESSAGES_URL, ANTHROPIC_VERSION, DEFAULT_MODEL,
};

#[derive(Debug)]
pub enum ApiConnectionError {
    MissingApiKey(String),
    NetworkError(reqwest::Error),
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
}

impl fmt::Display for ApiConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiConnectionError::MissingApiKey(key_name) => {
                write!(f, "API key not found in environment: {}", key_name)
            }
            ApiConnectionError::NetworkError(err) => write!(f, "Network error: {}", err),
            ApiConnectionError::ApiError { status, error_body } => {
                write!(f, "API error {}: {}", status, error_body)
            }
        }
    }
}

impl Error for ApiConnectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiConnectionError::NetworkError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiConnectionError {
    fn from(err: reqwest::Error) -> Self {
        ApiConnectionError::NetworkError(err)
    }
}

#[derive(Debug, Clone)]
pub enum Provider {
    Anthropic {
        api_key_env_var: String,
        model: String,
    },
}

impl Provider {
    pub fn anthropic(api_key_env_var: &str) -> Self {
        dotenv().ok();
        Self::Anthropic {
            api_key_env_var: api_key_env_var.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn anthropic_with_model(api_key_env_var: &str, model: &str) -> Self {
        dotenv().ok();
        Self::Anthropic {
            api_key_env_var: api_key_env_var.to_string(),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::Anthropic { model, .. } => model,
        }
    }

    pub async fn call_messages(
        &self,
        request: MessagesRequest,
    ) -> Result<MessagesResponse, ApiConnectionError> {
        match self {
            Provider::Anthropic {
                api_key_env_var, ..
            } => {
                dotenv().ok();
                let api_key = env::var(api_key_env_var)
                    .map_err(|_| ApiConnectionError::MissingApiKey(api_key_env_var.clone()))?;

                let client = Client::new();
                let response = client
                    .post(ANTHROPIC_MESSAGES_URL)
                    .header("x-api-key", api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .header("Content-Type", "application/json")
                    .json(&request)
                    .send()
                    .await?;

                if response.status().is_success() {
                    let messages_response = response.json::<MessagesResponse>().await?;
                    Ok(messages_response)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }
}
