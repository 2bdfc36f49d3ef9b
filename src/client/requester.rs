//! Client-side orchestration of the envelope exchange.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::capability::food_safety::{CAPABILITY_ENDPOINT, CAPABILITY_NAME, FOOD_ITEM_FIELD};
use crate::capability::FoodSafetyVerdict;
use crate::config::ClientSettings;
use crate::core::identity::{client_identity, service_address, AGENT_VERSION, CLIENT_NAME};
use crate::core::{DiscoveryDocument, HealthReport};
use crate::protocol::{build_request, validate_response, AgentIdentity, CapabilityInput, Outcome};
use crate::web::router::{DISCOVERY_PATH, HEALTH_PATH};

/// Why an exchange did not produce a result.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server error: {0}")]
    ServerStatus(u16),

    #[error("Invalid JSON response: {0}")]
    MalformedResponse(String),

    #[error("Invalid A2A response format: {0}")]
    InvalidResponse(String),

    #[error("Service error: {message}")]
    Service { code: String, message: String },
}

pub type Result<T> = std::result::Result<T, RequestError>;

/// Sends request envelopes to one service endpoint.
pub struct Requester {
    client: Client,
    base_url: String,
    identity: AgentIdentity,
    recipient: AgentIdentity,
    service: String,
    endpoint: String,
    timeout: Duration,
    discovery_timeout: Duration,
}

impl Requester {
    /// Requester for the food-safety capability.
    pub fn new(settings: &ClientSettings) -> crate::error::Result<Self> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", CLIENT_NAME, AGENT_VERSION))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.server_url.trim_end_matches('/').to_string(),
            identity: client_identity(),
            recipient: service_address(),
            service: CAPABILITY_NAME.to_string(),
            endpoint: CAPABILITY_ENDPOINT.to_string(),
            timeout: Duration::from_secs(settings.timeout_secs),
            discovery_timeout: Duration::from_secs(settings.discovery_timeout_secs),
        })
    }

    /// Target a different capability on the same server.
    pub fn with_capability(mut self, service: impl Into<String>, endpoint: impl Into<String>) -> Self {
        self.service = service.into();
        self.endpoint = endpoint.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one exchange and return the capability result.
    pub async fn check(&self, input: CapabilityInput) -> Result<Value> {
        let request = build_request(
            self.identity.clone(),
            self.recipient.clone(),
            self.service.clone(),
            input,
        );
        let request_id = request.id.clone();

        tracing::info!("Sending A2A request {} to {}", request_id, self.service);

        let response = self
            .client
            .post(format!("{}{}", self.base_url, self.endpoint))
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error: {}", e);
                RequestError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error: {}", status);
            return Err(RequestError::ServerStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let raw: Value = serde_json::from_slice(&body).map_err(|e| {
            tracing::error!("JSON decode error: {}", e);
            RequestError::MalformedResponse(e.to_string())
        })?;

        let envelope = validate_response(&raw, &request_id).map_err(|e| {
            tracing::error!("Rejected response to {}: {}", request_id, e);
            RequestError::InvalidResponse(e.reason().to_string())
        })?;

        match envelope.payload.outcome() {
            Some(Outcome::Success(result)) => Ok(result),
            Some(Outcome::Failure(error)) => Err(RequestError::Service {
                code: error.code,
                message: error.message,
            }),
            None => Err(RequestError::InvalidResponse(
                "Response payload must carry exactly one of 'result' or 'error'".to_string(),
            )),
        }
    }

    /// Fetch the service's discovery document.
    pub async fn discover(&self) -> Result<DiscoveryDocument> {
        self.get_json(DISCOVERY_PATH).await
    }

    /// Fetch the service's health report.
    pub async fn health(&self) -> Result<HealthReport> {
        self.get_json(HEALTH_PATH).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .timeout(self.discovery_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::ServerStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| RequestError::MalformedResponse(e.to_string()))
    }
}

/// Anything that can answer a food-safety question.
#[async_trait]
pub trait SafetyCheck: Send + Sync {
    async fn check_food_safety(&self, food_item: &str) -> Result<FoodSafetyVerdict>;
}

#[async_trait]
impl SafetyCheck for Requester {
    async fn check_food_safety(&self, food_item: &str) -> Result<FoodSafetyVerdict> {
        let mut input = CapabilityInput::new();
        input.insert(FOOD_ITEM_FIELD.to_string(), Value::String(food_item.to_string()));

        let result = self.check(input).await?;
        let verdict: FoodSafetyVerdict = serde_json::from_value(result)
            .map_err(|e| RequestError::MalformedResponse(e.to_string()))?;

        tracing::info!("Received response for {}: {:?}", food_item, verdict.status);
        Ok(verdict)
    }
}
