//! Message envelopes with correlation IDs for request/response exchanges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{
    AgentIdentity, CapabilityInput, MessageType, Outcome, RequestPayload, ResponsePayload,
    PROTOCOL_VERSION,
};

/// Message envelope wrapping a role-specific payload with metadata.
///
/// Envelopes are never mutated after construction; the builders below are
/// the only way this crate creates them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<P> {
    /// Protocol version
    pub version: String,
    /// Unique message ID (UUID v4)
    pub id: String,
    /// Creation instant
    pub timestamp: DateTime<Utc>,
    /// Envelope role
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// ID of the request this envelope answers (responses only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Required on requests; a response without one decodes as anonymous
    #[serde(default)]
    pub sender: AgentIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<AgentIdentity>,
    pub payload: P,
}

pub type RequestEnvelope = Envelope<RequestPayload>;
pub type ResponseEnvelope = Envelope<ResponsePayload>;

/// Where a response goes: the request ID to correlate with and the
/// identity to address it to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyTo {
    pub correlation_id: Option<String>,
    pub recipient: Option<AgentIdentity>,
}

impl ReplyTo {
    /// Salvage reply details from a decoded body that may not be a valid
    /// request. Missing or ill-shaped fields are left empty.
    pub fn from_raw(raw: &Value) -> Self {
        let correlation_id = raw.get("id").and_then(Value::as_str).map(str::to_string);
        let recipient = raw
            .get("sender")
            .cloned()
            .and_then(|sender| serde_json::from_value(sender).ok());

        Self {
            correlation_id,
            recipient,
        }
    }
}

impl From<&RequestEnvelope> for ReplyTo {
    fn from(request: &RequestEnvelope) -> Self {
        Self {
            correlation_id: Some(request.id.clone()),
            recipient: Some(request.sender.clone()),
        }
    }
}

/// Build a request envelope for `service` carrying `input`.
pub fn build_request(
    sender: AgentIdentity,
    recipient: AgentIdentity,
    service: impl Into<String>,
    input: CapabilityInput,
) -> RequestEnvelope {
    Envelope {
        version: PROTOCOL_VERSION.to_string(),
        id: generate_id(),
        timestamp: Utc::now(),
        message_type: MessageType::Request,
        correlation_id: None,
        sender,
        recipient: Some(recipient),
        payload: RequestPayload {
            service: service.into(),
            input,
        },
    }
}

/// Build a response envelope answering `origin`.
pub fn build_response(
    origin: &ReplyTo,
    sender: AgentIdentity,
    service: impl Into<String>,
    outcome: Outcome,
) -> ResponseEnvelope {
    Envelope {
        version: PROTOCOL_VERSION.to_string(),
        id: generate_id(),
        timestamp: Utc::now(),
        message_type: MessageType::Response,
        correlation_id: origin.correlation_id.clone(),
        sender,
        recipient: origin.recipient.clone(),
        payload: ResponsePayload::new(service, outcome),
    }
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
