//! Message types for the agent exchange protocol.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol version stamped on every envelope.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Error code for requests rejected by validation.
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
/// Error code for faults inside the service.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
/// Error code for bodies that are not decodable structured data.
pub const MALFORMED_PAYLOAD: &str = "MALFORMED_PAYLOAD";

/// Envelope role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Client-originated envelope
    Request,
    /// Service-originated envelope answering a request
    Response,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
        }
    }
}

/// Identity record for the sender or recipient of an envelope.
///
/// The default is the anonymous identity: empty id and name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentIdentity {
    pub agent_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl AgentIdentity {
    pub fn new(agent_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Capability-specific input fields carried next to `service`.
pub type CapabilityInput = Map<String, Value>;

/// Request body: the capability name plus its input fields, flattened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestPayload {
    pub service: String,
    #[serde(flatten)]
    pub input: CapabilityInput,
}

/// Error record carried by failed responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(INVALID_REQUEST, message)
    }

    /// Generic internal error. Never carries the underlying fault.
    pub fn internal() -> Self {
        Self::new(INTERNAL_ERROR, "Internal server error")
    }
}

/// What a response reports: a result or an error, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    Failure(ErrorBody),
}

/// Response body as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponsePayload {
    pub success: bool,
    /// Empty when the responder did not name the service
    #[serde(default)]
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ResponsePayload {
    pub fn new(service: impl Into<String>, outcome: Outcome) -> Self {
        let service = service.into();
        match outcome {
            Outcome::Success(result) => Self {
                success: true,
                service,
                result: Some(result),
                error: None,
            },
            Outcome::Failure(error) => Self {
                success: false,
                service,
                result: None,
                error: Some(error),
            },
        }
    }

    /// Recover the outcome, or `None` when `success` disagrees with the
    /// populated fields.
    pub fn outcome(&self) -> Option<Outcome> {
        match (self.success, &self.result, &self.error) {
            (true, Some(result), None) => Some(Outcome::Success(result.clone())),
            (false, None, Some(error)) => Some(Outcome::Failure(error.clone())),
            _ => None,
        }
    }
}
