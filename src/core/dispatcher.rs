//! Service-side orchestration of one envelope exchange.
//!
//! Every inbound body ends in exactly one terminal state:
//! - not decodable JSON: rejected with a minimal, uncorrelated error
//! - fails validation: `INVALID_REQUEST` envelope, client-error class
//! - handler rejects the input: `INVALID_REQUEST` envelope, client-error class
//! - handler faults: `INTERNAL_ERROR` envelope with a generic message
//! - handler succeeds: success envelope

use serde_json::Value;
use std::sync::Arc;

use super::discovery::DiscoveryDocument;
use crate::capability::{CapabilityError, CapabilityHandler};
use crate::protocol::types::MALFORMED_PAYLOAD;
use crate::protocol::{
    build_response, validate_request, AgentIdentity, ErrorBody, Outcome, ReplyTo,
    ResponseEnvelope,
};

/// Outcome class of a dispatched exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    Ok,
    ClientError,
    ServerError,
}

/// Terminal state of one dispatched body.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// An envelope answering the request
    Responded {
        status: DispatchStatus,
        envelope: ResponseEnvelope,
    },
    /// The body could not be read as an envelope at all
    Rejected(ErrorBody),
}

impl Dispatch {
    /// Reject a transport payload before any envelope can be built.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Rejected(ErrorBody::new(MALFORMED_PAYLOAD, message))
    }

    pub fn status(&self) -> DispatchStatus {
        match self {
            Self::Responded { status, .. } => *status,
            Self::Rejected(_) => DispatchStatus::ClientError,
        }
    }
}

/// Stateless request handler. Safe to share across connections.
pub struct Dispatcher {
    handler: Arc<dyn CapabilityHandler>,
    identity: AgentIdentity,
}

impl Dispatcher {
    pub fn new(handler: Arc<dyn CapabilityHandler>, identity: AgentIdentity) -> Self {
        Self { handler, identity }
    }

    /// Discovery document listing the capability this dispatcher serves.
    pub fn discovery(&self) -> DiscoveryDocument {
        DiscoveryDocument {
            services: vec![self.handler.descriptor().clone()],
        }
    }

    /// Decode a raw transport body and dispatch it.
    pub fn dispatch_bytes(&self, body: &[u8]) -> Dispatch {
        match serde_json::from_slice::<Value>(body) {
            Ok(raw) => self.dispatch(&raw),
            Err(e) => {
                tracing::warn!("Rejected malformed payload: {}", e);
                Dispatch::malformed(format!("Request body is not valid JSON: {}", e))
            }
        }
    }

    /// Validate a decoded body and run the capability.
    pub fn dispatch(&self, raw: &Value) -> Dispatch {
        let capability = self.handler.descriptor();
        let request_id = raw.get("id").and_then(Value::as_str);
        tracing::info!("Received A2A request: {}", request_id.unwrap_or("<none>"));

        let request = match validate_request(raw, capability) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("Invalid A2A request: {}", e);
                return self.respond(
                    &ReplyTo::from_raw(raw),
                    &capability.name,
                    DispatchStatus::ClientError,
                    Outcome::Failure(ErrorBody::invalid_request(e.reason())),
                );
            }
        };

        let origin = ReplyTo::from(&request);
        let service = request.payload.service.as_str();

        let (status, outcome) = match self.handler.handle(service, &request.payload.input) {
            Ok(result) => (DispatchStatus::Ok, Outcome::Success(result)),
            Err(e @ (CapabilityError::Unsupported(_) | CapabilityError::InvalidInput(_))) => {
                tracing::warn!("Capability rejected request {}: {}", request.id, e);
                (
                    DispatchStatus::ClientError,
                    Outcome::Failure(ErrorBody::invalid_request(e.to_string())),
                )
            }
            Err(CapabilityError::Internal(detail)) => {
                tracing::error!("Error processing request {}: {}", request.id, detail);
                (DispatchStatus::ServerError, Outcome::Failure(ErrorBody::internal()))
            }
        };

        self.respond(&origin, service, status, outcome)
    }

    fn respond(
        &self,
        origin: &ReplyTo,
        service: &str,
        status: DispatchStatus,
        outcome: Outcome,
    ) -> Dispatch {
        let envelope = build_response(origin, self.identity.clone(), service, outcome);
        tracing::info!(
            "Responded to {} with {:?}",
            origin.correlation_id.as_deref().unwrap_or("<uncorrelated>"),
            status
        );
        Dispatch::Responded { status, envelope }
    }
}
