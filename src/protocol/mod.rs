//! Agent exchange protocol for coopguard.
//!
//! This module defines the envelope protocol shared by client and service:
//! - Request and response envelopes with correlation IDs
//! - Typed payloads with exactly one of result or error
//! - Fail-fast validation of decoded envelopes

pub mod envelope;
pub mod types;
pub mod validator;

pub use envelope::{build_request, build_response, Envelope, ReplyTo, RequestEnvelope, ResponseEnvelope};
pub use types::{
    AgentIdentity, CapabilityInput, ErrorBody, MessageType, Outcome, RequestPayload,
    ResponsePayload, PROTOCOL_VERSION,
};
pub use validator::{validate_request, validate_response, ValidationError};
