//! Agent identities used on each side of the exchange.

use crate::protocol::AgentIdentity;

pub const SERVICE_AGENT_ID: &str = "chicken-food-safety-service";
pub const SERVICE_NAME: &str = "Chicken Food Safety Service";
pub const CLIENT_AGENT_ID: &str = "chicken-food-safety-client";
pub const CLIENT_NAME: &str = "Chicken Food Safety Client";
pub const AGENT_VERSION: &str = "1.0";

/// Identity the service signs its responses with.
pub fn service_identity() -> AgentIdentity {
    AgentIdentity::new(SERVICE_AGENT_ID, SERVICE_NAME).with_version(AGENT_VERSION)
}

/// Identity the requester signs its requests with.
pub fn client_identity() -> AgentIdentity {
    AgentIdentity::new(CLIENT_AGENT_ID, CLIENT_NAME).with_version(AGENT_VERSION)
}

/// How the requester addresses the service. Carries no version, as the
/// client does not know which one it will reach.
pub fn service_address() -> AgentIdentity {
    AgentIdentity::new(SERVICE_AGENT_ID, SERVICE_NAME)
}
