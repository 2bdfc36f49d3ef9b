//! Discovery and health metadata served next to the envelope exchange.
//!
//! These are plain JSON documents, not envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identity::{AGENT_VERSION, SERVICE_AGENT_ID};
use crate::capability::CapabilityDescriptor;

/// Capabilities a service advertises.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoveryDocument {
    pub services: Vec<CapabilityDescriptor>,
}

/// Liveness report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    /// Report for a running service, stamped now.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: SERVICE_AGENT_ID.to_string(),
            version: AGENT_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
