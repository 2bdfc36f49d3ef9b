//! Capability handlers invoked once a request envelope is validated.

pub mod descriptor;
pub mod food_safety;

use serde_json::Value;
use thiserror::Error;

use crate::protocol::CapabilityInput;

pub use descriptor::{CapabilityDescriptor, InputSchema, PropertySchema};
pub use food_safety::{FoodSafetyHandler, FoodSafetyVerdict, FoodTables, SafetyStatus};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("Unsupported capability: {0}")]
    Unsupported(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal fault: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CapabilityError>;

/// Business logic behind one named capability.
pub trait CapabilityHandler: Send + Sync {
    /// Metadata for the capability this handler serves.
    fn descriptor(&self) -> &CapabilityDescriptor;

    /// Run the capability against validated input.
    fn handle(&self, capability: &str, input: &CapabilityInput) -> Result<Value>;
}
