//! coopguard library root.

pub mod capability;
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod web;

pub use capability::{CapabilityHandler, FoodSafetyHandler, FoodTables};
pub use client::{RequestError, Requester, SafetyCheck};
pub use config::Settings;
pub use crate::core::{Dispatch, Dispatcher};
pub use error::{Error, Result};
pub use protocol::{build_request, build_response, Envelope};
pub use web::run_server;
