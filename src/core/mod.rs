//! Core module - dispatch and service metadata.
//!
//! This module contains the service side of the exchange:
//! - Stateless dispatcher turning request bodies into response envelopes
//! - Agent identities for both ends
//! - Discovery and health documents

pub mod discovery;
pub mod dispatcher;
pub mod identity;

pub use discovery::{DiscoveryDocument, HealthReport};
pub use dispatcher::{Dispatch, DispatchStatus, Dispatcher};
