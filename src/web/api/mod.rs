//! API endpoints module.

pub mod exchange;
pub mod meta;

pub use exchange::exchange;
pub use meta::{discovery, health};
