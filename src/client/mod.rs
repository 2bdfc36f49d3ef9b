//! Client side of the exchange: requester, result formatting, interactive loop.

pub mod format;
pub mod interactive;
pub mod requester;

pub use format::format_verdict;
pub use interactive::{run_loop, stdin_lines};
pub use requester::{RequestError, Requester, SafetyCheck};
