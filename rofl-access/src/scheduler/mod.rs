//! Scheduler polling layer
//!
//! Keeps a machine instance's logs fresh by polling its scheduler on an
//! interval while a session token is available.

pub mod poller;

pub use poller::{DEFAULT_POLL_INTERVAL, LogPoller, LogState, LogTarget, fetch_logs};
