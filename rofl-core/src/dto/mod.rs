//! Data Transfer Objects for the scheduler API
//!
//! Request bodies sent to the ROFL scheduler and the response schemas
//! they are validated against on the way back.

pub mod auth;
pub mod logs;
