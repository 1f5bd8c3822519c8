//! Domain types

pub mod log;
pub mod siwe;
pub mod token;
