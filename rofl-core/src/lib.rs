//! ROFL Core
//!
//! Core types shared by the ROFL scheduler client, the machine access flow and the CLI.
//!
//! This crate contains:
//! - Domain types: Session tokens, SIWE sign-in messages, log snapshots
//! - DTOs: Request and response bodies of the scheduler HTTP API

pub mod domain;
pub mod dto;
