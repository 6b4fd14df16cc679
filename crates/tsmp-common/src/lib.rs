//! # tsmp-common
//!
//! Shared types, configuration, error handling, and utilities used across all TSMP crates.
//! No business logic lives here, only primitives and contracts.

pub mod config;
pub mod error;
pub mod models;
pub mod snowflake;
pub mod validation;
