//! Core domain models shared across all TSMP services.
//!
//! These are the "truth" types: what the database stores and the API serializes.

pub mod account;
pub mod application;
pub mod market;
pub mod user;

/// Re-export all model types for convenience.
pub use account::*;
pub use application::*;
pub use market::*;
pub use user::*;
